//! Unit tests for address-bar input resolution.

use minibrowser::services::navigation_resolver::NavigationResolver;
use minibrowser::types::settings::NavigationSettings;
use rstest::rstest;

fn resolver() -> NavigationResolver {
    NavigationResolver::default()
}

/// Inputs that look like URLs and contain a dot are loaded directly.
#[rstest]
#[case("example.com", "http://example.com/")]
#[case("http://example.com", "http://example.com/")]
#[case("https://www.rust-lang.org/learn", "https://www.rust-lang.org/learn")]
#[case("example.com/path?x=1", "http://example.com/path?x=1")]
#[case("example.com:8080", "http://example.com:8080/")]
#[case("a.b", "http://a.b/")]
#[case("go.", "http://go./")]
#[case("  example.org  ", "http://example.org/")]
fn test_direct_urls(#[case] input: &str, #[case] expected: &str) {
    let target = resolver().resolve(input).expect("input should resolve");
    assert!(!target.is_search(), "{} should not be a search", input);
    assert_eq!(target.as_str(), expected);
}

/// Everything else becomes a search with `+`-joined tokens.
#[rstest]
#[case("how to bake bread", "how+to+bake+bread")]
#[case("rust", "rust")]
#[case("localhost", "localhost")]
#[case("what is rust-lang.org", "what+is+rust-lang.org")]
#[case("C++ tips", "C%2B%2B+tips")]
#[case("  spaced   out  ", "spaced+out")]
fn test_searches(#[case] input: &str, #[case] query: &str) {
    let target = resolver().resolve(input).expect("input should resolve");
    assert!(target.is_search(), "{} should be a search", input);
    assert_eq!(
        target.as_str(),
        format!("https://www.google.com/search?q={}", query)
    );
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\t\n")]
fn test_blank_input_is_ignored(#[case] input: &str) {
    assert!(resolver().resolve(input).is_none());
}

#[test]
fn test_explicit_scheme_without_dot_is_searched() {
    // No dot: even a parseable URL goes to the search engine.
    let target = resolver().resolve("http://localhost").unwrap();
    assert!(target.is_search());
}

#[test]
fn test_custom_search_template_and_scheme() {
    let resolver = NavigationResolver::from_settings(&NavigationSettings {
        search_url_template: "https://duckduckgo.com/?q={}".to_string(),
        default_scheme: "https".to_string(),
    });
    assert_eq!(
        resolver.resolve("hello world").unwrap().as_str(),
        "https://duckduckgo.com/?q=hello+world"
    );
    assert_eq!(
        resolver.resolve("example.com").unwrap().as_str(),
        "https://example.com/"
    );
}

#[test]
fn test_invalid_scheme_falls_back_to_default() {
    let resolver = NavigationResolver::from_settings(&NavigationSettings {
        default_scheme: "not a scheme".to_string(),
        ..NavigationSettings::default()
    });
    assert_eq!(
        resolver.resolve("example.com").unwrap().as_str(),
        "http://example.com/"
    );
}
