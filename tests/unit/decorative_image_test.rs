//! Unit tests for the new-tab decorative image: response parsing and the
//! failure paths that never touch the network.

use minibrowser::host::events::{event_channel, ShellEvent};
use minibrowser::services::decorative_image::{parse_random_photo, DecorativeImage, ImageFetcher};
use minibrowser::services::placeholder_page::{ImageSlot, PlaceholderPage};
use minibrowser::types::errors::ImageError;
use minibrowser::types::settings::DecorativeImageSettings;
use minibrowser::types::tab::TabId;
use rstest::rstest;

#[test]
fn test_parse_full_response() {
    let body = r#"{
        "id": "abc",
        "urls": {"raw": "https://img/raw", "regular": "https://img/regular"},
        "alt_description": "a foggy forest",
        "user": {"name": "Ada Lovelace"}
    }"#;
    let image = parse_random_photo(body).unwrap();
    assert_eq!(
        image,
        DecorativeImage {
            url: "https://img/regular".to_string(),
            alt: "a foggy forest".to_string(),
            credit: Some("Ada Lovelace".to_string()),
        }
    );
}

#[test]
fn test_parse_falls_back_to_smaller_sizes_and_default_alt() {
    let body = r#"{"urls": {"small": "https://img/small"}, "alt_description": null}"#;
    let image = parse_random_photo(body).unwrap();
    assert_eq!(image.url, "https://img/small");
    assert_eq!(image.alt, "Decorative image");
    assert_eq!(image.credit, None);
}

#[rstest]
#[case("not json")]
#[case("{}")]
#[case(r#"{"urls": {}}"#)]
#[case(r#"{"urls": {"regular": 42}}"#)]
fn test_parse_rejects_unusable_bodies(#[case] body: &str) {
    assert!(matches!(parse_random_photo(body), Err(ImageError::Parse(_))));
}

#[test]
fn test_missing_credential_posts_error_immediately() {
    let settings = DecorativeImageSettings::default();
    let fetcher = ImageFetcher::with_access_key(&settings, None);
    assert!(fetcher.is_enabled());

    let (sink, mut rx) = event_channel();
    let tab = TabId::from("t1");
    fetcher.request(tab.clone(), sink);
    match rx.try_recv().unwrap() {
        ShellEvent::DecorativeImageReady { tab: t, image } => {
            assert_eq!(t, tab);
            assert_eq!(
                image,
                Err(ImageError::MissingCredential("UNSPLASH_ACCESS_KEY".to_string()))
            );
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn test_disabled_fetcher_posts_disabled() {
    let settings = DecorativeImageSettings {
        enabled: false,
        ..DecorativeImageSettings::default()
    };
    let fetcher = ImageFetcher::with_access_key(&settings, Some("key".to_string()));
    assert!(!fetcher.is_enabled());

    let (sink, mut rx) = event_channel();
    fetcher.request(TabId::from("t1"), sink);
    assert!(matches!(
        rx.try_recv().unwrap(),
        ShellEvent::DecorativeImageReady {
            image: Err(ImageError::Disabled),
            ..
        }
    ));
}

#[test]
fn test_placeholder_renders_each_slot() {
    let page = PlaceholderPage::default();
    let image = DecorativeImage {
        url: "https://img/regular".to_string(),
        alt: "fog & trees".to_string(),
        credit: Some("Ada".to_string()),
    };

    assert!(!page.render(ImageSlot::Omitted).contains("<figure"));
    assert!(page.render(ImageSlot::Loading).contains("hero loading"));
    let ready = page.render(ImageSlot::Ready(&image));
    assert!(ready.contains("src=\"https://img/regular\""));
    assert!(ready.contains("alt=\"fog &amp; trees\""));
    assert!(ready.contains("Photo by Ada"));
    assert!(page.render(ImageSlot::Failed).contains("Image unavailable"));
    assert!(ready.contains("<title>New Tab</title>"));
}
