//! Address-bar input resolution.
//!
//! Turns raw address-bar text into a [`NavigationTarget`]. Text that parses as a
//! URL *and* contains a `.` is loaded directly; anything else becomes a search.
//! The `.` test is the only signal, so single-label hosts such as
//! `localhost` are searched for rather than visited.
//!
//! Purely local string handling: no DNS lookups, no network access.

use log::warn;
use url::form_urlencoded::byte_serialize;
use url::Url;

use crate::types::navigation::NavigationTarget;
use crate::types::settings::NavigationSettings;

/// Schemes accepted as written even without `//` after the colon.
const BARE_SCHEMES: &[&str] = &["about", "data", "file", "mailto", "javascript", "blob"];

/// Resolves address-bar text into something the engine can load.
#[derive(Debug, Clone)]
pub struct NavigationResolver {
    search_url_template: String,
    default_scheme: String,
}

impl Default for NavigationResolver {
    fn default() -> Self {
        Self::from_settings(&NavigationSettings::default())
    }
}

impl NavigationResolver {
    /// Builds a resolver from settings, falling back to the defaults for a
    /// search template that cannot produce a valid URL.
    pub fn from_settings(settings: &NavigationSettings) -> Self {
        let defaults = NavigationSettings::default();

        let template_ok = settings.search_url_template.contains("{}")
            && Url::parse(&settings.search_url_template.replace("{}", "q")).is_ok();
        let search_url_template = if template_ok {
            settings.search_url_template.clone()
        } else {
            warn!(
                "invalid search template '{}', using default",
                settings.search_url_template
            );
            defaults.search_url_template.clone()
        };

        let scheme = settings.default_scheme.trim().trim_end_matches("://");
        let default_scheme = if Url::parse(&format!("{}://example.org", scheme)).is_ok() {
            scheme.to_ascii_lowercase()
        } else {
            warn!("invalid default scheme '{}', using default", settings.default_scheme);
            defaults.default_scheme
        };

        Self {
            search_url_template,
            default_scheme,
        }
    }

    /// Resolves `text`. Returns `None` for empty (or whitespace-only) input.
    pub fn resolve(&self, text: &str) -> Option<NavigationTarget> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        match self.parse_user_input(trimmed) {
            Some(url) if text.contains('.') => Some(NavigationTarget::Direct(url)),
            _ => self.search(trimmed),
        }
    }

    /// Permissive "looks like a URL" parsing: an explicit scheme, or a valid
    /// host once the default scheme is prepended.
    fn parse_user_input(&self, text: &str) -> Option<Url> {
        if let Ok(url) = Url::parse(text) {
            if text.contains("://") || BARE_SCHEMES.contains(&url.scheme()) {
                return Some(url);
            }
        }

        let candidate = Url::parse(&format!("{}://{}", self.default_scheme, text)).ok()?;
        match candidate.host_str() {
            Some(host) if !host.is_empty() => Some(candidate),
            _ => None,
        }
    }

    fn search(&self, text: &str) -> Option<NavigationTarget> {
        let query = text
            .split_whitespace()
            .map(|token| byte_serialize(token.as_bytes()).collect::<String>())
            .collect::<Vec<_>>()
            .join("+");
        let url = Url::parse(&self.search_url_template.replace("{}", &query)).ok()?;
        Some(NavigationTarget::Search { query, url })
    }
}
