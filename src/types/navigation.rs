use std::fmt;

use url::Url;

/// A resolved absolute URL ready to be handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    /// The input was taken as a URL.
    Direct(Url),
    /// The input was taken as a search query; `query` is the `+`-joined form.
    Search { query: String, url: Url },
}

impl NavigationTarget {
    pub fn url(&self) -> &Url {
        match self {
            NavigationTarget::Direct(url) => url,
            NavigationTarget::Search { url, .. } => url,
        }
    }

    pub fn as_str(&self) -> &str {
        self.url().as_str()
    }

    pub fn is_search(&self) -> bool {
        matches!(self, NavigationTarget::Search { .. })
    }
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
