//! Best-effort decorative image for the new-tab page.
//!
//! Fetches a random photo description from an image API on a background
//! runtime and posts the outcome back as `ShellEvent::DecorativeImageReady`.
//! Tab creation never waits for it, and every failure stays local.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tokio::runtime::{Builder, Runtime};

use crate::host::events::{EventSink, ShellEvent};
use crate::types::errors::ImageError;
use crate::types::settings::DecorativeImageSettings;
use crate::types::tab::TabId;

/// An image the placeholder page can embed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorativeImage {
    pub url: String,
    pub alt: String,
    pub credit: Option<String>,
}

/// Extracts a `DecorativeImage` from a random-photo API response body.
pub fn parse_random_photo(body: &str) -> Result<DecorativeImage, ImageError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ImageError::Parse(e.to_string()))?;

    let urls = json
        .get("urls")
        .ok_or_else(|| ImageError::Parse("missing 'urls'".to_string()))?;
    let url = ["regular", "small", "full", "raw"]
        .iter()
        .find_map(|size| urls.get(size).and_then(|v| v.as_str()))
        .ok_or_else(|| ImageError::Parse("no usable image size in 'urls'".to_string()))?;

    let alt = ["alt_description", "description"]
        .iter()
        .find_map(|key| json.get(key).and_then(|v| v.as_str()))
        .unwrap_or("Decorative image");
    let credit = json
        .get("user")
        .and_then(|u| u.get("name"))
        .and_then(|n| n.as_str())
        .map(str::to_string);

    Ok(DecorativeImage {
        url: url.to_string(),
        alt: alt.to_string(),
        credit,
    })
}

enum FetcherState {
    Disabled,
    NoCredential(String),
    Ready {
        endpoint: String,
        access_key: String,
        client: reqwest::Client,
        runtime: Runtime,
    },
}

/// Fire-and-forget fetcher for decorative images.
pub struct ImageFetcher {
    state: FetcherState,
}

impl ImageFetcher {
    /// Builds a fetcher, reading the access key from the environment variable
    /// named in `settings`.
    pub fn from_settings(settings: &DecorativeImageSettings) -> Self {
        let key = env::var(&settings.access_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        Self::with_access_key(settings, key)
    }

    /// Builds a fetcher with an explicit access key.
    pub fn with_access_key(settings: &DecorativeImageSettings, access_key: Option<String>) -> Self {
        if !settings.enabled {
            return Self {
                state: FetcherState::Disabled,
            };
        }
        let Some(access_key) = access_key else {
            debug!("${} not set, new-tab image disabled", settings.access_key_env);
            return Self {
                state: FetcherState::NoCredential(settings.access_key_env.clone()),
            };
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .build();
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("image-fetch")
            .enable_all()
            .build();

        let state = match (client, runtime) {
            (Ok(client), Ok(runtime)) => FetcherState::Ready {
                endpoint: settings.endpoint.clone(),
                access_key,
                client,
                runtime,
            },
            (Err(e), _) => {
                warn!("image client unavailable: {}", e);
                FetcherState::Disabled
            }
            (_, Err(e)) => {
                warn!("image runtime unavailable: {}", e);
                FetcherState::Disabled
            }
        };
        Self { state }
    }

    /// Whether fetching is switched on in settings.
    pub fn is_enabled(&self) -> bool {
        !matches!(self.state, FetcherState::Disabled)
    }

    /// Requests an image for `tab`. The outcome is always posted to `sink`,
    /// immediately when no request can be made.
    pub fn request(&self, tab: TabId, sink: Arc<dyn EventSink>) {
        match &self.state {
            FetcherState::Disabled => sink.post(ShellEvent::DecorativeImageReady {
                tab,
                image: Err(ImageError::Disabled),
            }),
            FetcherState::NoCredential(var) => sink.post(ShellEvent::DecorativeImageReady {
                tab,
                image: Err(ImageError::MissingCredential(var.clone())),
            }),
            FetcherState::Ready {
                endpoint,
                access_key,
                client,
                runtime,
            } => {
                let client = client.clone();
                let endpoint = endpoint.clone();
                let access_key = access_key.clone();
                runtime.spawn(async move {
                    let image = fetch_random_photo(&client, &endpoint, &access_key).await;
                    if let Err(e) = &image {
                        warn!("decorative image fetch failed: {}", e);
                    }
                    sink.post(ShellEvent::DecorativeImageReady { tab, image });
                });
            }
        }
    }
}

async fn fetch_random_photo(
    client: &reqwest::Client,
    endpoint: &str,
    access_key: &str,
) -> Result<DecorativeImage, ImageError> {
    let body = client
        .get(endpoint)
        .query(&[("client_id", access_key), ("orientation", "landscape")])
        .header("Accept-Version", "v1")
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| ImageError::Network(e.to_string()))?
        .text()
        .await
        .map_err(|e| ImageError::Network(e.to_string()))?;
    parse_random_photo(&body)
}
