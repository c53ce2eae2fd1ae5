// MiniBrowser download naming
// Derives the saved file's extension from the download's source URL.

use std::path::{Path, PathBuf};

use url::Url;

/// Extension of the last path segment of `source_url`, without the dot.
pub fn extension_from_url(source_url: &str) -> Option<String> {
    let url = Url::parse(source_url).ok()?;
    let file_name = url.path_segments()?.next_back()?;
    let ext = Path::new(file_name).extension()?.to_str()?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_string())
    }
}

/// File name suggested to the save dialog: the URL's last path segment, or `download`.
pub fn suggested_file_name(source_url: &str) -> String {
    Url::parse(source_url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut s| s.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "download".to_string())
}

/// Appends the source URL's extension to `chosen` unless it already ends with it.
pub fn final_download_path(chosen: &Path, source_url: &str) -> PathBuf {
    let Some(ext) = extension_from_url(source_url) else {
        return chosen.to_path_buf();
    };
    let already = chosen
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(&ext));
    if already {
        return chosen.to_path_buf();
    }
    let mut name = chosen.as_os_str().to_os_string();
    name.push(".");
    name.push(&ext);
    PathBuf::from(name)
}
