//! HTML for the history and download-history viewers.
//!
//! The pages are rendered as inline documents. Buttons post IPC messages
//! (`delete_visit`, `clear_visits`, `delete_download`, `delete_download_file`,
//! `clear_downloads`) carrying the row index.

use crate::services::placeholder_page::escape_html;
use crate::types::download::DownloadRow;

const PAGE_CSS: &str = "body{margin:0;padding:24px 32px;background:#222;color:#eee;\
font-family:-apple-system,\"Segoe UI\",Helvetica,Arial,sans-serif}\
h1{font-weight:400;font-size:20px}\
ul{list-style:none;padding:0}\
li{display:flex;align-items:center;gap:8px;padding:6px 0;border-bottom:1px solid #333}\
li span.entry{flex:1;overflow:hidden;text-overflow:ellipsis;white-space:nowrap}\
.missing{color:#f85149;font-size:12px}\
button{background:#333;color:#eee;border:1px solid #444;border-radius:4px;padding:2px 8px;cursor:pointer}\
.empty{color:#888}";

const PAGE_JS: &str = "function mb(cmd,index){if(window.ipc)window.ipc.postMessage(JSON.stringify({cmd:cmd,index:index}))}";

fn page(title: &str, clear_cmd: &str, items: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"><title>{title}</title>\
<style>{css}</style><script>{js}</script></head><body>\
<h1>{title}</h1><button onclick=\"mb('{clear}',null)\">Clear all</button>\
<ul>{items}</ul></body></html>",
        title = escape_html(title),
        css = PAGE_CSS,
        js = PAGE_JS,
        clear = clear_cmd,
        items = items
    )
}

/// Renders the browsing history viewer.
pub fn render_history_page(visits: &[String]) -> String {
    let items = if visits.is_empty() {
        "<li class=\"empty\">No history</li>".to_string()
    } else {
        visits
            .iter()
            .enumerate()
            .map(|(i, url)| {
                format!(
                    "<li><span class=\"entry\">{}</span>\
<button onclick=\"mb('delete_visit',{})\">Delete</button></li>",
                    escape_html(url),
                    i
                )
            })
            .collect()
    };
    page("History", "clear_visits", &items)
}

/// Renders the download history viewer. Missing files are flagged per row.
pub fn render_downloads_page(rows: &[DownloadRow]) -> String {
    let items = if rows.is_empty() {
        "<li class=\"empty\">No downloads</li>".to_string()
    } else {
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                let marker = if row.missing {
                    "<span class=\"missing\">missing</span>".to_string()
                } else {
                    format!(
                        "<button onclick=\"mb('delete_download_file',{})\">Delete file</button>",
                        i
                    )
                };
                format!(
                    "<li><span class=\"entry\">{}</span>{}\
<button onclick=\"mb('delete_download',{})\">Remove</button></li>",
                    escape_html(&row.path),
                    marker,
                    i
                )
            })
            .collect()
    };
    page("Download History", "clear_downloads", &items)
}
