//! File id extraction from platform URLs, and image-link detection.

use std::sync::OnceLock;

use regex::Regex;

/// File extensions treated as inline images in summaries.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

fn path_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"/(?:d|folders|file/d)/([A-Za-z0-9_-]{10,})").expect("static regex")
    })
}

fn query_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[?&]id=([A-Za-z0-9_-]{10,})").expect("static regex"))
}

fn bare_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{10,}$").expect("static regex"))
}

/// Extract a file id from a share URL, or accept a bare id.
///
/// Handles `/d/<id>/...`, `/folders/<id>`, and `?id=<id>` forms.
///
/// ```
/// use subrev_core::links::extract_file_id;
///
/// assert_eq!(
///     extract_file_id("https://docs.google.com/spreadsheets/d/1AbCdEfGhIjK/edit#gid=0").as_deref(),
///     Some("1AbCdEfGhIjK"),
/// );
/// assert_eq!(extract_file_id("1AbCdEfGhIjK").as_deref(), Some("1AbCdEfGhIjK"));
/// ```
pub fn extract_file_id(input: &str) -> Option<String> {
    let input = input.trim();
    if bare_id_pattern().is_match(input) {
        return Some(input.to_string());
    }
    path_id_pattern()
        .captures(input)
        .or_else(|| query_id_pattern().captures(input))
        .map(|caps| caps[1].to_string())
}

fn is_drive_url(url: &str) -> bool {
    url.starts_with("https://drive.google.com/") || url.starts_with("https://docs.google.com/")
}

/// Whether a cell value should be rendered as an inline image.
///
/// Drive file links qualify, as does any http(s) URL whose path ends in a
/// known image extension.
pub fn is_image_link(value: &str) -> bool {
    let value = value.trim();
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return false;
    }
    if is_drive_url(value) {
        return value.contains("/file/d/") || value.contains("open?id=") || value.contains("uc?");
    }
    let path = value.split(['?', '#']).next().unwrap_or(value);
    path.rsplit_once('.')
        .map(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// A URL the document service can fetch an image from directly.
///
/// Drive share links are rewritten to the `uc?export=view` form; other URLs
/// are returned unchanged.
pub fn fetchable_image_url(value: &str) -> String {
    let value = value.trim();
    if is_drive_url(value) {
        if let Some(id) = extract_file_id(value) {
            return format!("https://drive.google.com/uc?export=view&id={id}");
        }
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_common_forms() {
        assert_eq!(
            extract_file_id("https://drive.google.com/drive/folders/0B_abcdefghijk?usp=sharing")
                .as_deref(),
            Some("0B_abcdefghijk")
        );
        assert_eq!(
            extract_file_id("https://drive.google.com/file/d/1xYz-1234567/view").as_deref(),
            Some("1xYz-1234567")
        );
        assert_eq!(
            extract_file_id("https://drive.google.com/open?id=1xYz-1234567").as_deref(),
            Some("1xYz-1234567")
        );
    }

    #[test]
    fn rejects_unrecognised_input() {
        assert_eq!(extract_file_id("https://example.org/page"), None);
        assert_eq!(extract_file_id("short"), None);
        assert_eq!(extract_file_id(""), None);
    }

    #[test]
    fn detects_images() {
        assert!(is_image_link("https://cdn.example.org/a/photo.JPG"));
        assert!(is_image_link("https://cdn.example.org/a/photo.png?size=large"));
        assert!(is_image_link("https://drive.google.com/file/d/1xYz-1234567/view"));
        assert!(!is_image_link("https://drive.google.com/drive/folders/0B_abcdefghijk"));
        assert!(!is_image_link("https://example.org/report.pdf"));
        assert!(!is_image_link("photo.png"));
    }

    #[test]
    fn drive_links_become_fetchable() {
        assert_eq!(
            fetchable_image_url("https://drive.google.com/file/d/1xYz-1234567/view?usp=sharing"),
            "https://drive.google.com/uc?export=view&id=1xYz-1234567"
        );
        assert_eq!(
            fetchable_image_url("https://cdn.example.org/a.png"),
            "https://cdn.example.org/a.png"
        );
    }
}
