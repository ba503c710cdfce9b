use base64::{engine::general_purpose::STANDARD, Engine};

pub mod multipart;

/// Inline `data:` URL for showing uploaded or generated images.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Blank form values mean "not given".
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Whether a JSON body lacks a non-blank string under `key`.
pub fn blank_field(body: &serde_json::Value, key: &str) -> bool {
    body.get(key)
        .and_then(serde_json::Value::as_str)
        .map_or(true, |value| value.trim().is_empty())
}
