pub mod client;
pub mod http;
pub mod local;

pub use client::{BlobError, BlobResult, BlobStore, StoredBlob};
pub use http::HttpBlobStore;
pub use local::LocalBlobStore;

/// `<unix millis>.<ext>` where `ext` comes from the uploaded file's name.
///
/// The extension is reduced to ASCII alphanumerics; names without a usable
/// extension get `bin`.
pub fn timestamped_name(original: &str, unix_millis: i64) -> String {
    let ext: String = original
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();

    let ext = if ext.is_empty() { "bin".to_string() } else { ext };
    format!("{unix_millis}.{ext}")
}
