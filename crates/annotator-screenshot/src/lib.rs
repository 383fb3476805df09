//! The Screenshot Sink (`§4.7`): a pure utility that decodes base64 bytes
//! and writes them under a per-user cache directory with a time-stamped
//! name, returning the absolute path.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

const CACHE_DIR_NAME: &str = "ai-annotator-screenshots";

#[derive(Debug, Error)]
pub enum ScreenshotError {
    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl ScreenshotError {
    /// Rendered by the tool surface as `Screenshot failed: <message>`
    /// (`§4.5`, `§4.7`).
    pub fn as_tool_message(&self) -> String {
        format!("Screenshot failed: {self}")
    }
}

/// Write base64-encoded screenshot bytes under the OS temp directory and
/// return the absolute path of the written file.
pub fn save(base64_payload: &str) -> Result<PathBuf, ScreenshotError> {
    save_into(&std::env::temp_dir(), base64_payload)
}

/// Same as [`save`] but rooted at an explicit directory, so tests do not
/// need to touch the real OS temp directory.
pub fn save_into(root: &Path, base64_payload: &str) -> Result<PathBuf, ScreenshotError> {
    let bytes = STANDARD.decode(base64_payload.as_bytes())?;
    let cache_dir = root.join(CACHE_DIR_NAME);
    std::fs::create_dir_all(&cache_dir)?;

    let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    let path = cache_dir.join(format!("screenshot-{millis}.webp"));
    std::fs::write(&path, bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_decoded_bytes_under_cache_dir() {
        let dir = tempfile::tempdir().unwrap();
        let payload = STANDARD.encode(b"fake-webp-bytes");
        let path = save_into(dir.path(), &payload).unwrap();
        assert!(path.starts_with(dir.path().join(CACHE_DIR_NAME)));
        assert_eq!(std::fs::read(&path).unwrap(), b"fake-webp-bytes");
    }

    #[test]
    fn rejects_invalid_base64() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_into(dir.path(), "not valid base64!!").unwrap_err();
        assert!(err.as_tool_message().starts_with("Screenshot failed:"));
    }

    #[test]
    fn concurrent_writes_do_not_collide_on_name() {
        let dir = tempfile::tempdir().unwrap();
        let payload = STANDARD.encode(b"x");
        let a = save_into(dir.path(), &payload).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = save_into(dir.path(), &payload).unwrap();
        assert_ne!(a, b);
    }
}
