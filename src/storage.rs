// SPDX-License-Identifier: MPL-2.0

//! Storage root resolution for log segments

use std::env;
use std::path::PathBuf;
use tracing::debug;

/// Environment variable overriding the storage root
pub const ROOT_ENV: &str = "CAMLOG_ROOT";

/// Resolve the default parent directory for segment directories.
///
/// `CAMLOG_ROOT` wins when set; otherwise the per-user video directory is
/// used, falling back to a dot directory under the home directory on
/// headless systems without an XDG videos dir.
pub fn log_root() -> PathBuf {
    if let Ok(root) = env::var(ROOT_ENV) {
        debug!(root = %root, "using storage root from environment");
        return PathBuf::from(root);
    }

    if let Some(videos) = dirs::video_dir() {
        return videos.join("camlog");
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".camlog")
        .join("media")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_override_wins() {
        // set_var is unsafe in edition 2024; this test owns the variable
        unsafe { env::set_var(ROOT_ENV, "/tmp/camlog-test-root") };
        assert_eq!(log_root(), PathBuf::from("/tmp/camlog-test-root"));
        unsafe { env::remove_var(ROOT_ENV) };
    }

    #[test]
    fn test_fallback_is_not_empty() {
        let root = log_root();
        assert!(!root.as_os_str().is_empty());
    }
}
