//! Runtime settings, read from the environment.

use std::env;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use crate::value::Timestamp;

/// Where downloads and themes are kept, and where replies go by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub download_dir: PathBuf,
    pub themes_dir: PathBuf,
    /// Channel for replies that have no originating message.
    pub channel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("downloads"),
            themes_dir: PathBuf::from("themes"),
            channel: "general".to_string(),
        }
    }
}

impl Config {
    /// Settings from `ANNOUNCER_DOWNLOAD_DIR`, `ANNOUNCER_THEMES_DIR`,
    /// and `ANNOUNCER_CHANNEL`, with defaults for any that are unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Settings from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            download_dir: lookup("ANNOUNCER_DOWNLOAD_DIR")
                .map_or(defaults.download_dir, PathBuf::from),
            themes_dir: lookup("ANNOUNCER_THEMES_DIR").map_or(defaults.themes_dir, PathBuf::from),
            channel: lookup("ANNOUNCER_CHANNEL").unwrap_or(defaults.channel),
        }
    }

    /// Cache file for a trimmed download. Distinct trims of the same
    /// song get distinct files.
    #[must_use]
    pub fn download_path(
        &self,
        uri: &str,
        start: Option<Timestamp>,
        stop: Option<Timestamp>,
    ) -> PathBuf {
        let start = start.map(|t| t.to_string()).unwrap_or_default();
        let stop = stop.map(|t| t.to_string()).unwrap_or_default();
        let digest = Sha256::digest(format!("[{start}-{stop}] {uri}").as_bytes());
        self.download_dir
            .join(hex::encode(digest))
            .with_extension("opus")
    }

    /// Join theme file of a user.
    #[must_use]
    pub fn theme_path(&self, author: &str) -> PathBuf {
        self.themes_dir.join(format!("{author}.opus"))
    }
}
