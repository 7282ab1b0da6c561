use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Published mass log of the Trondheim litter pick-ups.
pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/jsimonclark/TrondheimTrash/main/data/MassData.tsv";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Startup configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Remote dataset fetched at startup and on "Reload".
    pub data_url: String,
    /// Local file loaded instead of the URL, if set.
    pub data_file: Option<PathBuf>,
    pub fetch_timeout: Duration,
    /// Skip the startup fetch entirely.
    pub offline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            data_file: None,
            fetch_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            offline: false,
        }
    }
}

impl Config {
    /// Read `LITTER_*` variables from the process environment, then let the
    /// first command-line argument override the data file.
    pub fn from_env() -> Result<Self> {
        Self::from_sources(|key| std::env::var(key).ok(), std::env::args_os())
    }

    /// `args` includes the program name, as `std::env::args_os` does.
    fn from_sources(
        lookup: impl Fn(&str) -> Option<String>,
        args: impl IntoIterator<Item = OsString>,
    ) -> Result<Self> {
        let mut cfg = Self::from_lookup(lookup)?;
        if let Some(path) = args.into_iter().nth(1) {
            cfg.data_file = Some(PathBuf::from(path));
        }
        Ok(cfg)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(url) = lookup("LITTER_DATA_URL").filter(|s| !s.trim().is_empty()) {
            cfg.data_url = url.trim().to_string();
        }
        if let Some(path) = lookup("LITTER_DATA_FILE").filter(|s| !s.trim().is_empty()) {
            cfg.data_file = Some(PathBuf::from(path.trim()));
        }
        if let Some(secs) = lookup("LITTER_FETCH_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("LITTER_FETCH_TIMEOUT_SECS={secs:?} is not a number of seconds"))?;
            cfg.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(flag) = lookup("LITTER_OFFLINE") {
            cfg.offline = matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        Ok(cfg)
    }
}
