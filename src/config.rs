use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_WAIT_SECS: u64 = 5;
pub const DEFAULT_DELAY_SECS: u64 = 5;

/// Runtime settings, built once in main and handed to the loop and the store.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    /// Bound on the readiness-marker wait per profile page.
    pub wait_timeout: Duration,
    /// Fixed pacing delay observed after every visit.
    pub request_delay: Duration,
    pub headless: bool,
}

impl Config {
    pub fn new(db_path: PathBuf, wait_secs: u64, delay_secs: u64, headless: bool) -> Self {
        Self {
            db_path,
            wait_timeout: Duration::from_secs(wait_secs),
            request_delay: Duration::from_secs(delay_secs),
            headless,
        }
    }
}
