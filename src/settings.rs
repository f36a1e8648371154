use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://registrar.nu.edu.kz";
pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const DEFAULT_SESSION_FILE: &str = "session_data.json";
pub const DEFAULT_WISHLIST_FILE: &str = "schedule.txt";
pub const DEFAULT_SESSION_MAX_AGE_MINS: u64 = 10;
pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 1000;

/// Converts a `--max-age-mins` value; zero disables the check and huge
/// values saturate instead of overflowing.
pub fn session_max_age_from_mins(mins: u64) -> Option<Duration> {
    (mins > 0).then(|| Duration::from_secs(mins.saturating_mul(60)))
}

/// Run-wide knobs, filled from the command line.
#[derive(Clone, Debug)]
pub struct Settings {
    pub config_file: PathBuf,
    pub session_file: PathBuf,
    pub wishlist_file: PathBuf,
    pub base_url: String,
    /// `None` disables the freshness check on the saved session.
    pub session_max_age: Option<Duration>,
    /// Pause between consecutive submissions.
    pub submit_delay: Duration,
    pub accept_invalid_certs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_file: DEFAULT_CONFIG_FILE.into(),
            session_file: DEFAULT_SESSION_FILE.into(),
            wishlist_file: DEFAULT_WISHLIST_FILE.into(),
            base_url: DEFAULT_BASE_URL.into(),
            session_max_age: session_max_age_from_mins(DEFAULT_SESSION_MAX_AGE_MINS),
            submit_delay: Duration::from_millis(DEFAULT_SUBMIT_DELAY_MS),
            accept_invalid_certs: false,
        }
    }
}
