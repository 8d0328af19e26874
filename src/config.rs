use std::path::{Path, PathBuf};

use chrono::{DateTime, Days, Duration, Local, LocalResult, NaiveDateTime, TimeZone};
use ini::Ini;
use log::{debug, warn};

pub const CONFIG_FILE_NAME: &str = "config.ini";
/// Directory checked next to the working directory's parent during development.
pub const PROJECT_DIR_NAME: &str = "Countdown";
pub const TARGET_SECTION: &str = "Time";
pub const TARGET_KEY: &str = "Target";
pub const TARGET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
pub const DEFAULT_DAYS_AHEAD: u64 = 100;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no config.ini found in any search location")]
    NotFound,
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },
    #[error("Time/Target is missing or empty")]
    MissingTarget,
    #[error("invalid target time format: {value:?}")]
    InvalidTarget { value: String },
    #[error("target time {value:?} does not exist in the local time zone")]
    NonexistentLocalTime { value: String },
}

/// The roots the config file is looked up from, in priority order.
#[derive(Clone, Debug, Default)]
pub struct SearchPaths {
    pub exe_dir: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl SearchPaths {
    pub fn from_env() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        let working_dir = std::env::current_dir().ok();
        Self {
            exe_dir,
            working_dir,
        }
    }

    /// `<exe_dir>/config.ini`, then `<working_dir>/../Countdown/config.ini`.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::with_capacity(2);
        if let Some(dir) = &self.exe_dir {
            candidates.push(dir.join(CONFIG_FILE_NAME));
        }
        if let Some(parent) = self.working_dir.as_deref().and_then(Path::parent) {
            candidates.push(parent.join(PROJECT_DIR_NAME).join(CONFIG_FILE_NAME));
        }
        candidates
    }

    pub fn find_config_file(&self) -> Option<PathBuf> {
        self.candidates().into_iter().find(|path| path.is_file())
    }
}

pub fn parse_target(value: &str) -> Result<DateTime<Local>, ConfigError> {
    let naive = NaiveDateTime::parse_from_str(value, TARGET_FORMAT).map_err(|_| {
        ConfigError::InvalidTarget {
            value: value.to_owned(),
        }
    })?;
    // Ambiguous (DST fold) times resolve to the first occurrence.
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| ConfigError::NonexistentLocalTime {
            value: value.to_owned(),
        })
}

pub fn read_target(path: &Path) -> Result<DateTime<Local>, ConfigError> {
    let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value = ini
        .get_from(Some(TARGET_SECTION), TARGET_KEY)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingTarget)?;
    parse_target(value)
}

pub fn load_target(paths: &SearchPaths) -> Result<DateTime<Local>, ConfigError> {
    let path = paths.find_config_file().ok_or(ConfigError::NotFound)?;
    debug!("Using config file: {}", path.display());
    read_target(&path)
}

pub fn default_target(now: DateTime<Local>) -> DateTime<Local> {
    days_after(&now, DEFAULT_DAYS_AHEAD)
}

/// The same wall-clock time `days` calendar days after `now`. A wall-clock
/// time repeated by a DST fold resolves to its first occurrence; one skipped
/// by a DST gap falls back to `days * 24h` of elapsed time.
pub fn days_after<Tz: TimeZone>(now: &DateTime<Tz>, days: u64) -> DateTime<Tz> {
    let elapsed = now.clone() + Duration::days(days as i64);
    match now.naive_local().checked_add_days(Days::new(days)) {
        Some(naive) => earliest_or(now.timezone().from_local_datetime(&naive), elapsed),
        None => elapsed,
    }
}

fn earliest_or<Tz: TimeZone>(
    local: LocalResult<DateTime<Tz>>,
    fallback: DateTime<Tz>,
) -> DateTime<Tz> {
    local.earliest().unwrap_or(fallback)
}

/// Looks up the countdown target once. Every failure degrades to
/// [`default_target`] with a warning.
pub fn resolve_target(paths: &SearchPaths, now: DateTime<Local>) -> DateTime<Local> {
    match load_target(paths) {
        Ok(target) => target,
        Err(err) => {
            warn!("{err}. Using default ({DEFAULT_DAYS_AHEAD} days from now).");
            default_target(now)
        }
    }
}
