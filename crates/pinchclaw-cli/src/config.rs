//! Reads/writes `~/.pinchclaw/config.toml`.

use pinchclaw_kernel::{SessionConfig, SessionRules};
use pinchclaw_runtime::FrameLoopConfig;
use pinchclaw_types::ClawTuning;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted user configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Name used for leaderboard entries when `/play` is given none.
    #[serde(default)]
    pub player_name: String,

    #[serde(default = "default_frames_per_second")]
    pub frames_per_second: u32,

    /// Pace the game to wall-clock time.  `false` simulates as fast as possible.
    #[serde(default = "default_realtime")]
    pub realtime: bool,

    #[serde(default = "default_session_seconds")]
    pub session_seconds: u32,

    #[serde(default = "default_win_score")]
    pub win_score: u32,

    /// SQLite file holding the leaderboard.
    #[serde(default = "default_leaderboard_path")]
    pub leaderboard_path: String,

    #[serde(default)]
    pub tuning: ClawTuning,
}

fn default_frames_per_second() -> u32 {
    60
}
fn default_realtime() -> bool {
    true
}
fn default_session_seconds() -> u32 {
    60
}
fn default_win_score() -> u32 {
    500
}
fn default_leaderboard_path() -> String {
    pinchclaw_dir_for_home(&home_dir())
        .join("leaderboard.db")
        .to_string_lossy()
        .into_owned()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_name: String::new(),
            frames_per_second: default_frames_per_second(),
            realtime: default_realtime(),
            session_seconds: default_session_seconds(),
            win_score: default_win_score(),
            leaderboard_path: default_leaderboard_path(),
            tuning: ClawTuning::default(),
        }
    }
}

impl Config {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            tuning: self.tuning,
            rules: SessionRules {
                duration_secs: self.session_seconds,
                win_score: self.win_score,
            },
            ..SessionConfig::default()
        }
    }

    pub fn frame_loop_config(&self) -> FrameLoopConfig {
        FrameLoopConfig {
            frames_per_second: self.frames_per_second,
            realtime: self.realtime,
            max_frames: None,
        }
    }

    /// Reject settings the game cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.frames_per_second == 0 {
            return Err("frames_per_second must be at least 1".to_string());
        }
        if self.session_seconds == 0 {
            return Err("session_seconds must be at least 1".to_string());
        }
        self.tuning.validate().map_err(|e| e.to_string())
    }
}

fn home_dir() -> String {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string())
}

fn pinchclaw_dir_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".pinchclaw")
}

/// Return the path to `~/.pinchclaw/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(&home_dir())
}

pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    pinchclaw_dir_for_home(home).join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    cfg.validate()
        .map_err(|e| format!("Invalid config at {}: {}", path.display(), e))?;
    Ok(Some(cfg))
}

/// Apply `PINCHCLAW_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `PINCHCLAW_INVERT_X` | `tuning.invert_horizontal` (`true`/`false`/`1`/`0`) |
/// | `PINCHCLAW_FPS` | `frames_per_second` |
/// | `PINCHCLAW_LEADERBOARD` | `leaderboard_path` |
///
/// Unparseable values are ignored.
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("PINCHCLAW_INVERT_X")
        && let Some(invert) = parse_flag(&v)
    {
        cfg.tuning.invert_horizontal = invert;
    }
    if let Ok(v) = std::env::var("PINCHCLAW_FPS")
        && let Ok(fps) = v.trim().parse::<u32>()
        && fps > 0
    {
        cfg.frames_per_second = fps;
    }
    if let Ok(v) = std::env::var("PINCHCLAW_LEADERBOARD")
        && !v.trim().is_empty()
    {
        cfg.leaderboard_path = v;
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Save the config to disk, creating `~/.pinchclaw/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

pub(crate) fn save_to(cfg: &Config, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))
                .map_err(|e| format!("Failed to set config directory permissions: {}", e))?;
        }
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| f.write_all(raw.as_bytes()))
            .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}
