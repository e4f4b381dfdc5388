use std::{env, path::PathBuf};

use log::warn;

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then lets environment
/// variables (prefix `DUOPLAY__`) override it, and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("DUOPLAY")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Parse settings from an inline TOML document (missing keys take defaults).
    pub fn from_toml_str(src: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(src)
    }

    /// Load and validate settings, falling back to defaults on any failure.
    ///
    /// Configuration is optional; a broken file must not prevent playback.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(s) => {
                if let Err(msg) = s.validate() {
                    warn!("duoplay: invalid config, using defaults: {msg}");
                    Settings::default()
                } else {
                    s
                }
            }
            Err(e) => {
                warn!("duoplay: failed to load config, using defaults: {e}");
                Settings::default()
            }
        }
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.timing.poll_interval_ms == 0 {
            return Err("timing.poll_interval_ms must be >= 1".to_string());
        }
        if self.timing.resume_retry_attempts == 0 {
            return Err("timing.resume_retry_attempts must be >= 1".to_string());
        }
        if self.timing.bootstrap_retry_attempts == 0 {
            return Err("timing.bootstrap_retry_attempts must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `DUOPLAY_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("DUOPLAY_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/duoplay/config.toml`
/// or `~/.config/duoplay/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("duoplay").join("config.toml"))
}
