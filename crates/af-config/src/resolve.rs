//! Parameter file resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG paths → defaults.

use std::path::{Path, PathBuf};

/// Where the parameter file was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamsLocation {
    /// Path to the parameter file (None when using built-in defaults).
    pub path: Option<PathBuf>,

    /// Source of the file (for diagnostics).
    pub source: ConfigSource,
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Found in /etc/aftershock/.
    SystemConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::SystemConfig => write!(f, "system config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
pub const ENV_PARAMS_PATH: &str = "AFTERSHOCK_PARAMS";
pub const ENV_CONFIG_DIR: &str = "AFTERSHOCK_CONFIG_DIR";

/// Standard file names, in lookup order.
const PARAMS_FILENAMES: [&str; 2] = ["params.json", "params.toml"];

/// Application name for XDG directories.
const APP_NAME: &str = "aftershock";

/// Resolve the parameter file path.
///
/// 1. Explicit CLI path (used even if missing, so the load reports it)
/// 2. `AFTERSHOCK_PARAMS`
/// 3. `AFTERSHOCK_CONFIG_DIR` + filename
/// 4. XDG config directory (~/.config/aftershock/)
/// 5. System config (/etc/aftershock/)
/// 6. Built-in defaults (None)
pub fn resolve_params_path(cli_path: Option<&Path>) -> ParamsLocation {
    // 1. CLI argument
    if let Some(path) = cli_path {
        return ParamsLocation {
            path: Some(path.to_path_buf()),
            source: ConfigSource::CliArgument,
        };
    }

    // 2. Environment variable (direct path)
    if let Ok(env_path) = std::env::var(ENV_PARAMS_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return found(path, ConfigSource::Environment);
        }
    }

    // 3. Environment variable (config dir)
    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        if let Some(path) = find_in_dir(Path::new(&config_dir)) {
            return found(path, ConfigSource::Environment);
        }
    }

    // 4. XDG config directory
    if let Some(dir) = xdg_config_dir() {
        if let Some(path) = find_in_dir(&dir) {
            return found(path, ConfigSource::XdgConfig);
        }
    }

    // 5. System config
    if let Some(path) = find_in_dir(&system_config_dir()) {
        return found(path, ConfigSource::SystemConfig);
    }

    // 6. Built-in default
    ParamsLocation::default()
}

fn found(path: PathBuf, source: ConfigSource) -> ParamsLocation {
    ParamsLocation {
        path: Some(path),
        source,
    }
}

/// First standard parameter file present in `dir`.
fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    PARAMS_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Get the XDG config directory for aftershock.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Get the system config directory.
pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}
