use std::env;
use std::path::PathBuf;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const STAR_TABLE: &str = "STAR_TABLE";
    pub const PORT: &str = "PORT";
}

/// Default values
pub mod defaults {
    pub const STAR_TABLE: &str = "catalog/star_table.csv";
    pub const PORT: u16 = 5009;
    pub const LI_FIG_DIR: &str = "data/fig_Li_region";
    pub const HALPHA_FIG_DIR: &str = "data/fig_Halpha_region";
    pub const STATIC_DIR: &str = "static";
}

/// Returns the absolute path to the speclabel-backend directory.
/// Uses CARGO_MANIFEST_DIR at compile time, so it always resolves
/// to speclabel-backend/ regardless of the working directory at runtime.
pub fn backend_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Directory holding the pre-rendered Li-region crops
pub fn li_fig_dir() -> PathBuf {
    backend_dir().join(defaults::LI_FIG_DIR)
}

/// Directory holding the pre-rendered Halpha-region crops
pub fn halpha_fig_dir() -> PathBuf {
    backend_dir().join(defaults::HALPHA_FIG_DIR)
}

/// Directory holding the labeling UI static bundle (index.html, js, css)
pub fn static_dir() -> PathBuf {
    backend_dir().join(defaults::STATIC_DIR)
}

#[derive(Clone)]
pub struct Config {
    pub star_table: PathBuf,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            star_table: env::var(env_vars::STAR_TABLE)
                .map(PathBuf::from)
                .unwrap_or_else(|_| backend_dir().join(defaults::STAR_TABLE)),
            port: env::var(env_vars::PORT)
                .unwrap_or_else(|_| defaults::PORT.to_string())
                .parse()
                .expect("PORT must be a valid number"),
        }
    }

    /// The save log lives next to the star table: same stem, `.log` extension.
    pub fn log_path(&self) -> PathBuf {
        self.star_table.with_extension("log")
    }
}

/// Initialize the data directories used by the service.
/// Creates the star table's parent directory so the first CSV rewrite can
/// succeed; the image directories are produced by the external rendering
/// pipeline, so a missing one is only worth a warning.
pub fn initialize_workspace(config: &Config) -> std::io::Result<()> {
    if let Some(parent) = config.star_table.parent() {
        std::fs::create_dir_all(parent)?;
    }

    for dir in [li_fig_dir(), halpha_fig_dir()] {
        if !dir.exists() {
            log::warn!(
                "Image directory {:?} does not exist - spectra will be served without images",
                dir
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path_replaces_csv_extension() {
        let config = Config {
            star_table: PathBuf::from("catalog/remain3.csv"),
            port: defaults::PORT,
        };
        assert_eq!(config.log_path(), PathBuf::from("catalog/remain3.log"));
    }

    #[test]
    fn test_log_path_without_extension() {
        let config = Config {
            star_table: PathBuf::from("catalog/stars"),
            port: defaults::PORT,
        };
        assert_eq!(config.log_path(), PathBuf::from("catalog/stars.log"));
    }
}
