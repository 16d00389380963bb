use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ledger::Granularity;

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_currency_decimals() -> u32 {
    2
}

/// Display/output formatting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Prefix for rendered amounts (e.g. "$", "€").
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Amounts are rounded (half away from zero) and padded to this many
    /// decimal places when rendered.
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u32,

    /// Render amounts with thousands separators.
    pub currency_grouping: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            currency_decimals: default_currency_decimals(),
            currency_grouping: false,
        }
    }
}

/// Summary/chart configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Period used to bucket transactions for the per-period breakdown.
    pub period: Granularity,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to data directory. If relative, resolved from config file location.
    /// If not specified, defaults to the config file's directory.
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Resolve the data directory path.
    ///
    /// If `data_dir` is set and relative, it's resolved relative to `config_dir`.
    /// If `data_dir` is not set, returns `config_dir`.
    pub fn resolve_data_dir(&self, config_dir: &Path) -> PathBuf {
        match &self.data_dir {
            Some(data_dir) if data_dir.is_absolute() => data_dir.clone(),
            Some(data_dir) => config_dir.join(data_dir),
            None => config_dir.to_path_buf(),
        }
    }
}

/// Loaded configuration with resolved paths.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Where credential and ledger files live.
    pub data_dir: PathBuf,

    pub report: ReportConfig,

    pub display: DisplayConfig,
}

/// Returns the default config file path.
///
/// Resolution order:
/// 1. `./tallybook.toml` if it exists in current directory
/// 2. `~/.local/share/tallybook/tallybook.toml` (XDG data directory)
pub fn default_config_path() -> PathBuf {
    let local_config = PathBuf::from("tallybook.toml");
    if local_config.exists() {
        return local_config;
    }

    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("tallybook").join("tallybook.toml");
    }

    local_config
}

impl ResolvedConfig {
    /// Load and resolve config from a file path.
    ///
    /// The data directory is resolved relative to the config file's parent directory.
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_path = config_path
            .canonicalize()
            .with_context(|| format!("Config file not found: {}", config_path.display()))?;

        let config_dir = config_path
            .parent()
            .context("Config file has no parent directory")?;

        let config = Config::load(&config_path)?;
        Ok(Self::resolve(config, config_dir))
    }

    /// Like [`ResolvedConfig::load`], but a missing file yields defaults with
    /// the file's intended directory as the data directory.
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            return Self::load(config_path);
        }

        let config_path = if config_path.is_relative() {
            std::env::current_dir()
                .context("Failed to get current directory")?
                .join(config_path)
        } else {
            config_path.to_path_buf()
        };
        let config_dir = config_path
            .parent()
            .context("Config path has no parent directory")?;

        Ok(Self::resolve(Config::default(), config_dir))
    }

    fn resolve(config: Config, config_dir: &Path) -> Self {
        Self {
            data_dir: config.resolve_data_dir(config_dir),
            report: config.report,
            display: config.display,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_data_dir_is_config_dir() {
        let config = Config::default();
        let config_dir = Path::new("/home/user/finances");
        assert_eq!(
            config.resolve_data_dir(config_dir),
            PathBuf::from("/home/user/finances")
        );
    }

    #[test]
    fn test_relative_and_absolute_data_dir() {
        let config_dir = Path::new("/home/user/finances");

        let relative = Config {
            data_dir: Some(PathBuf::from("data")),
            ..Default::default()
        };
        assert_eq!(
            relative.resolve_data_dir(config_dir),
            PathBuf::from("/home/user/finances/data")
        );

        let absolute = Config {
            data_dir: Some(PathBuf::from("/var/tallybook")),
            ..Default::default()
        };
        assert_eq!(
            absolute.resolve_data_dir(config_dir),
            PathBuf::from("/var/tallybook")
        );
    }

    #[test]
    fn test_load_empty_config_uses_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("tallybook.toml");
        std::fs::File::create(&config_path)?;

        let config = Config::load(&config_path)?;
        assert_eq!(config.data_dir, None);
        assert_eq!(config.report.period, Granularity::Month);
        assert_eq!(config.display, DisplayConfig::default());
        assert_eq!(config.display.currency_symbol, "$");
        assert_eq!(config.display.currency_decimals, 2);

        Ok(())
    }

    #[test]
    fn test_load_report_and_display_sections() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("tallybook.toml");

        let mut file = std::fs::File::create(&config_path)?;
        writeln!(file, "[report]")?;
        writeln!(file, "period = \"day\"")?;
        writeln!(file, "[display]")?;
        writeln!(file, "currency_symbol = \"£\"")?;
        writeln!(file, "currency_grouping = true")?;

        let config = Config::load(&config_path)?;
        assert_eq!(config.report.period, Granularity::Day);
        assert_eq!(config.display.currency_symbol, "£");
        assert!(config.display.currency_grouping);
        assert_eq!(config.display.currency_decimals, 2);

        Ok(())
    }

    #[test]
    fn test_invalid_period_is_rejected() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("tallybook.toml");
        std::fs::write(&config_path, "[report]\nperiod = \"fortnight\"\n")?;

        assert!(Config::load(&config_path).is_err());
        Ok(())
    }

    #[test]
    fn test_resolved_config_load_or_default_missing_file() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("tallybook.toml");

        let resolved = ResolvedConfig::load_or_default(&config_path)?;
        assert_eq!(resolved.data_dir, dir.path());
        assert_eq!(resolved.report.period, Granularity::Month);

        Ok(())
    }

    #[test]
    fn test_resolved_config_resolves_relative_data_dir() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("tallybook.toml");
        std::fs::write(&config_path, "data_dir = \"./data\"\n")?;

        let resolved = ResolvedConfig::load(&config_path)?;
        assert_eq!(resolved.data_dir, dir.path().canonicalize()?.join("./data"));

        Ok(())
    }
}
