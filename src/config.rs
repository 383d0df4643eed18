//! Build configuration.
//!
//! Handles loading, validating, and merging `nbpages.toml`. Stock defaults are
//! overridden by whatever the user file sets; command-line path flags override
//! both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! notebooks = "notebooks"        # Directory holding the .ipynb files
//! pages = "docs/_notebooks"      # Where <id>.html pages are written
//! assets = "docs/assets"         # Where asset subdirectories are mirrored
//!
//! [assets]
//! subdirs = ["images"]           # Asset subdirectories next to the notebooks
//! overwrite = "skip"             # skip | overwrite | fail
//!
//! [build]
//! skip = []                      # Notebook ids (filename stems) to leave out
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want:
//!
//! ```toml
//! [assets]
//! subdirs = ["images", "data"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "nbpages.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Build configuration loaded from `nbpages.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Input and output locations.
    pub paths: PathsConfig,
    /// Asset subdirectories and copy behaviour.
    pub assets: AssetsConfig,
    /// Per-notebook build switches.
    pub build: BuildConfig,
}

impl SiteConfig {
    /// Validate config values before any filesystem work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, path) in [
            ("paths.notebooks", &self.paths.notebooks),
            ("paths.pages", &self.paths.pages),
            ("paths.assets", &self.paths.assets),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }

        let mut seen: Vec<String> = Vec::new();
        for subdir in &self.assets.subdirs {
            if subdir.is_empty() {
                return Err(ConfigError::Validation(
                    "assets.subdirs entries must not be empty".into(),
                ));
            }
            if subdir.contains(['/', '\\']) || subdir == "." || subdir == ".." {
                return Err(ConfigError::Validation(format!(
                    "assets.subdirs entry {subdir:?} must be a single directory name"
                )));
            }
            // Link matching ignores case, so names differing only in case collide.
            let key = subdir.to_lowercase();
            if seen.contains(&key) {
                return Err(ConfigError::Validation(format!(
                    "assets.subdirs entry {subdir:?} is listed twice"
                )));
            }
            seen.push(key);
        }
        Ok(())
    }

    /// Whether the notebook with this id is excluded from the build.
    pub fn is_skipped(&self, id: &str) -> bool {
        self.build.skip.iter().any(|s| s == id)
    }
}

/// Input and output locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory scanned for `*.ipynb` notebooks and asset subdirectories.
    pub notebooks: PathBuf,
    /// Directory receiving one `<id>.html` per built page.
    pub pages: PathBuf,
    /// Directory receiving copied asset subdirectories.
    pub assets: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            notebooks: PathBuf::from("notebooks"),
            pages: PathBuf::from("docs/_notebooks"),
            assets: PathBuf::from("docs/assets"),
        }
    }
}

/// Asset subdirectories and copy behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// Subdirectory names (next to the notebooks) holding referenced files.
    pub subdirs: Vec<String>,
    /// What to do when a copied asset already exists at the destination.
    pub overwrite: OverwritePolicy,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            subdirs: vec!["images".to_string()],
            overwrite: OverwritePolicy::default(),
        }
    }
}

/// Behaviour when an asset's destination file already exists.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    /// Leave the existing file in place.
    #[default]
    Skip,
    /// Replace the existing file.
    Overwrite,
    /// Abort the copy.
    Fail,
}

/// Per-notebook build switches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Notebook ids (filename stems) excluded from navigation and output.
    pub skip: Vec<String>,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is missing.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `nbpages.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# nbpages Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
#
# Command-line flags (--notebooks, --output, --assets-output) override [paths].

# ---------------------------------------------------------------------------
# Locations
# ---------------------------------------------------------------------------
[paths]
# Directory scanned for *.ipynb notebooks. Asset subdirectories live here too.
notebooks = "notebooks"

# Directory receiving one <id>.html page per notebook.
pages = "docs/_notebooks"

# Directory receiving the copied asset subdirectories.
assets = "docs/assets"

# ---------------------------------------------------------------------------
# Assets
# ---------------------------------------------------------------------------
[assets]
# Subdirectories next to the notebooks whose files are referenced from them.
# Links like src="images/plot.png" are rewritten to /assets/images/plot.png.
subdirs = ["images"]

# When a copied asset already exists: "skip", "overwrite" or "fail".
overwrite = "skip"

# ---------------------------------------------------------------------------
# Build
# ---------------------------------------------------------------------------
[build]
# Notebook ids (filename stems) left out of navigation and output.
skip = []
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_paths() {
        let config = SiteConfig::default();
        assert_eq!(config.paths.notebooks, PathBuf::from("notebooks"));
        assert_eq!(config.paths.pages, PathBuf::from("docs/_notebooks"));
        assert_eq!(config.paths.assets, PathBuf::from("docs/assets"));
    }

    #[test]
    fn default_config_assets() {
        let config = SiteConfig::default();
        assert_eq!(config.assets.subdirs, vec!["images"]);
        assert_eq!(config.assets.overwrite, OverwritePolicy::Skip);
        assert!(config.build.skip.is_empty());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[assets]
subdirs = ["images", "data"]
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.assets.subdirs, vec!["images", "data"]);
        // Unspecified values keep their defaults
        assert_eq!(config.assets.overwrite, OverwritePolicy::Skip);
        assert_eq!(config.paths.notebooks, PathBuf::from("notebooks"));
    }

    #[test]
    fn parse_overwrite_policy() {
        let config: SiteConfig = toml::from_str("[assets]\noverwrite = \"fail\"\n").unwrap();
        assert_eq!(config.assets.overwrite, OverwritePolicy::Fail);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[paths]\nnotebok = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn is_skipped_matches_ids() {
        let mut config = SiteConfig::default();
        config.build.skip = vec!["draft".to_string()];
        assert!(config.is_skipped("draft"));
        assert!(!config.is_skipped("final"));
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn default_config_is_valid() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_path_is_invalid() {
        let mut config = SiteConfig::default();
        config.paths.pages = PathBuf::new();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn nested_subdir_is_invalid() {
        let mut config = SiteConfig::default();
        config.assets.subdirs = vec!["images/plots".to_string()];
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        config.assets.subdirs = vec!["..".to_string()];
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn case_duplicate_subdirs_are_invalid() {
        let mut config = SiteConfig::default();
        config.assets.subdirs = vec!["images".to_string(), "Images".to_string()];
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // Merging and loading
    // =========================================================================

    #[test]
    fn merge_toml_overrides_leaves() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE);
        fs::write(
            &config_path,
            r##"
[paths]
pages = "site/_notebooks"

[build]
skip = ["scratch"]
"##,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.paths.pages, PathBuf::from("site/_notebooks"));
        assert_eq!(config.build.skip, vec!["scratch"]);
        // Unspecified values should be defaults
        assert_eq!(config.paths.notebooks, PathBuf::from("notebooks"));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE);
        fs::write(&config_path, "this is not valid toml [[[").unwrap();

        let result = load_config(&config_path);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE);
        fs::write(&config_path, "[assets]\nsubdirs = [\"\"]\n").unwrap();

        let result = load_config(&config_path);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, SiteConfig::default());
    }
}
