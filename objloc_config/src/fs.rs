use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};

use crate::DefaultsConfig;

const CONFIG_DIR_NAME: &str = "objloc";
const DEFAULTS_FILE_STEM: &str = "defaults";

/// File-backed [`objloc::ConfigDefaults`].
///
/// Loads a `defaults.{yaml,yml,json}` file from a config directory
/// (`~/.config/objloc` by default). A missing file yields an empty
/// configuration, so the built-in region fallback still applies.
#[derive(Debug, Clone)]
pub struct FsDefaults {
    config: DefaultsConfig,
}

impl FsDefaults {
    fn default_config_dir() -> Result<PathBuf, anyhow::Error> {
        let home = std::env::home_dir().context("Could not determine home directory")?;

        Ok(home.join(".config").join(CONFIG_DIR_NAME))
    }

    pub fn new(config: DefaultsConfig) -> Self {
        Self { config }
    }

    pub fn load_default() -> Result<Self, anyhow::Error> {
        let dir = Self::default_config_dir()?;
        Self::load_dir(&dir)
    }

    /// Load the defaults file from the given directory.
    pub fn load_dir(dir: &Path) -> Result<Self, anyhow::Error> {
        for ext in ["yaml", "yml", "json"] {
            let path = dir.join(format!("{DEFAULTS_FILE_STEM}.{ext}"));
            if path.is_file() {
                return Self::load_file(&path);
            }
        }

        tracing::trace!(
            dir = %dir.display(),
            "no defaults file found, using empty configuration"
        );
        Ok(Self {
            config: DefaultsConfig::default(),
        })
    }

    pub fn load_file(path: &Path) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read defaults file: '{}'", path.display()))?;
        let config = Self::parse_defaults(path, &contents)
            .with_context(|| format!("Failed to parse defaults file: '{}'", path.display()))?;

        tracing::trace!(path = %path.display(), "loaded locator defaults");
        Ok(Self { config })
    }

    fn parse_defaults(path: &Path, contents: &str) -> Result<DefaultsConfig, anyhow::Error> {
        let ext = path
            .extension()
            .context("defaults file does not have an extension")?
            .to_str()
            .context("defaults file extension is not valid UTF-8")?;

        match ext {
            "json" => serde_json::from_str(contents).context("Failed to parse JSON"),
            "yaml" | "yml" => serde_yaml::from_str(contents).context("Failed to parse YAML"),
            _ => bail!("Unsupported file extension: '{}'", ext),
        }
    }

    pub fn config(&self) -> &DefaultsConfig {
        &self.config
    }
}

impl objloc::ConfigDefaults for FsDefaults {
    fn default_region(&self, url: &url::Url) -> Option<String> {
        self.config.default_region(url)
    }

    fn active_profile(&self, url: &url::Url) -> Option<String> {
        self.config.active_profile(url)
    }
}
