//! Configured defaults for locator processing.
//!
//! Provides the [`objloc::ConfigDefaults`] implementations that back the
//! region/profile fallback tier: a config-file source ([`FsDefaults`]) and
//! an environment-variable source ([`EnvDefaults`]).

use url::Url;

mod env;
mod fs;

pub use self::{env::EnvDefaults, fs::FsDefaults};

/// Region assumed when neither the locator, a prior record, nor the
/// configuration names one.
pub const FALLBACK_REGION: &str = "us-east-1";

/// Contents of a defaults file.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct DefaultsConfig {
    /// Global default region.
    #[serde(default)]
    pub region: Option<String>,
    /// Global active credential profile.
    #[serde(default)]
    pub profile: Option<String>,
    /// Per-host overrides, matched against the locator host.
    #[serde(default)]
    pub hosts: Vec<HostDefaults>,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HostDefaults {
    /// Endpoint host this entry applies to. Matched case-insensitively.
    pub host: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub profile: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}

impl DefaultsConfig {
    fn host_entry(&self, url: &Url) -> Option<&HostDefaults> {
        let host = url.host_str()?;
        self.hosts
            .iter()
            .find(|entry| entry.host.eq_ignore_ascii_case(host))
    }
}

impl objloc::ConfigDefaults for DefaultsConfig {
    fn default_region(&self, url: &Url) -> Option<String> {
        self.host_entry(url)
            .and_then(|entry| non_empty(&entry.region))
            .or_else(|| non_empty(&self.region))
            .or_else(|| Some(FALLBACK_REGION.to_string()))
    }

    fn active_profile(&self, url: &Url) -> Option<String> {
        self.host_entry(url)
            .and_then(|entry| non_empty(&entry.profile))
            .or_else(|| non_empty(&self.profile))
    }
}
