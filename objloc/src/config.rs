use url::Url;

/// Configured fallbacks consulted when a locator does not carry enough
/// information on its own.
///
/// Implemented by the configuration layer (see the `objloc_config` crate);
/// [`NoDefaults`] and [`StaticDefaults`] cover callers that do not have one.
pub trait ConfigDefaults {
    /// The region to assume for `url` when none could be recovered from the
    /// locator itself or from a prior [`crate::StorageInfo`] record.
    fn default_region(&self, url: &Url) -> Option<String>;

    /// The name of the currently active credential profile for `url`, if any.
    fn active_profile(&self, url: &Url) -> Option<String>;
}

/// A [`ConfigDefaults`] with nothing configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDefaults;

impl ConfigDefaults for NoDefaults {
    fn default_region(&self, _url: &Url) -> Option<String> {
        None
    }

    fn active_profile(&self, _url: &Url) -> Option<String> {
        None
    }
}

/// A [`ConfigDefaults`] with fixed, host-independent values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticDefaults {
    pub region: Option<String>,
    pub profile: Option<String>,
}

impl StaticDefaults {
    pub fn with_region(region: impl Into<String>) -> Self {
        Self {
            region: Some(region.into()),
            profile: None,
        }
    }
}

impl ConfigDefaults for StaticDefaults {
    fn default_region(&self, _url: &Url) -> Option<String> {
        self.region.clone()
    }

    fn active_profile(&self, _url: &Url) -> Option<String> {
        self.profile.clone()
    }
}
