use url::Url;

/// [`objloc::ConfigDefaults`] backed by AWS-style environment variables.
///
/// `AWS_REGION` takes priority over `AWS_DEFAULT_REGION`; the active
/// profile comes from `AWS_PROFILE`. Empty values count as unset. The
/// environment is read on every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvDefaults;

const ENV_REGION: &[&str] = &["AWS_REGION", "AWS_DEFAULT_REGION"];
const ENV_PROFILE: &str = "AWS_PROFILE";

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl objloc::ConfigDefaults for EnvDefaults {
    fn default_region(&self, _url: &Url) -> Option<String> {
        ENV_REGION.iter().find_map(|name| non_empty_var(name))
    }

    fn active_profile(&self, _url: &Url) -> Option<String> {
        non_empty_var(ENV_PROFILE)
    }
}
