use std::path::Path;

use crate::error::Error;

/// Name of the project config file, looked up in the working directory.
pub const CONFIG_FILE: &str = ".srclink.toml";

/// Classes rustdoc puts on its "view source" anchors. Older releases emit
/// `srclink`, newer ones `src`.
const DEFAULT_LINK_CLASSES: [&str; 2] = ["srclink", "src"];

/// Everything the injection pass needs, fixed for the lifetime of a run.
/// Passed into the pass explicitly; there is no global configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    /// Provider name shown in the link text, e.g. `GitLab`.
    pub hosting_label: String,
    /// Class tokens that identify generator source links.
    pub link_classes: Vec<String>,
    /// First path segment under the generator's `src/` tree that belongs to this project.
    pub project_root_marker: String,
    /// Browsable tree URL at a fixed reference; relative paths are appended verbatim.
    pub repository_base_url: String,
}

/// Values given on the command line. Each one, when set, wins over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// `--label`
    pub hosting_label: Option<String>,
    /// `--class`, repeatable. Empty means "use the file or the default".
    pub link_classes: Vec<String>,
    /// `--root-marker`
    pub project_root_marker: Option<String>,
    /// `--base-url`
    pub repository_base_url: Option<String>,
}

/// Raw TOML structure for `.srclink.toml`.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct SrclinkTomlConfig {
    /// Provider name shown in the link text.
    hosting_label: Option<String>,
    /// Marker classes for generator source links.
    link_classes: Option<Vec<String>>,
    /// Project root segment.
    project_root_marker: Option<String>,
    /// Repository tree URL.
    repository_base_url: Option<String>,
}

impl LinkConfig {
    /// Load `.srclink.toml` from `root` and apply command-line overrides.
    /// A missing file is fine as long as the flags supply every required
    /// value. A file that exists but is malformed is an error, never
    /// silently replaced by defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// `Error::TomlDe` if the TOML is malformed, or `Error::MissingConfig`
    /// if a required value is absent from both sources.
    pub fn load(root: &Path, overrides: &ConfigOverrides) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let raw = match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using flags only");
                SrclinkTomlConfig::default()
            },
            Err(e) => return Err(Error::Io(e)),
        };
        return Self::merge(raw, overrides.clone());
    }

    /// Combine file values with overrides and check that nothing required is missing.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingConfig` naming the first absent or empty value.
    fn merge(raw: SrclinkTomlConfig, overrides: ConfigOverrides) -> Result<Self, Error> {
        let hosting_label = required("hosting_label", overrides.hosting_label.or(raw.hosting_label))?;
        let project_root_marker =
            required("project_root_marker", overrides.project_root_marker.or(raw.project_root_marker))?;
        let repository_base_url =
            required("repository_base_url", overrides.repository_base_url.or(raw.repository_base_url))?;

        let link_classes = if !overrides.link_classes.is_empty() {
            overrides.link_classes
        } else if let Some(classes) = raw.link_classes.filter(|c| return !c.is_empty()) {
            classes
        } else {
            DEFAULT_LINK_CLASSES.iter().map(|c| return (*c).to_string()).collect()
        };

        if !repository_base_url.ends_with('/') {
            tracing::warn!(
                url = %repository_base_url,
                "repository_base_url does not end in `/`; paths are appended verbatim"
            );
        }

        return Ok(Self {
            hosting_label,
            link_classes,
            project_root_marker,
            repository_base_url,
        });
    }
}

/// Treat both absent and empty values as missing.
///
/// # Errors
///
/// Returns `Error::MissingConfig` for `None` or an empty string.
fn required(field: &'static str, value: Option<String>) -> Result<String, Error> {
    return value
        .filter(|v| return !v.is_empty())
        .ok_or(Error::MissingConfig { field });
}
