use std::fmt;
use std::str::FromStr;

use djedi_conf::Settings;

use crate::error::UriError;

/// Address of a content node.
///
/// The textual form is `[scheme://][namespace@]path[.ext][#version]`, for
/// example `i18n://sv-se@page/title.md#draft`. Only `path` is required; the
/// remaining parts are filled in by the store from [`UriDefaults`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Uri {
    pub scheme: Option<String>,
    pub namespace: Option<String>,
    pub path: String,
    pub ext: Option<String>,
    pub version: Option<String>,
}

impl Uri {
    /// The context-free identifier used in edit markup: scheme, extension
    /// and version cleared.
    #[must_use]
    pub fn canonical(&self) -> Uri {
        Uri {
            scheme: None,
            ext: None,
            version: None,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_defaults(&self, defaults: &UriDefaults) -> Uri {
        Uri {
            scheme: self.scheme.clone().or_else(|| Some(defaults.scheme.clone())),
            namespace: self
                .namespace
                .clone()
                .or_else(|| Some(defaults.namespace.clone())),
            path: self.path.clone(),
            ext: self.ext.clone().or_else(|| Some(defaults.ext.clone())),
            version: self.version.clone(),
        }
    }
}

fn non_empty(part: &str) -> Option<String> {
    if part.is_empty() {
        None
    } else {
        Some(part.to_string())
    }
}

impl FromStr for Uri {
    type Err = UriError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let rest = input.trim();

        let (scheme, rest) = match rest.split_once("://") {
            Some((scheme, rest)) => (non_empty(scheme), rest),
            None => (None, rest),
        };

        let (rest, version) = match rest.split_once('#') {
            Some((rest, version)) => (rest, non_empty(version)),
            None => (rest, None),
        };

        let (namespace, rest) = match rest.split_once('@') {
            Some((namespace, rest)) => (non_empty(namespace), rest),
            None => (None, rest),
        };

        // Only the last segment may carry an extension: `a.b/c` has none.
        let segment_start = rest.rfind('/').map_or(0, |idx| idx + 1);
        let (path, ext) = match rest[segment_start..].rfind('.') {
            Some(dot) if dot > 0 => {
                let split = segment_start + dot;
                (&rest[..split], non_empty(&rest[split + 1..]))
            }
            _ => (rest, None),
        };

        if path.trim_matches('/').is_empty() {
            return Err(UriError::EmptyPath(input.to_string()));
        }

        Ok(Uri {
            scheme,
            namespace,
            path: path.to_string(),
            ext,
            version,
        })
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{scheme}://")?;
        }
        if let Some(namespace) = &self.namespace {
            write!(f, "{namespace}@")?;
        }
        f.write_str(&self.path)?;
        if let Some(ext) = &self.ext {
            write!(f, ".{ext}")?;
        }
        if let Some(version) = &self.version {
            write!(f, "#{version}")?;
        }
        Ok(())
    }
}

/// Values used for URI parts a key leaves out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UriDefaults {
    pub scheme: String,
    pub namespace: String,
    pub ext: String,
}

impl From<&Settings> for UriDefaults {
    fn from(settings: &Settings) -> Self {
        Self {
            scheme: settings.default_scheme.clone(),
            namespace: settings.default_namespace.clone(),
            ext: settings.default_plugin.clone(),
        }
    }
}

impl Default for UriDefaults {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}
