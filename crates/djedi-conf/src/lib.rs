use config::{Config, ConfigError as ExternalConfigError, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration build/deserialize error")]
    Config(#[from] ExternalConfigError),
    #[error("Failed to read pyproject.toml")]
    PyprojectIo(#[from] std::io::Error),
    #[error("Failed to parse pyproject.toml TOML")]
    PyprojectParse(#[from] toml::de::Error),
    #[error("Failed to serialize extracted pyproject data")]
    PyprojectSerialize(#[from] toml::ser::Error),
}

/// Settings shared by the content store and the template tags.
///
/// The URI defaults are applied to every node key that leaves them out, so
/// `page/title` is looked up as `i18n://en-us@page/title.txt` with the
/// defaults below.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub default_scheme: String,
    pub default_namespace: String,
    pub default_plugin: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_scheme: "i18n".to_string(),
            default_namespace: "en-us".to_string(),
            default_plugin: "txt".to_string(),
        }
    }
}

impl Settings {
    pub fn new(project_root: &Path) -> Result<Self, ConfigError> {
        let user_config_file = ProjectDirs::from("se", "5monkeys", "djedi")
            .map(|proj_dirs| proj_dirs.config_dir().join("djedi.toml"));

        Self::load_from_paths(project_root, user_config_file.as_deref())
    }

    /// Load settings for `project_root`, layering `user_config_path` (when
    /// given) under the project's own files.
    pub fn load_from_paths(
        project_root: &Path,
        user_config_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = user_config_path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        let pyproject_path = project_root.join("pyproject.toml");
        if pyproject_path.exists() {
            let content = fs::read_to_string(&pyproject_path)?;
            let full_toml_value: toml::Value = toml::from_str(&content)?;

            let djedi_value_opt: Option<&toml::Value> = ["tool", "djedi"]
                .iter()
                .try_fold(&full_toml_value, |current_val, &key| current_val.get(key));

            if let Some(djedi_table) = djedi_value_opt.and_then(|v| v.as_table()) {
                let djedi_toml_string = toml::to_string(djedi_table)?;
                builder = builder.add_source(File::from_str(&djedi_toml_string, FileFormat::Toml));
            }
        }

        builder = builder.add_source(
            File::from(project_root.join(".djedi.toml"))
                .format(FileFormat::Toml)
                .required(false),
        );

        builder = builder.add_source(
            File::from(project_root.join("djedi.toml"))
                .format(FileFormat::Toml)
                .required(false),
        );

        let config = builder.build()?;
        let settings: Settings = config.try_deserialize()?;
        tracing::debug!(
            root = %project_root.display(),
            scheme = %settings.default_scheme,
            namespace = %settings.default_namespace,
            plugin = %settings.default_plugin,
            "loaded djedi settings"
        );
        Ok(settings)
    }
}
