//! Commented-YAML configuration loading.
//!
//! `config.yml` is generated from field metadata so every knob carries its
//! description. User files are merged over the defaults, and the file is
//! rewritten when fields are missing so upgrades surface new knobs without
//! clobbering existing values.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error at {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid yaml at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("config encode error: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldMeta {
    pub name: &'static str,
    pub description: &'static str,
}

pub trait ConfigSpec: Serialize + DeserializeOwned + Default {
    const FILE_NAME: &'static str;
    fn fields() -> &'static [FieldMeta];
}

/// Load or create a config file.
///
/// Path resolution: an explicit `config_path` wins; otherwise
/// `base_dir/FILE_NAME`; otherwise `FILE_NAME` in the working directory.
pub fn load_or_create_with_base<T: ConfigSpec>(
    config_path: Option<&Path>,
    base_dir: Option<&Path>,
) -> Result<T, ConfigError> {
    let path = match (config_path, base_dir) {
        (Some(p), _) => p.to_path_buf(),
        (None, Some(base)) => base.join(T::FILE_NAME),
        (None, None) => PathBuf::from(T::FILE_NAME),
    };
    ensure_parent(&path)?;

    if !path.exists() {
        let defaults = T::default();
        write_with_comments(&defaults, &path)?;
        return Ok(defaults);
    }

    let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let user: Value = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;

    let has_missing = has_missing_fields::<T>(&user);

    let mut merged =
        serde_yaml::to_value(T::default()).map_err(|err| ConfigError::Encode(err.to_string()))?;
    merge_value(&mut merged, user);
    let config: T =
        serde_yaml::from_value(merged).map_err(|err| ConfigError::Encode(err.to_string()))?;

    if has_missing {
        write_with_comments(&config, &path)?;
    }

    Ok(config)
}

pub fn write_with_comments<T: ConfigSpec>(config: &T, path: &Path) -> Result<(), ConfigError> {
    ensure_parent(path)?;

    let mapping = match serde_yaml::to_value(config)
        .map_err(|err| ConfigError::Encode(err.to_string()))?
    {
        Value::Mapping(map) => map,
        _ => {
            return Err(ConfigError::Encode(
                "config must serialize to a mapping".to_string(),
            ));
        }
    };

    let mut lines = Vec::new();
    for field in T::fields() {
        if !field.description.is_empty() {
            lines.push(format!("# {}", field.description.replace('\n', "\n# ")));
        }
        let key = Value::String(field.name.to_string());
        let value = mapping.get(&key).cloned().unwrap_or(Value::Null);
        let yaml_line = serde_yaml::to_string(&serde_yaml::Mapping::from_iter([(key, value)]))
            .map_err(|err| ConfigError::Encode(err.to_string()))?;
        lines.push(yaml_line.trim().to_string());
    }

    fs::write(path, lines.join("\n")).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn has_missing_fields<T: ConfigSpec>(user: &Value) -> bool {
    let Value::Mapping(map) = user else {
        return true;
    };
    T::fields()
        .iter()
        .any(|field| !map.contains_key(Value::String(field.name.to_string())))
}

// Recurse into mappings so nested defaults survive; everything else the user
// wrote replaces the default wholesale.
fn merge_value(defaults: &mut Value, user: Value) {
    match (defaults, user) {
        (Value::Mapping(defaults), Value::Mapping(user)) => {
            for (key, value) in user {
                match defaults.get_mut(&key) {
                    Some(slot) => merge_value(slot, value),
                    None => {
                        defaults.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

fn ensure_parent(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base_system::context::Config;

    #[test]
    fn first_load_writes_commented_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config: Config = load_or_create_with_base(None, Some(dir.path())).unwrap();
        assert_eq!(config.channel_cap, Config::default().channel_cap);

        let written = fs::read_to_string(dir.path().join(Config::FILE_NAME)).unwrap();
        assert!(written.contains("channel_cap"));
        assert!(written.lines().any(|l| l.starts_with("# ")));
    }

    #[test]
    fn user_values_survive_merge_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(Config::FILE_NAME);
        fs::write(&path, "channel_cap: 10\n").unwrap();

        let config: Config = load_or_create_with_base(None, Some(dir.path())).unwrap();
        assert_eq!(config.channel_cap, 10);
        // missing fields come back from defaults and get written out
        let rewritten = fs::read_to_string(&path).unwrap();
        assert!(rewritten.contains("request_timeout"));
    }
}
