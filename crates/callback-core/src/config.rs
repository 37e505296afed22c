use std::path::Path;

use crate::error::ConfigError;

/// Trait for loading configuration documents from JSON.
///
/// Implementors derive `serde::Deserialize` and get file and string loaders
/// for free.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(contents)?)
    }

    fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }
}
