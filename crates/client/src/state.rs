//! The local state directory: one key pair, one config file.

use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use common::crypto::SecretKey;
use common::protocol::Identity;

pub const APP_NAME: &str = "deaddrop";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const KEY_FILE_NAME: &str = "key.pem";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Identity this client answers to on the relay
    pub identity: Identity,
    /// Relay the identity was registered with
    pub server: Url,
}

#[derive(Debug, Clone)]
pub struct ClientState {
    /// Path to the deaddrop directory (~/.deaddrop)
    pub state_dir: PathBuf,
    /// Path to the key PEM file
    pub key_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: ClientConfig,
}

impl ClientState {
    /// Get the deaddrop directory path (custom or default ~/.deaddrop)
    pub fn state_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Check if the deaddrop directory exists
    pub fn exists(custom_path: Option<PathBuf>) -> Result<bool, StateError> {
        let state_dir = Self::state_dir(custom_path)?;
        Ok(state_dir.exists())
    }

    /// Initialize a new deaddrop state directory.
    ///
    /// Refuses to touch an existing one: the key on disk may be the only
    /// copy of an identity the relay already knows.
    pub fn init(
        custom_path: Option<PathBuf>,
        key: &SecretKey,
        config: ClientConfig,
    ) -> Result<Self, StateError> {
        let state_dir = Self::state_dir(custom_path)?;

        if state_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&state_dir)?;

        let key_path = state_dir.join(KEY_FILE_NAME);
        let key_pem = key
            .to_pem()
            .map_err(|e| StateError::InvalidKey(e.to_string()))?;
        fs::write(&key_path, key_pem)?;

        let config_path = state_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            state_dir,
            key_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the deaddrop directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let state_dir = Self::state_dir(custom_path)?;

        if !state_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let key_path = state_dir.join(KEY_FILE_NAME);
        let config_path = state_dir.join(CONFIG_FILE_NAME);

        if !key_path.exists() {
            return Err(StateError::MissingFile(KEY_FILE_NAME.to_string()));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: ClientConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            state_dir,
            key_path,
            config_path,
            config,
        })
    }

    /// Load the secret key from the key file
    pub fn load_key(&self) -> Result<SecretKey, StateError> {
        let pem = fs::read_to_string(&self.key_path)?;
        let key = SecretKey::from_pem(&pem).map_err(|e| StateError::InvalidKey(e.to_string()))?;
        Ok(key)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("deaddrop directory not initialized. Run 'deaddrop init' first")]
    NotInitialized,

    #[error("deaddrop directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use common::crypto::KeyStrength;
    use tempfile::TempDir;

    use super::*;

    fn test_config() -> ClientConfig {
        ClientConfig {
            identity: Identity::new("tester"),
            server: Url::parse("http://localhost:8080").unwrap(),
        }
    }

    #[test]
    fn test_init_then_load() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("state");
        let key = SecretKey::generate(KeyStrength::Rsa1024).unwrap();

        let state = ClientState::init(Some(dir.clone()), &key, test_config()).unwrap();
        assert!(state.key_path.exists());
        assert!(state.config_path.exists());

        let loaded = ClientState::load(Some(dir)).unwrap();
        assert_eq!(loaded.config.identity, Identity::new("tester"));
        assert_eq!(loaded.config.server.as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_init_refuses_existing_directory() {
        let tmp = TempDir::new().unwrap();
        let key = SecretKey::generate(KeyStrength::Rsa1024).unwrap();

        let err = ClientState::init(Some(tmp.path().to_path_buf()), &key, test_config())
            .unwrap_err();
        assert!(matches!(err, StateError::AlreadyInitialized));
    }

    #[test]
    fn test_load_uninitialized_directory() {
        let tmp = TempDir::new().unwrap();
        let err = ClientState::load(Some(tmp.path().join("nowhere"))).unwrap_err();
        assert!(matches!(err, StateError::NotInitialized));
    }

    #[test]
    fn test_load_detects_missing_key_file() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("state");
        let key = SecretKey::generate(KeyStrength::Rsa1024).unwrap();

        let state = ClientState::init(Some(dir.clone()), &key, test_config()).unwrap();
        std::fs::remove_file(&state.key_path).unwrap();

        let err = ClientState::load(Some(dir)).unwrap_err();
        assert!(matches!(err, StateError::MissingFile(name) if name == KEY_FILE_NAME));
    }

    #[test]
    fn test_key_round_trips_through_disk() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("state");
        let key = SecretKey::generate(KeyStrength::Rsa1024).unwrap();

        let state = ClientState::init(Some(dir), &key, test_config()).unwrap();
        let reloaded = state.load_key().unwrap();

        let sealed = key.public_key().encrypt(b"still mine").unwrap();
        assert_eq!(reloaded.decrypt(&sealed).unwrap(), b"still mine");
    }
}
