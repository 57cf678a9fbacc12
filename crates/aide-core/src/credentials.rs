//! Credential resolution and the encrypted key store.
//!
//! One resolution strategy serves every agent: a per-session override wins,
//! then the process environment, then the key stored on disk. What happens
//! when all three are absent is the caller's policy: some agents prompt
//! interactively, others refuse to start.

use magic_crypt::{new_magic_crypt, MagicCryptTrait};
use rpassword::prompt_password;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::CredentialError;

/// Environment variable holding the process-wide default credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

// Obfuscation only: anyone holding this binary can decrypt the store. The
// store exists so the key does not sit in plain text in a dotfile.
const ENCRYPTION_KEY: &str = "aide-key-store-v1";

#[derive(Serialize, Deserialize, Debug, Default)]
struct KeyStoreFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    encrypted_data: Option<String>,
}

fn key_store_path(base_path: &Path) -> PathBuf {
    base_path.join(".aide").join("credentials.json")
}

fn store_error(e: impl ToString) -> CredentialError {
    CredentialError::Store(e.to_string())
}

fn read_store(path: &Path) -> Result<KeyStoreFile, CredentialError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(KeyStoreFile::default()),
        Err(e) => return Err(store_error(e)),
    };
    if content.trim().is_empty() {
        return Ok(KeyStoreFile::default());
    }
    serde_json::from_str(&content).map_err(store_error)
}

/// Reads and decrypts the stored API key, if one has been set.
pub fn read_stored_key(base_path: &Path) -> Result<Option<String>, CredentialError> {
    let store = read_store(&key_store_path(base_path))?;
    let Some(encrypted) = store.encrypted_data else {
        return Ok(None);
    };
    let crypt = new_magic_crypt!(ENCRYPTION_KEY, 256);
    let key = crypt
        .decrypt_base64_to_string(&encrypted)
        .map_err(store_error)?;
    Ok(Some(key))
}

/// Encrypts `key` and writes it to the store, replacing any previous value.
pub fn write_stored_key(base_path: &Path, key: &str) -> Result<(), CredentialError> {
    let crypt = new_magic_crypt!(ENCRYPTION_KEY, 256);
    let store = KeyStoreFile {
        encrypted_data: Some(crypt.encrypt_str_to_base64(key)),
    };
    let content = serde_json::to_string_pretty(&store).map_err(store_error)?;
    fs::write(key_store_path(base_path), content).map_err(store_error)
}

/// Stores a key, prompting interactively when no value is supplied.
pub fn set_stored_key(base_path: &Path, value: Option<String>) -> Result<(), CredentialError> {
    let key = match value {
        Some(v) => v,
        None => prompt_password("Enter the API key to store: ").map_err(store_error)?,
    };
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(CredentialError::Missing);
    }
    write_stored_key(base_path, &key)
}

/// Removes the stored key. Returns whether one was present.
pub fn clear_stored_key(base_path: &Path) -> Result<bool, CredentialError> {
    let path = key_store_path(base_path);
    let store = read_store(&path)?;
    let had_key = store.encrypted_data.is_some();
    if had_key {
        let content = serde_json::to_string_pretty(&KeyStoreFile::default()).map_err(store_error)?;
        fs::write(&path, content).map_err(store_error)?;
    }
    Ok(had_key)
}

/// What to do when no credential can be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnMissing {
    /// Refuse to proceed. For agents that need the credential up front.
    Fail,
    /// Ask for the key interactively on the terminal.
    Prompt,
}

/// The shared credential-resolution strategy.
pub struct CredentialResolver {
    base_path: PathBuf,
}

impl CredentialResolver {
    pub fn new(base_path: &Path) -> Self {
        Self {
            base_path: base_path.to_path_buf(),
        }
    }

    /// Resolves the API key: session override, then `GEMINI_API_KEY`, then
    /// the key store, then the `on_missing` policy.
    pub fn resolve(
        &self,
        session_override: Option<&str>,
        on_missing: OnMissing,
    ) -> Result<String, CredentialError> {
        if let Some(key) = session_override {
            let key = key.trim();
            if !key.is_empty() {
                return Ok(key.to_string());
            }
        }

        if let Ok(key) = env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key.trim().to_string());
            }
        }

        if let Some(key) = read_stored_key(&self.base_path)? {
            if !key.trim().is_empty() {
                return Ok(key.trim().to_string());
            }
        }

        tracing::debug!("no credential in the override, environment or key store");
        match on_missing {
            OnMissing::Fail => Err(CredentialError::Missing),
            OnMissing::Prompt => {
                let key = prompt_password("Enter your Gemini API key: ").map_err(store_error)?;
                let key = key.trim().to_string();
                if key.is_empty() {
                    Err(CredentialError::Missing)
                } else {
                    Ok(key)
                }
            }
        }
    }
}
