use std::fmt;

use crate::error::StartupError;

pub const API_KEY_ID_VAR: &str = "APCA_API_KEY_ID";
pub const API_SECRET_KEY_VAR: &str = "APCA_API_SECRET_KEY";

/// Static Alpaca key pair, attached to every outgoing request.
#[derive(Clone)]
pub struct Credentials {
    pub key_id: String,
    pub secret_key: String,
}

impl Credentials {
    pub fn new(key_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Credentials {
            key_id: key_id.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Reads the key pair from the process environment.
    pub fn from_env() -> Result<Self, StartupError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the key pair through `lookup`; unset and empty values are both missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(StartupError::MissingCredential(name))
        };
        Ok(Credentials {
            key_id: read(API_KEY_ID_VAR)?,
            secret_key: read(API_SECRET_KEY_VAR)?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key_id", &self.key_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
