//! Credential overrides in flash
//!
//! Two formats may be provisioned: TOML text under
//! [`StorageKey::CredentialsToml`] and a binary record under
//! [`StorageKey::Credentials`]. TOML wins and is converted into the binary
//! record the first time it loads.
//!
//! Nothing here logs. Every operation reports what happened so the firmware
//! can decide how loud to be about it.

use core::str;

use thermolink_hal::{FlashError, FlashStorage, StorageKey};

use super::record::{decode, encode, RecordError, MAX_RECORD_SIZE};
use super::toml::{parse_credentials, ParseError};
use crate::credentials::{CredentialSet, EmbeddedCredentials, ResolvedCredentials};

/// Maximum TOML override size
pub const MAX_TOML_SIZE: usize = 1024;

/// Credential persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    /// Flash operation failed
    Flash(FlashError),
    /// Invalid UTF-8 in TOML data
    InvalidUtf8,
    /// TOML parsing failed
    TomlParse(ParseError),
    /// Binary record rejected
    Record(RecordError),
}

impl From<FlashError> for LoadError {
    fn from(e: FlashError) -> Self {
        LoadError::Flash(e)
    }
}

impl From<RecordError> for LoadError {
    fn from(e: RecordError) -> Self {
        LoadError::Record(e)
    }
}

impl From<ParseError> for LoadError {
    fn from(e: ParseError) -> Self {
        LoadError::TomlParse(e)
    }
}

/// Which flash format supplied an override
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OverrideSource {
    /// TOML text; `import` is the outcome of rewriting it as a binary record
    Toml { import: Result<(), LoadError> },
    /// Binary record; `rejected_toml` is set when TOML was present but unusable
    Binary { rejected_toml: Option<LoadError> },
}

/// A credential override read from flash
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoadedOverride {
    pub credentials: CredentialSet,
    pub source: OverrideSource,
}

/// Why the embedded credentials were chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fallback {
    /// Flash holds no override
    NoOverride,
    /// The partition was corrupted; holds the result of erasing it
    Erased(Result<(), FlashError>),
    /// An override exists but could not be loaded
    Unusable(LoadError),
}

/// Outcome of [`CredentialPersistence::resolve`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    Override(LoadedOverride),
    Embedded {
        credentials: EmbeddedCredentials,
        reason: Fallback,
    },
}

impl Resolution {
    /// The credentials to run with
    pub fn into_credentials(self) -> ResolvedCredentials {
        match self {
            Resolution::Override(loaded) => ResolvedCredentials::Flash(loaded.credentials),
            Resolution::Embedded { credentials, .. } => ResolvedCredentials::Embedded(credentials),
        }
    }
}

/// Credential persistence manager
///
/// Handles loading, storing and clearing the flash override.
pub struct CredentialPersistence<S> {
    storage: S,
}

impl<S: FlashStorage> CredentialPersistence<S> {
    /// Create a new credential persistence manager
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Pick the credentials to run with
    ///
    /// A valid flash override wins; anything else falls back to `embedded`.
    /// A corrupted partition is erased so later provisioning can succeed.
    pub async fn resolve(&mut self, embedded: EmbeddedCredentials) -> Resolution {
        let reason = match self.load().await {
            Ok(loaded) => return Resolution::Override(loaded),
            Err(LoadError::Flash(FlashError::NotFound)) => Fallback::NoOverride,
            Err(LoadError::Flash(FlashError::Corrupted)) => {
                Fallback::Erased(self.storage.erase_all().await)
            }
            Err(e) => Fallback::Unusable(e),
        };

        Resolution::Embedded {
            credentials: embedded,
            reason,
        }
    }

    /// Load the credential override from flash
    ///
    /// Tries the TOML override first, falls back to the binary record.
    /// A TOML override that parses is imported into the binary record.
    pub async fn load(&mut self) -> Result<LoadedOverride, LoadError> {
        let rejected_toml = match self.load_toml().await {
            Ok(credentials) => {
                let import = self.import(&credentials).await;
                return Ok(LoadedOverride {
                    credentials,
                    source: OverrideSource::Toml { import },
                });
            }
            Err(LoadError::Flash(FlashError::NotFound)) => None,
            Err(e) => Some(e),
        };

        match self.load_binary().await {
            Ok(credentials) => Ok(LoadedOverride {
                credentials,
                source: OverrideSource::Binary { rejected_toml },
            }),
            // A broken TOML override says more than a missing record
            Err(LoadError::Flash(FlashError::NotFound)) => {
                Err(rejected_toml.unwrap_or(LoadError::Flash(FlashError::NotFound)))
            }
            Err(e) => Err(e),
        }
    }

    /// Save a credential set as the binary override
    pub async fn store(&mut self, credentials: &CredentialSet) -> Result<(), LoadError> {
        let mut buffer = [0u8; MAX_RECORD_SIZE];
        let bytes = encode(credentials, &mut buffer)?;
        self.storage.write(StorageKey::Credentials, bytes).await?;
        Ok(())
    }

    /// Remove both override formats, restoring the embedded credentials
    ///
    /// Only keys that exist are touched.
    pub async fn clear(&mut self) -> Result<(), FlashError> {
        for key in [StorageKey::Credentials, StorageKey::CredentialsToml] {
            if self.storage.exists(key).await {
                self.storage.remove(key).await?;
            }
        }
        Ok(())
    }

    async fn load_toml(&mut self) -> Result<CredentialSet, LoadError> {
        let mut buffer = [0u8; MAX_TOML_SIZE];
        let len = self
            .storage
            .read(StorageKey::CredentialsToml, &mut buffer)
            .await?;

        let text = str::from_utf8(&buffer[..len]).map_err(|_| LoadError::InvalidUtf8)?;
        Ok(parse_credentials(text)?)
    }

    async fn load_binary(&mut self) -> Result<CredentialSet, LoadError> {
        let mut buffer = [0u8; MAX_RECORD_SIZE];
        let len = self
            .storage
            .read(StorageKey::Credentials, &mut buffer)
            .await?;

        Ok(decode(&buffer[..len])?)
    }

    /// Replace a TOML override with the equivalent binary record
    ///
    /// The TOML stays if the record cannot be written. If only the removal
    /// fails, the next boot imports the same text again.
    async fn import(&mut self, credentials: &CredentialSet) -> Result<(), LoadError> {
        self.store(credentials).await?;
        self.storage.remove(StorageKey::CredentialsToml).await?;
        Ok(())
    }
}
