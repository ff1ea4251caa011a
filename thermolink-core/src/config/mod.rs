//! Credential configuration formats
//!
//! - [`toml`]: text format shared by `credentials.toml` and flash overrides
//! - [`record`]: binary flash record (postcard, requires the `serde` feature)
//! - [`persistence`]: loading both from flash (requires the `storage` feature)

#[cfg(feature = "storage")]
pub mod persistence;
#[cfg(feature = "serde")]
pub mod record;
pub mod toml;

#[cfg(feature = "storage")]
pub use persistence::{
    CredentialPersistence, Fallback, LoadError, LoadedOverride, OverrideSource, Resolution,
};
#[cfg(feature = "serde")]
pub use record::{decode, encode, RecordError, StoredCredentials, MAX_RECORD_SIZE};
pub use toml::{parse_credentials, parse_draft, CredentialDraft, ParseError};
