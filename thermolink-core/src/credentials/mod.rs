//! Connectivity credentials
//!
//! A Credential Set is the triple of WiFi network name, WiFi password and
//! platform authorization token that the connectivity bootstrap needs.
//! Values are opaque here: holders never validate or parse them.

pub mod diagnostics;
pub mod field;
pub mod resolved;
pub mod secret;
pub mod set;
pub mod source;

pub use diagnostics::{check, CredentialIssue, Diagnostics};
pub use field::CredentialField;
pub use resolved::{CredentialOrigin, ResolvedCredentials};
pub use secret::Secret;
pub use set::{CapacityError, CredentialSet};
pub use source::{CredentialSource, EmbeddedCredentials};

/// Maximum network name length (802.11 SSID limit)
pub const MAX_NETWORK_NAME_LEN: usize = 32;

/// Maximum network password length (63-char passphrase or 64-hex PSK)
pub const MAX_NETWORK_PASSWORD_LEN: usize = 64;

/// Maximum platform token length
pub const MAX_PLATFORM_TOKEN_LEN: usize = 64;

/// Network name shipped in the unedited example configuration
pub const PLACEHOLDER_NETWORK_NAME: &str = "<WiFi SSID>";

/// Network password shipped in the unedited example configuration
pub const PLACEHOLDER_NETWORK_PASSWORD: &str = "<WiFi Password>";

/// Platform token shipped in the unedited example configuration
pub const PLACEHOLDER_PLATFORM_TOKEN: &str = "<Blync Token>";
