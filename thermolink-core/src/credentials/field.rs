//! Credential field identifiers

use super::{
    MAX_NETWORK_NAME_LEN, MAX_NETWORK_PASSWORD_LEN, MAX_PLATFORM_TOKEN_LEN,
    PLACEHOLDER_NETWORK_NAME, PLACEHOLDER_NETWORK_PASSWORD, PLACEHOLDER_PLATFORM_TOKEN,
};

/// One of the three values in a Credential Set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CredentialField {
    /// WiFi network name (SSID)
    NetworkName,
    /// WiFi password (PSK)
    NetworkPassword,
    /// IoT platform authorization token
    PlatformToken,
}

impl CredentialField {
    /// All fields, in the order they are reported
    pub const ALL: [CredentialField; 3] = [
        CredentialField::NetworkName,
        CredentialField::NetworkPassword,
        CredentialField::PlatformToken,
    ];

    /// Section holding this field in `credentials.toml`
    pub const fn section(self) -> &'static str {
        match self {
            CredentialField::NetworkName | CredentialField::NetworkPassword => "wifi",
            CredentialField::PlatformToken => "platform",
        }
    }

    /// Key used for this field within its section
    pub const fn key(self) -> &'static str {
        match self {
            CredentialField::NetworkName => "ssid",
            CredentialField::NetworkPassword => "password",
            CredentialField::PlatformToken => "token",
        }
    }

    /// Human-readable label
    pub const fn label(self) -> &'static str {
        match self {
            CredentialField::NetworkName => "WiFi network name",
            CredentialField::NetworkPassword => "WiFi password",
            CredentialField::PlatformToken => "platform token",
        }
    }

    /// Storage capacity of a runtime [`CredentialSet`](super::CredentialSet)
    pub const fn capacity(self) -> usize {
        match self {
            CredentialField::NetworkName => MAX_NETWORK_NAME_LEN,
            CredentialField::NetworkPassword => MAX_NETWORK_PASSWORD_LEN,
            CredentialField::PlatformToken => MAX_PLATFORM_TOKEN_LEN,
        }
    }

    /// Value shipped in the unedited example configuration
    pub const fn placeholder(self) -> &'static str {
        match self {
            CredentialField::NetworkName => PLACEHOLDER_NETWORK_NAME,
            CredentialField::NetworkPassword => PLACEHOLDER_NETWORK_PASSWORD,
            CredentialField::PlatformToken => PLACEHOLDER_PLATFORM_TOKEN,
        }
    }
}

impl core::fmt::Display for CredentialField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}
