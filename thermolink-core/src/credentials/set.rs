//! Runtime credential set
//!
//! Owned, fixed-capacity copy of the three credential values. Used for
//! flash overrides, which are only known after boot.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{
    CredentialField, CredentialSource, Secret, MAX_NETWORK_NAME_LEN, MAX_NETWORK_PASSWORD_LEN,
    MAX_PLATFORM_TOKEN_LEN,
};

/// A value did not fit in the runtime capacity of its field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CapacityError {
    /// Field that overflowed
    pub field: CredentialField,
    /// Length of the rejected value in bytes
    pub len: usize,
}

impl core::fmt::Display for CapacityError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} is {} bytes, at most {} fit",
            self.field,
            self.len,
            self.field.capacity()
        )
    }
}

/// Network name, network password and platform token
///
/// Secrets are wrapped in [`Secret`], so `Debug`/`defmt` output of the
/// whole set never reveals them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CredentialSet {
    network_name: String<MAX_NETWORK_NAME_LEN>,
    network_password: Secret<MAX_NETWORK_PASSWORD_LEN>,
    platform_token: Secret<MAX_PLATFORM_TOKEN_LEN>,
}

impl CredentialSet {
    /// Copy three values into a new set
    pub fn new(
        network_name: &str,
        network_password: &str,
        platform_token: &str,
    ) -> Result<Self, CapacityError> {
        let network_name = String::try_from(network_name).map_err(|_| CapacityError {
            field: CredentialField::NetworkName,
            len: network_name.len(),
        })?;
        let network_password =
            Secret::try_from_str(network_password).ok_or(CapacityError {
                field: CredentialField::NetworkPassword,
                len: network_password.len(),
            })?;
        let platform_token = Secret::try_from_str(platform_token).ok_or(CapacityError {
            field: CredentialField::PlatformToken,
            len: platform_token.len(),
        })?;

        Ok(Self {
            network_name,
            network_password,
            platform_token,
        })
    }

    /// Build a set from already-bounded parts
    pub fn from_parts(
        network_name: String<MAX_NETWORK_NAME_LEN>,
        network_password: String<MAX_NETWORK_PASSWORD_LEN>,
        platform_token: String<MAX_PLATFORM_TOKEN_LEN>,
    ) -> Self {
        Self {
            network_name,
            network_password: network_password.into(),
            platform_token: platform_token.into(),
        }
    }

    /// Copy the values of any other holder
    pub fn from_source(source: &impl CredentialSource) -> Result<Self, CapacityError> {
        Self::new(
            source.network_name(),
            source.network_password(),
            source.platform_token(),
        )
    }
}

impl CredentialSource for CredentialSet {
    fn network_name(&self) -> &str {
        self.network_name.as_str()
    }

    fn network_password(&self) -> &str {
        self.network_password.expose()
    }

    fn platform_token(&self) -> &str {
        self.platform_token.expose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::EmbeddedCredentials;
    use proptest::prelude::*;
    use std::format;

    #[test]
    fn test_new_copies_values() {
        let set = CredentialSet::new("lab", "s3cret-pass", "tok-123").unwrap();
        assert_eq!(set.network_name(), "lab");
        assert_eq!(set.network_password(), "s3cret-pass");
        assert_eq!(set.platform_token(), "tok-123");
    }

    #[test]
    fn test_overlong_name_reports_field() {
        let name = "x".repeat(33);
        let err = CredentialSet::new(&name, "password", "token").unwrap_err();
        assert_eq!(err.field, CredentialField::NetworkName);
        assert_eq!(err.len, 33);
    }

    #[test]
    fn test_overlong_token_reports_field() {
        let token = "t".repeat(65);
        let err = CredentialSet::new("net", "password", &token).unwrap_err();
        assert_eq!(err.field, CredentialField::PlatformToken);
        assert_eq!(format!("{}", err), "platform token is 65 bytes, at most 64 fit");
    }

    #[test]
    fn test_from_source_copies_placeholders() {
        let set = CredentialSet::from_source(&EmbeddedCredentials::PLACEHOLDER).unwrap();
        assert_eq!(set.network_name(), "<WiFi SSID>");
        assert_eq!(set.network_password(), "<WiFi Password>");
        assert_eq!(set.platform_token(), "<Blync Token>");
    }

    #[test]
    fn test_debug_shows_name_only() {
        let set = CredentialSet::new("lab", "s3cret-pass", "tok-123").unwrap();
        let rendered = format!("{:?}", set);
        assert!(rendered.contains("lab"));
        assert!(!rendered.contains("s3cret-pass"));
        assert!(!rendered.contains("tok-123"));
    }

    #[test]
    fn test_default_is_empty() {
        let set = CredentialSet::default();
        assert_eq!(set.network_name(), "");
        assert_eq!(set.network_password(), "");
        assert_eq!(set.platform_token(), "");
    }

    proptest! {
        #[test]
        fn prop_debug_never_leaks_secrets(
            password in "[a-zA-Z0-9]{8,63}",
            token in "[a-zA-Z0-9_-]{16,64}",
        ) {
            let set = CredentialSet::new("net", &password, &token).unwrap();
            let rendered = format!("{:?}", set);
            prop_assert!(!rendered.contains(&password));
            prop_assert!(!rendered.contains(&token));
        }

        #[test]
        fn prop_reads_are_idempotent(name in "\\PC{0,32}", token in "\\PC{0,16}") {
            prop_assume!(name.len() <= MAX_NETWORK_NAME_LEN);
            let set = CredentialSet::new(&name, "", &token).unwrap();
            let first = (set.network_name(), set.platform_token());
            let second = (set.network_name(), set.platform_token());
            prop_assert_eq!(first, second);
            prop_assert_eq!(set.network_name(), name.as_str());
        }
    }
}
