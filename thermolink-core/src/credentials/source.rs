//! Configuration holder trait
//!
//! Bootstrap code reads credentials through [`CredentialSource`] and never
//! sees whether they were compiled in or loaded from flash.

use super::{
    CredentialField, PLACEHOLDER_NETWORK_NAME, PLACEHOLDER_NETWORK_PASSWORD,
    PLACEHOLDER_PLATFORM_TOKEN,
};

/// Supplies the three credential values to connectivity bootstrap
///
/// Accessors cannot fail and have no side effects. Repeated reads return
/// the same value for the lifetime of the holder.
pub trait CredentialSource {
    /// WiFi network name, passed to the association call
    fn network_name(&self) -> &str;

    /// WiFi password, passed to the association call
    fn network_password(&self) -> &str;

    /// Platform authorization token, passed to the platform handshake
    fn platform_token(&self) -> &str;

    /// Value of a single field
    fn get(&self, field: CredentialField) -> &str {
        match field {
            CredentialField::NetworkName => self.network_name(),
            CredentialField::NetworkPassword => self.network_password(),
            CredentialField::PlatformToken => self.platform_token(),
        }
    }
}

impl<T: CredentialSource + ?Sized> CredentialSource for &T {
    fn network_name(&self) -> &str {
        (**self).network_name()
    }

    fn network_password(&self) -> &str {
        (**self).network_password()
    }

    fn platform_token(&self) -> &str {
        (**self).platform_token()
    }
}

/// Credentials fixed at build time
///
/// The build script generates a `const` of this type from
/// `credentials.toml`, so the values live in flash with the firmware image.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedCredentials {
    network_name: &'static str,
    network_password: &'static str,
    platform_token: &'static str,
}

impl EmbeddedCredentials {
    /// The unedited example values
    pub const PLACEHOLDER: EmbeddedCredentials = EmbeddedCredentials::new(
        PLACEHOLDER_NETWORK_NAME,
        PLACEHOLDER_NETWORK_PASSWORD,
        PLACEHOLDER_PLATFORM_TOKEN,
    );

    /// Create a credential set from string literals
    pub const fn new(
        network_name: &'static str,
        network_password: &'static str,
        platform_token: &'static str,
    ) -> Self {
        Self {
            network_name,
            network_password,
            platform_token,
        }
    }
}

impl CredentialSource for EmbeddedCredentials {
    fn network_name(&self) -> &str {
        self.network_name
    }

    fn network_password(&self) -> &str {
        self.network_password
    }

    fn platform_token(&self) -> &str {
        self.platform_token
    }
}

impl core::fmt::Debug for EmbeddedCredentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EmbeddedCredentials")
            .field("network_name", &self.network_name)
            .field(
                "network_password",
                &format_args!("<redacted:{}>", self.network_password.len()),
            )
            .field(
                "platform_token",
                &format_args!("<redacted:{}>", self.platform_token.len()),
            )
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EmbeddedCredentials {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "EmbeddedCredentials(network_name={=str}, network_password=<redacted:{=usize}>, platform_token=<redacted:{=usize}>)",
            self.network_name,
            self.network_password.len(),
            self.platform_token.len()
        )
    }
}
