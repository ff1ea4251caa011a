//! Credentials chosen at boot

use super::{CredentialSet, CredentialSource, EmbeddedCredentials};

/// Where the active credentials came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CredentialOrigin {
    /// Override provisioned into flash
    Flash,
    /// Constants compiled into the firmware image
    Embedded,
}

/// The credential set the firmware runs with
///
/// A flash override wins over the embedded constants. Embedded values are
/// kept as `&'static str`, so they are never truncated to runtime capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResolvedCredentials {
    /// Loaded from flash
    Flash(CredentialSet),
    /// Compiled in
    Embedded(EmbeddedCredentials),
}

impl ResolvedCredentials {
    /// Where these credentials came from
    pub fn origin(&self) -> CredentialOrigin {
        match self {
            ResolvedCredentials::Flash(_) => CredentialOrigin::Flash,
            ResolvedCredentials::Embedded(_) => CredentialOrigin::Embedded,
        }
    }
}

impl CredentialSource for ResolvedCredentials {
    fn network_name(&self) -> &str {
        match self {
            ResolvedCredentials::Flash(set) => set.network_name(),
            ResolvedCredentials::Embedded(creds) => creds.network_name(),
        }
    }

    fn network_password(&self) -> &str {
        match self {
            ResolvedCredentials::Flash(set) => set.network_password(),
            ResolvedCredentials::Embedded(creds) => creds.network_password(),
        }
    }

    fn platform_token(&self) -> &str {
        match self {
            ResolvedCredentials::Flash(set) => set.platform_token(),
            ResolvedCredentials::Embedded(creds) => creds.platform_token(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_origin() {
        let set = CredentialSet::new("attic", "password1", "tok").unwrap();
        let resolved = ResolvedCredentials::Flash(set);
        assert_eq!(resolved.origin(), CredentialOrigin::Flash);
        assert_eq!(resolved.network_name(), "attic");
        assert_eq!(resolved.network_password(), "password1");
        assert_eq!(resolved.platform_token(), "tok");
    }

    #[test]
    fn test_embedded_keeps_long_values() {
        let long_token = "t".repeat(100);
        let long_token: &'static str = std::boxed::Box::leak(long_token.into_boxed_str());
        let resolved =
            ResolvedCredentials::Embedded(EmbeddedCredentials::new("net", "password1", long_token));
        assert_eq!(resolved.origin(), CredentialOrigin::Embedded);
        assert_eq!(resolved.platform_token().len(), 100);
    }
}
