//! Secret text values
//!
//! `Secret` holds a password or token in a fixed-capacity string. Its
//! `Debug` and `defmt::Format` output only ever shows the byte length, so a
//! whole [`CredentialSet`](super::CredentialSet) can be logged safely.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Secret text with redacted formatting
#[derive(Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Secret<const N: usize>(String<N>);

impl<const N: usize> Secret<N> {
    /// Create an empty secret
    pub const fn new() -> Self {
        Self(String::new())
    }

    /// Copy `value` into a secret
    ///
    /// Returns `None` if `value` exceeds the capacity `N`.
    pub fn try_from_str(value: &str) -> Option<Self> {
        String::try_from(value).ok().map(Self)
    }

    /// Plaintext value
    ///
    /// Only call this when handing the value to the consumer that needs it.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Length of the value in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<String<N>> for Secret<N> {
    fn from(value: String<N>) -> Self {
        Self(value)
    }
}

impl<const N: usize> core::fmt::Debug for Secret<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "<redacted:{}>", self.0.len())
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for Secret<N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "<redacted:{=usize}>", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::format;

    #[test]
    fn test_debug_hides_value() {
        let secret: Secret<16> = Secret::try_from_str("hunter22").unwrap();
        let rendered = format!("{:?}", secret);
        assert_eq!(rendered, "<redacted:8>");
        assert!(!rendered.contains("hunter22"));
    }

    #[test]
    fn test_capacity_is_enforced() {
        assert!(Secret::<4>::try_from_str("abcd").is_some());
        assert!(Secret::<4>::try_from_str("abcde").is_none());
    }

    #[test]
    fn test_expose_returns_plaintext() {
        let secret: Secret<8> = Secret::try_from_str("tok").unwrap();
        assert_eq!(secret.expose(), "tok");
        assert_eq!(secret.len(), 3);
        assert!(!secret.is_empty());
        assert!(Secret::<8>::new().is_empty());
    }
}
