//! Advisory credential checks
//!
//! Holders never reject values. These checks only catch the usual setup
//! mistakes (unedited placeholders, copy-paste whitespace, impossible WPA2
//! lengths) so the build script and boot log can warn about them before the
//! WiFi or platform layer fails with a less helpful error.

use heapless::Vec;

use super::{CredentialField, CredentialSource, MAX_NETWORK_NAME_LEN};

/// Maximum issues a single check can report
pub const MAX_ISSUES: usize = 8;

/// Shortest WPA2 passphrase
const MIN_PASSPHRASE_LEN: usize = 8;

/// Longest WPA2 passphrase
const MAX_PASSPHRASE_LEN: usize = 63;

/// Length of a raw hex PSK
const HEX_PSK_LEN: usize = 64;

/// A likely problem with a credential value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CredentialIssue {
    /// Value is empty
    Empty(CredentialField),
    /// Password is empty; only valid for open networks
    OpenNetwork,
    /// Value was never edited
    Placeholder(CredentialField),
    /// Value has leading or trailing whitespace
    Whitespace(CredentialField),
    /// Network name exceeds the 802.11 limit
    NetworkNameTooLong { len: usize },
    /// Password is neither an 8-63 byte passphrase nor a 64-digit hex key
    PasswordLength { len: usize },
}

impl CredentialIssue {
    /// Whether the issue only deserves a notice, not a warning
    pub const fn is_informational(&self) -> bool {
        matches!(self, CredentialIssue::OpenNetwork)
    }
}

impl core::fmt::Display for CredentialIssue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CredentialIssue::Empty(field) => write!(f, "{} is empty", field),
            CredentialIssue::OpenNetwork => {
                f.write_str("WiFi password is empty, joining as an open network")
            }
            CredentialIssue::Placeholder(field) => {
                write!(f, "{} is still a placeholder value", field)
            }
            CredentialIssue::Whitespace(field) => {
                write!(f, "{} has leading or trailing whitespace", field)
            }
            CredentialIssue::NetworkNameTooLong { len } => write!(
                f,
                "WiFi network name is {} bytes, at most {} allowed",
                len, MAX_NETWORK_NAME_LEN
            ),
            CredentialIssue::PasswordLength { len } => write!(
                f,
                "WiFi password is {} bytes, expected 8-63 or a 64-digit hex key",
                len
            ),
        }
    }
}

/// Result of [`check`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Diagnostics {
    issues: Vec<CredentialIssue, MAX_ISSUES>,
}

impl Diagnostics {
    /// True when nothing but informational notices were found
    pub fn is_ready(&self) -> bool {
        self.issues.iter().all(CredentialIssue::is_informational)
    }

    /// Issues in field order
    pub fn iter(&self) -> impl Iterator<Item = &CredentialIssue> {
        self.issues.iter()
    }

    /// Number of issues found
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Whether no issue was found at all
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Whether a specific issue was reported
    pub fn contains(&self, issue: &CredentialIssue) -> bool {
        self.issues.contains(issue)
    }

    fn push(&mut self, issue: CredentialIssue) {
        // At most 3 + 3 + 2 issues can be produced, which fits MAX_ISSUES
        let _ = self.issues.push(issue);
    }
}

/// Review a credential holder for likely setup mistakes
pub fn check(source: &impl CredentialSource) -> Diagnostics {
    let mut diagnostics = Diagnostics::default();

    for field in CredentialField::ALL {
        let value = source.get(field);

        if value.is_empty() {
            diagnostics.push(match field {
                CredentialField::NetworkPassword => CredentialIssue::OpenNetwork,
                _ => CredentialIssue::Empty(field),
            });
            continue;
        }

        if is_placeholder(field, value) {
            diagnostics.push(CredentialIssue::Placeholder(field));
        }

        if value.trim() != value {
            diagnostics.push(CredentialIssue::Whitespace(field));
        }

        match field {
            CredentialField::NetworkName if value.len() > MAX_NETWORK_NAME_LEN => {
                diagnostics.push(CredentialIssue::NetworkNameTooLong { len: value.len() });
            }
            CredentialField::NetworkPassword if !is_valid_wpa_key(value) => {
                diagnostics.push(CredentialIssue::PasswordLength { len: value.len() });
            }
            _ => {}
        }
    }

    diagnostics
}

/// Whether `value` is the shipped placeholder or has its `<...>` shape
pub fn is_placeholder(field: CredentialField, value: &str) -> bool {
    value == field.placeholder()
        || (value.len() >= 2 && value.starts_with('<') && value.ends_with('>'))
}

fn is_valid_wpa_key(value: &str) -> bool {
    let len = value.len();
    (MIN_PASSPHRASE_LEN..=MAX_PASSPHRASE_LEN).contains(&len)
        || (len == HEX_PSK_LEN && value.bytes().all(|b| b.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{CredentialSet, EmbeddedCredentials};
    use std::string::ToString;

    #[test]
    fn test_unedited_placeholders_are_flagged() {
        let diagnostics = check(&EmbeddedCredentials::PLACEHOLDER);
        assert_eq!(diagnostics.len(), 3);
        assert!(!diagnostics.is_ready());
        for field in CredentialField::ALL {
            assert!(diagnostics.contains(&CredentialIssue::Placeholder(field)));
        }
    }

    #[test]
    fn test_clean_credentials_are_ready() {
        let creds = EmbeddedCredentials::new("home", "long enough", "0123456789abcdef");
        let diagnostics = check(&creds);
        assert!(diagnostics.is_empty());
        assert!(diagnostics.is_ready());
    }

    #[test]
    fn test_empty_password_is_open_network() {
        let creds = EmbeddedCredentials::new("cafe", "", "token-value");
        let diagnostics = check(&creds);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.contains(&CredentialIssue::OpenNetwork));
        assert!(diagnostics.is_ready());
    }

    #[test]
    fn test_empty_name_and_token() {
        let creds = EmbeddedCredentials::new("", "password1", "");
        let diagnostics = check(&creds);
        let issues: std::vec::Vec<_> = diagnostics.iter().copied().collect();
        assert_eq!(
            issues,
            [
                CredentialIssue::Empty(CredentialField::NetworkName),
                CredentialIssue::Empty(CredentialField::PlatformToken),
            ]
        );
        assert!(!diagnostics.is_ready());
    }

    #[test]
    fn test_password_length_rules() {
        let short = EmbeddedCredentials::new("net", "1234567", "tok");
        assert!(check(&short).contains(&CredentialIssue::PasswordLength { len: 7 }));

        let hex = "0123456789abcdef0123456789ABCDEF0123456789abcdef0123456789abcdef";
        let hex_key = EmbeddedCredentials::new("net", hex, "tok");
        assert!(check(&hex_key).is_ready());

        let not_hex = "g123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
        let bad_key = EmbeddedCredentials::new("net", not_hex, "tok");
        assert!(check(&bad_key).contains(&CredentialIssue::PasswordLength { len: 64 }));
    }

    #[test]
    fn test_long_network_name() {
        let name = "n".repeat(40);
        let name: &'static str = std::boxed::Box::leak(name.into_boxed_str());
        let creds = EmbeddedCredentials::new(name, "password1", "tok");
        assert!(check(&creds).contains(&CredentialIssue::NetworkNameTooLong { len: 40 }));
    }

    #[test]
    fn test_whitespace_is_flagged() {
        let set = CredentialSet::new("home ", "password1", "\ttok").unwrap();
        let diagnostics = check(&set);
        assert!(diagnostics.contains(&CredentialIssue::Whitespace(CredentialField::NetworkName)));
        assert!(diagnostics.contains(&CredentialIssue::Whitespace(CredentialField::PlatformToken)));
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_custom_angle_bracket_value_is_placeholder() {
        assert!(is_placeholder(CredentialField::PlatformToken, "<your token here>"));
        assert!(!is_placeholder(CredentialField::PlatformToken, "<"));
        assert!(!is_placeholder(CredentialField::NetworkName, "home<net>x"));
    }

    #[test]
    fn test_messages_never_include_values() {
        let creds = EmbeddedCredentials::new("net", "short", "<Blync Token>");
        for issue in check(&creds).iter() {
            let message = issue.to_string();
            assert!(!message.contains("short"));
            assert!(!message.contains("<Blync Token>"));
        }
        assert_eq!(
            CredentialIssue::Placeholder(CredentialField::PlatformToken).to_string(),
            "platform token is still a placeholder value"
        );
    }
}
