//! Minimal TOML parser for credential files
//!
//! Handles only the subset used by `credentials.toml`. It does NOT support
//! the full TOML grammar, and it never allocates.
//!
//! Supported features:
//! - `[wifi]` with `ssid` and `password` (alias `psk`)
//! - `[platform]` with `token` (alias `auth_token`); `[blynk]` is accepted
//!   as a section alias
//! - Root-level `wifi_ssid`, `wifi_password`, `blynk_token` keys
//! - Basic strings with the TOML escapes (`\b \t \n \f \r \" \\ \uXXXX
//!   \UXXXXXXXX`) and literal strings
//! - Comments (# ...) outside of strings
//!
//! NOT supported:
//! - Unquoted values, numbers and booleans (credentials are always text)
//! - Multi-line strings
//! - Arrays, inline tables, array tables
//! - Dotted or quoted keys

use core::str::Chars;

use heapless::String as HString;

use crate::credentials::{
    CredentialField, CredentialSet, MAX_NETWORK_NAME_LEN, MAX_NETWORK_PASSWORD_LEN,
    MAX_PLATFORM_TOKEN_LEN,
};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Malformed or unsupported value
    InvalidValue,
    /// Unknown escape sequence in a basic string
    InvalidEscape,
    /// Value exceeds the field capacity
    TooLong(CredentialField),
    /// Required field not present
    Missing(CredentialField),
    /// Field given more than once
    Duplicate(CredentialField),
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Wifi,
    Platform,
}

impl Section {
    /// Canonical table name, matching [`CredentialField::section`]
    fn name(self) -> &'static str {
        match self {
            Section::Root => "",
            Section::Wifi => "wifi",
            Section::Platform => "platform",
        }
    }
}

/// Credential values collected from TOML text
///
/// Fields may still be missing; [`CredentialDraft::finish`] reports them.
/// No `Debug` impl, the draft holds plaintext secrets.
#[derive(Default)]
pub struct CredentialDraft {
    network_name: Option<HString<MAX_NETWORK_NAME_LEN>>,
    network_password: Option<HString<MAX_NETWORK_PASSWORD_LEN>>,
    platform_token: Option<HString<MAX_PLATFORM_TOKEN_LEN>>,
}

impl CredentialDraft {
    fn set(&mut self, field: CredentialField, raw: &str) -> Result<(), ParseError> {
        match field {
            CredentialField::NetworkName => store(&mut self.network_name, field, raw),
            CredentialField::NetworkPassword => store(&mut self.network_password, field, raw),
            CredentialField::PlatformToken => store(&mut self.platform_token, field, raw),
        }
    }

    /// Whether the text set `field`
    pub fn contains(&self, field: CredentialField) -> bool {
        match field {
            CredentialField::NetworkName => self.network_name.is_some(),
            CredentialField::NetworkPassword => self.network_password.is_some(),
            CredentialField::PlatformToken => self.platform_token.is_some(),
        }
    }

    /// Set `field` to an already decoded value, replacing any parsed one
    pub fn replace(&mut self, field: CredentialField, value: &str) -> Result<(), ParseError> {
        let too_long = ParseError::TooLong(field);
        match field {
            CredentialField::NetworkName => {
                self.network_name = Some(HString::try_from(value).map_err(|_| too_long)?);
            }
            CredentialField::NetworkPassword => {
                self.network_password = Some(HString::try_from(value).map_err(|_| too_long)?);
            }
            CredentialField::PlatformToken => {
                self.platform_token = Some(HString::try_from(value).map_err(|_| too_long)?);
            }
        }
        Ok(())
    }

    /// Turn the draft into a Credential Set, requiring all three values
    pub fn finish(self) -> Result<CredentialSet, ParseError> {
        let network_name = self
            .network_name
            .ok_or(ParseError::Missing(CredentialField::NetworkName))?;
        let network_password = self
            .network_password
            .ok_or(ParseError::Missing(CredentialField::NetworkPassword))?;
        let platform_token = self
            .platform_token
            .ok_or(ParseError::Missing(CredentialField::PlatformToken))?;

        Ok(CredentialSet::from_parts(
            network_name,
            network_password,
            platform_token,
        ))
    }
}

fn store<const N: usize>(
    slot: &mut Option<HString<N>>,
    field: CredentialField,
    raw: &str,
) -> Result<(), ParseError> {
    if slot.is_some() {
        return Err(ParseError::Duplicate(field));
    }
    *slot = Some(decode_value(raw, field)?);
    Ok(())
}

/// Parse TOML text into a Credential Set
///
/// All three values are required. Unknown keys are ignored so the same file
/// can carry settings for other parts of the firmware.
pub fn parse_credentials(input: &str) -> Result<CredentialSet, ParseError> {
    parse_draft(input)?.finish()
}

/// Parse TOML text without requiring every field
///
/// Syntax, duplicates and capacities are checked as in [`parse_credentials`].
pub fn parse_draft(input: &str) -> Result<CredentialDraft, ParseError> {
    let mut section = Section::Root;
    let mut draft = CredentialDraft::default();

    for line in input.lines() {
        let line = strip_comment(line).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        if let Some(field) = field_for_key(section, key) {
            draft.set(field, value)?;
        }
    }

    Ok(draft)
}

/// Cut a trailing `# comment`, ignoring `#` inside strings
fn strip_comment(line: &str) -> &str {
    let mut in_basic = false;
    let mut in_literal = false;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if in_basic {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_basic = false;
            }
        } else if in_literal {
            if c == '\'' {
                in_literal = false;
            }
        } else {
            match c {
                '"' => in_basic = true,
                '\'' => in_literal = true,
                '#' => return &line[..i],
                _ => {}
            }
        }
    }

    line
}

/// Parse a header line like "[wifi]"
fn parse_section_header(line: &str) -> Result<Section, ParseError> {
    let name = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(ParseError::InvalidSection)?
        .trim();

    match name {
        "wifi" => Ok(Section::Wifi),
        "platform" | "blynk" => Ok(Section::Platform),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

/// Map a key in a section to the field it sets
fn field_for_key(section: Section, key: &str) -> Option<CredentialField> {
    match (section, key) {
        // Aliases and the flat layout of older header-style files
        (Section::Root, "wifi_ssid") => Some(CredentialField::NetworkName),
        (Section::Root, "wifi_password") | (Section::Wifi, "psk") => {
            Some(CredentialField::NetworkPassword)
        }
        (Section::Root, "blynk_token" | "platform_token") | (Section::Platform, "auth_token") => {
            Some(CredentialField::PlatformToken)
        }
        (Section::Root, _) => None,
        _ => CredentialField::ALL
            .into_iter()
            .find(|field| field.section() == section.name() && field.key() == key),
    }
}

/// Decode a raw value into a bounded string
fn decode_value<const N: usize>(
    raw: &str,
    field: CredentialField,
) -> Result<HString<N>, ParseError> {
    if let Some(body) = raw.strip_prefix('"') {
        return decode_basic(body, field);
    }
    if let Some(body) = raw.strip_prefix('\'') {
        return decode_literal(body, field);
    }
    Err(ParseError::InvalidValue)
}

/// Decode the body of a `"..."` string (opening quote already removed)
fn decode_basic<const N: usize>(
    body: &str,
    field: CredentialField,
) -> Result<HString<N>, ParseError> {
    // Multi-line basic strings start with three quotes
    if body.starts_with("\"\"") {
        return Err(ParseError::InvalidValue);
    }

    let mut out = HString::new();
    let mut chars = body.chars();

    loop {
        let c = match chars.next() {
            None => return Err(ParseError::InvalidValue),
            Some('"') => break,
            Some('\\') => match chars.next() {
                Some('"') => '"',
                Some('\\') => '\\',
                Some('b') => '\u{8}',
                Some('f') => '\u{c}',
                Some('n') => '\n',
                Some('t') => '\t',
                Some('r') => '\r',
                Some('u') => decode_unicode(&mut chars, 4)?,
                Some('U') => decode_unicode(&mut chars, 8)?,
                _ => return Err(ParseError::InvalidEscape),
            },
            Some(c) => c,
        };
        out.push(c).map_err(|_| ParseError::TooLong(field))?;
    }

    // Nothing may follow the closing quote
    if !chars.as_str().trim().is_empty() {
        return Err(ParseError::InvalidValue);
    }

    Ok(out)
}

/// Decode the body of a `'...'` string (opening quote already removed)
fn decode_literal<const N: usize>(
    body: &str,
    field: CredentialField,
) -> Result<HString<N>, ParseError> {
    if body.starts_with("''") {
        return Err(ParseError::InvalidValue);
    }

    let inner = body.strip_suffix('\'').ok_or(ParseError::InvalidValue)?;
    if inner.contains('\'') {
        return Err(ParseError::InvalidValue);
    }

    HString::try_from(inner).map_err(|_| ParseError::TooLong(field))
}

/// Decode the `digits` hex digits after `\u` or `\U`
fn decode_unicode(chars: &mut Chars<'_>, digits: usize) -> Result<char, ParseError> {
    let mut code = 0u32;
    for _ in 0..digits {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or(ParseError::InvalidEscape)?;
        code = code * 16 + digit;
    }
    char::from_u32(code).ok_or(ParseError::InvalidEscape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::CredentialSource;
    use proptest::prelude::*;
    use std::string::String;

    #[test]
    fn test_parse_sections() {
        let input = r#"
# Home network
[wifi]
ssid = "home-net"
password = "correct horse battery"

[platform]
token = "0123456789abcdef"
"#;

        let creds = parse_credentials(input).unwrap();
        assert_eq!(creds.network_name(), "home-net");
        assert_eq!(creds.network_password(), "correct horse battery");
        assert_eq!(creds.platform_token(), "0123456789abcdef");
    }

    #[test]
    fn test_parse_legacy_root_keys() {
        let input = r#"
blynk_token = "<Blync Token>"
wifi_ssid = "<WiFi SSID>"
wifi_password = "<WiFi Password>"
"#;

        let creds = parse_credentials(input).unwrap();
        assert_eq!(creds.network_name(), "<WiFi SSID>");
        assert_eq!(creds.network_password(), "<WiFi Password>");
        assert_eq!(creds.platform_token(), "<Blync Token>");
    }

    #[test]
    fn test_parse_aliases() {
        let input = "[wifi]\nssid = \"lab\"\npsk = 'p@ss\\word'\n[blynk]\nauth_token = 'abc'\n";

        let creds = parse_credentials(input).unwrap();
        assert_eq!(creds.network_name(), "lab");
        assert_eq!(creds.network_password(), "p@ss\\word");
        assert_eq!(creds.platform_token(), "abc");
    }

    #[test]
    fn test_comments_inside_strings_are_kept() {
        let input = r#"
[wifi]
ssid = "cafe #1"   # the one upstairs
password = 'hash#tag'
[platform]
token = "t" # trailing
"#;

        let creds = parse_credentials(input).unwrap();
        assert_eq!(creds.network_name(), "cafe #1");
        assert_eq!(creds.network_password(), "hash#tag");
        assert_eq!(creds.platform_token(), "t");
    }

    #[test]
    fn test_escapes() {
        let input = r#"
[wifi]
ssid = "say \"hi\""
password = "tab\there\u00e9"
[platform]
token = "back\\slash"
"#;

        let creds = parse_credentials(input).unwrap();
        assert_eq!(creds.network_name(), "say \"hi\"");
        assert_eq!(creds.network_password(), "tab\there\u{e9}");
        assert_eq!(creds.platform_token(), "back\\slash");
    }

    #[test]
    fn test_empty_values_are_allowed() {
        let input = "[wifi]\nssid = \"open\"\npassword = \"\"\n[platform]\ntoken = ''\n";

        let creds = parse_credentials(input).unwrap();
        assert_eq!(creds.network_password(), "");
        assert_eq!(creds.platform_token(), "");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let input = "[wifi]\nssid = 'a'\npassword = 'b'\nchannel = 6\n[platform]\ntoken = 'c'\nserver = blynk.cloud\n";
        assert!(parse_credentials(input).is_ok());
    }

    #[test]
    fn test_missing_field() {
        let input = "[wifi]\nssid = \"a\"\npassword = \"b\"\n";
        assert_eq!(
            parse_credentials(input),
            Err(ParseError::Missing(CredentialField::PlatformToken))
        );
    }

    #[test]
    fn test_duplicate_field() {
        let input = "wifi_ssid = 'a'\n[wifi]\nssid = 'b'\n";
        assert_eq!(
            parse_credentials(input),
            Err(ParseError::Duplicate(CredentialField::NetworkName))
        );
    }

    #[test]
    fn test_overlong_value() {
        let mut input = String::from("[wifi]\nssid = \"");
        input.push_str(&"s".repeat(33));
        input.push_str("\"\npassword = 'p'\n[platform]\ntoken = 't'\n");
        assert_eq!(
            parse_credentials(&input),
            Err(ParseError::TooLong(CredentialField::NetworkName))
        );
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(parse_credentials("[mqtt]\n"), Err(ParseError::InvalidSection));
        assert_eq!(parse_credentials("[[wifi]]\n"), Err(ParseError::InvalidSection));
        assert_eq!(parse_credentials("[wifi\n"), Err(ParseError::InvalidSection));
        assert_eq!(parse_credentials("just words\n"), Err(ParseError::InvalidLine));
        assert_eq!(parse_credentials("wifi_ssid =\n"), Err(ParseError::InvalidValue));
        assert_eq!(
            parse_credentials("wifi_ssid = \"open\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_credentials("wifi_ssid = \"a\" b\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_credentials("wifi_ssid = \"\"\"a\"\"\"\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_credentials("wifi_ssid = \"\\x41\"\n"),
            Err(ParseError::InvalidEscape)
        );
        assert_eq!(
            parse_credentials("wifi_ssid = \"\\uZZZZ\"\n"),
            Err(ParseError::InvalidEscape)
        );
    }

    #[test]
    fn test_password_and_psk_conflict() {
        let input = "[wifi]\nssid = 'a'\npassword = \"one\"\npsk = \"two\"\n[platform]\ntoken = 't'\n";
        assert_eq!(
            parse_credentials(input),
            Err(ParseError::Duplicate(CredentialField::NetworkPassword))
        );
    }

    #[test]
    fn test_unquoted_values_are_rejected() {
        assert_eq!(parse_credentials("wifi_ssid = 123\n"), Err(ParseError::InvalidValue));
        assert_eq!(parse_credentials("wifi_ssid = lab\n"), Err(ParseError::InvalidValue));
        assert_eq!(parse_credentials("wifi_ssid = true\n"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_all_toml_escapes() {
        let input = r#"
[wifi]
ssid = "\b\f\n\r\t"
password = "smile \U0001F600"
[platform]
token = "\u00e9"
"#;

        let creds = parse_credentials(input).unwrap();
        assert_eq!(creds.network_name(), "\u{8}\u{c}\n\r\t");
        assert_eq!(creds.network_password(), "smile \u{1F600}");
        assert_eq!(creds.platform_token(), "\u{e9}");

        assert_eq!(
            parse_credentials("wifi_ssid = \"\\U00110000\"\n"),
            Err(ParseError::InvalidEscape)
        );
        assert_eq!(
            parse_credentials("wifi_ssid = \"\\U0001F6\"\n"),
            Err(ParseError::InvalidEscape)
        );
    }

    #[test]
    fn test_canonical_keys_follow_field_names() {
        for field in CredentialField::ALL {
            let section = match field.section() {
                "wifi" => Section::Wifi,
                _ => Section::Platform,
            };
            assert_eq!(field_for_key(section, field.key()), Some(field));
            assert_eq!(field_for_key(Section::Root, field.key()), None);
        }
        assert_eq!(field_for_key(Section::Wifi, "token"), None);
    }

    #[test]
    fn test_draft_replace_and_finish() {
        let mut draft = parse_draft("[wifi]\nssid = \"from-file\"\n").unwrap();
        assert!(draft.contains(CredentialField::NetworkName));
        assert!(!draft.contains(CredentialField::PlatformToken));

        draft.replace(CredentialField::NetworkName, "from-env").unwrap();
        draft.replace(CredentialField::NetworkPassword, "").unwrap();
        assert_eq!(
            draft.replace(CredentialField::NetworkName, &"n".repeat(33)),
            Err(ParseError::TooLong(CredentialField::NetworkName))
        );

        let draft_missing_token = parse_draft("[wifi]\nssid = 'a'\npassword = 'b'\n").unwrap();
        assert_eq!(
            draft_missing_token.finish().err(),
            Some(ParseError::Missing(CredentialField::PlatformToken))
        );

        draft.replace(CredentialField::PlatformToken, "tok \"raw\"").unwrap();
        let creds = draft.finish().unwrap();
        assert_eq!(creds.network_name(), "from-env");
        assert_eq!(creds.network_password(), "");
        assert_eq!(creds.platform_token(), "tok \"raw\"");
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("a = 1 # c"), "a = 1 ");
        assert_eq!(strip_comment("a = \"x\\\"#\" # c"), "a = \"x\\\"#\" ");
        assert_eq!(strip_comment("# only"), "");
    }

    proptest! {
        #[test]
        fn prop_escaped_basic_strings_decode(token in "\\PC{0,16}") {
            let mut quoted = String::from("\"");
            for c in token.chars() {
                match c {
                    '"' => quoted.push_str("\\\""),
                    '\\' => quoted.push_str("\\\\"),
                    _ => quoted.push(c),
                }
            }
            quoted.push('"');

            let decoded: HString<MAX_PLATFORM_TOKEN_LEN> =
                decode_value(&quoted, CredentialField::PlatformToken).unwrap();
            prop_assert_eq!(decoded.as_str(), token.as_str());
        }
    }
}
