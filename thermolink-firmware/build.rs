//! Build script for thermolink-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates credentials.toml and embeds the credentials as constants
//!
//! The `toml` crate checks syntax and section names with readable errors;
//! the values themselves come from the firmware's own credential parser, so
//! a file that builds also loads as a flash override.

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use thermolink_core::config::{parse_draft, ParseError};
use thermolink_core::credentials::{check, CredentialField, CredentialSet, CredentialSource};

/// User credentials (ignored by git)
const CREDENTIALS_FILE: &str = "credentials.toml";

/// Shipped template, used when no credentials.toml exists
const EXAMPLE_FILE: &str = "credentials.example.toml";

/// Sections the credentials file may contain
const KNOWN_SECTIONS: [&str; 3] = ["wifi", "platform", "blynk"];

fn main() {
    setup_linker();
    embed_credentials();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Linker scripts from cortex-m-rt, embassy-rp and defmt
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Environment variable that overrides a field
fn env_var(field: CredentialField) -> &'static str {
    match field {
        CredentialField::NetworkName => "THERMOLINK_WIFI_SSID",
        CredentialField::NetworkPassword => "THERMOLINK_WIFI_PASSWORD",
        CredentialField::PlatformToken => "THERMOLINK_PLATFORM_TOKEN",
    }
}

/// Validate credentials and write them to $OUT_DIR/credentials.rs
fn embed_credentials() {
    println!("cargo:rerun-if-changed={}", CREDENTIALS_FILE);
    println!("cargo:rerun-if-changed={}", EXAMPLE_FILE);
    for field in CredentialField::ALL {
        println!("cargo:rerun-if-env-changed={}", env_var(field));
    }

    let (config_path, content, config) = read_config();

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    if errors.is_empty() {
        // Values go through the same parser the firmware uses for flash overrides
        match resolve_values(&content) {
            Ok((credentials, overridden)) => {
                report_issues(&credentials);
                write_generated(&credentials, &describe_source(&config_path, &overridden));
                return;
            }
            Err(message) => errors.push(message),
        }
    }

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: Invalid credentials in {:<34}║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        config_path.display(),
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Parse the file and apply environment overrides
///
/// Returns the credentials and the names of the variables that were applied.
fn resolve_values(content: &str) -> Result<(CredentialSet, Vec<&'static str>), String> {
    let mut draft = parse_draft(content).map_err(describe_error)?;

    let mut overridden = Vec::new();
    for field in CredentialField::ALL {
        if let Ok(value) = env::var(env_var(field)) {
            draft.replace(field, &value).map_err(describe_error)?;
            overridden.push(env_var(field));
        }
    }

    let credentials = draft.finish().map_err(describe_error)?;
    Ok((credentials, overridden))
}

/// Turn a parse error into a message naming the offending key
fn describe_error(error: ParseError) -> String {
    match error {
        ParseError::InvalidSection => "Malformed or unknown section header".to_string(),
        ParseError::InvalidLine => "Line is not `key = value`".to_string(),
        ParseError::InvalidValue => "Value is not a single-line string".to_string(),
        ParseError::InvalidEscape => "Unsupported escape sequence in a string".to_string(),
        ParseError::TooLong(field) => format!(
            "{} is longer than {} bytes",
            field_location(field),
            field.capacity()
        ),
        ParseError::Missing(field) => format!(
            "Missing {} - set {} or {}",
            field.label(),
            field_location(field),
            env_var(field)
        ),
        ParseError::Duplicate(field) => {
            format!("{} is set more than once (check aliases)", field_location(field))
        }
    }
}

/// Where a field lives in the credentials file
fn field_location(field: CredentialField) -> String {
    format!("[{}] {}", field.section(), field.key())
}

/// Emit advisory diagnostics as cargo warnings
///
/// Diagnostics never fail the build; placeholders are the user's call.
fn report_issues(credentials: &CredentialSet) {
    for issue in check(credentials).iter() {
        println!("cargo:warning=credentials: {}", issue);
    }
}

/// Human-readable origin recorded in the firmware image
fn describe_source(config_path: &Path, overridden: &[&str]) -> String {
    let mut source = config_path.display().to_string();
    if !overridden.is_empty() {
        source.push_str(" + ");
        source.push_str(&overridden.join(", "));
    }
    source
}

/// Locate and parse the credentials file
fn read_config() -> (PathBuf, String, toml::Value) {
    let config_path = if Path::new(CREDENTIALS_FILE).exists() {
        PathBuf::from(CREDENTIALS_FILE)
    } else {
        println!(
            "cargo:warning={} not found, building with {} values",
            CREDENTIALS_FILE, EXAMPLE_FILE
        );
        PathBuf::from(EXAMPLE_FILE)
    };

    // Read the config file
    let config_content = match fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read {:<42}║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ║                                                                  ║\n\
                ║  Copy credentials.example.toml to credentials.toml and edit it.  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                config_path.display(),
                e
            );
        }
    };

    // Parse and validate TOML syntax
    match toml::from_str(&config_content) {
        Ok(value) => (config_path, config_content, value),
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in {:<34}║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                config_path.display(),
                format_error_lines(&error_msg)
            );
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reject sections the firmware does not understand
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let table = match config.as_table() {
        Some(t) => t,
        None => return,
    };

    for (name, value) in table {
        if value.is_table() && !KNOWN_SECTIONS.contains(&name.as_str()) {
            errors.push(format!("Unknown section [{}]", name));
        }
    }
}

/// Write the generated constants
fn write_generated(credentials: &CredentialSet, source: &str) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("credentials.rs")).unwrap();

    // Debug formatting of str produces a valid Rust string literal
    writeln!(f, "/// Where the embedded credentials were read from").unwrap();
    writeln!(f, "pub const SOURCE: &str = {:?};", source).unwrap();
    writeln!(f).unwrap();
    writeln!(f, "/// Credentials compiled into the firmware image").unwrap();
    writeln!(
        f,
        "pub const EMBEDDED: thermolink_core::EmbeddedCredentials = \
         thermolink_core::EmbeddedCredentials::new({:?}, {:?}, {:?});",
        credentials.network_name(),
        credentials.network_password(),
        credentials.platform_token()
    )
    .unwrap();
}
