//! Board-agnostic credential handling for the sensor firmware
//!
//! This crate contains everything about connectivity credentials that does
//! not depend on specific hardware:
//!
//! - Credential Set types and the [`CredentialSource`] holder trait
//! - Secret wrapper with redacted formatting
//! - Advisory diagnostics (placeholders, empty values, length limits)
//! - `no_std` TOML parser for credential overrides
//! - Binary flash record codec
//! - Flash override loader over the `thermolink-hal` storage trait
//!
//! The firmware consumes [`CredentialSource`] only; where the values came
//! from (build-time constants or a flash override) is invisible to it.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod credentials;

pub use credentials::{
    CredentialField, CredentialOrigin, CredentialSet, CredentialSource, EmbeddedCredentials,
    ResolvedCredentials,
};
