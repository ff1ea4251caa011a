//! Build-time credentials
//!
//! Defines `EMBEDDED` and `SOURCE`, generated by build.rs. Edit
//! credentials.toml (or set the THERMOLINK_* environment variables) and
//! rebuild to change them.

include!(concat!(env!("OUT_DIR"), "/credentials.rs"));
