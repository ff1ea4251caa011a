//! Boot-time credential selection
//!
//! Runs the flash override loader from `thermolink-core` and logs what it
//! found. Falls back to the embedded constants if flash holds nothing usable.

use defmt::*;

use thermolink_core::config::{CredentialPersistence, Fallback, OverrideSource, Resolution};
use thermolink_core::credentials::{EmbeddedCredentials, ResolvedCredentials};
// Import the FlashStorage trait to bring methods into scope
use thermolink_hal_rp2040::FlashStorageTrait;

/// Pick the credentials to run with
pub async fn resolve<S: FlashStorageTrait>(
    persistence: &mut CredentialPersistence<S>,
    embedded: EmbeddedCredentials,
) -> ResolvedCredentials {
    info!("Loading credential override from flash...");

    let resolution = persistence.resolve(embedded).await;
    log_resolution(&resolution);
    resolution.into_credentials()
}

/// Drop any flash override so the embedded credentials apply
pub async fn clear<S: FlashStorageTrait>(persistence: &mut CredentialPersistence<S>) {
    match persistence.clear().await {
        Ok(()) => info!("Cleared credential overrides"),
        Err(e) => error!("Failed to clear credential overrides: {:?}", e),
    }
}

fn log_resolution(resolution: &Resolution) {
    match resolution {
        Resolution::Override(loaded) => match loaded.source {
            OverrideSource::Toml { import: Ok(()) } => {
                info!("Loaded credential override from TOML, imported into binary record");
            }
            OverrideSource::Toml { import: Err(e) } => {
                info!("Loaded credential override from TOML");
                warn!("Failed to import TOML override: {:?}", e);
            }
            OverrideSource::Binary { rejected_toml } => {
                if let Some(e) = rejected_toml {
                    warn!("Ignoring unusable TOML override: {:?}", e);
                }
                info!("Loaded credential override from binary record");
            }
        },
        Resolution::Embedded { reason, .. } => match reason {
            Fallback::NoOverride => {
                info!("No credential override in flash, using embedded credentials");
            }
            Fallback::Erased(Ok(())) => {
                warn!("Credential storage was corrupted and has been erased, using embedded credentials");
            }
            Fallback::Erased(Err(e)) => {
                error!("Credential storage corrupted and could not be erased: {:?}", e);
            }
            Fallback::Unusable(e) => {
                warn!(
                    "Failed to load credential override: {:?}, using embedded credentials",
                    e
                );
            }
        },
    }
}
