//! Thermolink - Connected Temperature Sensor Firmware
//!
//! Main firmware binary for RP2040-based sensor nodes. Resolves the
//! connectivity credentials (flash override or build-time constants) and
//! hands them to the connectivity bootstrap.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Pull};
use embassy_time::Timer;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use thermolink_core::config::CredentialPersistence;
use thermolink_core::credentials::{check, CredentialSource, ResolvedCredentials};
use thermolink_hal_rp2040::flash::FlashStorage;

use crate::config::{embedded, loader};

mod config;

/// Settling time for the reset pin pull-up before sampling it
const RESET_PIN_SETTLE_MS: u64 = 10;

// Resolved credentials (must live forever for consumer references)
static CREDENTIALS: StaticCell<ResolvedCredentials> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Thermolink firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let storage = FlashStorage::new(p.FLASH, p.DMA_CH0);
    let mut persistence = CredentialPersistence::new(storage);

    // Holding GPIO15 low at boot discards any flash override
    let reset_pin = Input::new(p.PIN_15, Pull::Up);
    Timer::after_millis(RESET_PIN_SETTLE_MS).await;
    if reset_pin.is_low() {
        warn!("Credential reset requested");
        loader::clear(&mut persistence).await;
    }

    info!("Embedded credentials from {}", embedded::SOURCE);
    let credentials = loader::resolve(&mut persistence, embedded::EMBEDDED).await;
    report(&credentials);

    let credentials: &'static ResolvedCredentials = CREDENTIALS.init(credentials);

    // Connectivity bootstrap reads `credentials` through CredentialSource
    info!(
        "Credentials ready: network '{}', origin {}",
        credentials.network_name(),
        credentials.origin()
    );

    // Main task has nothing else to do
    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Log a redacted summary and any diagnostics of the active credentials
fn report(credentials: &ResolvedCredentials) {
    debug!("Active credentials: {}", credentials);

    let diagnostics = check(credentials);
    for issue in diagnostics.iter() {
        if issue.is_informational() {
            info!("Credentials: {}", issue);
        } else {
            warn!("Credentials: {}", issue);
        }
    }

    if !diagnostics.is_ready() {
        warn!("Credentials look incomplete; network association or platform authentication will likely fail");
    }
}
