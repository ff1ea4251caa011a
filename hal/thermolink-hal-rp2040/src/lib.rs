//! RP2040-specific HAL for the sensor firmware
//!
//! Provides the flash storage driver implementing
//! `thermolink_hal::FlashStorage` on top of the RP2040 QSPI flash.

#![no_std]

pub mod flash;

// Re-export shared traits from thermolink-hal for convenience
pub use thermolink_hal::{FlashStorage as FlashStorageTrait, StorageKey};
