//! Credential storage in RP2040 QSPI flash
//!
//! The top 64KB of the 2MB flash hold a `sequential-storage` key/value map.
//! `memory.x` ends the firmware image below this partition.

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use embedded_storage_async::nor_flash::NorFlash;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

pub use thermolink_hal::flash::{FlashError, StorageKey};

/// Total flash on a Pico W
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Space reserved for credential overrides
pub const STORAGE_PARTITION_SIZE: usize = 64 * 1024;

/// First byte of the credential partition
pub const STORAGE_PARTITION_START: usize = FLASH_SIZE - STORAGE_PARTITION_SIZE;

// The map erases whole sectors
const _: () = assert!(STORAGE_PARTITION_START % ERASE_SIZE == 0);
const _: () = assert!(STORAGE_PARTITION_SIZE % ERASE_SIZE == 0);

/// Scratch buffer size; bounds key plus value of a single item
pub const MAX_ITEM_SIZE: usize = 1024;

/// Flash range handed to `sequential-storage`
pub const STORAGE_RANGE: core::ops::Range<u32> =
    (STORAGE_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Key/value credential storage on the RP2040
pub struct Rp2040FlashStorage<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> Rp2040FlashStorage<'d> {
    /// Take the flash peripheral; `dma` drives the async reads
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }
}

/// Collapse a map error into the HAL error
fn map_error<E>(error: sequential_storage::Error<E>) -> FlashError {
    match error {
        sequential_storage::Error::Storage { .. } => FlashError::Flash,
        sequential_storage::Error::Corrupted { .. } => FlashError::Corrupted,
        sequential_storage::Error::FullStorage => FlashError::Full,
        sequential_storage::Error::BufferTooSmall(_) => FlashError::BufferTooSmall,
        _ => FlashError::Storage,
    }
}

impl<'d> thermolink_hal::FlashStorage for Rp2040FlashStorage<'d> {
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let mut data_buffer = [0u8; MAX_ITEM_SIZE];

        let data = map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            STORAGE_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
        )
        .await
        .map_err(map_error)?
        .ok_or(FlashError::NotFound)?;

        let target = buffer
            .get_mut(..data.len())
            .ok_or(FlashError::BufferTooSmall)?;
        target.copy_from_slice(data);
        Ok(data.len())
    }

    async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        let mut data_buffer = [0u8; MAX_ITEM_SIZE];

        map::store_item(
            &mut self.flash,
            STORAGE_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
            &data,
        )
        .await
        .map_err(map_error)
    }

    async fn exists(&mut self, key: StorageKey) -> bool {
        let mut data_buffer = [0u8; MAX_ITEM_SIZE];

        let found = map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            STORAGE_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
        )
        .await;
        matches!(found, Ok(Some(_)))
    }

    async fn remove(&mut self, key: StorageKey) -> Result<(), FlashError> {
        let mut data_buffer = [0u8; MAX_ITEM_SIZE];

        map::remove_item(
            &mut self.flash,
            STORAGE_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
        )
        .await
        .map_err(map_error)
    }

    async fn erase_all(&mut self) -> Result<(), FlashError> {
        // One call; the driver walks the sectors of the range
        self.flash
            .erase(STORAGE_RANGE.start, STORAGE_RANGE.end)
            .await
            .map_err(|_| FlashError::Flash)
    }
}

/// Storage type the firmware instantiates
pub type FlashStorage<'d> = Rp2040FlashStorage<'d>;
