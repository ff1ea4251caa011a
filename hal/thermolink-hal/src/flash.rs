//! Persistent key/value storage
//!
//! The credential loader only sees this trait. Chip HALs back it with their
//! own flash driver.

/// Slots in the credential partition
///
/// The byte values are written to flash; never renumber them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// Binary postcard record of a Credential Set
    Credentials = 0,
    /// TOML text dropped in by provisioning, imported on next boot
    CredentialsToml = 1,
}

impl StorageKey {
    /// On-flash key byte
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Key for an on-flash key byte, if it is one of ours
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(StorageKey::Credentials),
            1 => Some(StorageKey::CredentialsToml),
            _ => None,
        }
    }
}

/// Storage failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// The flash driver reported an error
    Flash,
    /// Any other storage-layer failure
    Storage,
    /// Key was never written, or was removed
    NotFound,
    /// Item does not fit the caller's or driver's buffer
    BufferTooSmall,
    /// Partition contents are inconsistent; erasing recovers
    Corrupted,
    /// No room left for the item
    Full,
}

/// Async key/value storage
///
/// Writes replace the previous value of a key.
pub trait FlashStorage {
    /// Copy the value of `key` into `buffer`, returning its length
    fn read(
        &mut self,
        key: StorageKey,
        buffer: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, FlashError>>;

    /// Store `data` under `key`
    fn write(
        &mut self,
        key: StorageKey,
        data: &[u8],
    ) -> impl core::future::Future<Output = Result<(), FlashError>>;

    /// Whether `key` currently holds a value
    fn exists(&mut self, key: StorageKey) -> impl core::future::Future<Output = bool>;

    /// Drop `key`; removing an absent key succeeds
    fn remove(
        &mut self,
        key: StorageKey,
    ) -> impl core::future::Future<Output = Result<(), FlashError>>;

    /// Wipe the whole partition
    fn erase_all(&mut self) -> impl core::future::Future<Output = Result<(), FlashError>>;
}

// Keys are stored as their single byte
#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        let slot = buffer
            .first_mut()
            .ok_or(sequential_storage::map::SerializationError::BufferTooSmall)?;
        *slot = self.as_u8();
        Ok(1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        let byte = *buffer
            .first()
            .ok_or(sequential_storage::map::SerializationError::BufferTooSmall)?;
        let key = StorageKey::from_u8(byte)
            .ok_or(sequential_storage::map::SerializationError::InvalidFormat)?;
        Ok((key, 1))
    }
}
