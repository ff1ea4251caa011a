//! Binary credential record
//!
//! A provisioned override is stored in flash as a postcard-serialized
//! [`StoredCredentials`] with a magic number, a format version and a CRC32
//! over the payload.

use serde::{Deserialize, Serialize};

use crate::credentials::{CredentialField, CredentialSet, CredentialSource};

/// Magic number to identify a credential record
pub const RECORD_MAGIC: u32 = 0x544C_4352; // "TLCR"

/// Current record format version
pub const RECORD_VERSION: u8 = 1;

/// Maximum serialized record size
pub const MAX_RECORD_SIZE: usize = 256;

/// Record encoding/decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// Serialization failed (buffer too small)
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Invalid magic or version
    InvalidFormat,
    /// CRC check failed
    CrcMismatch,
}

/// Credential record as stored in flash
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Serialize, Deserialize)]
pub struct StoredCredentials {
    /// Magic number for validation
    pub magic: u32,
    /// Data format version
    pub version: u8,
    /// The credential values
    pub credentials: CredentialSet,
    /// CRC32 checksum (calculated over magic..credentials)
    pub crc: u32,
}

impl StoredCredentials {
    /// Wrap a set in a record with a valid header and CRC
    pub fn new(credentials: CredentialSet) -> Self {
        let mut record = Self {
            magic: RECORD_MAGIC,
            version: RECORD_VERSION,
            credentials,
            crc: 0,
        };
        record.update_crc();
        record
    }

    /// Check if the header is valid (magic and version match)
    pub fn is_valid(&self) -> bool {
        self.magic == RECORD_MAGIC && self.version == RECORD_VERSION
    }

    /// Calculate CRC32 for the record (excluding the crc field itself)
    pub fn calculate_crc(&self) -> u32 {
        let mut crc: u32 = 0xFFFF_FFFF;

        crc = crc32_update(crc, &self.magic.to_le_bytes());
        crc = crc32_update(crc, &[self.version]);

        // Length-prefix each value so field boundaries are covered
        for field in CredentialField::ALL {
            let value = self.credentials.get(field).as_bytes();
            crc = crc32_update(crc, &(value.len() as u16).to_le_bytes());
            crc = crc32_update(crc, value);
        }

        !crc
    }

    /// Update the CRC field
    pub fn update_crc(&mut self) {
        self.crc = self.calculate_crc();
    }

    /// Verify the CRC is correct
    pub fn verify_crc(&self) -> bool {
        self.crc == self.calculate_crc()
    }
}

/// Serialize a credential set into `buffer`
///
/// Returns the used prefix of `buffer`.
pub fn encode<'a>(
    credentials: &CredentialSet,
    buffer: &'a mut [u8],
) -> Result<&'a mut [u8], RecordError> {
    let record = StoredCredentials::new(credentials.clone());
    postcard::to_slice(&record, buffer).map_err(|_| RecordError::Serialize)
}

/// Deserialize and verify a credential record
pub fn decode(bytes: &[u8]) -> Result<CredentialSet, RecordError> {
    let record: StoredCredentials =
        postcard::from_bytes(bytes).map_err(|_| RecordError::Deserialize)?;

    if !record.is_valid() {
        return Err(RecordError::InvalidFormat);
    }

    if !record.verify_crc() {
        return Err(RecordError::CrcMismatch);
    }

    Ok(record.credentials)
}

/// Simple CRC32 update function (IEEE 802.3 polynomial)
fn crc32_update(crc: u32, data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB88320;
    let mut crc = crc;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    crc
}
