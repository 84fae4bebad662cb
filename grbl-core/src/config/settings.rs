//! Persisted kernel settings
//!
//! The settings collaborator stores a [`KernelConfig`] as one framed blob:
//!
//! ```text
//! ┌───────┬─────────┬────────┬──────────────────┬────────┐
//! │ MAGIC │ VERSION │ LENGTH │ postcard payload │ CRC32  │
//! │ 4B LE │ 1B      │ 2B LE  │ LENGTH bytes     │ 4B LE  │
//! └───────┴─────────┴────────┴──────────────────┴────────┘
//! ```
//!
//! The CRC covers header and payload.

use super::types::KernelConfig;

/// Magic number to identify a settings blob ("GRBL")
pub const SETTINGS_MAGIC: u32 = 0x4752_424C;

/// Current settings layout version
pub const SETTINGS_VERSION: u8 = 1;

/// Buffer size that always fits an encoded [`KernelConfig`]
pub const MAX_SETTINGS_SIZE: usize = 128;

const HEADER_LEN: usize = 7;
const CRC_LEN: usize = 4;

/// Settings encode / decode errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Output buffer cannot hold the frame
    BufferTooSmall,
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Not a settings blob
    BadMagic,
    /// Written by a different layout version
    VersionMismatch,
    /// Frame shorter than its header claims
    Length,
    /// Checksum mismatch
    Crc,
    /// Decoded values fail validation
    Invalid,
}

/// Encode `config` into `buf`, returning the frame length
pub fn encode(config: &KernelConfig, buf: &mut [u8]) -> Result<usize, SettingsError> {
    if buf.len() < HEADER_LEN + CRC_LEN {
        return Err(SettingsError::BufferTooSmall);
    }

    let payload_end = buf.len() - CRC_LEN;
    let payload_len = postcard::to_slice(config, &mut buf[HEADER_LEN..payload_end])
        .map_err(|_| SettingsError::Serialize)?
        .len();
    let payload_len_u16 = u16::try_from(payload_len).map_err(|_| SettingsError::BufferTooSmall)?;

    buf[0..4].copy_from_slice(&SETTINGS_MAGIC.to_le_bytes());
    buf[4] = SETTINGS_VERSION;
    buf[5..7].copy_from_slice(&payload_len_u16.to_le_bytes());

    let end = HEADER_LEN + payload_len;
    let crc = crc32(&buf[..end]);
    buf[end..end + CRC_LEN].copy_from_slice(&crc.to_le_bytes());

    Ok(end + CRC_LEN)
}

/// Decode and validate a settings frame
pub fn decode(bytes: &[u8]) -> Result<KernelConfig, SettingsError> {
    if bytes.len() < HEADER_LEN + CRC_LEN {
        return Err(SettingsError::Length);
    }

    let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    if magic != SETTINGS_MAGIC {
        return Err(SettingsError::BadMagic);
    }
    if bytes[4] != SETTINGS_VERSION {
        return Err(SettingsError::VersionMismatch);
    }

    let payload_len = u16::from_le_bytes([bytes[5], bytes[6]]) as usize;
    let end = HEADER_LEN + payload_len;
    if bytes.len() < end + CRC_LEN {
        return Err(SettingsError::Length);
    }

    let stored = u32::from_le_bytes([bytes[end], bytes[end + 1], bytes[end + 2], bytes[end + 3]]);
    if stored != crc32(&bytes[..end]) {
        return Err(SettingsError::Crc);
    }

    let config: KernelConfig =
        postcard::from_bytes(&bytes[HEADER_LEN..end]).map_err(|_| SettingsError::Deserialize)?;
    if !config.is_valid() {
        return Err(SettingsError::Invalid);
    }
    Ok(config)
}

/// CRC-32 (IEEE 802.3 polynomial)
fn crc32(data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB88320;
    let mut crc = 0xFFFF_FFFFu32;

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

    !crc
}
