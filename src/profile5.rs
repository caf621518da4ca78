//! # E2E Profile 5
//!
//! Protects a payload of 3..4096 bytes with a 2-byte little-endian
//! CRC-16/CCITT-FALSE and a 1-byte counter, both placed at a configurable
//! byte offset:
//!
//! ```text
//! [ ... | CRC_LSB | CRC_MSB | COUNTER | ... ]
//!          offset              offset+2
//! ```
//!
//! Unlike Profile 1, the CRC here has no seeding trick: it is one ordinary
//! chained computation starting from the variant's real `Init`.

use crate::crc::variants::crc16_ccitt_false;
use crate::error::{E2EError, E2EResult};
use crate::field_ops;

const BITS_PER_BYTE: u16 = 8;
const MIN_DATA_LENGTH_BITS: u16 = 3 * BITS_PER_BYTE;
const MAX_DATA_LENGTH_BITS: u16 = 4096 * BITS_PER_BYTE;

/// Fine-grained per-cycle check outcome (spec §6 wire values).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Profile5FineStatus {
    Ok = 0x00,
    NoNewData = 0x01,
    Error = 0x07,
    Repeated = 0x08,
    OkSomeLost = 0x20,
    WrongSequence = 0x40,
}

#[derive(Debug, Clone)]
pub struct Profile5Config {
    pub data_length_bits: u16,
    pub data_id: u16,
    pub max_delta_counter: u8,
    pub offset_bits: u16,
}

impl Default for Profile5Config {
    fn default() -> Self {
        Self {
            data_id: 0x1234,
            offset_bits: 0,
            data_length_bits: 24,
            max_delta_counter: 1,
        }
    }
}

/// Sender-side state: a single 1-byte counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Profile5ProtectState {
    pub counter: u8,
}

/// Receiver-side state (spec §3; `counter` starts at `0xFF` so the first
/// received `0x00` registers as a one-step advance, not a repeat).
#[derive(Debug, Clone, Copy)]
pub struct Profile5CheckState {
    pub status: Profile5FineStatus,
    pub counter: u8,
}

impl Default for Profile5CheckState {
    fn default() -> Self {
        Self {
            status: Profile5FineStatus::NoNewData,
            counter: 0xFF,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Profile5 {
    config: Profile5Config,
}

impl Profile5 {
    pub fn new(config: Profile5Config) -> E2EResult<Self> {
        Self::validate_config(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Profile5Config {
        &self.config
    }

    fn validate_config(config: &Profile5Config) -> E2EResult<()> {
        if !config.offset_bits.is_multiple_of(BITS_PER_BYTE) {
            return Err(E2EError::InvalidConfiguration(
                "offset_bits must be a multiple of 8".into(),
            ));
        }
        if config.data_length_bits < MIN_DATA_LENGTH_BITS || config.data_length_bits > MAX_DATA_LENGTH_BITS {
            return Err(E2EError::InvalidConfiguration(format!(
                "data_length_bits must be between {} and {}",
                MIN_DATA_LENGTH_BITS, MAX_DATA_LENGTH_BITS
            )));
        }
        if config.offset_bits > config.data_length_bits - MIN_DATA_LENGTH_BITS {
            return Err(E2EError::InvalidConfiguration(
                "offset_bits leaves no room for the 3-byte header".into(),
            ));
        }
        Ok(())
    }

    fn validate_length(&self, len: usize) -> E2EResult<()> {
        let expected = (self.config.data_length_bits / BITS_PER_BYTE) as usize;
        if len != expected {
            return Err(E2EError::InvalidDataFormat(format!(
                "expected {} bytes, got {}",
                expected, len
            )));
        }
        Ok(())
    }

    fn offset(&self) -> usize {
        field_ops::byte_index(self.config.offset_bits)
    }

    fn compute_crc(&self, data: &[u8]) -> u16 {
        let offset = self.offset();
        let mut value = crc16_ccitt_false::compute(&data[0..offset], 0xFFFF, true);
        value = crc16_ccitt_false::compute(&data[offset + 2..], value, false);
        value = crc16_ccitt_false::compute(&self.config.data_id.to_le_bytes(), value, false);
        value
    }

    /// Write counter and CRC into `data` (spec §4.3.3).
    pub fn protect(&self, state: &mut Profile5ProtectState, data: &mut [u8]) -> E2EResult<()> {
        self.validate_length(data.len())?;
        let offset = self.offset();

        field_ops::write_be_u8_at(data, offset + 2, state.counter);
        let crc = self.compute_crc(data);
        field_ops::write_le_u16_at(data, offset, crc);

        state.counter = state.counter.wrapping_add(1);
        Ok(())
    }

    /// Validate, recompute CRC, and advance `state` per spec §4.3.4.
    ///
    /// `data` is `None` when the cycle has no new data available, mirroring
    /// the source's null-buffer check (a memory-safe API has no use for an
    /// `INPUTERR_NULL` distinct from this).
    pub fn check(&self, state: &mut Profile5CheckState, data: Option<&[u8]>) -> E2EResult<Profile5FineStatus> {
        let Some(data) = data else {
            state.status = Profile5FineStatus::NoNewData;
            return Ok(state.status);
        };
        self.validate_length(data.len())?;
        let offset = self.offset();

        let received_counter = field_ops::read_be_u8_at(data, offset + 2);
        let received_crc = field_ops::read_le_u16_at(data, offset);
        let expected_crc = self.compute_crc(data);

        if expected_crc != received_crc {
            state.status = Profile5FineStatus::Error;
            return Ok(state.status);
        }

        let delta = received_counter.wrapping_sub(state.counter);
        state.status = if delta == 0 {
            Profile5FineStatus::Repeated
        } else if delta <= self.config.max_delta_counter {
            if delta == 1 {
                Profile5FineStatus::Ok
            } else {
                Profile5FineStatus::OkSomeLost
            }
        } else {
            Profile5FineStatus::WrongSequence
        };
        state.counter = received_counter;
        Ok(state.status)
    }

    /// Collapse a fine status into the six-valued `CheckStatus` the
    /// aggregation SM consumes (spec §4.4).
    pub fn map_status_to_sm(status: Profile5FineStatus) -> crate::sm::CheckStatus {
        use crate::sm::CheckStatus;
        match status {
            Profile5FineStatus::Ok | Profile5FineStatus::OkSomeLost => CheckStatus::Ok,
            Profile5FineStatus::Error => CheckStatus::Error,
            Profile5FineStatus::Repeated => CheckStatus::Repeated,
            Profile5FineStatus::NoNewData => CheckStatus::NoNewData,
            Profile5FineStatus::WrongSequence => CheckStatus::WrongSequence,
        }
    }
}
