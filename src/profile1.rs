//! # E2E Profile 1
//!
//! Protects a payload of `data_length_bits / 8` bytes (multiple of 8,
//! at least 12 bits) with:
//! - an 8-bit CRC (CRC-8/J1850, with the Data-ID mixed into the seed),
//! - a 4-bit counter (0..14; 15 is reserved and signals a corrupt frame),
//! - an optional explicit Data-ID nibble (`NIBBLE` mode only).
//!
//! Unlike the other profile in this crate, Protect and Check each carry
//! their own state type: a transmitter only ever needs [`Profile1ProtectState`]
//! and a receiver only ever needs [`Profile1CheckState`] — nothing here
//! assumes both run against the same buffer.

use crate::crc::variants::crc8_j1850;
use crate::error::{E2EError, E2EResult};
use crate::field_ops;

const NIBBLE_MASK: u8 = 0x0F;
const COUNTER_MAX: u8 = 14;
const COUNTER_MODULO: u8 = 15;
const RESERVED_COUNTER: u8 = 15;
const BITS_PER_BYTE: u16 = 8;
const MIN_DATA_LENGTH_BITS: u16 = 12;

/// How the 16-bit Data-ID is mixed into the CRC and, for `Nibble`, how much
/// of it also rides explicitly on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile1IdMode {
    /// Both ID bytes are mixed into the CRC; neither appears on the wire.
    Both,
    /// Only the low ID byte is mixed into the CRC.
    Low,
    /// The low ID byte is mixed on even counters, the high byte on odd ones.
    Alt,
    /// The low ID byte is mixed into the CRC; the high nibble of the high
    /// byte rides explicitly at `data_id_nibble_offset_bits`.
    Nibble,
}

/// Fine-grained per-cycle check outcome (spec §6 wire values).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Profile1FineStatus {
    Ok = 0x00,
    NoNewData = 0x01,
    WrongCrc = 0x02,
    Sync = 0x03,
    Initial = 0x04,
    Repeated = 0x08,
    OkSomeLost = 0x20,
    WrongSequence = 0x40,
}

/// Immutable per-channel configuration.
#[derive(Debug, Clone)]
pub struct Profile1Config {
    pub counter_offset_bits: u16,
    pub crc_offset_bits: u16,
    pub data_id: u16,
    pub data_id_nibble_offset_bits: u16,
    pub mode: Profile1IdMode,
    pub data_length_bits: u16,
    pub max_delta_counter_init: u8,
    pub max_no_new_or_repeated_data: u8,
    pub sync_counter_init: u8,
}

impl Default for Profile1Config {
    fn default() -> Self {
        Self {
            counter_offset_bits: 8,
            crc_offset_bits: 0,
            data_id: 0x123,
            data_id_nibble_offset_bits: 12,
            mode: Profile1IdMode::Nibble,
            data_length_bits: 64,
            max_delta_counter_init: 1,
            max_no_new_or_repeated_data: 1,
            sync_counter_init: 0,
        }
    }
}

/// Sender-side state: a single 4-bit counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Profile1ProtectState {
    pub counter: u8,
}

/// Receiver-side state (spec §3).
#[derive(Debug, Clone, Copy)]
pub struct Profile1CheckState {
    pub last_valid_counter: u8,
    pub max_delta_counter: u8,
    pub wait_for_first_data: bool,
    /// Set by the caller before each `check` call; the library never sets
    /// this itself — it only reads it.
    pub new_data_available: bool,
    pub lost_data: u8,
    pub status: Profile1FineStatus,
    pub sync_counter: u8,
    pub no_new_or_repeated_data_counter: u8,
}

impl Profile1CheckState {
    pub fn new(config: &Profile1Config) -> Self {
        Self {
            last_valid_counter: 0,
            max_delta_counter: config.max_delta_counter_init,
            wait_for_first_data: true,
            new_data_available: true,
            lost_data: 0,
            status: Profile1FineStatus::NoNewData,
            sync_counter: 0,
            no_new_or_repeated_data_counter: 0,
        }
    }
}

/// Stateless codec: config only. Callers hold [`Profile1ProtectState`] and
/// [`Profile1CheckState`] separately and pass them in by reference.
#[derive(Debug, Clone)]
pub struct Profile1 {
    config: Profile1Config,
}

impl Profile1 {
    pub fn new(config: Profile1Config) -> E2EResult<Self> {
        Self::validate_config(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Profile1Config {
        &self.config
    }

    fn validate_config(config: &Profile1Config) -> E2EResult<()> {
        if !config.counter_offset_bits.is_multiple_of(4) {
            return Err(E2EError::InvalidConfiguration(
                "counter_offset_bits must be a multiple of 4".into(),
            ));
        }
        if !config.crc_offset_bits.is_multiple_of(BITS_PER_BYTE) {
            return Err(E2EError::InvalidConfiguration(
                "crc_offset_bits must be a multiple of 8".into(),
            ));
        }
        match config.mode {
            Profile1IdMode::Nibble => {
                if !config.data_id_nibble_offset_bits.is_multiple_of(4) {
                    return Err(E2EError::InvalidConfiguration(
                        "data_id_nibble_offset_bits must be a multiple of 4 in NIBBLE mode".into(),
                    ));
                }
            }
            _ => {
                if config.data_id_nibble_offset_bits != 0 {
                    return Err(E2EError::InvalidConfiguration(
                        "data_id_nibble_offset_bits must be 0 outside NIBBLE mode".into(),
                    ));
                }
            }
        }
        if !config.data_length_bits.is_multiple_of(BITS_PER_BYTE) || config.data_length_bits < MIN_DATA_LENGTH_BITS {
            return Err(E2EError::InvalidConfiguration(format!(
                "data_length_bits must be a multiple of 8 and at least {}",
                MIN_DATA_LENGTH_BITS
            )));
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

    /// Bytes mixed into the CRC seed ahead of the buffer, per `mode`.
    fn id_mix_bytes(&self, counter: u8) -> ([u8; 2], usize) {
        let [lsb, msb] = self.config.data_id.to_le_bytes();
        match self.config.mode {
            Profile1IdMode::Both => ([lsb, msb], 2),
            Profile1IdMode::Low => ([lsb, 0], 1),
            Profile1IdMode::Alt => {
                if counter % 2 == 0 {
                    ([lsb, 0], 1)
                } else {
                    ([msb, 0], 1)
                }
            }
            Profile1IdMode::Nibble => ([lsb, 0x00], 2),
        }
    }

    /// See SPEC_FULL.md's "Profile 1 / Profile 5" section for why this is
    /// the engine's own resumable contract applied twice plus one explicit
    /// trailing XOR, not a simplified shortcut.
    fn compute_crc(&self, data: &[u8], id_mix_counter: u8) -> u8 {
        let (id_bytes, id_len) = self.id_mix_bytes(id_mix_counter);
        let mut value = crc8_j1850::compute(&id_bytes[..id_len], 0xFF, false);

        let crc_byte = field_ops::byte_index(self.config.crc_offset_bits);
        value = crc8_j1850::compute(&data[0..crc_byte], value, false);
        value = crc8_j1850::compute(&data[crc_byte + 1..], value, false);

        value ^ 0xFF
    }

    fn read_nibble(&self, offset: u16, data: &[u8]) -> u8 {
        field_ops::read_nibble_at(data, offset)
    }

    fn write_nibble(&self, offset: u16, value: u8, data: &mut [u8]) {
        field_ops::write_nibble_at(data, offset, value & NIBBLE_MASK)
    }

    fn read_crc(&self, data: &[u8]) -> u8 {
        field_ops::read_be_u8_at(data, field_ops::byte_index(self.config.crc_offset_bits))
    }

    fn write_crc(&self, crc: u8, data: &mut [u8]) {
        field_ops::write_be_u8_at(data, field_ops::byte_index(self.config.crc_offset_bits), crc)
    }

    /// Write counter, optional ID nibble, and CRC into `data` (spec §4.2.3).
    pub fn protect(&self, state: &mut Profile1ProtectState, data: &mut [u8]) -> E2EResult<()> {
        self.validate_length(data.len())?;

        self.write_nibble(self.config.counter_offset_bits, state.counter, data);
        if self.config.mode == Profile1IdMode::Nibble {
            let high_nibble = (self.config.data_id >> 8) as u8 & NIBBLE_MASK;
            self.write_nibble(self.config.data_id_nibble_offset_bits, high_nibble, data);
        }

        let crc = self.compute_crc(data, state.counter);
        self.write_crc(crc, data);
        state.counter = (state.counter + 1) % COUNTER_MODULO;
        Ok(())
    }

    /// Validate, recompute CRC, and advance `state` per spec §4.2.4.
    pub fn check(&self, state: &mut Profile1CheckState, data: &[u8]) -> E2EResult<Profile1FineStatus> {
        self.validate_length(data.len())?;

        state.max_delta_counter = (state.max_delta_counter + 1).min(COUNTER_MAX);

        if !state.new_data_available {
            state.no_new_or_repeated_data_counter = (state.no_new_or_repeated_data_counter + 1).min(COUNTER_MAX);
            state.status = Profile1FineStatus::NoNewData;
            return Ok(state.status);
        }

        let received_counter = self.read_nibble(self.config.counter_offset_bits, data);
        if received_counter == RESERVED_COUNTER {
            return Err(E2EError::InvalidDataFormat("counter nibble value 15 is reserved".into()));
        }

        let expected_crc = self.compute_crc(data, received_counter);
        let received_crc = self.read_crc(data);
        let nibble_ok = if self.config.mode == Profile1IdMode::Nibble {
            let expected_nibble = (self.config.data_id >> 8) as u8 & NIBBLE_MASK;
            self.read_nibble(self.config.data_id_nibble_offset_bits, data) == expected_nibble
        } else {
            true
        };

        if expected_crc != received_crc || !nibble_ok {
            state.status = Profile1FineStatus::WrongCrc;
            return Ok(state.status);
        }

        if state.wait_for_first_data {
            state.wait_for_first_data = false;
            state.max_delta_counter = self.config.max_delta_counter_init;
            state.last_valid_counter = received_counter;
            state.status = Profile1FineStatus::Initial;
            return Ok(state.status);
        }

        let delta = (COUNTER_MODULO + received_counter - state.last_valid_counter) % COUNTER_MODULO;

        if delta == 0 {
            state.no_new_or_repeated_data_counter = (state.no_new_or_repeated_data_counter + 1).min(COUNTER_MAX);
            state.status = Profile1FineStatus::Repeated;
        } else if delta > state.max_delta_counter {
            state.no_new_or_repeated_data_counter = 0;
            state.sync_counter = self.config.sync_counter_init;
            if state.sync_counter != 0 {
                state.max_delta_counter = self.config.max_delta_counter_init;
                state.last_valid_counter = received_counter;
            }
            state.status = Profile1FineStatus::WrongSequence;
        } else {
            state.max_delta_counter = self.config.max_delta_counter_init;
            state.last_valid_counter = received_counter;
            state.lost_data = delta - 1;

            if state.no_new_or_repeated_data_counter > self.config.max_no_new_or_repeated_data {
                state.sync_counter = self.config.sync_counter_init;
                state.no_new_or_repeated_data_counter = 0;
                state.status = Profile1FineStatus::Sync;
            } else if state.sync_counter > 0 {
                state.sync_counter -= 1;
                state.no_new_or_repeated_data_counter = 0;
                state.status = Profile1FineStatus::Sync;
            } else {
                state.no_new_or_repeated_data_counter = 0;
                state.status = if delta == 1 { Profile1FineStatus::Ok } else { Profile1FineStatus::OkSomeLost };
            }
        }

        Ok(state.status)
    }

    /// Collapse a fine status into the six-valued `CheckStatus` the
    /// aggregation SM consumes (spec §4.4).
    pub fn map_status_to_sm(status: Profile1FineStatus, legacy: bool) -> crate::sm::CheckStatus {
        use crate::sm::CheckStatus;
        match status {
            Profile1FineStatus::Ok | Profile1FineStatus::OkSomeLost => CheckStatus::Ok,
            Profile1FineStatus::Initial => {
                if legacy {
                    CheckStatus::WrongSequence
                } else {
                    CheckStatus::Ok
                }
            }
            Profile1FineStatus::WrongCrc => CheckStatus::Error,
            Profile1FineStatus::Repeated => CheckStatus::Repeated,
            Profile1FineStatus::NoNewData => CheckStatus::NoNewData,
            Profile1FineStatus::WrongSequence => CheckStatus::WrongSequence,
            Profile1FineStatus::Sync => {
                if legacy {
                    CheckStatus::Ok
                } else {
                    CheckStatus::WrongSequence
                }
            }
        }
    }
}
