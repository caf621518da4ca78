//! # e2e-guard
//!
//! An implementation of the AUTOSAR End-to-End (E2E) Communication
//! Protection Library: a parameterised CRC engine, the Profile 1 and
//! Profile 5 per-message codecs, and the windowed aggregation state machine
//! that turns a stream of per-cycle verdicts into a channel-level
//! VALID/INVALID judgement.
//!
//! ## Layout
//!
//! - [`crc`] — width-generic, resumable CRC engine plus the seven named
//!   variants from the AUTOSAR CRC library.
//! - [`profile1`] — 1-byte CRC + 4-bit counter + Data-ID mixing, for small
//!   fixed-layout payloads.
//! - [`profile5`] — 2-byte CRC + 1-byte counter, for 3..4096-byte payloads.
//! - [`sm`] — the aggregation state machine consuming either profile's
//!   mapped status.
//!
//! ## Example
//!
//! ```rust
//! use e2e_guard::profile5::{Profile5, Profile5Config, Profile5ProtectState, Profile5CheckState};
//!
//! # fn main() -> Result<(), e2e_guard::E2EError> {
//! let config = Profile5Config { data_length_bits: 24, ..Default::default() };
//! let profile = Profile5::new(config)?;
//!
//! let mut tx_state = Profile5ProtectState::default();
//! let mut rx_state = Profile5CheckState::default();
//! let mut data = [0u8; 3];
//!
//! profile.protect(&mut tx_state, &mut data)?;
//! let status = profile.check(&mut rx_state, Some(&data))?;
//! # let _ = status;
//! # Ok(())
//! # }
//! ```

pub mod crc;
pub mod error;
pub mod field_ops;
pub mod profile1;
pub mod profile5;
pub mod sm;

pub use error::{E2EError, E2EResult, StatusCode};
