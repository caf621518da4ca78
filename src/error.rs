use thiserror::Error;

/// Errors returned by configuration construction and by `protect`/`check`
/// calls whose buffer does not match the configured length.
///
/// Protocol-level anomalies (CRC mismatch, counter jumps, repetition, ...)
/// are never represented here: they are reported inside each state's
/// `status` field and the call itself still returns `Ok` (spec §4.6).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum E2EError {
    /// A configuration value violates one of the profile's invariants.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A buffer passed to `protect`/`check` does not have the length the
    /// configuration requires.
    #[error("invalid data format: {0}")]
    InvalidDataFormat(String),

    /// The aggregation state machine was stepped before `init`.
    #[error("state machine used before init")]
    WrongState,
}

pub type E2EResult<T> = Result<T, E2EError>;

/// Wire-compatible numeric status codes from spec §6, preserved for
/// callers bridging into AUTOSAR tooling that expects these exact values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StatusCode {
    Ok = 0x00,
    InputErrNull = 0x13,
    InputErrWrong = 0x17,
    IntErr = 0x19,
    WrongState = 0x1A,
}
