//! # Aggregation state machine
//!
//! Consumes the six-valued [`CheckStatus`] produced by a profile's mapper,
//! one per communication cycle, and maintains a sliding window of recent
//! statuses to decide whether the channel as a whole is `VALID`. Mirrors the
//! shape of the reference `E2E_SM.c` (ring buffer + per-state window size +
//! OK/ERROR recount), but with the `INIT`/`VALID`/`INVALID` transitions the
//! source leaves unimplemented (see DESIGN.md) filled in from the transition
//! table.

use crate::error::{E2EError, E2EResult};

/// Profile-independent per-cycle status the mapper produces (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CheckStatus {
    Ok = 0,
    Repeated = 1,
    WrongSequence = 2,
    Error = 3,
    NotAvailable = 4,
    NoNewData = 5,
}

/// Channel-level state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmState {
    /// Before `init` is called; any `check` call is a contract violation.
    Deinit,
    /// Initialized, nothing observed yet.
    NoData,
    /// Some data observed, not yet trusted.
    Init,
    /// Trusted.
    Valid,
    /// Failed recently.
    Invalid,
}

/// Immutable per-channel configuration.
#[derive(Debug, Clone, Copy)]
pub struct AggregationConfig {
    pub window_size_valid: usize,
    pub window_size_init: usize,
    pub window_size_invalid: usize,
    pub min_ok_state_init: usize,
    pub max_error_state_init: usize,
    pub min_ok_state_valid: usize,
    pub max_error_state_valid: usize,
    pub min_ok_state_invalid: usize,
    pub max_error_state_invalid: usize,
    /// Whether a NODATA→INVALID transition also clears the window.
    pub clear_to_invalid: bool,
}

/// The window is sized to `window_size_valid`, which by construction must be
/// the largest of the three configured window sizes.
const MAX_WINDOW: usize = 256;

/// Windowed channel state (spec §3, §4.5).
pub struct AggregationSm {
    config: AggregationConfig,
    window: [CheckStatus; MAX_WINDOW],
    window_top_index: usize,
    ok_count: usize,
    error_count: usize,
    state: SmState,
}

impl AggregationSm {
    pub fn new(config: AggregationConfig) -> E2EResult<Self> {
        Self::validate_config(&config)?;
        Ok(Self {
            config,
            window: [CheckStatus::NotAvailable; MAX_WINDOW],
            window_top_index: 0,
            ok_count: 0,
            error_count: 0,
            state: SmState::Deinit,
        })
    }

    fn validate_config(config: &AggregationConfig) -> E2EResult<()> {
        if config.window_size_valid == 0 || config.window_size_valid > MAX_WINDOW {
            return Err(E2EError::InvalidConfiguration(format!(
                "window_size_valid must be between 1 and {}",
                MAX_WINDOW
            )));
        }
        if config.window_size_init > config.window_size_valid || config.window_size_invalid > config.window_size_valid {
            return Err(E2EError::InvalidConfiguration(
                "window_size_valid must be the largest of the three configured window sizes".into(),
            ));
        }
        if config.window_size_init == 0 || config.window_size_invalid == 0 {
            return Err(E2EError::InvalidConfiguration(
                "every configured window size must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn state(&self) -> SmState {
        self.state
    }

    pub fn ok_count(&self) -> usize {
        self.ok_count
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn window_top_index(&self) -> usize {
        self.window_top_index
    }

    /// Fill the window with `NOTAVAILABLE`, zero the counters, and move to
    /// `NODATA` (spec §4.5 "Init").
    pub fn init(&mut self) {
        self.window[..self.config.window_size_valid].fill(CheckStatus::NotAvailable);
        self.window_top_index = 0;
        self.ok_count = 0;
        self.error_count = 0;
        self.state = SmState::NoData;
    }

    fn current_window_size(&self) -> usize {
        match self.state {
            SmState::Valid => self.config.window_size_valid,
            SmState::Invalid => self.config.window_size_invalid,
            SmState::Init | SmState::NoData | SmState::Deinit => self.config.window_size_init,
        }
    }

    /// Wipe the whole window buffer (spec's `E2E_SMClearStatus` equivalent),
    /// independent of the currently active window size.
    fn clear_window_full(&mut self) {
        self.window = [CheckStatus::NotAvailable; MAX_WINDOW];
        self.ok_count = 0;
        self.error_count = 0;
        self.window_top_index = 0;
    }

    /// Advance the window by one cycle and evaluate state transitions
    /// (spec §4.5).
    pub fn check(&mut self, status: CheckStatus) -> E2EResult<SmState> {
        if self.state == SmState::Deinit {
            return Err(E2EError::WrongState);
        }

        let window_size = self.current_window_size();
        self.window[self.window_top_index] = status;
        self.recount(window_size);
        let wrapped_to_zero = self.window_top_index + 1 == window_size;
        self.window_top_index = if wrapped_to_zero { 0 } else { self.window_top_index + 1 };

        match self.state {
            SmState::NoData => {
                if wrapped_to_zero {
                    // Only ERROR/NONEWDATA statuses seen since init: the
                    // window index ran all the way around without a real
                    // arrival resetting it.
                    if self.config.clear_to_invalid {
                        self.clear_window_full();
                    }
                    self.state = SmState::Invalid;
                } else if !matches!(status, CheckStatus::Error | CheckStatus::NoNewData) {
                    // NODATA and INIT share `window_size_init`, so the
                    // window just written (including this cycle's entry)
                    // carries over as-is — nothing to resize or discard.
                    self.state = SmState::Init;
                }
            }
            SmState::Init => {
                if self.error_count > self.config.max_error_state_init {
                    self.transition_to(SmState::Invalid, self.config.window_size_invalid);
                } else if self.ok_count >= self.config.min_ok_state_init && self.error_count <= self.config.max_error_state_init {
                    self.transition_to(SmState::Valid, self.config.window_size_valid);
                }
            }
            SmState::Valid => {
                if self.ok_count < self.config.min_ok_state_valid || self.error_count > self.config.max_error_state_valid {
                    self.transition_to(SmState::Invalid, self.config.window_size_invalid);
                }
            }
            SmState::Invalid => {
                if self.ok_count >= self.config.min_ok_state_invalid && self.error_count <= self.config.max_error_state_invalid {
                    self.transition_to(SmState::Valid, self.config.window_size_valid);
                }
            }
            SmState::Deinit => unreachable!("checked above"),
        }

        Ok(self.state)
    }

    fn recount(&mut self, window_size: usize) {
        let window = &self.window[..window_size];
        self.ok_count = window.iter().filter(|s| matches!(s, CheckStatus::Ok)).count();
        self.error_count = window.iter().filter(|s| matches!(s, CheckStatus::Error)).count();
    }

    /// Move to `next_state`, resizing the active window per the open-question
    /// resolution in SPEC_FULL.md: keep the most recent `min(old, new)`
    /// entries nearest `window_top_index`, pad the rest with `NOTAVAILABLE`.
    fn transition_to(&mut self, next_state: SmState, next_window_size: usize) {
        let old_window_size = self.current_window_size();
        let retained = old_window_size.min(next_window_size);

        let mut resized = [CheckStatus::NotAvailable; MAX_WINDOW];
        for i in 0..retained {
            let src = (self.window_top_index + old_window_size - retained + i) % old_window_size;
            resized[i] = self.window[src];
        }
        self.window = resized;
        self.window_top_index = retained % next_window_size;
        self.state = next_state;
        self.recount(next_window_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AggregationConfig {
        AggregationConfig {
            window_size_valid: 20,
            window_size_init: 10,
            window_size_invalid: 5,
            min_ok_state_init: 5,
            max_error_state_init: 3,
            min_ok_state_valid: 14,
            max_error_state_valid: 6,
            min_ok_state_invalid: 3,
            max_error_state_invalid: 1,
            clear_to_invalid: true,
        }
    }

    #[test]
    fn checking_before_init_is_wrong_state() {
        let mut sm = AggregationSm::new(config()).unwrap();
        assert!(matches!(sm.check(CheckStatus::Ok), Err(E2EError::WrongState)));
    }

    #[test]
    fn nodata_to_init_on_first_real_arrival() {
        let mut sm = AggregationSm::new(config()).unwrap();
        sm.init();
        assert_eq!(sm.check(CheckStatus::Ok).unwrap(), SmState::Init);
        assert_eq!(sm.window_top_index(), 1);
        assert_eq!(sm.ok_count(), 1);
    }

    #[test]
    fn init_to_valid_once_enough_oks_accumulate() {
        let mut sm = AggregationSm::new(config()).unwrap();
        sm.init();
        for _ in 0..5 {
            sm.check(CheckStatus::Ok).unwrap();
        }
        assert_eq!(sm.state(), SmState::Valid);
    }

    #[test]
    fn init_to_invalid_on_too_many_errors() {
        let mut sm = AggregationSm::new(config()).unwrap();
        sm.init();
        sm.check(CheckStatus::Ok).unwrap();
        for _ in 0..4 {
            sm.check(CheckStatus::Error).unwrap();
        }
        assert_eq!(sm.state(), SmState::Invalid);
    }

    #[test]
    fn valid_drops_to_invalid_when_ok_count_falls_below_threshold() {
        let mut sm = AggregationSm::new(config()).unwrap();
        sm.init();
        for _ in 0..5 {
            sm.check(CheckStatus::Ok).unwrap();
        }
        assert_eq!(sm.state(), SmState::Valid);
        for _ in 0..20 {
            sm.check(CheckStatus::Error).unwrap();
        }
        assert_eq!(sm.state(), SmState::Invalid);
    }

    #[test]
    fn invalid_recovers_to_valid() {
        let mut sm = AggregationSm::new(config()).unwrap();
        sm.init();
        sm.check(CheckStatus::Ok).unwrap();
        for _ in 0..4 {
            sm.check(CheckStatus::Error).unwrap();
        }
        assert_eq!(sm.state(), SmState::Invalid);
        for _ in 0..5 {
            sm.check(CheckStatus::Ok).unwrap();
        }
        assert_eq!(sm.state(), SmState::Valid);
    }

    #[test]
    fn window_counts_never_exceed_the_active_window_size() {
        let mut sm = AggregationSm::new(config()).unwrap();
        sm.init();
        for i in 0..200 {
            let status = if i % 3 == 0 { CheckStatus::Error } else { CheckStatus::Ok };
            sm.check(status).unwrap();
            let window_size = sm.current_window_size();
            assert!(sm.ok_count() + sm.error_count() <= window_size);
            assert!(sm.window_top_index() < window_size);
        }
    }
}
