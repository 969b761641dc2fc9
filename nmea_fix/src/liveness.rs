use core::{fmt, time::Duration};

use crate::{scheduler::Tick, state::FixState};

/// What the receiver looks like from the outside
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Fewer satellites than the fix threshold
    Acquiring,
    /// At least as many satellites as the fix threshold
    Fixed,
}

/// Signal for the status indicator, emitted on every heartbeat
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heartbeat {
    /// Running, still looking for satellites
    Alive,
    /// Running with a fix
    Fixed,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Acquiring => f.write_str("ACQUIRING"),
            Mode::Fixed => f.write_str("FIXED"),
        }
    }
}

impl From<Mode> for Heartbeat {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Acquiring => Heartbeat::Alive,
            Mode::Fixed => Heartbeat::Fixed,
        }
    }
}

/// How confidence fades when sentences stop arriving.
///
/// Once nothing has been reconciled for longer than `staleness_threshold`, every call to
/// [`DecayPolicy::decay`] takes one satellite away. The count reaches zero gradually, so a
/// display shows the fix fading rather than vanishing.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecayPolicy {
    pub staleness_threshold: Duration,
    pub fix_threshold: u32,
}

impl Default for DecayPolicy {
    fn default() -> Self {
        Self {
            staleness_threshold: Duration::from_secs(10),
            fix_threshold: 3,
        }
    }
}

impl DecayPolicy {
    /// True when the last successful update is older than the staleness threshold. A
    /// state that was never updated is stale.
    pub fn is_stale(&self, state: &FixState, now: Tick) -> bool {
        match state.last_update_tick() {
            Some(last) => now.saturating_duration_since(last) > self.staleness_threshold,
            None => true,
        }
    }

    /// Removes one satellite if the state is stale. Returns whether anything changed.
    pub fn decay(&self, state: &mut FixState, now: Tick) -> bool {
        self.is_stale(state, now) && state.decay_satellites()
    }

    pub fn mode(&self, state: &FixState) -> Mode {
        if state.satellite_count() >= self.fix_threshold {
            Mode::Fixed
        } else {
            Mode::Acquiring
        }
    }
}
