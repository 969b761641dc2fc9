use bitflags::bitflags;
use chrono::NaiveDateTime;

use crate::{
    error::DateTimeError,
    fields::{FixDate, UtcTime},
    scheduler::Tick,
    update::{PartialFixUpdate, Position},
};

bitflags! {
    /// Which parts of the [`FixState`] an update carried
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct UpdatedFields: u8 {
        const DATE = 0x01;
        const TIME = 0x02;
        const POSITION = 0x04;
        const SATELLITES = 0x08;
    }
}

/// The current fix, merged from every sentence reconciled so far.
///
/// Only [`reconcile`] and the decay policy ever change it; everybody else gets a copy.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixState {
    date: Option<FixDate>,
    time_of_day: Option<UtcTime>,
    position: Option<Position>,
    satellite_count: u32,
    last_update_tick: Option<Tick>,
}

impl FixState {
    pub const fn new() -> Self {
        Self {
            date: None,
            time_of_day: None,
            position: None,
            satellite_count: 0,
            last_update_tick: None,
        }
    }

    /// Last known date. Once set it is only ever replaced by another date.
    pub fn date(&self) -> Option<FixDate> {
        self.date
    }

    pub fn time_of_day(&self) -> Option<UtcTime> {
        self.time_of_day
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn latitude(&self) -> Option<f64> {
        self.position.map(|p| p.lat)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.position.map(|p| p.lon)
    }

    pub fn satellite_count(&self) -> u32 {
        self.satellite_count
    }

    /// When the last non-empty update was reconciled, `None` until the first one
    pub fn last_update_tick(&self) -> Option<Tick> {
        self.last_update_tick
    }

    /// Date and time combined, as long as both are known.
    ///
    /// The two may come from different sentences, the date being sticky.
    pub fn datetime(&self) -> Option<Result<NaiveDateTime, DateTimeError>> {
        let (date, time) = (self.date?, self.time_of_day?);
        Some(
            date.to_naive_date()
                .and_then(|d| time.to_naive_time().map(|t| NaiveDateTime::new(d, t))),
        )
    }

    /// Applies every field present in `update`, in place. An empty update leaves the
    /// state, `last_update_tick` included, untouched.
    pub fn apply(&mut self, update: &PartialFixUpdate, now: Tick) -> UpdatedFields {
        let fields = update.fields();
        if fields.is_empty() {
            return fields;
        }

        if let Some(date) = update.date {
            self.date = Some(date);
        }
        if let Some(time) = update.time_of_day {
            self.time_of_day = Some(time);
        }
        if let Some(position) = update.position {
            self.position = Some(position);
        }
        if let Some(count) = update.satellite_count {
            self.satellite_count = count;
        }
        self.last_update_tick = Some(now);
        fields
    }

    /// Removes one satellite from the count, stopping at zero. Returns whether the count
    /// changed.
    pub(crate) fn decay_satellites(&mut self) -> bool {
        let before = self.satellite_count;
        self.satellite_count = before.saturating_sub(1);
        self.satellite_count != before
    }
}

/// Merges `update` into `state`.
///
/// Fields absent from the update keep their value; `last_update_tick` moves to `now` as
/// soon as the update carries anything at all.
pub fn reconcile(mut state: FixState, update: &PartialFixUpdate, now: Tick) -> FixState {
    state.apply(update, now);
    state
}
