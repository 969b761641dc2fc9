use bitflags::bitflags;
use core::time::Duration;

/// A point on a monotonic clock, in milliseconds since an arbitrary origin.
///
/// On a microcontroller this is whatever the systick counter says; on a host see
/// [`MonotonicClock`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tick(u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Time elapsed since `earlier`, zero if `earlier` is actually later
    pub fn saturating_duration_since(self, earlier: Tick) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }

    pub fn saturating_add(self, duration: Duration) -> Tick {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Tick(self.0.saturating_add(millis))
    }
}

/// Source of [`Tick`]s for the monitor loop
pub trait Clock {
    fn now(&self) -> Tick;
}

/// Implement clock for simple closures, handy in tests and on bare metal
impl<F: Fn() -> Tick> Clock for F {
    fn now(&self) -> Tick {
        self()
    }
}

/// Wall-independent clock measuring from its own creation
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for MonotonicClock {
    fn now(&self) -> Tick {
        let millis = self.origin.elapsed().as_millis();
        Tick(u64::try_from(millis).unwrap_or(u64::MAX))
    }
}

/// A periodic action, due once `period` has elapsed since it last ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period: Duration,
    last: Tick,
}

impl Interval {
    /// The first run is due one `period` after `start`.
    pub const fn new(period: Duration, start: Tick) -> Self {
        Self {
            period,
            last: start,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_due(&self, now: Tick) -> bool {
        now.saturating_duration_since(self.last) >= self.period
    }

    /// Returns true, and restarts the period from `now`, if the action is due.
    pub fn poll(&mut self, now: Tick) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.last = now;
        true
    }
}

bitflags! {
    /// Periodic actions that came due in one [`Scheduler::poll`]
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Due: u8 {
        const DECAY = 0x01;
        const RENDER = 0x02;
        const HEARTBEAT = 0x04;
    }
}

/// The three periodic actions of the monitor loop, each on its own interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    decay: Interval,
    render: Interval,
    heartbeat: Interval,
}

impl Scheduler {
    pub const fn new(
        decay_interval: Duration,
        render_interval: Duration,
        heartbeat_interval: Duration,
        start: Tick,
    ) -> Self {
        Self {
            decay: Interval::new(decay_interval, start),
            render: Interval::new(render_interval, start),
            heartbeat: Interval::new(heartbeat_interval, start),
        }
    }

    pub fn poll(&mut self, now: Tick) -> Due {
        let mut due = Due::empty();
        due.set(Due::DECAY, self.decay.poll(now));
        due.set(Due::RENDER, self.render.poll(now));
        due.set(Due::HEARTBEAT, self.heartbeat.poll(now));
        due
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tick_arithmetic() {
        let t = Tick::from_millis(1500);
        assert_eq!(
            t.saturating_duration_since(Tick::from_millis(500)),
            Duration::from_secs(1)
        );
        assert_eq!(t.saturating_duration_since(Tick::from_millis(2000)), Duration::ZERO);
        assert_eq!(t.saturating_add(Duration::from_millis(250)).as_millis(), 1750);
    }

    #[test]
    fn interval_restarts_from_poll_time() {
        let mut interval = Interval::new(Duration::from_millis(1000), Tick::from_millis(100));
        assert!(!interval.poll(Tick::from_millis(1099)));
        assert!(interval.poll(Tick::from_millis(1100)));
        assert!(!interval.poll(Tick::from_millis(1100)));
        assert!(!interval.poll(Tick::from_millis(2000)));
        assert!(interval.poll(Tick::from_millis(2500)));
        assert!(!interval.is_due(Tick::from_millis(3000)));
    }

    #[test]
    fn independent_intervals() {
        let mut scheduler = Scheduler::new(
            Duration::from_millis(100),
            Duration::from_millis(1000),
            Duration::from_millis(2000),
            Tick::ZERO,
        );
        assert_eq!(scheduler.poll(Tick::from_millis(50)), Due::empty());
        assert_eq!(scheduler.poll(Tick::from_millis(100)), Due::DECAY);
        assert_eq!(
            scheduler.poll(Tick::from_millis(1000)),
            Due::DECAY | Due::RENDER
        );
        assert_eq!(scheduler.poll(Tick::from_millis(2000)), Due::all());
    }

    #[test]
    fn closure_clock() {
        let clock = || Tick::from_millis(42);
        assert_eq!(clock.now(), Tick::from_millis(42));
    }
}
