use core::time::Duration;

use crate::{
    error::SentenceError,
    liveness::{DecayPolicy, Heartbeat, Mode},
    parser::{Parser, UnderlyingBuffer},
    scheduler::{Due, Scheduler, Tick},
    sentence::RawSentence,
    state::{FixState, UpdatedFields},
    update::{classify, PartialFixUpdate},
};

#[cfg(feature = "std")]
use crate::scheduler::Clock;
#[cfg(feature = "std")]
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Cadences and thresholds of the monitor loop
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// How often the display gets a fresh [`Snapshot`]
    pub render_interval: Duration,
    /// How often the status indicator is told whether there is a fix. Never slower than
    /// `render_interval`: [`FixMonitor::new`] clamps a longer value down to it.
    pub heartbeat_interval: Duration,
    /// How often the decay policy is evaluated
    pub decay_interval: Duration,
    /// Silence after which satellites start to decay
    pub staleness_threshold: Duration,
    /// Satellites needed to report [`Mode::Fixed`]
    pub fix_threshold: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        let policy = DecayPolicy::default();
        Self {
            render_interval: Duration::from_secs(1),
            heartbeat_interval: Duration::from_secs(1),
            decay_interval: Duration::from_secs(1),
            staleness_threshold: policy.staleness_threshold,
            fix_threshold: policy.fix_threshold,
        }
    }
}

impl MonitorConfig {
    pub const fn with_render_interval(mut self, interval: Duration) -> Self {
        self.render_interval = interval;
        self
    }

    pub const fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    pub const fn with_decay_interval(mut self, interval: Duration) -> Self {
        self.decay_interval = interval;
        self
    }

    pub const fn with_staleness_threshold(mut self, threshold: Duration) -> Self {
        self.staleness_threshold = threshold;
        self
    }

    pub const fn with_fix_threshold(mut self, satellites: u32) -> Self {
        self.fix_threshold = satellites;
        self
    }

    /// The same configuration with the heartbeat at most as slow as the display
    pub fn clamped(mut self) -> Self {
        if self.heartbeat_interval > self.render_interval {
            self.heartbeat_interval = self.render_interval;
        }
        self
    }

    pub fn decay_policy(&self) -> DecayPolicy {
        DecayPolicy {
            staleness_threshold: self.staleness_threshold,
            fix_threshold: self.fix_threshold,
        }
    }
}

/// What collaborators get to see: a copy of the fix and the mode derived from it
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub state: FixState,
    pub mode: Mode,
}

/// Counters for everything the monitor absorbed instead of failing
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostics {
    /// Complete lines handed to the tokenizer, blank lines excluded
    pub lines: u64,
    /// Sentences that changed the fix
    pub updates_applied: u64,
    /// Well-formed sentences flagged as "no fix"
    pub empty_updates: u64,
    pub malformed: u64,
    pub too_few_fields: u64,
    pub invalid_angle: u64,
    pub invalid_time: u64,
    pub invalid_date: u64,
    pub invalid_count: u64,
    pub line_too_long: u64,
    /// Satellites taken away by the decay policy
    pub decays: u64,
}

impl Diagnostics {
    /// Counts one absorbed error
    pub fn record(&mut self, error: &SentenceError) {
        let counter = match error {
            SentenceError::MalformedSentence => &mut self.malformed,
            SentenceError::TooFewFields { .. } => &mut self.too_few_fields,
            SentenceError::InvalidAngle => &mut self.invalid_angle,
            SentenceError::InvalidTime => &mut self.invalid_time,
            SentenceError::InvalidDate => &mut self.invalid_date,
            SentenceError::InvalidCount => &mut self.invalid_count,
            SentenceError::LineTooLong { .. } => &mut self.line_too_long,
        };
        *counter += 1;
    }

    /// Total number of sentences and lines that were dropped
    pub fn rejected(&self) -> u64 {
        self.malformed
            + self.too_few_fields
            + self.invalid_angle
            + self.invalid_time
            + self.invalid_date
            + self.invalid_count
            + self.line_too_long
    }
}

/// Receives a [`Snapshot`] once per render interval. Layout is entirely up to the sink.
pub trait DisplaySink {
    fn render(&mut self, _snapshot: &Snapshot) {}
}

/// Implement display sink for simple callbacks / closures
impl<F: FnMut(&Snapshot)> DisplaySink for F {
    fn render(&mut self, snapshot: &Snapshot) {
        self(snapshot)
    }
}

/// Drives an LED or similar once per heartbeat interval
pub trait StatusIndicator {
    fn heartbeat(&mut self, _beat: Heartbeat) {}
}

/// Implement status indicator for simple callbacks / closures
impl<F: FnMut(Heartbeat)> StatusIndicator for F {
    fn heartbeat(&mut self, beat: Heartbeat) {
        self(beat)
    }
}

/// Owns the fix and everything that may change it.
///
/// Bytes go in through [`FixMonitor::feed`], time goes in through [`FixMonitor::tick`].
/// Neither ever fails: bad input ends up in [`Diagnostics`], silence ends up decaying
/// the satellite count.
pub struct FixMonitor<T: UnderlyingBuffer> {
    parser: Parser<T>,
    state: FixState,
    mode: Mode,
    policy: DecayPolicy,
    scheduler: Scheduler,
    config: MonitorConfig,
    diagnostics: Diagnostics,
}

impl<T: UnderlyingBuffer> FixMonitor<T> {
    /// Creates a monitor with an empty fix. All intervals start counting at `now`.
    ///
    /// A `heartbeat_interval` longer than `render_interval` is clamped to it.
    pub fn new(buffer: T, config: MonitorConfig, now: Tick) -> Self {
        if config.heartbeat_interval > config.render_interval {
            log::warn!(
                "Heartbeat every {:?} is slower than the display, using {:?}",
                config.heartbeat_interval,
                config.render_interval
            );
        }
        let config = config.clamped();
        let policy = config.decay_policy();
        let state = FixState::new();
        Self {
            parser: Parser::new(buffer),
            mode: policy.mode(&state),
            state,
            policy,
            scheduler: Scheduler::new(
                config.decay_interval,
                config.render_interval,
                config.heartbeat_interval,
                now,
            ),
            config,
            diagnostics: Diagnostics::default(),
        }
    }

    /// Consumes raw bytes from the transport. Every complete line is tokenized,
    /// classified and reconciled; partial lines wait for the next call.
    ///
    /// Returns the union of the fields changed by the sentences in `bytes`.
    pub fn feed(&mut self, bytes: &[u8], now: Tick) -> UpdatedFields {
        let mut updated = UpdatedFields::empty();
        {
            let mut it = self.parser.consume(bytes);
            while let Some(res) = it.next() {
                self.diagnostics.lines += 1;
                match res.and_then(|sentence| classify(&sentence)) {
                    Ok(update) => {
                        updated |=
                            absorb_update(&mut self.state, &mut self.diagnostics, &update, now);
                    },
                    Err(e) => absorb_error(&mut self.diagnostics, e),
                }
            }
        }
        self.refresh_mode();
        updated
    }

    /// Processes one already framed line, bypassing the line buffer.
    ///
    /// The failure is still counted, but unlike [`FixMonitor::feed`] it is also returned.
    pub fn ingest_line(&mut self, line: &[u8], now: Tick) -> Result<UpdatedFields, SentenceError> {
        self.diagnostics.lines += 1;
        let result = match RawSentence::parse(line).and_then(|sentence| classify(&sentence)) {
            Ok(update) => Ok(absorb_update(
                &mut self.state,
                &mut self.diagnostics,
                &update,
                now,
            )),
            Err(e) => {
                absorb_error(&mut self.diagnostics, e);
                Err(e)
            },
        };
        self.refresh_mode();
        result
    }

    /// Runs whatever periodic work is due at `now`: decay first, so that the display
    /// and the heartbeat already see its outcome.
    pub fn tick<D, S>(&mut self, now: Tick, display: &mut D, status: &mut S) -> Due
    where
        D: DisplaySink + ?Sized,
        S: StatusIndicator + ?Sized,
    {
        let due = self.scheduler.poll(now);
        if due.contains(Due::DECAY) && self.policy.decay(&mut self.state, now) {
            self.diagnostics.decays += 1;
            log::debug!(
                "No fix data for a while, {} satellites left",
                self.state.satellite_count()
            );
            self.refresh_mode();
        }
        if due.contains(Due::RENDER) {
            display.render(&self.snapshot());
        }
        if due.contains(Due::HEARTBEAT) {
            status.heartbeat(self.mode.into());
        }
        due
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            mode: self.mode,
        }
    }

    pub fn state(&self) -> &FixState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    fn refresh_mode(&mut self) {
        let mode = self.policy.mode(&self.state);
        if mode != self.mode {
            log::info!(
                "{} -> {} with {} satellites",
                self.mode,
                mode,
                self.state.satellite_count()
            );
            self.mode = mode;
        }
    }
}

fn absorb_update(
    state: &mut FixState,
    diagnostics: &mut Diagnostics,
    update: &PartialFixUpdate,
    now: Tick,
) -> UpdatedFields {
    let fields = state.apply(update, now);
    if fields.is_empty() {
        diagnostics.empty_updates += 1;
        log::debug!("Sentence carries no valid fix, state kept");
    } else {
        diagnostics.updates_applied += 1;
        log::trace!("Reconciled {:?}", fields);
    }
    fields
}

fn absorb_error(diagnostics: &mut Diagnostics, error: SentenceError) {
    diagnostics.record(&error);
    log::debug!("Dropping sentence; cause {}", error);
}

/// Cloneable request to leave [`FixMonitor::run`], e.g. from a signal handler
#[cfg(feature = "std")]
#[derive(Debug, Clone, Default)]
pub struct Shutdown(Arc<AtomicBool>);

#[cfg(feature = "std")]
impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Size of a single read from the transport
#[cfg(feature = "std")]
const READ_CHUNK: usize = 256;
/// Pause when the transport had nothing to offer
#[cfg(feature = "std")]
const IDLE_SLEEP: Duration = Duration::from_millis(10);

#[cfg(feature = "std")]
impl<T: UnderlyingBuffer> FixMonitor<T> {
    /// Drives the monitor from `reader` until `shutdown` is requested or the reader
    /// reaches end of stream.
    ///
    /// The reader must not block indefinitely: give it a read timeout (serial ports,
    /// sockets) or put it in non-blocking mode. Decay, rendering and the heartbeat only
    /// run between reads, so a read that waits for data that never comes freezes them
    /// together with the fix. Files and in-memory readers are fine as they are.
    ///
    /// Timeouts, would-block and interruptions count as "no data"; any other I/O
    /// error is returned.
    pub fn run<R, C, D, S>(
        &mut self,
        reader: &mut R,
        clock: &C,
        display: &mut D,
        status: &mut S,
        shutdown: &Shutdown,
    ) -> std::io::Result<()>
    where
        R: std::io::Read + ?Sized,
        C: Clock + ?Sized,
        D: DisplaySink + ?Sized,
        S: StatusIndicator + ?Sized,
    {
        let mut local_buf = [0; READ_CHUNK];
        while !shutdown.is_requested() {
            let nbytes = match read_port(reader, &mut local_buf)? {
                Some(0) => {
                    log::debug!("End of stream");
                    break;
                },
                Some(nbytes) => nbytes,
                None => 0,
            };

            if nbytes > 0 {
                self.feed(&local_buf[..nbytes], clock.now());
            } else {
                std::thread::sleep(IDLE_SLEEP);
            }
            self.tick(clock.now(), display, status);
        }
        Ok(())
    }
}

/// Reads the transport, converting timeouts into `None`
#[cfg(feature = "std")]
fn read_port<R: std::io::Read + ?Sized>(
    reader: &mut R,
    output: &mut [u8],
) -> std::io::Result<Option<usize>> {
    use std::io::ErrorKind;

    match reader.read(output) {
        Ok(b) => Ok(Some(b)),
        Err(e) => match e.kind() {
            ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted => Ok(None),
            _ => Err(e),
        },
    }
}
