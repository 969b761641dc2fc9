use nmea_fix::{DisplaySink, Heartbeat, Mode, Snapshot, StatusIndicator};
use std::io::Write;

/// Renders snapshots as text blocks, or as one JSON object per line
pub struct TerminalDisplay<W: Write> {
    out: W,
    json: bool,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, json: bool) -> Self {
        Self { out, json }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_snapshot(&mut self, snapshot: &Snapshot) -> std::io::Result<()> {
        if self.json {
            serde_json::to_writer(&mut self.out, snapshot)?;
            return writeln!(self.out);
        }

        let state = &snapshot.state;
        match snapshot.mode {
            Mode::Fixed => {
                writeln!(self.out, "GPS info")?;
                match state.date() {
                    Some(date) => writeln!(self.out, "date: {}", date)?,
                    None => writeln!(self.out, "date: -")?,
                }
                match state.time_of_day() {
                    Some(time) => writeln!(self.out, "time: {}", time)?,
                    None => writeln!(self.out, "time: -")?,
                }
                if let Some(position) = state.position() {
                    writeln!(self.out, "latitude: {:.6}°", position.lat)?;
                    writeln!(self.out, "longitude: {:.6}°", position.lon)?;
                }
                writeln!(self.out, "satellites: {}", state.satellite_count())?;
                writeln!(self.out, "status: {}", snapshot.mode)?;
            },
            Mode::Acquiring => {
                writeln!(self.out, "Waiting for signal...")?;
                writeln!(self.out, "satellites: {}", state.satellite_count())?;
                writeln!(self.out, "Move the receiver to open sky")?;
            },
        }
        writeln!(self.out)
    }
}

impl<W: Write> DisplaySink for TerminalDisplay<W> {
    fn render(&mut self, snapshot: &Snapshot) {
        if let Err(e) = self.write_snapshot(snapshot) {
            log::error!("Failed to render fix; cause {e}");
        }
    }
}

/// Stand-in for a status LED: one blink per heartbeat, logged
#[derive(Debug, Default)]
pub struct ConsoleLed {
    blinks: u64,
}

impl ConsoleLed {
    pub fn blinks(&self) -> u64 {
        self.blinks
    }
}

impl StatusIndicator for ConsoleLed {
    fn heartbeat(&mut self, beat: Heartbeat) {
        self.blinks += 1;
        match beat {
            Heartbeat::Alive => log::debug!("LED: slow blink, acquiring"),
            Heartbeat::Fixed => log::debug!("LED: quick flash, fixed"),
        }
    }
}
