use anyhow::{Context, Result};
use nmea_fix::{
    Clock, DisplaySink, FixMonitor, FixedBuffer, MonotonicClock, Shutdown, DEFAULT_LINE_CAPACITY,
};

mod cli;
mod display;

use display::{ConsoleLed, TerminalDisplay};

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_env("FIX_MONITOR_LOGLEVEL")
        .init();

    let cli = cli::CommandBuilder::default().build().get_matches();
    let config = cli::Command::monitor_config(&cli);
    let mut source = cli::Command::source(&cli)?;

    let shutdown = Shutdown::new();
    let handler = shutdown.clone();
    ctrlc::set_handler(move || handler.request()).context("Failed to install Ctrl-C handler")?;

    let clock = MonotonicClock::new();
    let mut monitor = FixMonitor::new(
        FixedBuffer::<DEFAULT_LINE_CAPACITY>::new(),
        config,
        clock.now(),
    );
    let mut display = TerminalDisplay::new(std::io::stdout(), cli::Command::json_output(&cli));
    let mut led = ConsoleLed::default();

    log::info!("Initializing, move the receiver to open sky");
    monitor.run(&mut source, &clock, &mut display, &mut led, &shutdown)?;
    // A replayed capture usually ends before the first render is due
    display.render(&monitor.snapshot());

    let diagnostics = monitor.diagnostics();
    log::info!(
        "Stopped after {} lines: {} applied, {} without fix, {} rejected, {} heartbeats",
        diagnostics.lines,
        diagnostics.updates_applied,
        diagnostics.empty_updates,
        diagnostics.rejected(),
        led.blinks()
    );
    Ok(())
}
