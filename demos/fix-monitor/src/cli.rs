use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgMatches};
use nmea_fix::MonitorConfig;
use serialport::{FlowControl as SerialFlowControl, SerialPort};
use std::{fs::File, io::Read, path::PathBuf, time::Duration};

pub struct CommandBuilder {
    command: clap::Command,
}

pub struct Command;

impl Default for CommandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBuilder {
    pub fn new() -> Self {
        let command = clap::Command::new("fix-monitor")
            .about("Shows the current GNSS fix from the NMEA output of a receiver")
            .arg_required_else_help(true)
            .arg(
                Arg::new("port")
                    .value_name("port")
                    .short('p')
                    .long("port")
                    .required_unless_present("replay")
                    .help("Serial port the receiver is connected to"),
            )
            .arg(
                Arg::new("replay")
                    .value_name("file")
                    .short('r')
                    .long("replay")
                    .conflicts_with("port")
                    .value_parser(value_parser!(PathBuf))
                    .help("Replay a captured NMEA log instead of opening a port"),
            )
            .arg(
                Arg::new("baud")
                    .value_name("baud")
                    .short('s')
                    .long("baud")
                    .required(false)
                    .default_value("9600")
                    .value_parser(value_parser!(u32))
                    .help("Baud rate for the selected port"),
            )
            .arg(
                Arg::new("stop-bits")
                    .long("stop-bits")
                    .help("Number of stop bits for the selected port")
                    .required(false)
                    .value_parser(["1", "2"])
                    .default_value("1"),
            )
            .arg(
                Arg::new("data-bits")
                    .long("data-bits")
                    .help("Number of data bits for the selected port")
                    .required(false)
                    .value_parser(["7", "8"])
                    .default_value("8"),
            )
            .arg(
                Arg::new("parity")
                    .long("parity")
                    .help("Parity to use for selected port")
                    .required(false)
                    .value_parser(["even", "odd"]),
            )
            .arg(
                Arg::new("render-ms")
                    .long("render-ms")
                    .value_parser(value_parser!(u64))
                    .help("How often the fix is printed [default: 1000]"),
            )
            .arg(
                Arg::new("heartbeat-ms")
                    .long("heartbeat-ms")
                    .value_parser(value_parser!(u64))
                    .help("Status indicator cadence, capped at --render-ms [default: 1000]"),
            )
            .arg(
                Arg::new("decay-ms")
                    .long("decay-ms")
                    .value_parser(value_parser!(u64))
                    .help("How often a stale fix loses a satellite [default: 1000]"),
            )
            .arg(
                Arg::new("staleness-ms")
                    .long("staleness-ms")
                    .value_parser(value_parser!(u64))
                    .help("Silence after which the fix starts to decay [default: 10000]"),
            )
            .arg(
                Arg::new("fix-threshold")
                    .long("fix-threshold")
                    .value_parser(value_parser!(u32))
                    .help("Satellites needed to report a fix [default: 3]"),
            )
            .arg(
                Arg::new("json")
                    .long("json")
                    .action(clap::ArgAction::SetTrue)
                    .help("Print every snapshot as a line of JSON"),
            );
        Self { command }
    }

    pub fn build(&self) -> clap::Command {
        self.command.clone()
    }
}

impl Command {
    pub fn json_output(cli: &ArgMatches) -> bool {
        cli.get_flag("json")
    }

    /// Monitor configuration, library defaults for everything not given
    pub fn monitor_config(cli: &ArgMatches) -> MonitorConfig {
        let defaults = MonitorConfig::default();
        let millis = |id: &str, default: Duration| {
            cli.get_one::<u64>(id)
                .map(|ms| Duration::from_millis(*ms))
                .unwrap_or(default)
        };

        defaults
            .with_render_interval(millis("render-ms", defaults.render_interval))
            .with_heartbeat_interval(millis("heartbeat-ms", defaults.heartbeat_interval))
            .with_decay_interval(millis("decay-ms", defaults.decay_interval))
            .with_staleness_threshold(millis("staleness-ms", defaults.staleness_threshold))
            .with_fix_threshold(
                cli.get_one::<u32>("fix-threshold")
                    .copied()
                    .unwrap_or(defaults.fix_threshold),
            )
    }

    /// Opens the capture file if one was given, the serial port otherwise
    pub fn source(cli: &ArgMatches) -> Result<Box<dyn Read>> {
        match cli.get_one::<PathBuf>("replay") {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open capture: {}", path.display()))?;
                Ok(Box::new(file))
            },
            None => Ok(Box::new(Self::serialport(cli)?)),
        }
    }

    pub fn serialport(cli: &ArgMatches) -> Result<Box<dyn SerialPort>> {
        let port = cli
            .get_one::<String>("port")
            .context("Expected either a 'port' or a 'replay' cli argument")?;

        let baud = cli.get_one::<u32>("baud").cloned().unwrap_or(9600);
        let stop_bits = match cli.get_one::<String>("stop-bits").map(|s| s.as_str()) {
            Some("2") => serialport::StopBits::Two,
            _ => serialport::StopBits::One,
        };
        let data_bits = match cli.get_one::<String>("data-bits").map(|s| s.as_str()) {
            Some("7") => serialport::DataBits::Seven,
            _ => serialport::DataBits::Eight,
        };
        let parity = match cli.get_one::<String>("parity").map(|s| s.as_str()) {
            Some("odd") => serialport::Parity::Odd,
            Some("even") => serialport::Parity::Even,
            _ => serialport::Parity::None,
        };

        let builder = serialport::new(port, baud)
            .stop_bits(stop_bits)
            .data_bits(data_bits)
            .timeout(Duration::from_millis(10))
            .parity(parity)
            .flow_control(SerialFlowControl::None);

        log::info!("{:?}", &builder);
        builder
            .open()
            .with_context(|| format!("Failed to open port: {}", port))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_match_library() {
        let cli = CommandBuilder::new()
            .build()
            .try_get_matches_from(["fix-monitor", "--port", "/dev/ttyUSB0"])
            .unwrap();
        assert_eq!(Command::monitor_config(&cli), MonitorConfig::default());
        assert!(!Command::json_output(&cli));
    }

    #[test]
    fn replay_with_custom_cadence() {
        let cli = CommandBuilder::new()
            .build()
            .try_get_matches_from([
                "fix-monitor",
                "--replay",
                "capture.nmea",
                "--render-ms",
                "250",
                "--fix-threshold",
                "5",
                "--json",
            ])
            .unwrap();
        let config = Command::monitor_config(&cli);
        assert_eq!(config.render_interval, Duration::from_millis(250));
        assert_eq!(config.fix_threshold, 5);
        assert!(Command::json_output(&cli));
    }

    #[test]
    fn port_and_replay_conflict() {
        let res = CommandBuilder::new().build().try_get_matches_from([
            "fix-monitor",
            "--port",
            "/dev/ttyUSB0",
            "--replay",
            "capture.nmea",
        ]);
        assert!(res.is_err());
    }
}
