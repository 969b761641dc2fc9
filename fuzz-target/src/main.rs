#[macro_use]
extern crate afl;
extern crate nmea_fix;

use nmea_fix::{FixMonitor, FixState, FixedLinearBuffer, Heartbeat, MonitorConfig, Snapshot, Tick};

const GGA: &[u8] = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";

fn feed(bufsize: usize, chunksize: usize, data: &[u8]) {
    let mut buf = vec![0; bufsize];
    let buf = FixedLinearBuffer::new(&mut buf[..]);
    let mut monitor = FixMonitor::new(buf, MonitorConfig::default(), Tick::ZERO);
    let mut now = Tick::ZERO;
    for chunk in data.chunks(chunksize) {
        now = Tick::from_millis(now.as_millis() + 250);
        monitor.feed(chunk, now);
        monitor.tick(now, &mut |_: &Snapshot| {}, &mut |_: Heartbeat| {});
        // Whatever came in, lat and lon are either both known or both unknown
        let state = monitor.state();
        assert_eq!(state.latitude().is_some(), state.longitude().is_some());
    }

    // Terminate whatever partial line the data left behind, then a good sentence must
    // always get through
    monitor.feed(b"\n", now);
    let date = monitor.state().date();
    monitor.feed(GGA, now);
    let state: &FixState = monitor.state();
    assert_eq!(state.satellite_count(), 8);
    assert_eq!(state.date(), date);
    assert_eq!(state.last_update_tick(), Some(now));
}

fn main() {
    fuzz!(|data: &[u8]| {
        if data.len() > 2 {
            let bufsize = 96 + data[0] as usize;
            let chunksize = data[1] as usize;
            if chunksize != 0 {
                feed(bufsize, chunksize, &data[2..]);
            }
        }
    });
}
