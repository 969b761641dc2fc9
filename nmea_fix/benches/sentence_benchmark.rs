use criterion::{criterion_group, criterion_main, Criterion};
use nmea_fix::*;
use std::hint::black_box;

const CAPTURE: &[&str] = &[
    "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A",
    "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47",
    "$GPGSA,A,3,04,05,,09,12,,,24,,,,,2.5,1.3,2.1*39",
    "$GNGLL,4916.45,N,12311.12,W,225444,A,*1D",
    "$GPVTG,054.7,T,034.4,M,005.5,N,010.2,K*48",
    "$GPRMC,123520,V,,,,,,,230394,,*6A",
];

fn capture(repeat: usize) -> Vec<u8> {
    let mut data = Vec::new();
    for _ in 0..repeat {
        for line in CAPTURE {
            data.extend_from_slice(line.as_bytes());
            data.extend_from_slice(b"\r\n");
        }
    }
    data
}

fn parse_all<T: UnderlyingBuffer>(mut parser: Parser<T>, data: &[u8], chunk_size: usize) -> usize {
    let mut count = 0;
    for chunk in data.chunks(chunk_size) {
        let mut it = parser.consume(chunk);
        loop {
            match it.next() {
                Some(Ok(sentence)) => {
                    if classify(&sentence).is_ok() {
                        count += 1;
                    }
                },
                Some(Err(_)) => {
                    // Unknown sentence kinds are part of the capture
                },
                None => {
                    // We've eaten all the lines we have
                    break;
                },
            }
        }
    }
    count
}

fn monitor_all<T: UnderlyingBuffer>(mut monitor: FixMonitor<T>, data: &[u8], chunk_size: usize) -> u64 {
    let mut now = Tick::ZERO;
    for chunk in data.chunks(chunk_size) {
        now = Tick::from_millis(now.as_millis() + 10);
        monitor.feed(chunk, now);
        monitor.tick(now, &mut |_: &Snapshot| {}, &mut |_: Heartbeat| {});
    }
    monitor.diagnostics().updates_applied
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let data = capture(500);
    for chunk in &[1, 16, 64, 256, 1024] {
        c.bench_function(&format!("vec_parse_capture_{}", chunk), |b| {
            b.iter(|| {
                let parser = Parser::default();
                assert_eq!(parse_all(parser, black_box(&data), *chunk), 2000);
            })
        });
    }
    for (buf_size, chunk) in &[(96, 64), (128, 64), (128, 256), (128, 1024)] {
        let mut underlying = vec![0; *buf_size];
        c.bench_function(&format!("array_monitor_capture_{}_{}", buf_size, chunk), |b| {
            b.iter(|| {
                let underlying = FixedLinearBuffer::new(&mut underlying);
                let monitor = FixMonitor::new(underlying, MonitorConfig::default(), Tick::ZERO);
                assert_eq!(monitor_all(monitor, black_box(&data), *chunk), 1500);
            })
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
