//! Live joint monitor
//!
//! Waits for the glove, streams datasets through a channel for 10 seconds and
//! prints the sample rate and the range seen on each of the 22 sensors. Handy
//! for checking that every sensor moves before a recording session.
//!
//! Usage:
//! ```bash
//! RUST_LOG=info cargo run --example finger_monitor -- 192.168.1.2
//! ```

use cyberglove::config::LinkConfig;
use cyberglove::link::DeviceLink;
use cyberglove::protocol::constants::DATASET_VALUES;
use cyberglove::protocol::Dataset;
use cyberglove::sampling::SamplingSession;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let address = std::env::args()
        .nth(1)
        .unwrap_or_else(|| LinkConfig::default().local_address);

    let link = DeviceLink::new(LinkConfig::default());
    println!("Waiting for glove on {}...", address);
    link.connect(&address, &AtomicBool::new(false))?;
    println!("Status: {}", link.status()?);

    let (tx, rx) = crossbeam_channel::unbounded::<Dataset>();
    let mut session = SamplingSession::new(link.clone());
    let handle = session.start(tx)?;

    let mut min = [u8::MAX; DATASET_VALUES];
    let mut max = [u8::MIN; DATASET_VALUES];
    let started = Instant::now();
    while started.elapsed() < Duration::from_secs(10) {
        let Ok(dataset) = rx.recv_timeout(Duration::from_millis(500)) else {
            if handle.is_finished() {
                break;
            }
            continue;
        };
        for (i, value) in dataset.iter().enumerate() {
            min[i] = min[i].min(value);
            max[i] = max[i].max(value);
        }
    }

    let report = session.stop(handle)?;
    let elapsed = started.elapsed().as_secs_f32();
    println!(
        "{} datasets in {:.1}s ({:.0} Hz)",
        report.datasets,
        elapsed,
        report.datasets as f32 / elapsed
    );
    for i in 0..DATASET_VALUES {
        println!("sensor {:2}: {:3} - {:3}", i, min[i], max[i]);
    }

    link.disconnect();
    Ok(())
}
