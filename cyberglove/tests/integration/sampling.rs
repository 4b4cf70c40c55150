//! Datasets and continuous sampling over TCP

use crate::{GloveSim, SimBehavior};
use cyberglove::config::LinkConfig;
use cyberglove::link::{DeviceLink, GloveListener};
use cyberglove::sampling::{SamplingSession, TextFileSink};
use cyberglove::Error;
use std::fs;
use std::net::Ipv4Addr;
use std::sync::atomic::AtomicBool;
use std::thread;
use std::time::Duration;

fn connected_link(config: LinkConfig, behavior: SimBehavior) -> (DeviceLink, GloveSim) {
    let listener =
        GloveListener::bind(Ipv4Addr::LOCALHOST, 0, Duration::from_millis(10)).unwrap();
    let sim = GloveSim::dial(listener.local_port().unwrap(), behavior);
    let link = DeviceLink::new(config);
    link.accept_from(listener, &AtomicBool::new(false)).unwrap();
    (link, sim)
}

#[test]
fn single_dataset() {
    let behavior = SimBehavior::default();
    let expected = behavior.dataset;
    let (link, sim) = connected_link(LinkConfig::default(), behavior);

    assert_eq!(link.request_dataset().unwrap(), expected);
    assert_eq!(link.request_datasets(3).unwrap(), vec![expected; 3]);

    link.disconnect();
    assert_eq!(sim.join().len(), 4);
}

#[test]
fn corrupted_frame_is_retransmitted() {
    let behavior = SimBehavior {
        corrupt_datasets: 1,
        ..Default::default()
    };
    let expected = behavior.dataset;
    let (link, sim) = connected_link(LinkConfig::default(), behavior);

    assert_eq!(link.request_dataset().unwrap(), expected);

    link.disconnect();
    let received = sim.join();
    assert_eq!(received, vec![b"G".to_vec(), b"G".to_vec()]);
}

#[test]
fn truncated_frame_is_retransmitted() {
    let behavior = SimBehavior {
        short_datasets: 1,
        ..Default::default()
    };
    let expected = behavior.dataset;
    let (link, sim) = connected_link(LinkConfig::default(), behavior);

    let (tx, rx) = crossbeam_channel::bounded(1);
    let worker = {
        let link = link.clone();
        thread::spawn(move || {
            let _ = tx.send(link.request_dataset());
        })
    };

    let result = rx
        .recv_timeout(Duration::from_secs(3))
        .expect("request_dataset blocked on a truncated frame");
    assert_eq!(result.unwrap(), expected);
    worker.join().unwrap();

    link.disconnect();
    assert_eq!(sim.join(), vec![b"G".to_vec(), b"G".to_vec()]);
}

#[test]
fn persistent_corruption_gives_up() {
    let config = LinkConfig {
        max_resync_attempts: 2,
        ..Default::default()
    };
    let behavior = SimBehavior {
        corrupt_datasets: usize::MAX,
        ..Default::default()
    };
    let (link, sim) = connected_link(config, behavior);

    assert!(matches!(
        link.request_dataset(),
        Err(Error::ResyncFailed { attempts: 2 })
    ));
    assert!(link.is_connected());

    link.disconnect();
    assert_eq!(sim.join().len(), 3);
}

#[test]
fn disconnect_through_clone() {
    let (link, sim) = connected_link(LinkConfig::default(), SimBehavior::default());
    let other = link.clone();

    other.disconnect();
    sim.join();
    assert!(matches!(link.request_dataset(), Err(Error::Disconnected)));
}

#[test]
fn recording_to_file() {
    let behavior = SimBehavior::default();
    let expected = behavior.dataset.to_string();
    let (link, sim) = connected_link(LinkConfig::default(), behavior);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output.txt");

    let mut session = SamplingSession::new(link.clone());
    let handle = session.start(TextFileSink::create(&path).unwrap()).unwrap();
    thread::sleep(Duration::from_millis(50));
    let report = session.stop(handle).unwrap();

    link.disconnect();
    sim.join();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count() as u64, report.datasets);
    assert!(contents.lines().all(|line| line == expected));
}
