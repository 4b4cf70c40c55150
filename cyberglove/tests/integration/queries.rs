//! Query commands against the simulated glove

use crate::{GloveSim, SimBehavior};
use cyberglove::config::LinkConfig;
use cyberglove::link::{DeviceLink, GloveListener, GloveStatus, GloveVersion};
use cyberglove::protocol::Command;
use std::net::Ipv4Addr;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

fn connected_link(behavior: SimBehavior) -> (DeviceLink, GloveSim) {
    let listener =
        GloveListener::bind(Ipv4Addr::LOCALHOST, 0, Duration::from_millis(10)).unwrap();
    let sim = GloveSim::dial(listener.local_port().unwrap(), behavior);
    let link = DeviceLink::new(LinkConfig::default());
    link.accept_from(listener, &AtomicBool::new(false)).unwrap();
    (link, sim)
}

#[test]
fn identity_queries() {
    let (link, sim) = connected_link(SimBehavior::default());

    assert_eq!(link.information().unwrap(), "CyberGlove III simulator");
    assert_eq!(link.sensor_count().unwrap(), 22);
    assert_eq!(link.status().unwrap(), GloveStatus::PluggedInitialized);
    assert!(link.is_right_handed().unwrap());
    assert_eq!(
        link.version().unwrap(),
        GloveVersion {
            firmware: 1,
            format: 2
        }
    );

    link.disconnect();
    let received = sim.join();
    assert_eq!(
        received,
        vec![
            b"?i".to_vec(),
            b"?S".to_vec(),
            b"?G".to_vec(),
            b"?R".to_vec(),
            b"?V".to_vec()
        ]
    );
}

#[test]
fn raw_exchange_returns_full_reply() {
    let (link, sim) = connected_link(SimBehavior::default());

    let command = Command::parse("?x").unwrap();
    assert_eq!(link.exchange(&command).unwrap(), b"?x\x00");
    assert_eq!(link.query(&Command::SENSOR_COUNT).unwrap(), vec![22]);

    link.disconnect();
    sim.join();
}
