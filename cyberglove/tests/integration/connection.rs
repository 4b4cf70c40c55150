//! Listening, handshake and cancellation

use crate::{GloveSim, SimBehavior};
use cyberglove::config::LinkConfig;
use cyberglove::link::{DeviceLink, GloveListener, LinkState};
use cyberglove::Error;
use std::net::{Ipv4Addr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const POLL: Duration = Duration::from_millis(10);

fn listener() -> (GloveListener, u16) {
    let listener = GloveListener::bind(Ipv4Addr::LOCALHOST, 0, POLL).unwrap();
    let port = listener.local_port().unwrap();
    (listener, port)
}

#[test]
fn glove_connects_with_handshake() {
    let (listener, port) = listener();
    let sim = GloveSim::dial(port, SimBehavior::default());

    let link = DeviceLink::new(LinkConfig::default());
    let cancel = AtomicBool::new(false);
    link.accept_from(listener, &cancel).unwrap();
    assert_eq!(link.state(), LinkState::Connected);

    link.disconnect();
    assert_eq!(link.state(), LinkState::Disconnected);
    assert!(sim.join().is_empty());
}

#[test]
fn wrong_handshake_is_rejected() {
    let (listener, port) = listener();
    let sim = GloveSim::dial(
        port,
        SimBehavior {
            handshake: b"x".to_vec(),
            ..Default::default()
        },
    );

    let link = DeviceLink::new(LinkConfig::default());
    let cancel = AtomicBool::new(false);
    match link.accept_from(listener, &cancel) {
        Err(Error::HandshakeFailed { received }) => assert_eq!(received, b"x"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(link.state(), LinkState::Disconnected);

    // Harmless without a connection
    link.disconnect();
    sim.join();
}

#[test]
fn silent_close_is_rejected() {
    let (listener, port) = listener();
    let sim = GloveSim::dial(
        port,
        SimBehavior {
            handshake: Vec::new(),
            ..Default::default()
        },
    );

    let link = DeviceLink::new(LinkConfig::default());
    let cancel = AtomicBool::new(false);
    assert!(matches!(
        link.accept_from(listener, &cancel),
        Err(Error::HandshakeFailed { received }) if received.is_empty()
    ));
    sim.join();
}

#[test]
fn cancelled_before_accept() {
    let (listener, port) = listener();
    let link = DeviceLink::new(LinkConfig::default());
    let cancel = AtomicBool::new(true);

    let started = Instant::now();
    assert!(matches!(
        link.accept_from(listener, &cancel),
        Err(Error::Cancelled)
    ));
    assert!(started.elapsed() < Duration::from_millis(200));
    assert_eq!(link.state(), LinkState::Disconnected);

    // The listening socket was released
    GloveListener::bind(Ipv4Addr::LOCALHOST, port, POLL).unwrap();
}

#[test]
fn cancelled_while_waiting() {
    let (listener, _port) = listener();
    let link = DeviceLink::new(LinkConfig::default());
    let cancel = Arc::new(AtomicBool::new(false));

    let waiter = {
        let link = link.clone();
        let cancel = Arc::clone(&cancel);
        thread::spawn(move || link.accept_from(listener, &cancel))
    };

    thread::sleep(Duration::from_millis(50));
    assert_eq!(link.state(), LinkState::Listening);

    let cancelled_at = Instant::now();
    cancel.store(true, Ordering::Relaxed);
    let result = waiter.join().unwrap();

    assert!(matches!(result, Err(Error::Cancelled)));
    assert!(cancelled_at.elapsed() < Duration::from_millis(500));
    assert_eq!(link.state(), LinkState::Disconnected);
}

#[test]
fn foreign_address_opens_no_socket() {
    // Reserve a concrete port, then point the link at it
    let port = {
        let (listener, port) = listener();
        drop(listener);
        port
    };
    let link = DeviceLink::new(LinkConfig {
        port,
        ..Default::default()
    });
    let cancel = AtomicBool::new(false);

    assert!(matches!(
        link.connect("203.0.113.77", &cancel),
        Err(Error::AddressNotLocal(_))
    ));
    assert!(matches!(
        link.connect("not-an-address", &cancel),
        Err(Error::InvalidAddress(_))
    ));
    assert_eq!(link.state(), LinkState::Disconnected);

    // Nothing is listening and the port is still free
    assert!(TcpStream::connect(("127.0.0.1", port)).is_err());
    GloveListener::bind(Ipv4Addr::LOCALHOST, port, POLL).unwrap();
}
