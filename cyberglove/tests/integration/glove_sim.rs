//! Glove simulator
//!
//! Plays the glove's side of the protocol on a real TCP connection.

use cyberglove::protocol::codec::{dataset_frame, echo_reply};
use cyberglove::protocol::{Command, Dataset};
use std::io::{Read, Write};
use std::net::TcpStream;
use std::thread::{self, JoinHandle};

/// How the simulated glove behaves
#[derive(Clone)]
pub struct SimBehavior {
    /// First message sent after connecting (empty: close without a word)
    pub handshake: Vec<u8>,
    /// Dataset returned for every `G`
    pub dataset: Dataset,
    /// Number of `G` requests answered with a broken frame first
    pub corrupt_datasets: usize,
    /// Number of `G` requests answered with a truncated 20-byte frame first
    pub short_datasets: usize,
}

impl Default for SimBehavior {
    fn default() -> Self {
        Self {
            handshake: b"o".to_vec(),
            dataset: Dataset::new(std::array::from_fn(|i| 10 + i as u8)),
            corrupt_datasets: 0,
            short_datasets: 0,
        }
    }
}

/// Running simulator thread
pub struct GloveSim {
    thread: JoinHandle<Vec<Vec<u8>>>,
}

impl GloveSim {
    /// Connect to the host on `port` and serve until the host closes
    pub fn dial(port: u16, behavior: SimBehavior) -> Self {
        let stream = TcpStream::connect(("127.0.0.1", port)).expect("glove sim connect");
        let thread = thread::Builder::new()
            .name("glove-sim".to_string())
            .spawn(move || serve(stream, behavior))
            .expect("spawn glove sim");
        Self { thread }
    }

    /// Wait for the host to close and return every command received
    pub fn join(self) -> Vec<Vec<u8>> {
        self.thread.join().expect("glove sim panicked")
    }
}

struct Faults {
    corrupt_left: usize,
    short_left: usize,
}

fn reply_for(request: &[u8], behavior: &SimBehavior, faults: &mut Faults) -> Vec<u8> {
    match request {
        b"G" => {
            let mut frame = dataset_frame(&behavior.dataset).to_vec();
            if faults.short_left > 0 {
                faults.short_left -= 1;
                frame.truncate(20);
            } else if faults.corrupt_left > 0 {
                faults.corrupt_left -= 1;
                frame[0] = b'?';
            }
            frame
        }
        b"?i" => echo_reply(&Command::INFORMATION, b"CyberGlove III simulator"),
        b"?S" => echo_reply(&Command::SENSOR_COUNT, &[22]),
        b"?G" => echo_reply(&Command::STATUS, &[3]),
        b"?R" => echo_reply(&Command::RIGHT_HANDED, &[1]),
        b"?V" => echo_reply(&Command::VERSION, &[0, 1, 0, 2]),
        other => {
            let mut reply = other.to_vec();
            reply.push(0);
            reply
        }
    }
}

fn serve(mut stream: TcpStream, behavior: SimBehavior) -> Vec<Vec<u8>> {
    let mut received = Vec::new();
    if behavior.handshake.is_empty() || stream.write_all(&behavior.handshake).is_err() {
        return received;
    }

    let mut faults = Faults {
        corrupt_left: behavior.corrupt_datasets,
        short_left: behavior.short_datasets,
    };
    let mut buffer = [0u8; 16];
    loop {
        let n = match stream.read(&mut buffer) {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        let request = buffer[..n].to_vec();
        let reply = reply_for(&request, &behavior, &mut faults);
        received.push(request);
        if stream.write_all(&reply).is_err() {
            break;
        }
    }
    received
}
