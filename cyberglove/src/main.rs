//! CyberGlove - command-line host for the CyberGlove III
//!
//! Listens for the glove on the configured address, verifies the handshake
//! and runs one of the subcommands:
//!
//! - `info`: print the glove's identity and status
//! - `sample --count N`: request N datasets and print them
//! - `record [--output FILE]`: record datasets between two Enter presses
//! - `raw <CMD>`: send any 1-2 character command and dump the reply
//!
//! Ctrl-C aborts the wait for the glove and ends a recording.

use clap::{Parser, Subcommand};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use cyberglove::config::GloveConfig;
use cyberglove::error::{Error, Result};
use cyberglove::link::DeviceLink;
use cyberglove::protocol::Command;
use cyberglove::sampling::{SamplingSession, TextFileSink};
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "cyberglove")]
#[command(about = "Host-side driver for the CyberGlove III data glove")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Static IPv4 address of this host (overrides the configuration)
    #[arg(short, long)]
    address: Option<String>,

    /// TCP port the glove connects to (overrides the configuration)
    #[arg(short, long)]
    port: Option<u16>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Print information, sensor count, status, handedness and version
    Info,

    /// Request datasets and print them
    Sample {
        /// Number of datasets
        #[arg(short, long, default_value = "1")]
        count: usize,
    },

    /// Record datasets to a text file, started and stopped with Enter
    Record {
        /// Recording file (defaults to the configured output)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Send a raw command and print the reply bytes
    Raw {
        /// One or two ASCII characters, e.g. `?S`
        command: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GloveConfig::from_file(path)?,
        None => GloveConfig::default(),
    };
    if let Some(address) = &args.address {
        config.link.local_address = address.clone();
    }
    if let Some(port) = args.port {
        config.link.port = port;
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("CyberGlove v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &args.config {
        log::info!("Using config: {}", path);
    }

    let cancel = Arc::new(AtomicBool::new(false));
    let c = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        c.store(true, Ordering::Relaxed);
    })
    .map_err(|e| io::Error::other(format!("Error setting Ctrl-C handler: {}", e)))?;

    let link = DeviceLink::new(config.link.clone());
    log::info!(
        "Waiting for glove on {}:{} (Ctrl-C to abort)",
        config.link.local_address,
        config.link.port
    );
    link.connect(&config.link.local_address, &cancel)?;

    let result = match args.action {
        Action::Info => print_info(&link),
        Action::Sample { count } => sample(&link, count),
        Action::Record { output } => {
            let output = output.unwrap_or_else(|| config.sampling.output.clone());
            record(&link, &output, &cancel)
        }
        Action::Raw { command } => raw(&link, &command),
    };

    if link.is_connected() {
        link.disconnect();
    }
    log::info!("CyberGlove stopped");
    result
}

fn print_info(link: &DeviceLink) -> Result<()> {
    println!("Information:  {}", link.information()?.trim_end());
    println!("Sensors:      {}", link.sensor_count()?);
    println!("Status:       {}", link.status()?);
    let hand = if link.is_right_handed()? { "right" } else { "left" };
    println!("Hand:         {}", hand);
    println!("Version:      {}", link.version()?);
    Ok(())
}

fn sample(link: &DeviceLink, count: usize) -> Result<()> {
    for dataset in link.request_datasets(count)? {
        println!("{}", dataset);
    }
    Ok(())
}

fn raw(link: &DeviceLink, command: &str) -> Result<()> {
    let command = Command::parse(command)?;
    let reply = link.exchange(&command)?;
    println!("{} bytes: {:02X?}", reply.len(), reply);
    println!("text: {:?}", String::from_utf8_lossy(&reply));
    Ok(())
}

/// Forward each line typed on stdin
fn stdin_lines() -> Result<Receiver<()>> {
    let (tx, rx) = crossbeam_channel::bounded(1);
    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            let mut line = String::new();
            while stdin.lock().read_line(&mut line).is_ok_and(|n| n > 0) {
                line.clear();
                if tx.send(()).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

/// Block until Enter is pressed; false if cancelled or stdin closed
fn wait_for_enter(enter: &Receiver<()>, cancel: &AtomicBool) -> bool {
    loop {
        if cancel.load(Ordering::Relaxed) {
            return false;
        }
        match enter.recv_timeout(Duration::from_millis(100)) {
            Ok(()) => return true,
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return false,
        }
    }
}

fn record(link: &DeviceLink, output: &str, cancel: &AtomicBool) -> Result<()> {
    let enter = stdin_lines()?;

    print!("Press Enter to start recording to {} ", output);
    io::stdout().flush()?;
    if !wait_for_enter(&enter, cancel) {
        log::info!("Recording aborted before start");
        return Err(Error::Cancelled);
    }

    let mut session = SamplingSession::new(link.clone());
    let handle = session.start(TextFileSink::create(output)?)?;
    print!("Recording... press Enter to stop ");
    io::stdout().flush()?;

    loop {
        if handle.is_finished() || cancel.load(Ordering::Relaxed) {
            break;
        }
        match enter.recv_timeout(Duration::from_millis(100)) {
            Ok(()) => break,
            Err(RecvTimeoutError::Timeout) => {}
            // stdin closed: keep recording until Ctrl-C
            Err(RecvTimeoutError::Disconnected) => thread::sleep(Duration::from_millis(100)),
        }
    }

    let report = session.stop(handle)?;
    println!("Recorded {} datasets to {}", report.datasets, output);
    Ok(())
}
