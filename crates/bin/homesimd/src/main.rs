//! # homesimd: home simulator daemon
//!
//! Composition root that wires the virtual devices into a home and drives it.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Install the tracing subscriber
//! - Construct the device factory, the tokio scheduler and the home service
//! - Create the start-up devices listed in the configuration
//! - Tick the simulation periodically while reading console commands from
//!   stdin, until `quit`, end of input or Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;
mod console;

use std::sync::Arc;

use anyhow::Context;
use homesim_adapter_virtual::VirtualDeviceFactory;
use homesim_app::scheduler::TokioScheduler;
use homesim_app::services::HomeService;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::console::{Console, Reply, StdoutObserver};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .with_writer(std::io::stderr)
        .init();

    let factory = VirtualDeviceFactory::new(config.device_defaults());
    let home = HomeService::new(factory, TokioScheduler::new());
    let console = Console::new(home.clone(), Arc::new(StdoutObserver));

    for entry in &config.home.devices {
        match console.add(&entry.kind, &entry.name) {
            Ok(device) => tracing::info!(name = %device.name, kind = %device.kind, "start-up device created"),
            Err(error) => tracing::warn!(name = %entry.name, %error, "start-up device skipped"),
        }
    }

    let mut ticker = tokio::time::interval(config.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    tracing::info!(
        tick_ms = config.simulation.tick_interval_ms,
        "homesimd ready, type 'help' for commands"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => home.tick(),
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                match console.execute(&line) {
                    Reply::Output(text) if text.is_empty() => {}
                    Reply::Output(text) => println!("{text}"),
                    Reply::Quit => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    tracing::info!("homesimd stopped");
    Ok(())
}
