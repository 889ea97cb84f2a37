//! Zentrax terminal dashboard.
//!
//! Connects to the assistant backend, prints every state change as it arrives
//! and reads controls from stdin:
//!   zentrax --url ws://localhost:8765
//!   RUST_LOG=zentrax=debug zentrax --config zentrax.toml

mod config;
mod input;
mod view;

use clap::Parser;
use config::Config;
use input::{HELP, Input};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval};
use tracing_subscriber::EnvFilter;
use view::View;
use zentrax_client::{Event, Runtime};

#[derive(Debug, Parser)]
#[command(name = "zentrax", version, about = "Terminal dashboard for the Zentrax assistant")]
struct Args {
    /// Path to a zentrax.toml config file.
    #[arg(short, long, env = "ZENTRAX_CONFIG")]
    config: Option<PathBuf>,

    /// Backend WebSocket URL (overrides the config file).
    #[arg(long, env = "ZENTRAX_URL")]
    url: Option<String>,

    /// Reconnect attempts before giving up (overrides the config file).
    #[arg(long)]
    max_attempts: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("zentrax=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(url) = args.url {
        config.backend.url = url;
    }
    if let Some(max_attempts) = args.max_attempts {
        config.reconnect.max_attempts = max_attempts;
    }
    config.validate()?;

    tracing::info!("Starting Zentrax dashboard for {}", config.backend.url);

    let runtime = Runtime::new(config.client());
    let events = runtime.sender();
    let (render_tx, mut renders) = mpsc::unbounded_channel();
    let session = tokio::spawn(runtime.run(render_tx));

    let mut view = View::new(config.history.capacity);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut status = config
        .status_interval()
        .map(|period| tokio::time::interval_at(Instant::now() + period, period));

    println!("{HELP}");

    loop {
        tokio::select! {
            render = renders.recv() => {
                let Some(render) = render else { break };
                println!("{}", view.apply(render));
            }

            line = lines.next_line() => {
                let Some(line) = line? else {
                    events.send(Event::Shutdown)?;
                    break;
                };
                match input::parse(&line) {
                    Ok(None) => {}
                    Ok(Some(Input::Event(event))) => events.send(event)?,
                    Ok(Some(Input::History)) => {
                        for line in view.history_lines() {
                            println!("  {line}");
                        }
                    }
                    Ok(Some(Input::Help)) => println!("{HELP}"),
                    Ok(Some(Input::Quit)) => {
                        events.send(Event::Shutdown)?;
                        break;
                    }
                    Err(e) => println!("{e}"),
                }
            }

            _ = tick(&mut status) => println!("[status] {}", view.status_line()),

            _ = tokio::signal::ctrl_c() => {
                events.send(Event::Shutdown)?;
                break;
            }
        }
    }

    session.await?;
    while let Ok(render) = renders.try_recv() {
        println!("{}", view.apply(render));
    }
    Ok(())
}

async fn tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
