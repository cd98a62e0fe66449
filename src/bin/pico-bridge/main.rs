mod args;

use std::{process::ExitCode, time::Duration};

use anyhow::{Context as _, Result, anyhow};
use args::{Args, BackendConfig};
use colored::Colorize as _;
use log::{error, info};
use safety_bridge::{
    bridge::{Bridge, Stop},
    db::PgSink,
    report::ConsoleReporter,
    rest::RestSink,
    serial::{self, LineReader},
    sink::Backend,
};
use tokio::{signal, sync::mpsc};

const LINE_BUFFER: usize = 64;

#[tokio::main]
async fn main() -> ExitCode {
    pretty_env_logger::init_timed();

    if let Err(e) = run().await {
        eprintln!("{} {e:#}", "✗".red());
        return ExitCode::from(1);
    }

    ExitCode::from(0)
}

async fn run() -> Result<()> {
    let Some(args) = Args::from_cli_args(std::env::args_os())? else {
        return Ok(());
    };

    if args.list_ports {
        print_ports()?;
        return Ok(());
    }

    let backend = args.backend().context("invalid configuration")?;

    println!("{}", "=".repeat(50));
    println!("IoT Safety Monitor - Serial Bridge");
    println!("Sensors: Fire, Smoke, Motion");
    println!("{}", "=".repeat(50));

    let sink = connect(backend).await?;
    println!("{} {} sink ready (table: {})", "✓".green(), sink.name(), args.table);

    let port_name = match args.port.clone() {
        Some(port) => port,
        None => find_port()?,
    };

    println!("Connecting to {port_name} at {} baud...", args.baud_rate);
    let port = serial::open(&port_name, args.baud_rate)?;
    println!("{} Serial connection established", "✓".green());

    println!();
    println!("{}", "=".repeat(50));
    println!("Listening for sensor data... (Ctrl+C to stop)");
    println!(r#"Expected JSON format: {{"fire_val": 0, "smoke_val": 0, "motion_val": "NORMAL"}}"#);
    println!("{}", "=".repeat(50));
    println!();

    let (tx, mut rx) = mpsc::channel(LINE_BUFFER);
    let reader =
        tokio::task::spawn_blocking(move || serial::pump_lines(LineReader::new(port), tx));

    let mut bridge = Bridge::new(
        sink,
        ConsoleReporter,
        args.table.clone(),
        Duration::from_secs(args.insert_timeout_secs),
    );
    let stop = bridge.run(&mut rx, signal::ctrl_c()).await;

    // Dropping the receiver lets the reader thread exit at its next read timeout.
    drop(rx);

    println!();
    println!("Stopped. Total readings sent: {}", bridge.sent());
    if bridge.failed() > 0 {
        println!("Failed inserts: {}", bridge.failed());
    }

    let source = reader.await.context("serial reader task failed")?;
    println!("Serial connection closed.");

    match stop {
        Stop::Interrupted => {
            info!("interrupted by user");
            if let Err(err) = source {
                error!("serial reader stopped with error: {err}");
            }
            Ok(())
        }
        Stop::SourceClosed => {
            let err = match source {
                Err(err) => anyhow::Error::from(err),
                Ok(()) => anyhow!("serial reader stopped"),
            };
            Err(err.context("serial connection lost"))
        }
    }
}

async fn connect(backend: BackendConfig) -> Result<Backend> {
    match backend {
        BackendConfig::Postgres { database_url } => {
            println!("\nConnecting to database...");
            Ok(Backend::Postgres(PgSink::connect(&database_url).await?))
        }
        BackendConfig::Rest { url, api_key } => {
            println!("\nConnecting to {url}...");
            Ok(Backend::Rest(RestSink::new(&url, &api_key)?))
        }
    }
}

fn find_port() -> Result<String> {
    let ports = serial::available_ports()?;

    if let Some(port) = serial::select_port(&ports) {
        println!("Found monitor on {}", serial::describe_port(port));
        return Ok(port.port_name.clone());
    }

    eprintln!("Could not find the safety monitor. Available ports:");
    if ports.is_empty() {
        eprintln!("  (none)");
    }
    for port in &ports {
        eprintln!("  - {}", serial::describe_port(port));
    }

    Err(anyhow!("no serial device found; pass --port or set SERIAL_PORT"))
}

fn print_ports() -> Result<()> {
    let ports = serial::available_ports()?;

    println!("Available serial ports:");
    if ports.is_empty() {
        println!("  (none)");
    }
    for port in &ports {
        println!("  {}", serial::describe_port(port));
    }

    Ok(())
}
