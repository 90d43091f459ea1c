use clap::Parser;
use tokio::io::BufReader;
use tokio_serial::SerialPortBuilderExt;
use tracing_subscriber::FmtSubscriber;

use tracing_log::LogTracer;

use splant_monitor::{Monitor, MonitorResult};

#[derive(Parser)]
#[command(name = "splant-monitor")]
#[command(about = "Validate and log the smart plant's JSON reading stream")]
struct Cli {
    /// Serial device the plant is attached to, stdin when omitted
    #[arg(short, long)]
    port: Option<String>,

    #[arg(short, long, default_value_t = 115200)]
    baud: u32,

    /// Debug level logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> MonitorResult<()> {
    let cli = Cli::parse();

    LogTracer::init().expect("Unable to set up log tracer");

    let sub = FmtSubscriber::builder()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();

    tracing::subscriber::set_global_default(sub).expect("Unable to set up tracing subscriber");

    let mut monitor = Monitor::new();
    let stats = match cli.port {
        Some(port) => {
            let serial = tokio_serial::new(&port, cli.baud).open_native_async()?;
            log::info!("Connected to {port} at {} baud", cli.baud);
            monitor
                .run(BufReader::new(serial), tokio::signal::ctrl_c())
                .await?
        }
        None => {
            log::info!("Reading from stdin");
            monitor
                .run(BufReader::new(tokio::io::stdin()), tokio::signal::ctrl_c())
                .await?
        }
    };

    log::info!(
        "Logged {} readings, skipped {} invalid, ignored {} other lines",
        stats.logged,
        stats.skipped,
        stats.ignored
    );
    if let Some(at) = monitor.snapshot().last_seen {
        log::info!("Last reading at {}", at.to_rfc3339());
    }

    Ok(())
}
