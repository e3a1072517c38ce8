use std::path::PathBuf;

use clap::Parser;
use colony_sim::{
    actor::dispatcher::Dispatcher,
    api::console,
    config::SimConfig,
    instrumentation::{LogFormat, init_tracing_subscriber},
};

/// Headless colony simulation. Reads JSON requests on stdin and answers on
/// stdout while the clock runs.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON scenario file; built-in colony when omitted.
    #[arg(long, env = "COLONY_CONFIG")]
    config: Option<PathBuf>,

    /// Milliseconds between ticks, overriding the scenario.
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Only tick on explicit `tick` requests.
    #[arg(long)]
    manual: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing_subscriber(args.log_format)?;
    tracing::info!("Starting the colony...");

    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(ms) = args.tick_ms {
        config.tick_interval_ms = ms;
    }

    let engine = config.build_engine()?;
    let interval = (!args.manual).then(|| tokio::time::Duration::from_millis(config.tick_interval_ms));
    let mut dispatcher = Dispatcher::start(engine, interval);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    tokio::select! {
        res = console::serve(stdin, stdout, dispatcher.handle()) => {
            if let Err(e) = res {
                tracing::error!("Console failed: {}", e);
            }
            if interval.is_some() {
                tracing::info!("Console closed, running until Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C, stopping simulation...");
        }
    }

    dispatcher.stop().await;
    tracing::info!("Colony stopped.");
    Ok(())
}
