use anyhow::{Context, Result};
use clap::Parser;
use procpulse::launcher;
use procpulse::logger::SampleLog;
use procpulse::monitor::{self, StopReason};
use procpulse::probe::LinuxProbe;
use procpulse::settings::Settings;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Launch an executable and log its resource usage until it exits.
#[derive(Parser)]
#[command(name = "procpulse", version, about)]
struct Args {
    /// Path of the executable to launch and monitor
    executable: PathBuf,

    /// Sampling interval in seconds (clamped to 30)
    #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    interval: u64,

    /// CSV file receiving one row per sample
    #[arg(short, long)]
    output: PathBuf,

    /// Field separator for the CSV output
    #[arg(short, long, default_value_t = ',')]
    separator: char,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let settings = Settings::new(args.executable, args.interval, args.output, args.separator)
        .context("invalid arguments")?;

    let probe = LinuxProbe::new();

    let swept = launcher::sweep_existing(&probe, &settings.target_name);
    if swept > 0 {
        info!(count = swept, "cleared pre-existing instances before launch");
    }

    let mut log = SampleLog::create(&settings.output, settings.delimiter)
        .with_context(|| format!("failed to initialize {}", settings.output.display()))?;

    let mut child = launcher::launch(&settings.executable)?;
    let pid = child.id();
    info!(
        pid,
        name = %settings.target_name,
        interval_secs = settings.interval.as_secs(),
        output = %settings.output.display(),
        "monitoring started"
    );

    let summary = monitor::run(&probe, pid, &settings.target_name, settings.interval, &mut log);

    match summary.reason {
        StopReason::TargetExited => {
            let status = child.wait().context("failed to reap target")?;
            info!(
                %status,
                samples_written = summary.samples_written,
                samples_skipped = summary.samples_skipped,
                "monitoring finished"
            );
        }
        StopReason::SinkLost => {
            warn!(
                samples_written = summary.samples_written,
                samples_skipped = summary.samples_skipped,
                "monitoring aborted, target left running"
            );
        }
    }
    Ok(())
}
