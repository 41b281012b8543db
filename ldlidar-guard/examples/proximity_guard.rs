use anyhow::Context;
use clap::Parser;
use ldlidar_guard::{run_guard, GuardConfig, LogActuator};
use std::io::BufRead;
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Warns when an object comes too close to the LiDAR.")]
struct Args {
    /// The device path to a serial port
    #[arg(long)]
    port: Option<String>,
    /// Load port settings and zones from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Drop frames whose CRC does not match
    #[arg(long, default_value_t = false)]
    verify_checksum: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GuardConfig::load(path)
            .with_context(|| format!("loading guard config {}", path.display()))?,
        None => GuardConfig::default(),
    };
    if let Some(port) = args.port {
        config.port = port;
    }
    config.verify_checksum |= args.verify_checksum;

    let zones = config.build_zones()?;
    let (guard, snapshots) = run_guard(&config, LogActuator::new(&zones))
        .with_context(|| format!("starting guard on {}", config.port))?;

    // Snapshots are only drained so the guard never sees a full queue for long.
    std::thread::spawn(move || snapshots.iter().for_each(drop));

    println!("Guarding {} zones on {}. Press Enter to stop.", zones.len(), config.port);
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;

    guard.join().context("guard stopped with an error")?;
    Ok(())
}
