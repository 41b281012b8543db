use anyhow::Context;
use clap::Parser;
use ldlidar_guard::{
    ActuatorDriver, GuardConfig, LidarError, NullObserver, Pipeline, ReplaySource, StopSignal,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Runs a raw LiDAR byte capture through the zone guard.")]
struct Args {
    /// File holding bytes recorded from the sensor
    capture: PathBuf,
    /// Load zones from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    verify_checksum: bool,
}

/// Prints every output change as a JSON line.
struct JsonActuator {
    names: Vec<String>,
}

impl ActuatorDriver for JsonActuator {
    fn set_zone_output(&mut self, zone: usize, active: bool) {
        let line = serde_json::json!({
            "zone": zone,
            "name": self.names.get(zone),
            "active": active,
        });
        println!("{}", line);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GuardConfig::load(path)?,
        None => GuardConfig::default(),
    };
    config.verify_checksum |= args.verify_checksum;

    let capture = std::fs::read(&args.capture)
        .with_context(|| format!("reading capture {}", args.capture.display()))?;
    let actuator = JsonActuator {
        names: config.zones.iter().map(|z| z.name.clone()).collect(),
    };
    let mut pipeline = Pipeline::new(ReplaySource::new(capture), &config, actuator)?
        .with_observer(NullObserver);

    match pipeline.run(StopSignal::never()) {
        Ok(()) | Err(LidarError::TransportClosed) => {}
        Err(e) => return Err(e.into()),
    }

    let stats = pipeline.stats();
    eprintln!(
        "frames = {}, resyncs = {}, malformed = {}, checksum failures = {}, transitions = {}",
        stats.frames,
        pipeline.resync_count(),
        stats.malformed,
        stats.checksum_failures,
        stats.transitions
    );
    Ok(())
}
