use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::core::{
    config::ConfigManager,
    enrichment::capabilities::Capabilities,
    geodesy::{format_distance, format_time},
    monitor::{GeofenceMonitor, MonitorEvent},
    replay::{self, Scenario},
};

const USAGE: &str = "usage: safestep-replay <scenario.json> [--config-dir DIR] [--speed N]";

struct Args {
    scenario: PathBuf,
    config_dir: PathBuf,
    speed: f64,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut scenario = None;
    let mut config_dir = PathBuf::from(".");
    let mut speed = 0.0_f64;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config-dir" => {
                config_dir = args.next().map(PathBuf::from).ok_or(USAGE)?;
            }
            "--speed" => {
                let value = args.next().ok_or(USAGE)?;
                speed = value
                    .parse::<f64>()
                    .map_err(|_| format!("invalid --speed value: {}", value))?;
            }
            _ if scenario.is_none() => scenario = Some(PathBuf::from(arg)),
            _ => return Err(USAGE.to_string()),
        }
    }

    Ok(Args {
        scenario: scenario.ok_or(USAGE)?,
        config_dir,
        speed,
    })
}

async fn replay_scenario(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = ConfigManager::new(args.config_dir).load();
    let scenario = Scenario::load(&args.scenario)?;
    println!(
        "Replaying {} readings from {:?}",
        scenario.readings.len(),
        args.scenario
    );

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut monitor = GeofenceMonitor::new(settings, Capabilities::offline()).with_events(event_tx);
    monitor.apply_config(scenario.config)?;

    let printer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                MonitorEvent::Status {
                    distance_meters,
                    severity,
                } => log::debug!("{} from home ({})", format_distance(distance_meters), severity.display_name()),
                MonitorEvent::AlertRaised { recipient, record } => {
                    log::info!("Alert {} sent to {}", record.id, recipient)
                }
                MonitorEvent::TipUpdated(tip) => log::info!("Safety insight: {}", tip),
            }
        }
    });

    let (feed_tx, feed_rx) = mpsc::channel(64);
    let player = tokio::spawn(replay::play(scenario.readings, args.speed, feed_tx));

    monitor.run(feed_rx).await;
    player.await?;
    monitor.close_events();
    printer.await?;

    let state = monitor.state();
    println!(
        "Tracked {} fixes, {} alert(s). Status: {:?}",
        state.history.len(),
        state.alerts.len(),
        monitor.status()
    );
    for alert in &state.alerts {
        println!(
            "[{}] {:<9} {}",
            format_time(alert.created_at_millis),
            alert.severity.display_name(),
            alert.message
        );
    }
    Ok(())
}

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(2);
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(replay_scenario(args)) {
        log::error!("Replay failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args() {
        let parsed = parse_args(args(&["walk.json", "--speed", "10", "--config-dir", "/tmp/cfg"])).unwrap();
        assert_eq!(parsed.scenario, PathBuf::from("walk.json"));
        assert_eq!(parsed.config_dir, PathBuf::from("/tmp/cfg"));
        assert_eq!(parsed.speed, 10.0);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["a.json", "b.json"])).is_err());
        assert!(parse_args(args(&["a.json", "--speed", "fast"])).is_err());
    }
}
