use std::env;
use std::sync::Arc;

use innova_hvac::{hvac_action, hvac_mode, Coordinator, InnovaClient, Options};

#[tokio::main]
async fn main() -> innova_hvac::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let host = args.get(1).expect("usage: monitor <host> [scan-interval-secs]");
    let mut options = Options::new(host.as_str());
    if let Some(secs) = args.get(2) {
        options = options.with_scan_interval(secs.parse().expect("scan interval must be seconds"));
    }
    options.validate()?;

    let client = InnovaClient::builder(&options.host)
        .on_event(|event| println!("{event:?}"))
        .build()?;
    let coordinator = Coordinator::new(Arc::new(client), options.scan_interval());

    coordinator.subscribe(|update| match update {
        Ok(status) => {
            println!(
                "{:.1}\u{00b0}C -> {:.1}\u{00b0}C | {:?} / {:?} | fan: {:?}{}",
                status.ambient_temperature,
                status.target_temperature,
                hvac_mode(status),
                hvac_action(status),
                status.fan_speed,
                if status.rotation_enabled { " | swing" } else { "" },
            );
            if let Ok(json) = serde_json::to_string(status) {
                println!("{json}");
            }
        }
        Err(e) => eprintln!("{e}, showing last known status"),
    });

    println!("Connecting to {host}...");
    if let Err(e) = coordinator.first_refresh().await {
        eprintln!("{e}");
    }
    let source = coordinator.source();
    println!("Connected to {}. Polling every {:?}...", source.display_name(), coordinator.interval());

    coordinator.start();
    tokio::signal::ctrl_c().await?;
    coordinator.stop().await;
    Ok(())
}
