use std::env;
use std::sync::{Arc, Mutex};

use innova_hvac::{Event, InnovaClient, Mode};

/// Run with: INNOVA_HOST=192.168.1.40 cargo test --test integration -- --ignored
/// Requires a real unit on the local network. Only reads, never sends commands.
fn live_host() -> String {
    env::var("INNOVA_HOST").expect("INNOVA_HOST must point at a unit")
}

#[tokio::test]
#[ignore]
async fn refresh_live_unit() {
    let events: Arc<Mutex<Vec<Event>>> = Arc::new(Mutex::new(vec![]));
    let events_clone = events.clone();

    let client = InnovaClient::builder(live_host())
        .on_event(move |event| {
            events_clone.lock().unwrap().push(event.clone());
        })
        .build()
        .expect("client should build");

    assert!(client.refresh().await, "refresh failed");

    let status = client.status();
    assert_ne!(status.mode, Mode::Unknown, "unit should report a working mode");
    assert!(status.min_temperature <= status.max_temperature);
    assert!(!client.unique_id().is_empty());

    // Fields move off their defaults on the first refresh.
    assert!(!events.lock().unwrap().is_empty(), "should have received events");
}

#[tokio::test]
#[ignore]
async fn repeated_refresh_is_stable() {
    let client = InnovaClient::builder(live_host())
        .build()
        .expect("client should build");

    for i in 0..3 {
        assert!(client.refresh().await, "refresh {i} failed");
    }
    assert!(client.status().supports_target_temperature());
}
