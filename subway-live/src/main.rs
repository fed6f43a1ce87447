use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use subway_live::directory::StationDirectory;
use subway_live::domain::{StopId, Timestamp, TripId};
use subway_live::format::{format_countdown, format_wait_minutes};
use subway_live::poll::{Freshness, PollConfig, subscribe};
use subway_live::position::{TripPosition, estimate};
use subway_live::transiter::{CacheConfig, CachedTransiterClient, TransiterClient, TransiterConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let (mode, subject) = match (args.next(), args.next()) {
        (Some(mode), Some(subject)) if mode == "trip" || mode == "station" => (mode, subject),
        _ => {
            eprintln!("Usage: subway-live trip <trip-id> | station <stop-id>");
            std::process::exit(2);
        }
    };

    let mut config = TransiterConfig::default();
    if let Ok(url) = std::env::var("TRANSITER_URL") {
        config = config.with_base_url(url);
    }
    if let Ok(system) = std::env::var("TRANSITER_SYSTEM") {
        config = config.with_system_id(system);
    }

    let client = TransiterClient::new(config).expect("Failed to create Transiter client");
    let client = Arc::new(CachedTransiterClient::new(client, &CacheConfig::default()));

    let stations_path =
        std::env::var("STATIONS_FILE").unwrap_or_else(|_| "data/stations.json".to_string());
    let directory =
        StationDirectory::from_path(&stations_path).expect("Failed to load station directory");
    println!("Loaded {} station records from {stations_path}", directory.len());

    match mode.as_str() {
        "trip" => follow_trip(client, TripId::new(subject)).await,
        _ => watch_station(client, directory, StopId::new(subject)).await,
    }
}

/// Poll one trip and print its interpolated position once per second.
async fn follow_trip(client: Arc<CachedTransiterClient>, trip_id: TripId) {
    let fetch_id = trip_id.clone();
    let sub = subscribe(
        move || {
            let client = client.clone();
            let id = fetch_id.clone();
            async move { Ok(Arc::unwrap_or_clone(client.get_trip(&id).await?)) }
        },
        PollConfig::default(),
    );

    // The estimate moves with the clock between refreshes, so redraw
    // every second rather than only on a new snapshot.
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(1));
    loop {
        ticker.tick().await;
        let view = sub.view();
        if view.freshness == Freshness::Failed && view.snapshot.is_none() {
            eprintln!("Trip unavailable");
            return;
        }
        let Some(trip) = view.snapshot else { continue };
        let now = Timestamp::now();

        let tag = match view.freshness {
            Freshness::Fresh => "",
            Freshness::Degraded => " [stale]",
            Freshness::Failed => " [lost]",
        };
        let destination = trip.destination().unwrap_or("Unknown");
        println!("({}) to {destination}{tag}", trip.line);

        match estimate(&trip.stop_times, now) {
            TripPosition::NotStarted => {
                if let Some(first) = trip.stop_times.first() {
                    println!(
                        "  Not yet departed; leaves {} in {}",
                        first.stop_name,
                        format_countdown(first.departure_or_arrival(), now)
                    );
                }
            }
            TripPosition::InTransit { last_departed, progress } => {
                let from = &trip.stop_times[last_departed];
                match trip.stop_times.get(last_departed + 1) {
                    Some(to) => println!(
                        "  {:.0}% of the way from {} to {} (arrives {})",
                        progress,
                        from.stop_name,
                        to.stop_name,
                        format_countdown(to.arrival, now)
                    ),
                    None => println!("  At {}", from.stop_name),
                }
            }
            TripPosition::Completed { final_stop } => {
                println!("  Arrived at {}", trip.stop_times[final_stop].stop_name);
            }
        }

        if view.freshness == Freshness::Failed {
            break;
        }
    }
}

/// Poll one station and print its departure board on every refresh.
async fn watch_station(
    client: Arc<CachedTransiterClient>,
    directory: StationDirectory,
    stop_id: StopId,
) {
    let name = directory
        .resolve(&stop_id)
        .map(|entry| entry.name.clone())
        .unwrap_or_else(|| stop_id.as_str().to_string());

    let fetch_id = stop_id.clone();
    let mut sub = subscribe(
        move || {
            let client = client.clone();
            let id = fetch_id.clone();
            async move { Ok(Arc::unwrap_or_clone(client.get_station(&id).await?)) }
        },
        PollConfig::default(),
    );

    while sub.changed().await {
        let view = sub.view();
        let Some(station) = view.snapshot else { continue };
        let now = Timestamp::now();

        let tag = match view.freshness {
            Freshness::Fresh => "",
            Freshness::Degraded => " [stale]",
            Freshness::Failed => " [lost]",
        };
        println!("{name}{tag}");
        for st in station.stop_times.iter().take(8) {
            println!(
                "  ({}) {}  {}",
                st.line,
                st.headsign_or_unknown(),
                format_wait_minutes(st.departure_or_arrival(), now)
            );
        }

        if view.freshness == Freshness::Failed {
            break;
        }
    }
}
