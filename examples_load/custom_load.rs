use std::sync::Arc;
use std::time::Instant;
use tokio::time::Duration;
use tracing::{error, Level};

use logship::init::{init_tracing_with_config, TracingConfig};
use logship::noop_transport::NoopTransport;
use logship::{ClientConfig, LogClient};

#[tokio::main]
async fn main() {
    let config = ClientConfig::new("load-test", "http://localhost")
        .with_batch_size(1_000)
        .with_flush_interval(Duration::from_millis(200))
        .with_default_source("load-generator");
    let client = LogClient::with_transport(config, Arc::new(NoopTransport));

    let tracing_config = TracingConfig {
        min_level: Level::ERROR,
        enable_stdout: false,
    };
    init_tracing_with_config(&client, tracing_config).expect("install tracing subscriber");

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        error!(target: "load", iteration = i, "custom load test error");
    }

    let elapsed = start.elapsed();
    println!("custom config: logged {} events in {:?} (~{:.0} ev/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );

    client.close().await;
    println!("{:?}", client.stats());
}
