use std::sync::Arc;
use std::time::Instant;

use logship::noop_transport::NoopTransport;
use logship::{ClientConfig, LogClient, Metadata};
use serde_json::json;

#[tokio::main]
async fn main() {
    let client = LogClient::with_transport(
        ClientConfig::new("load-test", "http://localhost"),
        Arc::new(NoopTransport),
    );

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        let metadata: Metadata = [("iteration".to_string(), json!(i))].into_iter().collect();
        client.error("default load test error", metadata, None);
    }

    let elapsed = start.elapsed();
    println!("default config: logged {} entries in {:?} (~{:.0} entries/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );

    client.close().await;
    println!("{:?}", client.stats());
}
