use crate::client::LogClient;
use crate::layer::ShippingLayer;
use tracing::subscriber::SetGlobalDefaultError;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration of the `tracing` bridge.
///
/// **Fields**
/// - `min_level`: least severe level that is shipped through the client.
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt::Layer` is
///   stacked on top of [`ShippingLayer`] so events are also printed.
#[derive(Clone, Debug)]
pub struct TracingConfig {
    pub min_level: Level,
    pub enable_stdout: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            min_level: Level::INFO,
            enable_stdout: true,
        }
    }
}

/// Install a global `tracing` subscriber that ships events through
/// `client`.
///
/// **Parameters**
/// - `client`: the [`LogClient`] that buffers and ships entries.
/// - `config`: [`TracingConfig`] selecting the level and console output.
///
/// **Returns**
/// - `Err(..)` if a global subscriber was already installed.
pub fn init_tracing_with_config(
    client: &LogClient,
    config: TracingConfig,
) -> Result<(), SetGlobalDefaultError> {
    let layer = ShippingLayer::new(client.clone(), config.min_level);

    // Two concrete subscriber types, so each branch installs its own.
    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber)
    }
}

/// Install the bridge with [`TracingConfig::default`].
pub fn init_tracing(client: &LogClient) -> Result<(), SetGlobalDefaultError> {
    init_tracing_with_config(client, TracingConfig::default())
}
