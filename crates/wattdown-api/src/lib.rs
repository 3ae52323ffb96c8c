// wattdown-api: HTTP clients for the metrics backend (VictoriaMetrics /
// Prometheus query API) and the Shelly smart-plug relay.

pub mod envelope;
pub mod error;
pub mod metrics;
pub mod relay;

pub use envelope::{InstantSeries, InstantVector, RangeMatrix, RangeSeries, Sample};
pub use error::Error;
pub use metrics::MetricsClient;
pub use relay::RelayClient;
