// Shelly relay command client
//
// Gen1 plugs expose the relay as `GET http://{addr}/relay/0?turn=off`.
// The address is learned from metric labels at runtime, so this client is
// built once and pointed at whatever address the caller passes in.

use std::time::Duration;

use tracing::info;

use crate::error::Error;

/// Bounded timeout for relay commands. Shorter than the query timeout --
/// the plug is on the local network.
const RELAY_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for the smart plug's relay endpoint.
///
/// In dry-run mode `turn_off` logs the intended action and reports success
/// without any network call.
#[derive(Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    dry_run: bool,
}

impl RelayClient {
    /// Create a new client with the default bounded-timeout HTTP client.
    pub fn new(dry_run: bool) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(RELAY_TIMEOUT)
            .build()
            .map_err(Error::Transport)?;
        Ok(Self::with_client(http, dry_run))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, dry_run: bool) -> Self {
        Self { http, dry_run }
    }

    /// Whether this client is in dry-run mode.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Turn the relay at `addr` off.
    ///
    /// `addr` is the plug's network address as learned from metric labels
    /// (an IP, or `host:port`).
    pub async fn turn_off(&self, addr: &str) -> Result<(), Error> {
        if self.dry_run {
            info!(%addr, "dry run: would turn relay off");
            return Ok(());
        }

        let url = format!("http://{addr}/relay/0?turn=off");
        let resp = self.http.get(&url).send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Relay {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
