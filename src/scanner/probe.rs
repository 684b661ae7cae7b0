//! TCP connect prober.
//!
//! Performs one full TCP handshake against one scan unit and, on success,
//! one bounded banner read. This is the most reliable scanning method but
//! also the most detectable as it completes the full TCP handshake.

use crate::banner::{read_banner, BANNER_TIMEOUT};
use crate::error::ProbeError;
use crate::types::ScanUnit;
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{lookup_host, TcpStream};
use tokio::time::timeout;
use tracing::debug;

/// A single connection attempt against one scan unit.
///
/// `Ok(banner)` means the port accepted the connection; the banner is
/// whatever the service sent first, if anything. Any failure to connect is
/// a `ProbeError`. Implementations must release the connection before
/// returning.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, unit: &ScanUnit, dial_timeout: Duration)
        -> Result<Option<String>, ProbeError>;
}

/// Prober backed by the operating system's socket API.
///
/// Does not require elevated privileges.
#[derive(Debug, Clone)]
pub struct TcpProber {
    read_timeout: Duration,
}

impl TcpProber {
    pub fn new() -> Self {
        Self {
            read_timeout: BANNER_TIMEOUT,
        }
    }

    /// Override the banner read deadline.
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Resolve and connect. Name resolution counts against the dial timeout.
    async fn connect(unit: &ScanUnit) -> Result<TcpStream, ProbeError> {
        let addrs: Vec<SocketAddr> = lookup_host((unit.host.as_str(), unit.port.as_u16()))
            .await
            .map_err(|e| ProbeError::Resolve(e.to_string()))?
            .collect();

        if addrs.is_empty() {
            return Err(ProbeError::Resolve(format!("no addresses for {}", unit.host)));
        }

        TcpStream::connect(addrs.as_slice())
            .await
            .map_err(classify_connect_error)
    }
}

impl Default for TcpProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(
        &self,
        unit: &ScanUnit,
        dial_timeout: Duration,
    ) -> Result<Option<String>, ProbeError> {
        let mut stream = match timeout(dial_timeout, Self::connect(unit)).await {
            Ok(result) => result?,
            Err(_) => return Err(ProbeError::Timeout),
        };
        debug!(%unit, "connected");

        let banner = read_banner(&mut stream, self.read_timeout).await;
        if let Some(ref text) = banner {
            debug!(%unit, banner = %text.trim_end(), "captured banner");
        }
        drop(stream);

        Ok(banner)
    }
}

fn classify_connect_error(e: io::Error) -> ProbeError {
    match e.kind() {
        io::ErrorKind::ConnectionRefused => ProbeError::ConnectionRefused,
        io::ErrorKind::TimedOut => ProbeError::Timeout,
        _ if e.to_string().to_lowercase().contains("unreachable") => {
            ProbeError::Unreachable(e.to_string())
        }
        _ => ProbeError::Io(e),
    }
}
