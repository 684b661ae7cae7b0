//! Banner capture for TCP connections.
//!
//! Reads whatever a service sends immediately after the handshake. No probe
//! is sent and the bytes are not interpreted.

use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::timeout;
use tracing::debug;

/// Maximum bytes to read for a banner.
pub const MAX_BANNER_SIZE: usize = 1024;

/// Read deadline for a banner, independent of the dial timeout.
pub const BANNER_TIMEOUT: Duration = Duration::from_secs(2);

/// Perform a single time-bounded read from a freshly connected stream.
///
/// Returns `None` on timeout, read error, or an immediately closed stream.
pub async fn read_banner<R>(stream: &mut R, deadline: Duration) -> Option<String>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = [0u8; MAX_BANNER_SIZE];

    match timeout(deadline, stream.read(&mut buffer)).await {
        Ok(Ok(n)) if n > 0 => Some(String::from_utf8_lossy(&buffer[..n]).into_owned()),
        Ok(Ok(_)) => {
            debug!("peer closed before sending a banner");
            None
        }
        Ok(Err(e)) => {
            debug!(error = %e, "banner read failed");
            None
        }
        Err(_) => {
            debug!(?deadline, "banner read timed out");
            None
        }
    }
}

/// Make a banner safe for single-line terminal display.
///
/// Control characters become spaces or dots and runs of whitespace collapse.
pub fn display_banner(banner: &str) -> String {
    let mut result = String::with_capacity(banner.len());
    let mut prev_space = false;

    for c in banner.chars() {
        let c = match c {
            '\r' | '\n' | '\t' | ' ' => ' ',
            c if c.is_control() => '.',
            c => c,
        };
        if c == ' ' {
            if !prev_space {
                result.push(c);
            }
            prev_space = true;
        } else {
            result.push(c);
            prev_space = false;
        }
    }

    result.trim().to_string()
}
