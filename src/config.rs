//! Configuration for lanlight
//!
//! Centralized configuration with sensible defaults.

use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::time::Duration;

use crate::error::{LanError, Result};
use crate::protocol::DEFAULT_PORT;

/// Main configuration for an emulated device
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Host or address to bind
    pub host: String,

    /// UDP port to bind (0 picks an ephemeral port)
    pub port: u16,

    /// Socket read timeout (milliseconds), must be at least 1
    ///
    /// The server checks for shutdown each time a read times out, so this
    /// also bounds how long `shutdown` takes to stop it.
    pub read_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Device Configuration
    // -------------------------------------------------------------------------
    /// This device's target id, written into every reply
    pub mac: u64,

    // -------------------------------------------------------------------------
    // Worker Configuration
    // -------------------------------------------------------------------------
    /// Number of handler threads
    pub workers: usize,

    /// Decoded messages buffered between the receive loop and the workers
    pub queue_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            read_timeout_ms: 500,
            mac: 0,
            workers: 4,
            queue_depth: 1024,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Read timeout as a `Duration`
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.read_timeout_ms == 0 {
            return Err(LanError::Config("read_timeout_ms must be at least 1".to_string()));
        }
        if self.workers == 0 {
            return Err(LanError::Config("workers must be at least 1".to_string()));
        }
        if self.queue_depth == 0 {
            return Err(LanError::Config(
                "queue_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the bind host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the bind port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the device target id
    pub fn mac(mut self, mac: u64) -> Self {
        self.config.mac = mac;
        self
    }

    /// Set the number of handler threads
    pub fn workers(mut self, count: usize) -> Self {
        self.config.workers = count;
        self
    }

    /// Set the receive queue depth
    pub fn queue_depth(mut self, depth: usize) -> Self {
        self.config.queue_depth = depth;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

/// Parse a colon-separated MAC into a target id
///
/// The first octet lands in the lowest byte, matching the order devices use
/// in the frame address. Fewer than six octets is an error.
pub fn parse_mac(s: &str) -> Result<u64> {
    let octets: Vec<&str> = s.split(':').collect();
    if octets.len() != 6 {
        return Err(LanError::Config(format!(
            "MAC '{}' must have six colon-separated octets",
            s
        )));
    }

    let mut bytes = [0u8; 8];
    for (slot, octet) in bytes.iter_mut().zip(&octets) {
        *slot = u8::from_str_radix(octet, 16)
            .map_err(|_| LanError::Config(format!("invalid MAC octet '{}' in '{}'", octet, s)))?;
    }
    Ok(u64::from_le_bytes(bytes))
}

/// Format a target id as a colon-separated MAC
pub fn format_mac(mac: u64) -> String {
    mac.to_le_bytes()[..6]
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Resolve `host`, `host:port`, an IP, or an IP with port to one address
///
/// `default_port` is used only when the text carries no port. Bare IPv6
/// addresses are recognized before any `host:port` split.
pub fn resolve_addr(s: &str, default_port: u16) -> Result<SocketAddr> {
    if let Ok(addr) = s.parse::<SocketAddr>() {
        return Ok(addr);
    }
    if let Ok(ip) = s.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, default_port));
    }

    let mut addrs = if s.contains(':') {
        s.to_socket_addrs()?
    } else {
        (s, default_port).to_socket_addrs()?
    };
    addrs
        .next()
        .ok_or_else(|| LanError::Config(format!("cannot resolve '{}'", s)))
}
