//! UDP Connection
//!
//! Owns the bound socket and this device's target id.

use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use crate::config::Config;
use crate::error::{LanError, Result};
use crate::protocol::{ReceivableMessage, DEFAULT_PORT, MAX_DATAGRAM_SIZE};

/// A bound UDP endpoint speaking the LAN protocol
///
/// `send` and `receive` take `&self`, so one connection can be shared
/// between a receive loop and any number of responding threads.
#[derive(Debug, Default)]
pub struct Connection {
    /// Target id written into replies
    mac: u64,

    /// None once closed, or for an unbound handle
    socket: Option<UdpSocket>,
}

impl Connection {
    /// Bind `host` on the protocol's default port
    pub fn listen(host: &str) -> Result<Self> {
        Self::listen_on_port(host, DEFAULT_PORT)
    }

    /// Bind `host` on a specific port (0 for an ephemeral one)
    pub fn listen_on_port(host: &str, port: u16) -> Result<Self> {
        let socket = UdpSocket::bind((host, port))?;
        tracing::debug!("Bound UDP socket on {}", socket.local_addr()?);

        Ok(Self {
            mac: 0,
            socket: Some(socket),
        })
    }

    /// Bind using the network and device settings of a config
    pub fn from_config(config: &Config) -> Result<Self> {
        let connection = Self::listen_on_port(&config.host, config.port)?.with_mac(config.mac);
        if config.read_timeout_ms > 0 {
            connection.set_read_timeout(Some(config.read_timeout()))?;
        }
        Ok(connection)
    }

    /// A handle with no socket; every I/O call fails with `NotBound`
    pub fn unbound(mac: u64) -> Self {
        Self { mac, socket: None }
    }

    /// Set the target id claimed by replies
    pub fn with_mac(mut self, mac: u64) -> Self {
        self.mac = mac;
        self
    }

    pub fn mac(&self) -> u64 {
        self.mac
    }

    pub fn is_bound(&self) -> bool {
        self.socket.is_some()
    }

    fn socket(&self) -> Result<&UdpSocket> {
        self.socket.as_ref().ok_or(LanError::NotBound)
    }

    /// The locally bound address
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket()?.local_addr()?)
    }

    /// The locally bound port
    pub fn port(&self) -> Result<u16> {
        Ok(self.local_addr()?.port())
    }

    /// Configure how long `receive` blocks before returning a timeout error
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.socket()?.set_read_timeout(timeout)?;
        Ok(())
    }

    /// Allow sending to broadcast addresses
    pub fn set_broadcast(&self, on: bool) -> Result<()> {
        self.socket()?.set_broadcast(on)?;
        Ok(())
    }

    /// Send one datagram, returning the bytes written
    pub fn send(&self, addr: SocketAddr, bytes: &[u8]) -> Result<usize> {
        let written = self.socket()?.send_to(bytes, addr)?;
        tracing::trace!("Sent {} bytes to {}", written, addr);
        Ok(written)
    }

    /// Wait for the next datagram that decodes
    ///
    /// Datagrams that fail to decode are logged and dropped, and the wait
    /// continues. Only socket errors (including a read timeout) return.
    pub fn receive(&self) -> Result<(usize, SocketAddr, ReceivableMessage)> {
        let socket = self.socket()?;
        let mut buf = [0u8; MAX_DATAGRAM_SIZE];

        loop {
            let (n, peer) = socket.recv_from(&mut buf)?;

            match ReceivableMessage::decode(&buf[..n]) {
                Ok(message) => {
                    tracing::trace!(
                        "Received {} from {} ({} bytes)",
                        message.message_type(),
                        peer,
                        n
                    );
                    return Ok((n, peer, message));
                }
                Err(e) => {
                    tracing::debug!("Discarding {} byte datagram from {}: {}", n, peer, e);
                }
            }
        }
    }

    /// Release the socket; safe to call repeatedly or when unbound
    pub fn close(&mut self) {
        if let Some(socket) = self.socket.take() {
            if let Ok(addr) = socket.local_addr() {
                tracing::debug!("Closed UDP socket on {}", addr);
            }
        }
    }
}
