//! UDP Server
//!
//! One receive loop feeds decoded messages to a pool of handler threads.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam::channel::{self, Receiver, TrySendError};

use super::Connection;
use crate::config::Config;
use crate::error::{LanError, Result};
use crate::protocol::{Payload, ReceivableMessage};

/// A reply produced by a handler
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub payload: Payload,

    /// Send even if the request did not set `res_required`
    pub always: bool,
}

impl Reply {
    /// Sent only when the requester asked for a response
    pub fn new(payload: Payload) -> Self {
        Self {
            payload,
            always: false,
        }
    }

    /// Sent regardless of the request's `res_required` flag
    pub fn always(payload: Payload) -> Self {
        Self {
            payload,
            always: true,
        }
    }
}

/// Device logic: turns a request into an optional reply
///
/// Acknowledgements are handled by the server; returning `None` for a
/// request with `ack_required` still acknowledges it. Messages addressed to
/// another device never reach the handler.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, peer: SocketAddr, message: &ReceivableMessage) -> Option<Reply>;
}

impl<F> Handler for F
where
    F: Fn(SocketAddr, &ReceivableMessage) -> Option<Reply> + Send + Sync + 'static,
{
    fn handle(&self, peer: SocketAddr, message: &ReceivableMessage) -> Option<Reply> {
        self(peer, message)
    }
}

/// Stops a running server from another thread
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Ask the receive loop to exit at its next wakeup
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// UDP server for an emulated device
pub struct Server<H: Handler> {
    config: Config,
    connection: Arc<Connection>,
    handler: Arc<H>,
    shutdown: ShutdownHandle,
}

impl<H: Handler> Server<H> {
    /// Bind according to `config` and serve with `handler`
    pub fn bind(config: Config, handler: H) -> Result<Self> {
        config.validate()?;
        let connection = Connection::from_config(&config)?;
        Ok(Self::new(config, connection, handler))
    }

    /// Serve on an already bound connection
    ///
    /// `run` replaces the connection's read timeout with the configured
    /// one, since shutdown is only noticed when a read returns.
    pub fn new(config: Config, connection: Connection, handler: H) -> Self {
        Self {
            config,
            connection: Arc::new(connection),
            handler: Arc::new(handler),
            shutdown: ShutdownHandle {
                flag: Arc::new(AtomicBool::new(false)),
            },
        }
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.connection.local_addr()
    }

    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Run until shut down or the socket fails (blocking)
    pub fn run(&self) -> Result<()> {
        self.config.validate()?;
        self.connection.set_read_timeout(Some(self.config.read_timeout()))?;
        let (tx, rx) = channel::bounded::<(SocketAddr, ReceivableMessage)>(self.config.queue_depth);

        let workers = (0..self.config.workers)
            .map(|id| {
                let rx = rx.clone();
                let connection = Arc::clone(&self.connection);
                let handler = Arc::clone(&self.handler);
                thread::Builder::new()
                    .name(format!("lanlight-worker-{}", id))
                    .spawn(move || worker_loop(rx, connection, handler))
            })
            .collect::<std::io::Result<Vec<_>>>()?;
        drop(rx);

        tracing::info!(
            "Serving on {} with {} workers",
            self.connection.local_addr()?,
            workers.len()
        );

        let result = self.receive_loop(&tx);

        // Closing the channel lets workers drain the queue and exit
        drop(tx);
        for worker in workers {
            if worker.join().is_err() {
                tracing::warn!("Worker thread panicked");
            }
        }

        tracing::info!("Server stopped");
        result
    }

    /// Broadcasts and messages targeting our MAC; everything when the MAC is 0
    fn accepts(&self, message: &ReceivableMessage) -> bool {
        let mac = self.connection.mac();
        mac == 0 || message.is_for(mac)
    }

    fn receive_loop(&self, tx: &channel::Sender<(SocketAddr, ReceivableMessage)>) -> Result<()> {
        while !self.shutdown.is_shutdown() {
            let (_, peer, message) = match self.connection.receive() {
                Ok(received) => received,
                Err(LanError::Io(ref e))
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Receive failed: {}", e);
                    return Err(e);
                }
            };

            if !self.accepts(&message) {
                tracing::trace!(
                    "Ignoring {} from {} addressed to {:#x}",
                    message.message_type(),
                    peer,
                    message.target()
                );
                continue;
            }

            match tx.try_send((peer, message)) {
                Ok(()) => {}
                Err(TrySendError::Full((peer, message))) => {
                    tracing::warn!(
                        "Queue full, dropping {} from {}",
                        message.message_type(),
                        peer
                    );
                }
                Err(TrySendError::Disconnected(_)) => {
                    return Err(LanError::Config("all workers exited".to_string()));
                }
            }
        }
        Ok(())
    }
}

fn worker_loop<H: Handler>(
    rx: Receiver<(SocketAddr, ReceivableMessage)>,
    connection: Arc<Connection>,
    handler: Arc<H>,
) {
    for (peer, message) in rx.iter() {
        let result = match handler.handle(peer, &message) {
            Some(reply) => connection.respond(reply.always, peer, &message, &reply.payload),
            None => connection.acknowledge(peer, &message),
        };

        if let Err(e) = result {
            tracing::warn!(
                "Failed to answer {} from {}: {}",
                message.message_type(),
                peer,
                e
            );
        }
    }
}
