//! Responder
//!
//! Decides which replies a request obligates and sends them:
//!
//! | ack_required | res_required or always | sent                    |
//! |--------------|------------------------|-------------------------|
//! | no           | no                     | nothing                 |
//! | yes          | no                     | Acknowledgement         |
//! | no           | yes                    | reply                   |
//! | yes          | yes                    | Acknowledgement, reply  |

use std::net::SocketAddr;

use super::Connection;
use crate::error::{LanError, Result};
use crate::protocol::{MessageType, Payload, ReceivableMessage, SendableMessage};

impl Connection {
    /// Answer `trigger` according to its ack/response flags
    ///
    /// `always` forces the reply even when the sender did not ask for one.
    /// Returns the total bytes written across both sends. If the reply
    /// fails after an acknowledgement went out, the error is a
    /// `PartialSend` carrying the acknowledgement's byte count.
    pub fn respond(
        &self,
        always: bool,
        peer: SocketAddr,
        trigger: &ReceivableMessage,
        reply: &Payload,
    ) -> Result<usize> {
        let mut message = SendableMessage::reply_to(trigger, self.mac());
        let mut sent = 0;

        if trigger.ack_required() {
            message.set_reply(MessageType::Acknowledgement, None);
            sent += self.transmit(peer, &message)?;
        }

        if always || trigger.res_required() {
            message.set_reply(reply.message_type(), Some(reply.clone()));
            match self.transmit(peer, &message) {
                Ok(n) => sent += n,
                Err(e) if sent > 0 => {
                    return Err(LanError::PartialSend {
                        sent,
                        source: Box::new(e),
                    })
                }
                Err(e) => return Err(e),
            }
        }

        Ok(sent)
    }

    /// Send only the Acknowledgement, if `trigger` asked for one
    pub fn acknowledge(&self, peer: SocketAddr, trigger: &ReceivableMessage) -> Result<usize> {
        if !trigger.ack_required() {
            return Ok(0);
        }

        let mut message = SendableMessage::reply_to(trigger, self.mac());
        message.set_reply(MessageType::Acknowledgement, None);
        self.transmit(peer, &message)
    }

    fn transmit(&self, peer: SocketAddr, message: &SendableMessage) -> Result<usize> {
        let bytes = message.encode()?;
        let written = self.send(peer, &bytes)?;
        tracing::trace!(
            "Replied to {} with type {} (source={}, sequence={})",
            peer,
            message.header.protocol_header.typ,
            message.header.frame.source,
            message.header.frame_address.sequence
        );
        Ok(written)
    }
}
