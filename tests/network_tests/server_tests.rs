//! Tests for the UDP server
//!
//! These tests verify:
//! - Handler replies reach the requester through the responder
//! - Requests with no reply are still acknowledged
//! - Garbage does not stop the server
//! - Messages addressed to another device are ignored
//! - Shutdown stops the receive loop and joins the workers

use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use lanlight::protocol::{
    EchoPayload, MessageType, Payload, Power, PowerLevel, ReceivableMessage, SendableMessage,
};
use lanlight::{Config, Connection, LanError, Reply, Server};

const MAC: u64 = 0xd073d5;

// =============================================================================
// Helper Functions
// =============================================================================

fn test_config() -> Config {
    Config::builder()
        .host("127.0.0.1")
        .port(0)
        .mac(MAC)
        .read_timeout_ms(20)
        .workers(2)
        .queue_depth(16)
        .build()
}

fn echo_handler(_peer: SocketAddr, message: &ReceivableMessage) -> Option<Reply> {
    match message.payload() {
        Some(Payload::EchoRequest(p)) => Some(Reply::always(Payload::EchoResponse(*p))),
        _ if message.message_type() == MessageType::GetPower => {
            Some(Reply::new(Payload::StatePower(Power {
                level: PowerLevel::ENABLED,
            })))
        }
        _ => None,
    }
}

fn client() -> UdpSocket {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_millis(1000)))
        .unwrap();
    socket
}

fn recv(client: &UdpSocket) -> ReceivableMessage {
    let mut buf = [0u8; 256];
    let (n, _) = client.recv_from(&mut buf).unwrap();
    ReceivableMessage::decode(&buf[..n]).unwrap()
}

fn spawn<H: lanlight::Handler>(
    server: Server<H>,
) -> (SocketAddr, lanlight::network::ShutdownHandle, thread::JoinHandle<lanlight::Result<()>>) {
    let addr = server.local_addr().unwrap();
    let shutdown = server.shutdown_handle();
    let handle = thread::spawn(move || server.run());
    (addr, shutdown, handle)
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn test_bind_rejects_invalid_config() {
    let config = Config::builder().host("127.0.0.1").port(0).workers(0).build();

    let result = Server::bind(config, echo_handler);

    assert!(matches!(result, Err(LanError::Config(_))));
}

#[test]
fn test_echo_round_trip() {
    let server = Server::bind(test_config(), echo_handler).unwrap();
    let (addr, shutdown, handle) = spawn(server);
    let client = client();

    let request = SendableMessage::with_payload(Payload::EchoRequest(EchoPayload::from_slice(
        b"are you there",
    )))
    .source(99)
    .sequence(4)
    .encode()
    .unwrap();
    client.send_to(&request, addr).unwrap();

    let reply = recv(&client);
    assert_eq!(reply.message_type(), MessageType::EchoResponse);
    assert_eq!(reply.source(), 99);
    assert_eq!(reply.sequence(), 4);
    assert_eq!(reply.target(), MAC);
    match reply.payload() {
        Some(Payload::EchoResponse(p)) => assert_eq!(&p.0[..13], b"are you there"),
        other => panic!("Expected EchoResponse, got {:?}", other),
    }

    shutdown.shutdown();
    handle.join().unwrap().unwrap();
}

#[test]
fn test_unanswered_request_is_acknowledged() {
    let server = Server::bind(test_config(), echo_handler).unwrap();
    let (addr, shutdown, handle) = spawn(server);
    let client = client();

    let request = SendableMessage::bare(MessageType::GetLabel)
        .ack_required(true)
        .encode()
        .unwrap();
    client.send_to(&request, addr).unwrap();

    assert_eq!(recv(&client).message_type(), MessageType::Acknowledgement);

    shutdown.shutdown();
    handle.join().unwrap().unwrap();
}

#[test]
fn test_garbage_does_not_stop_server() {
    let server = Server::bind(test_config(), echo_handler).unwrap();
    let (addr, shutdown, handle) = spawn(server);
    let client = client();

    client.send_to(&[0xde, 0xad, 0xbe, 0xef], addr).unwrap();
    let request = SendableMessage::bare(MessageType::GetPower)
        .res_required(true)
        .encode()
        .unwrap();
    client.send_to(&request, addr).unwrap();

    let reply = recv(&client);
    assert_eq!(reply.message_type(), MessageType::StatePower);

    shutdown.shutdown();
    handle.join().unwrap().unwrap();
}

#[test]
fn test_handler_runs_once_per_message() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let handler = move |_peer: SocketAddr, _message: &ReceivableMessage| -> Option<Reply> {
        counter.fetch_add(1, Ordering::SeqCst);
        Some(Reply::always(Payload::StatePower(Power::default())))
    };

    let server = Server::bind(test_config(), handler).unwrap();
    let (addr, shutdown, handle) = spawn(server);
    let client = client();

    let request = SendableMessage::bare(MessageType::GetPower).encode().unwrap();
    for _ in 0..5 {
        client.send_to(&request, addr).unwrap();
    }
    for _ in 0..5 {
        assert_eq!(recv(&client).message_type(), MessageType::StatePower);
    }

    shutdown.shutdown();
    handle.join().unwrap().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 5);
}

#[test]
fn test_shutdown_without_traffic() {
    let server = Server::bind(test_config(), echo_handler).unwrap();
    let (_addr, shutdown, handle) = spawn(server);

    thread::sleep(Duration::from_millis(50));
    shutdown.shutdown();

    assert!(shutdown.is_shutdown());
    assert!(handle.join().unwrap().is_ok());
}

#[test]
fn test_ignores_messages_for_other_devices() {
    let server = Server::bind(test_config(), echo_handler).unwrap();
    let (addr, shutdown, handle) = spawn(server);
    let client = client();
    client
        .set_read_timeout(Some(Duration::from_millis(200)))
        .unwrap();

    let elsewhere = SendableMessage::bare(MessageType::GetPower)
        .target(0xbeef)
        .ack_required(true)
        .res_required(true)
        .encode()
        .unwrap();
    client.send_to(&elsewhere, addr).unwrap();

    let mut buf = [0u8; 256];
    assert!(client.recv_from(&mut buf).is_err());

    let ours = SendableMessage::bare(MessageType::GetPower)
        .target(MAC)
        .res_required(true)
        .encode()
        .unwrap();
    client.send_to(&ours, addr).unwrap();

    assert_eq!(recv(&client).message_type(), MessageType::StatePower);

    shutdown.shutdown();
    handle.join().unwrap().unwrap();
}

#[test]
fn test_bind_rejects_zero_read_timeout() {
    let config = Config::builder()
        .host("127.0.0.1")
        .port(0)
        .read_timeout_ms(0)
        .build();

    let result = Server::bind(config, echo_handler);

    assert!(matches!(result, Err(LanError::Config(_))));
}

#[test]
fn test_shutdown_with_blocking_connection() {
    let connection = Connection::listen_on_port("127.0.0.1", 0)
        .unwrap()
        .with_mac(MAC);
    connection.set_read_timeout(None).unwrap();

    let server = Server::new(test_config(), connection, echo_handler);
    let (_addr, shutdown, handle) = spawn(server);
    thread::sleep(Duration::from_millis(50));
    shutdown.shutdown();

    let (done_tx, done_rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = done_tx.send(handle.join().map(|result| result.is_ok()));
    });

    let finished = done_rx
        .recv_timeout(Duration::from_secs(3))
        .expect("server did not stop after shutdown");
    assert!(finished.unwrap());
}
