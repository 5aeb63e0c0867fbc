//! lanlight CLI Client
//!
//! Sends a single request to a device and prints the decoded reply.

use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use lanlight::config::{format_mac, parse_mac, resolve_addr};
use lanlight::protocol::{
    EchoPayload, MessageType, Payload, Power, PowerLevel, SendableMessage, DEFAULT_PORT,
};
use lanlight::{Connection, LanError, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// lanlight CLI
#[derive(Parser, Debug)]
#[command(name = "lanlight-cli")]
#[command(about = "CLI for LAN smart bulbs")]
struct Args {
    /// Device address (host or host:port), or a broadcast address
    #[arg(short, long, default_value = "255.255.255.255")]
    device: String,

    /// Device MAC; omit to address every device
    #[arg(short, long)]
    mac: Option<String>,

    /// Seconds to wait for a reply
    #[arg(short, long, default_value = "2")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask which service and port the device offers
    Service,

    /// Get the device label
    Label,

    /// Get the device power level
    Power,

    /// Turn the device on or off
    SetPower {
        /// "on" or "off"
        state: String,
    },

    /// Get the full light state
    Light,

    /// Send an echo request
    Echo {
        /// Text to echo (up to 64 bytes)
        text: String,
    },
}

fn build_request(command: &Commands) -> Result<SendableMessage> {
    let message = match command {
        Commands::Service => SendableMessage::bare(MessageType::GetService),
        Commands::Label => SendableMessage::bare(MessageType::GetLabel),
        Commands::Power => SendableMessage::bare(MessageType::GetPower),
        Commands::Light => SendableMessage::bare(MessageType::LightGet),
        Commands::SetPower { state } => {
            let on = match state.as_str() {
                "on" => true,
                "off" => false,
                other => {
                    return Err(LanError::Config(format!(
                        "power state must be 'on' or 'off', got '{}'",
                        other
                    )))
                }
            };
            SendableMessage::with_payload(Payload::SetPower(Power {
                level: PowerLevel::from(on),
            }))
        }
        Commands::Echo { text } => SendableMessage::with_payload(Payload::EchoRequest(
            EchoPayload::from_slice(text.as_bytes()),
        )),
    };
    Ok(message)
}

fn run(args: Args) -> Result<()> {
    let target = match &args.mac {
        Some(mac) => parse_mac(mac)?,
        None => 0,
    };
    let addr = resolve_addr(&args.device, DEFAULT_PORT)?;
    let source = std::process::id().max(2);

    let request = build_request(&args.command)?
        .source(source)
        .target(target)
        .sequence(1)
        .res_required(true);

    let connection = Connection::listen_on_port("0.0.0.0", 0)?;
    connection.set_broadcast(true)?;
    connection.set_read_timeout(Some(Duration::from_millis(250)))?;

    let bytes = request.encode()?;
    connection.send(addr, &bytes)?;
    tracing::debug!("Sent {} bytes to {}", bytes.len(), addr);

    let deadline = Instant::now() + Duration::from_secs(args.timeout);
    let mut replies = 0;
    while Instant::now() < deadline {
        let (_, peer, reply) = match connection.receive() {
            Ok(received) => received,
            Err(LanError::Io(ref e))
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                continue;
            }
            Err(e) => return Err(e),
        };

        if reply.source() != source || reply.message_type() == MessageType::Acknowledgement {
            continue;
        }

        replies += 1;
        match reply.payload() {
            Some(payload) => println!("{} [{}] {:?}", peer, format_mac(reply.target()), payload),
            None => println!("{} [{}] {}", peer, format_mac(reply.target()), reply.message_type()),
        }

        // A unicast request gets exactly one answer
        if target != 0 {
            break;
        }
    }

    if replies == 0 {
        println!("No reply within {}s", args.timeout);
    }
    Ok(())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
