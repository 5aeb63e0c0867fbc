//! lanlight Device Binary
//!
//! Runs an emulated bulb that answers on the LAN protocol.

use std::net::SocketAddr;
use std::time::Instant;

use clap::Parser;
use lanlight::config::{format_mac, parse_mac};
use lanlight::protocol::{
    Color, DeviceLabel, Firmware, Label, LightState, Membership, MessageType,
    NetworkInfo, Payload, Power, PowerLevel, ReceivableMessage, Service, StateInfo, StateService,
    StateVersion, Timestamp, DEFAULT_PORT,
};
use lanlight::{Config, Handler, Reply, Server};
use parking_lot::RwLock;
use tracing_subscriber::{fmt, EnvFilter};

/// lanlight Device
#[derive(Parser, Debug)]
#[command(name = "lanlight-device")]
#[command(about = "Emulated LAN smart bulb")]
#[command(version)]
struct Args {
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// UDP port to bind
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Device MAC address
    #[arg(short, long, default_value = "d0:73:d5:00:00:01")]
    mac: String,

    /// Initial bulb label
    #[arg(short, long, default_value = "lanlight")]
    label: String,

    /// Handler threads
    #[arg(short, long, default_value = "4")]
    workers: usize,
}

/// Mutable bulb state behind the handler
struct BulbState {
    power: PowerLevel,
    color: Color,
    label: Label,
    location: Membership,
    group: Membership,
    #[cfg(feature = "owner")]
    owner: Membership,
}

/// In-memory bulb answering Get/Set requests
struct Bulb {
    port: u16,
    booted: Instant,
    state: RwLock<BulbState>,
}

impl Bulb {
    fn new(port: u16, label: Label) -> Self {
        Self {
            port,
            booted: Instant::now(),
            state: RwLock::new(BulbState {
                power: PowerLevel::ENABLED,
                color: Color::white(u16::MAX, 3500),
                label,
                location: Membership::default(),
                group: Membership::default(),
                #[cfg(feature = "owner")]
                owner: Membership::default(),
            }),
        }
    }

    fn light_state(&self) -> Payload {
        let state = self.state.read();
        Payload::LightState(LightState {
            color: state.color,
            power: state.power,
            label: state.label.clone(),
            ..LightState::default()
        })
    }
}

impl Handler for Bulb {
    fn handle(&self, peer: SocketAddr, message: &ReceivableMessage) -> Option<Reply> {
        tracing::debug!("{} from {}", message.message_type(), peer);

        let reply = match (message.message_type(), message.payload()) {
            (MessageType::GetService, _) => Reply::always(Payload::StateService(StateService {
                service: Service::Udp,
                port: u32::from(self.port),
            })),
            (MessageType::GetHostInfo, _) => {
                Reply::always(Payload::StateHostInfo(NetworkInfo::default()))
            }
            (MessageType::GetWifiInfo, _) => Reply::always(Payload::StateWifiInfo(NetworkInfo {
                signal: 1e-5,
                ..NetworkInfo::default()
            })),
            (MessageType::GetHostFirmware, _) => {
                Reply::always(Payload::StateHostFirmware(Firmware::default()))
            }
            (MessageType::GetWifiFirmware, _) => {
                Reply::always(Payload::StateWifiFirmware(Firmware::default()))
            }
            (MessageType::GetVersion, _) => Reply::always(Payload::StateVersion(StateVersion {
                vendor: 1,
                product: 1,
                version: 0,
            })),
            (MessageType::GetInfo, _) => Reply::always(Payload::StateInfo(StateInfo {
                time: Timestamp::now(),
                uptime: u64::try_from(self.booted.elapsed().as_nanos()).unwrap_or(u64::MAX),
                downtime: 0,
            })),
            (MessageType::GetPower, _) => Reply::always(Payload::StatePower(Power {
                level: self.state.read().power,
            })),
            (MessageType::SetPower, Some(Payload::SetPower(p))) => {
                self.state.write().power = p.level;
                Reply::new(Payload::StatePower(*p))
            }
            (MessageType::GetLabel, _) => Reply::always(Payload::StateLabel(DeviceLabel {
                label: self.state.read().label.clone(),
            })),
            (MessageType::SetLabel, Some(Payload::SetLabel(p))) => {
                self.state.write().label = p.label.clone();
                Reply::new(Payload::StateLabel(p.clone()))
            }
            (MessageType::GetLocation, _) => {
                Reply::always(Payload::StateLocation(self.state.read().location.clone()))
            }
            (MessageType::SetLocation, Some(Payload::SetLocation(p))) => {
                self.state.write().location = p.clone();
                Reply::new(Payload::StateLocation(p.clone()))
            }
            (MessageType::GetGroup, _) => {
                Reply::always(Payload::StateGroup(self.state.read().group.clone()))
            }
            (MessageType::SetGroup, Some(Payload::SetGroup(p))) => {
                self.state.write().group = p.clone();
                Reply::new(Payload::StateGroup(p.clone()))
            }
            #[cfg(feature = "owner")]
            (MessageType::GetOwner, _) => {
                Reply::always(Payload::StateOwner(self.state.read().owner.clone()))
            }
            #[cfg(feature = "owner")]
            (MessageType::SetOwner, Some(Payload::SetOwner(p))) => {
                self.state.write().owner = p.clone();
                Reply::new(Payload::StateOwner(p.clone()))
            }
            (MessageType::EchoRequest, Some(Payload::EchoRequest(p))) => {
                Reply::always(Payload::EchoResponse(*p))
            }
            (MessageType::LightGet, _) => Reply::always(self.light_state()),
            (MessageType::LightSetColor, Some(Payload::LightSetColor(p))) => {
                self.state.write().color = p.color;
                Reply::new(self.light_state())
            }
            (MessageType::LightGetPower, _) => Reply::always(Payload::LightStatePower(Power {
                level: self.state.read().power,
            })),
            (MessageType::LightSetPower, Some(Payload::LightSetPower(p))) => {
                self.state.write().power = p.level;
                Reply::new(Payload::LightStatePower(Power { level: p.level }))
            }
            // State reports and acknowledgements from other devices
            _ => return None,
        };

        Some(reply)
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lanlight=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    let mac = match parse_mac(&args.mac) {
        Ok(mac) => mac,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("lanlight device v{}", lanlight::VERSION);
    tracing::info!("MAC: {}", format_mac(mac));
    tracing::info!("Listen address: {}:{}", args.host, args.port);

    // Build config from args
    let config = Config::builder()
        .host(&args.host)
        .port(args.port)
        .mac(mac)
        .workers(args.workers)
        .build();

    let bulb = Bulb::new(args.port, Label::new(args.label));

    let server = match Server::bind(config, bulb) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to bind: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
