//! Service banner responses for version detection probes.

use scansim_common::network::flags::Flag;
use scansim_common::network::host::PortState;
use scansim_common::network::packet::Packet;

/// Payload that marks a packet as a version-detection probe.
pub const SERVICE_PROBE: &str = "ServiceProbe";

/// Mock banner table for the well-known ports the virtual network runs.
pub fn banner(port: u16) -> &'static str {
    match port {
        80 => "Apache/2.4.52 (Ubuntu)",
        22 => "OpenSSH 8.9p1",
        443 => "nginx/1.18.0",
        53 => "BIND 9.18.1",
        3000 => "Node.js Express",
        _ => "Unknown Service",
    }
}

/// Open services greet a probe with their banner; everything else ignores it.
pub fn banner_response(state: PortState, packet: &Packet, now: u64) -> Option<Packet> {
    if state != PortState::Open {
        return None;
    }
    Some(
        packet
            .reply(vec![Flag::Ack, Flag::Psh], now)
            .with_payload(banner(packet.destination.port)),
    )
}
