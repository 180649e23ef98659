//! TCP responses: SYN scan replies and the malformed-flags OS probe.

use scansim_common::network::flags::Flag;
use scansim_common::network::host::{Host, PortState};
use scansim_common::network::packet::Packet;

/// FIN, URG and PSH together form the bogus flag combination OS-detection
/// probes use; no legitimate segment carries all three.
pub fn is_os_probe(packet: &Packet) -> bool {
    packet.has_flag(Flag::Fin) && packet.has_flag(Flag::Urg) && packet.has_flag(Flag::Psh)
}

/// Hosts answer the malformed probe with a RST,ACK revealing their OS,
/// regardless of the probed port's state.
pub fn fingerprint_response(host: &Host, packet: &Packet, now: u64) -> Packet {
    packet
        .reply(vec![Flag::Rst, Flag::Ack], now)
        .with_payload(format!("Fingerprint: {}", host.os))
}

/// Classic SYN scan semantics: open ports accept, closed ports reset,
/// filtered ports drop the segment on the floor.
pub fn syn_response(state: PortState, packet: &Packet, now: u64) -> Option<Packet> {
    match state {
        PortState::Open => Some(packet.reply(vec![Flag::Syn, Flag::Ack], now)),
        PortState::Closed => Some(packet.reply(vec![Flag::Rst, Flag::Ack], now)),
        PortState::Filtered => None,
    }
}
