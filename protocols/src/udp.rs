//! UDP probe handling.
//!
//! Open UDP ports only answer when the probe carried a payload their service
//! recognizes; a silent open port is indistinguishable from a filtered one,
//! which is exactly the open|filtered ambiguity real UDP scans suffer from.

use scansim_common::network::flags::Flag;
use scansim_common::network::host::PortState;
use scansim_common::network::packet::Packet;

/// Payload of the data response an open port sends back for a payloadful probe.
const DATA_RESPONSE: &str = "Data";

pub fn probe_response(state: PortState, packet: &Packet, now: u64) -> Option<Packet> {
    match state {
        PortState::Open => packet
            .payload
            .is_some()
            .then(|| packet.reply(vec![Flag::Udp], now).with_payload(DATA_RESPONSE)),
        // Closed UDP ports answer with ICMP port unreachable.
        PortState::Closed => Some(packet.reply(vec![Flag::IcmpUnreach], now)),
        PortState::Filtered => None,
    }
}
