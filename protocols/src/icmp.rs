//! ICMP echo handling: dead hosts stay silent, live ones echo back.

use scansim_common::network::flags::Flag;
use scansim_common::network::host::Host;
use scansim_common::network::packet::Packet;

/// Answers an ECHO probe with a REPLY when the host is up. A missing
/// response is how the simulation expresses a down host.
pub fn echo_response(host: &Host, packet: &Packet, now: u64) -> Option<Packet> {
    if !host.is_alive {
        return None;
    }
    Some(packet.reply(vec![Flag::Reply], now))
}
