//! # Protocol Response Logic
//!
//! Decides how a virtual host answers an arriving packet. [`respond`] is an
//! ordered priority chain: the first matching rule wins, and the order is
//! significant (the firewall gate runs before anything else, ICMP before the
//! port-state rules, the OS-probe signature before plain SYN handling).
//!
//! Everything here is total. Unmatched flag combinations, unknown ports and
//! probes against dead hosts all resolve to `None`; a non-response is a
//! valid simulated outcome, never an error. The only host state these
//! functions touch is the firewall bookkeeping in [`firewall`].

pub mod firewall;
pub mod icmp;
pub mod service;
pub mod tcp;
pub mod udp;

use scansim_common::network::flags::Flag;
use scansim_common::network::host::Host;
use scansim_common::network::packet::Packet;

/// Evaluates an arriving packet against a host and produces the response the
/// host would send, if any. `now` is the logical-clock arrival time and is
/// the timestamp of any produced response.
pub fn respond(host: &mut Host, packet: &Packet, now: u64) -> Option<Packet> {
    // Rate gate first; a blocked packet never reaches protocol handling.
    if let Some(verdict) = firewall::rate_gate(host, packet, now) {
        return Some(verdict);
    }

    if packet.has_flag(Flag::Echo) {
        return icmp::echo_response(host, packet, now);
    }

    let state = host.port_state(packet.destination.port);

    if packet.has_flag(Flag::Udp) {
        return udp::probe_response(state, packet, now);
    }

    if packet.payload.as_deref() == Some(service::SERVICE_PROBE) {
        return service::banner_response(state, packet, now);
    }

    if tcp::is_os_probe(packet) {
        return Some(tcp::fingerprint_response(host, packet, now));
    }

    if packet.has_flag(Flag::Syn) {
        return tcp::syn_response(state, packet, now);
    }

    // A bare ACK is the tail of a handshake; nothing left to say. Anything
    // else falls through to silence as well.
    None
}
