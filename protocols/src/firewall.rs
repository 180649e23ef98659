//! # Timing-Based Firewall
//!
//! Two independent layers share one threshold:
//!
//! * [`rate_gate`] runs at *arrival* time and compares the gap since the
//!   previous attacker packet against the host's last recorded arrival.
//! * [`signature_check`] runs at *send* time and classifies a packet purely
//!   by the scan delay advertised in its metadata: anything faster than the
//!   threshold is noisy enough to drop, anything slower is polite and always
//!   passes.
//!
//! The layers are intentionally separate and separately testable; a packet
//! polite enough to pass the signature check can still trip the rate gate
//! when deliveries bunch up.

use tracing::debug;

use scansim_common::network::endpoint::Role;
use scansim_common::network::flags::Flag;
use scansim_common::network::host::Host;
use scansim_common::network::packet::Packet;

/// Packets spaced closer than this are treated as hostile scanning.
pub const RATE_LIMIT_MS: u64 = 1_500;

/// Arrival-time rate check. Returns the synthetic `[BLOCKED]` verdict packet
/// when the gate trips, `None` when the packet may continue down the chain.
///
/// The arrival timestamp is recorded for *every* gated packet, blocked ones
/// included, so a rapid burst after a block keeps comparing against the
/// immediately prior packet rather than the last accepted one. That quirk is
/// deliberate and covered by tests.
pub fn rate_gate(host: &mut Host, packet: &Packet, now: u64) -> Option<Packet> {
    if !host.firewall_enabled || packet.source.role != Role::Attacker {
        return None;
    }

    match host.last_packet_time {
        Some(prev) if now.saturating_sub(prev) < RATE_LIMIT_MS => {
            host.last_packet_time = Some(now);
            host.blocked_count += 1;
            debug!(
                host = %host.ip,
                elapsed_ms = now.saturating_sub(prev),
                "firewall rate gate tripped"
            );
            Some(
                packet
                    .reply(vec![Flag::Blocked], now)
                    .into_blocked(),
            )
        }
        _ => {
            // No prior packet, or a polite gap; record and let it through.
            host.last_packet_time = Some(now);
            None
        }
    }
}

/// Send-time signature classification. Consumes the outgoing packet and
/// returns it either untouched or marked blocked, bumping the destination
/// host's counter in the latter case.
pub fn signature_check(host: &mut Host, packet: Packet) -> Packet {
    if host.firewall_enabled && packet.timing_ms() < RATE_LIMIT_MS {
        host.blocked_count += 1;
        debug!(
            host = %host.ip,
            timing_ms = packet.timing_ms(),
            "firewall signature match, dropping packet before delivery"
        );
        return packet.into_blocked();
    }
    packet
}
