//! # Scan Orchestration
//!
//! Translates a scan request into the timed packet stream it should
//! produce. Nothing is constructed eagerly: each probe is described by a
//! [`PacketPlan`] paired with a relative send offset, and the simulation
//! materializes the actual packet (timestamp, epoch, firewall verdict) when
//! the scheduler fires the plan.

use std::net::IpAddr;

use scansim_common::network::endpoint::Endpoint;
use scansim_common::network::flags::Flag;
use scansim_common::scan::ScanKind;

/// Ephemeral source-port base for TCP and UDP probes.
const PROBE_PORT_BASE: u16 = 55_000;
/// Version probes use their own ephemeral range.
const VERSION_PORT_BASE: u16 = 56_000;
/// Fixed source port of the single OS-detection probe.
const OS_PROBE_PORT: u16 = 40_000;
/// OS probes go to a port assumed open on anything worth fingerprinting.
const OS_PROBE_TARGET_PORT: u16 = 80;

pub const CONNECT_PAYLOAD: &str = "CONNECT";
pub const OS_PROBE_PAYLOAD: &str = "OSProbe";

/// Blueprint for one packet to be built at fire time.
#[derive(Debug, Clone)]
pub struct PacketPlan {
    pub source: Endpoint,
    pub destination: Endpoint,
    pub flags: Vec<Flag>,
    pub payload: Option<String>,
    /// Scan delay advertised in the packet's metadata.
    pub timing_ms: u64,
}

/// Lays out the probes a scan of `kind` sends against one target:
/// `(send offset, plan)` pairs, offsets spaced `delay_ms` apart. Port-less
/// kinds (ping, OS) emit a single probe at offset zero and ignore `ports`.
pub fn probe_plans(
    kind: ScanKind,
    attacker_ip: IpAddr,
    target_ip: IpAddr,
    ports: &[u16],
    delay_ms: u64,
) -> Vec<(u64, PacketPlan)> {
    match kind {
        ScanKind::Syn => per_port_plans(
            attacker_ip,
            target_ip,
            ports,
            delay_ms,
            PROBE_PORT_BASE,
            vec![Flag::Syn],
            None,
        ),
        ScanKind::Connect => per_port_plans(
            attacker_ip,
            target_ip,
            ports,
            delay_ms,
            PROBE_PORT_BASE,
            vec![Flag::Syn],
            Some(CONNECT_PAYLOAD),
        ),
        ScanKind::Udp => per_port_plans(
            attacker_ip,
            target_ip,
            ports,
            delay_ms,
            PROBE_PORT_BASE,
            vec![Flag::Udp],
            None,
        ),
        ScanKind::Version => per_port_plans(
            attacker_ip,
            target_ip,
            ports,
            delay_ms,
            VERSION_PORT_BASE,
            vec![Flag::Ack],
            Some(scansim_protocols::service::SERVICE_PROBE),
        ),
        ScanKind::Os => vec![(
            0,
            PacketPlan {
                source: Endpoint::attacker(attacker_ip, OS_PROBE_PORT),
                destination: Endpoint::target(target_ip, OS_PROBE_TARGET_PORT),
                flags: vec![Flag::Fin, Flag::Urg, Flag::Psh],
                payload: Some(OS_PROBE_PAYLOAD.to_string()),
                timing_ms: delay_ms,
            },
        )],
        ScanKind::Ping => vec![(
            0,
            PacketPlan {
                source: Endpoint::attacker(attacker_ip, 0),
                destination: Endpoint::target(target_ip, 0),
                flags: vec![Flag::Echo],
                payload: None,
                timing_ms: delay_ms,
            },
        )],
    }
}

fn per_port_plans(
    attacker_ip: IpAddr,
    target_ip: IpAddr,
    ports: &[u16],
    delay_ms: u64,
    port_base: u16,
    flags: Vec<Flag>,
    payload: Option<&str>,
) -> Vec<(u64, PacketPlan)> {
    ports
        .iter()
        .enumerate()
        .map(|(index, &port)| {
            let plan = PacketPlan {
                source: Endpoint::attacker(attacker_ip, ephemeral_port(port_base, index)),
                destination: Endpoint::target(target_ip, port),
                flags: flags.clone(),
                payload: payload.map(str::to_string),
                timing_ms: delay_ms,
            };
            (delay_ms * index as u64, plan)
        })
        .collect()
}

/// Source ports cycle through `base..=u16::MAX` so a port list of any length,
/// a full-range sweep included, stays inside the ephemeral span.
fn ephemeral_port(base: u16, index: usize) -> u16 {
    let span = usize::from(u16::MAX - base) + 1;
    base + (index % span) as u16
}
