//! Shared test driver: plays the embedding layer's role by ticking the
//! clock and routing every emitted, non-blocked packet back for delivery
//! after a fixed propagation delay.

use std::net::{IpAddr, Ipv4Addr};

use scansim_common::config::SimConfig;
use scansim_common::network::packet::Packet;
use scansim_core::{SimEvent, Simulation};

pub const PROPAGATION_MS: u64 = 50;
const STEP_MS: u64 = 50;
const MAX_TICKS: usize = 100_000;

pub fn ip(last: u8) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(192, 168, 1, last))
}

pub fn all_alive_config() -> SimConfig {
    SimConfig {
        alive_probability: 1.0,
        ..SimConfig::default()
    }
}

/// Everything a finished run produced, in order.
pub struct RunLog {
    pub emitted: Vec<Packet>,
    pub delivered: Vec<Packet>,
    pub completed: bool,
}

/// Drives the simulation until its queue drains or the tick budget runs out.
pub fn run_to_completion(sim: &mut Simulation) -> RunLog {
    let mut log = RunLog {
        emitted: Vec::new(),
        delivered: Vec::new(),
        completed: false,
    };

    for _ in 0..MAX_TICKS {
        sim.advance(STEP_MS);
        for event in sim.drain_events() {
            match event {
                SimEvent::PacketEmitted(packet) => {
                    if !packet.is_blocked() {
                        sim.schedule_delivery(packet.clone(), PROPAGATION_MS);
                    }
                    log.emitted.push(packet);
                }
                SimEvent::PacketDelivered(packet) => log.delivered.push(packet),
                SimEvent::ScanComplete => log.completed = true,
            }
        }
        if log.completed {
            break;
        }
    }
    log
}

impl RunLog {
    /// Rendered delivery sequence with timestamps stripped, for
    /// determinism comparisons.
    pub fn delivered_rendering(&self) -> Vec<String> {
        self.delivered.iter().map(|p| p.to_string()).collect()
    }
}
