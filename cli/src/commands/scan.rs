//! Runs one simulated scan end to end.
//!
//! The engine never decides when a packet "arrives"; this driver does. Every
//! emitted, non-blocked packet is handed back to the scheduler with a fixed
//! propagation delay, the clock is ticked in fixed steps, and each tick's
//! events are drained and rendered. Arrivals at the attacker feed the
//! nmap-style report printed at the end.

use std::collections::{BTreeMap, BTreeSet};
use std::net::IpAddr;

use anyhow::Context;
use colored::*;
use tracing::{info, warn};

use scansim_common::config::SimConfig;
use scansim_common::network::endpoint::Role;
use scansim_common::network::flags::Flag;
use scansim_common::network::packet::Packet;
use scansim_common::scan::TimingTier;
use scansim_core::{SimEvent, Simulation};

use crate::commands::ScanArgs;
use crate::terminal::print;

/// Fixed one-way latency this driver assumes for every hop.
const PROPAGATION_MS: u64 = 250;

/// Bail-out horizon in simulated time, in case a scan never settles.
const MAX_SIM_TIME_MS: u64 = 3_600_000;

pub fn scan(args: ScanArgs) -> anyhow::Result<()> {
    let tier = TimingTier::from_level(args.timing)
        .with_context(|| format!("timing level {} is out of range (0..=5)", args.timing))?;

    let config = SimConfig {
        seed: args.seed,
        firewall_enabled: args.firewall,
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(config);
    sim.start_scan(&args.targets, args.kind, &args.ports, tier)?;

    info!(
        "{} scan from {} against {} host(s), profile {}",
        args.kind,
        sim.attacker().ip,
        args.targets.len(),
        tier
    );

    let mut report = Report::default();

    'ticking: loop {
        if sim.clock() > MAX_SIM_TIME_MS {
            warn!("scan did not settle within the simulated time budget");
            break;
        }
        sim.advance(args.step);

        for event in sim.drain_events() {
            match event {
                SimEvent::PacketEmitted(packet) => {
                    if packet.is_blocked() {
                        print::dropped_line(sim.clock(), &packet.to_string());
                    } else {
                        sim.schedule_delivery(packet, PROPAGATION_MS);
                    }
                }
                SimEvent::PacketDelivered(packet) => {
                    print::packet_line(sim.clock(), &packet.to_string());
                    report.observe(&sim, &packet);
                }
                SimEvent::ScanComplete => {
                    info!("scan complete at {}ms simulated", sim.clock());
                    break 'ticking;
                }
            }
        }
    }

    report.print(&sim, &args.targets);
    Ok(())
}

/// Facts gathered from responses arriving back at the attacker.
#[derive(Default)]
struct Report {
    /// (target, port) -> version or banner, when one was observed.
    open_tcp: BTreeMap<(IpAddr, u16), Option<String>>,
    open_udp: BTreeSet<(IpAddr, u16)>,
    closed_udp: BTreeSet<(IpAddr, u16)>,
    live_hosts: BTreeSet<IpAddr>,
    fingerprints: BTreeMap<IpAddr, String>,
}

impl Report {
    fn observe(&mut self, sim: &Simulation, packet: &Packet) {
        if packet.destination.role != Role::Attacker {
            return;
        }
        let target = packet.source.ip;
        let port = packet.source.port;

        if packet.has_flag(Flag::Syn) && packet.has_flag(Flag::Ack) {
            let version = sim
                .target(target)
                .and_then(|host| host.port(port))
                .and_then(|entry| entry.version.clone());
            self.open_tcp.entry((target, port)).or_insert(version);
        } else if packet.has_flag(Flag::Ack) && packet.has_flag(Flag::Psh) {
            // Service banner; stronger evidence than the port table version.
            self.open_tcp
                .insert((target, port), packet.payload.clone());
        } else if packet.has_flag(Flag::Reply) {
            self.live_hosts.insert(target);
        } else if packet.has_flag(Flag::IcmpUnreach) {
            self.closed_udp.insert((target, port));
        } else if packet.has_flag(Flag::Udp) && packet.payload.is_some() {
            self.open_udp.insert((target, port));
        } else if let Some(os) = packet
            .payload
            .as_deref()
            .and_then(|payload| payload.strip_prefix("Fingerprint: "))
        {
            self.fingerprints.insert(target, os.to_string());
        }
    }

    fn print(&self, sim: &Simulation, targets: &[IpAddr]) {
        print::header("scan report");
        for &target in targets {
            println!("{} {}", "Report for".bold(), target.to_string().cyan());

            if self.live_hosts.contains(&target) {
                println!("  Host is {}.", "up".green());
            }
            if let Some(os) = self.fingerprints.get(&target) {
                println!("  OS details: {}", os.yellow());
            }

            let open_tcp: Vec<_> = self
                .open_tcp
                .iter()
                .filter(|((ip, _), _)| *ip == target)
                .collect();
            if !open_tcp.is_empty() {
                println!("  {:<10} {:<8} {:<14} VERSION", "PORT", "STATE", "SERVICE");
                for ((_, port), version) in open_tcp {
                    let service = sim
                        .target(target)
                        .and_then(|host| host.port(*port))
                        .map(|entry| entry.service.clone())
                        .unwrap_or_else(|| "unknown".to_string());
                    println!(
                        "  {:<10} {:<8} {:<14} {}",
                        format!("{port}/tcp"),
                        "open".green(),
                        service,
                        version.as_deref().unwrap_or("")
                    );
                }
            }
            for (_, port) in self.open_udp.iter().filter(|(ip, _)| *ip == target) {
                println!("  {:<10} {}", format!("{port}/udp"), "open".green());
            }
            for (_, port) in self.closed_udp.iter().filter(|(ip, _)| *ip == target) {
                println!("  {:<10} {}", format!("{port}/udp"), "closed".red());
            }

            if let Some(host) = sim.target(target) {
                if host.blocked_count > 0 {
                    println!(
                        "  Firewall dropped {} packet(s).",
                        host.blocked_count.to_string().red().bold()
                    );
                }
            }
        }
    }
}
