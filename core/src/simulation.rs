//! # Simulation Context
//!
//! One isolated simulation instance: scheduler, attacker host, target hosts
//! and the outbound event queue the embedding layer consumes once per tick.
//!
//! Control flow: [`Simulation::start_scan`] schedules send events; driving
//! the clock with [`Simulation::advance`] fires them and surfaces
//! [`SimEvent::PacketEmitted`] notifications. The embedding layer decides
//! when a packet arrives — either calling [`Simulation::deliver`] directly
//! or routing the hop through the scheduler with
//! [`Simulation::schedule_delivery`] — and delivery is the only point where
//! the protocol responder runs. Responses and handshake follow-ups re-enter
//! the same pipeline with a small pacing delay.
//!
//! Every packet and scheduled event carries the epoch of the run that
//! produced it; [`Simulation::reset`] bumps the epoch, so anything left over
//! from a previous run is rejected instead of mutating fresh state.

use std::collections::{BTreeMap, VecDeque};
use std::net::IpAddr;

use tracing::{debug, warn};

use scansim_common::config::SimConfig;
use scansim_common::error::ScanConfigError;
use scansim_common::network::endpoint::Role;
use scansim_common::network::flags::Flag;
use scansim_common::network::host::Host;
use scansim_common::network::packet::Packet;
use scansim_common::scan::{ScanKind, TimingTier};
use scansim_protocols as protocols;

use crate::scanner::{self, PacketPlan};
use crate::scheduler::Scheduler;
use crate::topology;

/// Pacing delay for responses and handshake follow-ups. Strictly positive:
/// zero-delay responses would collapse a whole exchange into one tick.
pub const RESPONSE_DELAY_MS: u64 = 300;

/// Safety cap on events fired during one `advance` call; a same-tick cascade
/// that exceeds it is left queued rather than spun on forever.
const MAX_EVENTS_PER_ADVANCE: usize = 10_000;

const ATTACKER_OS: &str = "Linux 5.4";

/// What the simulation tells its embedding layer. Drained in order, at most
/// once per tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    /// A packet was produced, before any delivery decision. Blocked packets
    /// still surface here so a consumer can show them dropping.
    PacketEmitted(Packet),
    /// A packet arrived and was processed.
    PacketDelivered(Packet),
    /// The event queue drained while a scan was running; emitted exactly
    /// once per run.
    ScanComplete,
}

/// Work items the scheduler holds. Probes are blueprints materialized at
/// fire time so their timestamps match the logical clock; responses were
/// already built on arrival and are forwarded as-is.
enum Action {
    Emit(PacketPlan),
    Forward(Packet),
    Deliver(Packet),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Running,
}

/// Parameters of the current (or most recent) run. Kept after completion:
/// late SYN,ACK arrivals still need to know which follow-up to send.
#[derive(Debug, Clone, Copy)]
struct ScanRun {
    kind: ScanKind,
    delay_ms: u64,
}

pub struct Simulation {
    config: SimConfig,
    scheduler: Scheduler<Action>,
    attacker: Host,
    targets: BTreeMap<IpAddr, Host>,
    outbox: VecDeque<SimEvent>,
    run: Option<ScanRun>,
    state: RunState,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        let attacker = Host::new(config.attacker_ip, Role::Attacker, ATTACKER_OS);
        Self {
            config,
            scheduler: Scheduler::new(),
            attacker,
            targets: BTreeMap::new(),
            outbox: VecDeque::new(),
            run: None,
            state: RunState::Idle,
        }
    }

    pub fn clock(&self) -> u64 {
        self.scheduler.clock()
    }

    pub fn epoch(&self) -> u64 {
        self.scheduler.epoch()
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn attacker(&self) -> &Host {
        &self.attacker
    }

    pub fn target(&self, ip: IpAddr) -> Option<&Host> {
        self.targets.get(&ip)
    }

    pub fn targets(&self) -> impl Iterator<Item = &Host> {
        self.targets.values()
    }

    /// Validates and launches a scan. The previous run is reset first, the
    /// virtual network is provisioned from the configured seed, and one send
    /// event per probe is scheduled. Configuration errors are reported
    /// before any state is touched.
    pub fn start_scan(
        &mut self,
        targets: &[IpAddr],
        kind: ScanKind,
        ports: &[u16],
        tier: TimingTier,
    ) -> Result<(), ScanConfigError> {
        if targets.is_empty() || targets.contains(&self.config.attacker_ip) {
            return Err(ScanConfigError::InvalidTarget);
        }
        if ports.is_empty() {
            return Err(ScanConfigError::InvalidPortList);
        }

        self.reset();
        self.targets = topology::provision_targets(targets, &self.config);

        let delay_ms = tier.delay_ms();
        self.run = Some(ScanRun { kind, delay_ms });
        self.state = RunState::Running;

        for (index, &ip) in targets.iter().enumerate() {
            let base = delay_ms * index as u64;
            let plans = scanner::probe_plans(kind, self.config.attacker_ip, ip, ports, delay_ms);
            for (offset, plan) in plans {
                self.scheduler.schedule(base + offset, Action::Emit(plan));
            }
        }

        debug!(
            %kind,
            %tier,
            targets = targets.len(),
            pending = self.scheduler.len(),
            "scan scheduled"
        );
        Ok(())
    }

    /// Moves the logical clock forward and fires everything that became due,
    /// including zero-delay events scheduled during this same call. With an
    /// empty queue this only advances the clock.
    pub fn advance(&mut self, dt: u64) {
        // Completion is checked before firing anything: the queue must have
        // stayed drained across a full tick, after the embedding layer
        // consumed the previous events and had its chance to schedule more
        // deliveries. Emitted exactly once per run.
        if self.state == RunState::Running && self.scheduler.is_empty() && self.outbox.is_empty() {
            self.state = RunState::Idle;
            self.outbox.push_back(SimEvent::ScanComplete);
        }

        self.scheduler.advance_clock(dt);

        let mut fired = 0;
        loop {
            if fired >= MAX_EVENTS_PER_ADVANCE {
                warn!(
                    cap = MAX_EVENTS_PER_ADVANCE,
                    "same-tick cascade hit the safety cap, leaving remaining events queued"
                );
                break;
            }
            let Some(action) = self.scheduler.pop_due() else {
                break;
            };
            fired += 1;
            self.run_action(action);
        }
    }

    /// Hands the queued events to the embedding layer, oldest first.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.outbox.drain(..).collect()
    }

    /// Routes a packet's network hop through the scheduler: it will be
    /// delivered `delay_ms` from now. Use a positive delay so the hop stays
    /// visible as a separate tick.
    pub fn schedule_delivery(&mut self, packet: Packet, delay_ms: u64) {
        self.scheduler.schedule(delay_ms, Action::Deliver(packet));
    }

    /// A packet arrives. Stale packets from an earlier epoch and packets a
    /// firewall already marked blocked are dropped without side effects;
    /// everything else runs through the protocol responder (target side) or
    /// the handshake follow-up logic (attacker side).
    pub fn deliver(&mut self, packet: Packet) {
        if packet.epoch() != self.scheduler.epoch() {
            debug!(
                packet_epoch = packet.epoch(),
                current_epoch = self.scheduler.epoch(),
                "dropping stale packet from a previous run"
            );
            return;
        }
        if packet.is_blocked() {
            return;
        }

        let now = self.scheduler.clock();
        self.outbox
            .push_back(SimEvent::PacketDelivered(packet.clone()));

        match packet.destination.role {
            Role::Attacker => self.handle_attacker_arrival(&packet),
            Role::Target => {
                let Some(host) = self.targets.get_mut(&packet.destination.ip) else {
                    // Unknown destination: a non-response, not an error.
                    return;
                };
                let Some(response) = protocols::respond(host, &packet, now) else {
                    return;
                };
                if response.is_blocked() {
                    // Rate-gate verdict. The counters were bumped in the
                    // responder; the verdict packet itself goes nowhere.
                    return;
                }
                self.scheduler
                    .schedule(RESPONSE_DELAY_MS, Action::Forward(response));
            }
        }
    }

    /// Enables or disables the firewall on one target. Unknown hosts are
    /// ignored; returns whether the host existed.
    pub fn set_firewall(&mut self, host_ip: IpAddr, enabled: bool) -> bool {
        match self.targets.get_mut(&host_ip) {
            Some(host) => {
                host.set_firewall(enabled);
                true
            }
            None => false,
        }
    }

    /// Flips the firewall on every current target and on future provisions.
    pub fn set_firewall_all(&mut self, enabled: bool) {
        self.config.firewall_enabled = enabled;
        for host in self.targets.values_mut() {
            host.set_firewall(enabled);
        }
    }

    /// Clears everything and bumps the epoch. Safe to call repeatedly.
    pub fn reset(&mut self) {
        self.scheduler.invalidate();
        self.targets.clear();
        self.attacker = Host::new(self.config.attacker_ip, Role::Attacker, ATTACKER_OS);
        self.outbox.clear();
        self.run = None;
        self.state = RunState::Idle;
    }

    fn run_action(&mut self, action: Action) {
        match action {
            Action::Emit(plan) => self.emit_planned(plan),
            Action::Forward(packet) => self.emit(packet),
            Action::Deliver(packet) => self.deliver(packet),
        }
    }

    /// Materializes a probe blueprint at fire time: stamps clock and epoch,
    /// then lets the destination's firewall classify it before it leaves.
    fn emit_planned(&mut self, plan: PacketPlan) {
        let now = self.scheduler.clock();
        let mut packet = Packet::new(plan.source, plan.destination, plan.flags, now)
            .with_timing(plan.timing_ms)
            .with_epoch(self.scheduler.epoch());
        if let Some(payload) = plan.payload {
            packet = packet.with_payload(payload);
        }

        if packet.destination.role == Role::Target {
            if let Some(host) = self.targets.get_mut(&packet.destination.ip) {
                packet = protocols::firewall::signature_check(host, packet);
            }
        }

        self.emit(packet);
    }

    fn emit(&mut self, packet: Packet) {
        self.outbox.push_back(SimEvent::PacketEmitted(packet));
    }

    /// A response reached the scanning host. A SYN,ACK triggers exactly one
    /// secondary packet: the closing ACK of a connect scan, or the aborting
    /// RST of a half-open SYN scan.
    fn handle_attacker_arrival(&mut self, packet: &Packet) {
        if !(packet.has_flag(Flag::Syn) && packet.has_flag(Flag::Ack)) {
            return;
        }
        let Some(run) = self.run else {
            return;
        };
        let flags = match run.kind {
            ScanKind::Connect => vec![Flag::Ack],
            ScanKind::Syn => vec![Flag::Rst],
            _ => return,
        };
        let plan = PacketPlan {
            source: packet.destination,
            destination: packet.source,
            flags,
            payload: None,
            timing_ms: run.delay_ms,
        };
        self.scheduler.schedule(RESPONSE_DELAY_MS, Action::Emit(plan));
    }
}
