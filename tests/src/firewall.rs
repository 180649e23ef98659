use scansim_common::config::SimConfig;
use scansim_common::network::endpoint::Role;
use scansim_common::network::flags::Flag;
use scansim_common::network::packet::Packet;
use scansim_common::scan::{ScanKind, TimingTier};
use scansim_core::{SimEvent, Simulation};

use crate::driver::{ip, run_to_completion};

fn firewalled_config() -> SimConfig {
    SimConfig {
        alive_probability: 1.0,
        firewall_enabled: true,
        ..SimConfig::default()
    }
}

fn emitted(events: &[SimEvent]) -> Vec<Packet> {
    events
        .iter()
        .filter_map(|event| match event {
            SimEvent::PacketEmitted(packet) => Some(packet.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn aggressive_scan_is_dropped_at_send_time() {
    let mut sim = Simulation::new(firewalled_config());
    // T5 advertises a 100ms profile, far under the 1500ms threshold.
    sim.start_scan(&[ip(1)], ScanKind::Syn, &[80, 443], TimingTier::T5)
        .unwrap();
    let log = run_to_completion(&mut sim);

    assert!(log.completed);
    assert_eq!(log.emitted.len(), 2);
    assert!(log.emitted.iter().all(|p| p.is_blocked()));
    assert!(log.delivered.is_empty());
    assert_eq!(sim.target(ip(1)).unwrap().blocked_count, 2);
}

#[test]
fn polite_scan_passes_the_signature_layer() {
    let mut sim = Simulation::new(firewalled_config());
    // One closed port: the RST,ACK response carries no handshake follow-up,
    // so nothing bunches up at the target.
    sim.start_scan(&[ip(1)], ScanKind::Syn, &[443], TimingTier::T2)
        .unwrap();
    let log = run_to_completion(&mut sim);

    assert!(log.emitted.iter().all(|p| !p.is_blocked()));
    let rst_acks: Vec<_> = log
        .delivered
        .iter()
        .filter(|p| p.destination.role == Role::Attacker && p.flags() == [Flag::Rst, Flag::Ack])
        .collect();
    assert_eq!(rst_acks.len(), 1);
    assert_eq!(sim.target(ip(1)).unwrap().blocked_count, 0);
}

#[test]
fn bunched_deliveries_trip_the_arrival_gate() {
    // Both probes pass the send-time signature check, but the second one is
    // delivered only 1000ms after the first and the rate gate eats it.
    let mut sim = Simulation::new(firewalled_config());
    sim.start_scan(&[ip(1)], ScanKind::Syn, &[80, 443], TimingTier::T2)
        .unwrap();

    sim.advance(0);
    let probe_80 = emitted(&sim.drain_events()).remove(0);
    sim.advance(2_000);
    let probe_443 = emitted(&sim.drain_events()).remove(0);
    assert!(!probe_80.is_blocked());
    assert!(!probe_443.is_blocked());

    sim.deliver(probe_80);
    sim.advance(1_000);
    let responses = emitted(&sim.drain_events());
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].flags(), &[Flag::Syn, Flag::Ack]);

    sim.deliver(probe_443);
    sim.advance(1_000);
    let after = emitted(&sim.drain_events());
    assert!(after.is_empty());

    let host = sim.target(ip(1)).unwrap();
    assert_eq!(host.blocked_count, 1);
    // The gate records the blocked arrival too.
    assert_eq!(host.last_packet_time, Some(3_000));
}

#[test]
fn spaced_deliveries_pass_the_arrival_gate() {
    let mut sim = Simulation::new(firewalled_config());
    sim.start_scan(&[ip(1)], ScanKind::Syn, &[80, 443], TimingTier::T2)
        .unwrap();

    sim.advance(0);
    let probe_80 = emitted(&sim.drain_events()).remove(0);
    sim.advance(2_000);
    let probe_443 = emitted(&sim.drain_events()).remove(0);

    sim.deliver(probe_80);
    sim.advance(2_000);
    sim.drain_events();

    // 2000ms after the previous arrival, over the 1500ms threshold.
    sim.deliver(probe_443);
    sim.advance(300);
    let responses = emitted(&sim.drain_events());
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].flags(), &[Flag::Rst, Flag::Ack]);
    assert_eq!(sim.target(ip(1)).unwrap().blocked_count, 0);
}

#[test]
fn disabling_the_firewall_lets_fast_probes_through() {
    let mut sim = Simulation::new(firewalled_config());
    sim.start_scan(&[ip(1)], ScanKind::Syn, &[80], TimingTier::T5)
        .unwrap();
    assert!(sim.set_firewall(ip(1), false));
    let log = run_to_completion(&mut sim);

    assert!(log.emitted.iter().all(|p| !p.is_blocked()));
    assert!(
        log.delivered
            .iter()
            .any(|p| p.flags() == [Flag::Syn, Flag::Ack])
    );
}

#[test]
fn enabling_the_firewall_for_every_target_sticks_across_runs() {
    let mut sim = Simulation::new(SimConfig {
        alive_probability: 1.0,
        ..SimConfig::default()
    });
    sim.start_scan(&[ip(1), ip(2)], ScanKind::Syn, &[80], TimingTier::T5)
        .unwrap();
    sim.set_firewall_all(true);
    let log = run_to_completion(&mut sim);
    assert!(log.emitted.iter().all(|p| p.is_blocked()));

    // The next run provisions fresh hosts with the firewall still on.
    sim.start_scan(&[ip(3)], ScanKind::Syn, &[80], TimingTier::T5)
        .unwrap();
    assert!(sim.target(ip(3)).unwrap().firewall_enabled);
}
