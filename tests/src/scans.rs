use scansim_common::config::SimConfig;
use scansim_common::network::endpoint::Role;
use scansim_common::network::flags::Flag;
use scansim_common::scan::{ScanKind, TimingTier};
use scansim_core::Simulation;

use crate::driver::{all_alive_config, ip, run_to_completion};

#[test]
fn syn_scan_classifies_open_closed_and_filtered_ports() {
    let mut sim = Simulation::new(all_alive_config());
    // .1 hosts run the server template: 80 open, 443 closed, 22 filtered.
    sim.start_scan(&[ip(1)], ScanKind::Syn, &[80, 443, 22], TimingTier::T5)
        .unwrap();
    let log = run_to_completion(&mut sim);
    assert!(log.completed);

    let to_attacker: Vec<_> = log
        .delivered
        .iter()
        .filter(|p| p.destination.role == Role::Attacker)
        .collect();

    let syn_acks: Vec<_> = to_attacker
        .iter()
        .filter(|p| p.flags() == [Flag::Syn, Flag::Ack])
        .collect();
    assert_eq!(syn_acks.len(), 1);
    assert_eq!(syn_acks[0].source.port, 80);

    let rst_acks: Vec<_> = to_attacker
        .iter()
        .filter(|p| p.flags() == [Flag::Rst, Flag::Ack])
        .collect();
    assert_eq!(rst_acks.len(), 1);
    assert_eq!(rst_acks[0].source.port, 443);

    // The filtered port dropped its probe on the floor.
    assert!(to_attacker.iter().all(|p| p.source.port != 22));

    // Half-open scan: the one SYN,ACK was aborted with exactly one RST.
    let aborts: Vec<_> = log
        .delivered
        .iter()
        .filter(|p| p.destination.role == Role::Target && p.flags() == [Flag::Rst])
        .collect();
    assert_eq!(aborts.len(), 1);
    assert_eq!(aborts[0].destination.port, 80);
}

#[test]
fn connect_scan_completes_the_handshake_with_an_ack() {
    let mut sim = Simulation::new(all_alive_config());
    sim.start_scan(&[ip(1)], ScanKind::Connect, &[80], TimingTier::T5)
        .unwrap();
    let log = run_to_completion(&mut sim);

    let closing_acks: Vec<_> = log
        .delivered
        .iter()
        .filter(|p| p.destination.role == Role::Target && p.flags() == [Flag::Ack])
        .collect();
    assert_eq!(closing_acks.len(), 1);
    assert_eq!(closing_acks[0].destination.port, 80);
    // And no RST abort anywhere; that belongs to SYN scans.
    assert!(log.delivered.iter().all(|p| p.flags() != [Flag::Rst]));
}

#[test]
fn udp_scan_preserves_the_open_filtered_ambiguity() {
    let mut sim = Simulation::new(all_alive_config());
    // 53 is open on the server template, 161 is unconfigured (closed).
    sim.start_scan(&[ip(1)], ScanKind::Udp, &[53, 161], TimingTier::T5)
        .unwrap();
    let log = run_to_completion(&mut sim);

    // The open port got a payload-less probe and said nothing.
    assert!(
        log.delivered
            .iter()
            .all(|p| !(p.destination.role == Role::Attacker && p.source.port == 53))
    );

    let unreachable: Vec<_> = log
        .delivered
        .iter()
        .filter(|p| p.flags() == [Flag::IcmpUnreach])
        .collect();
    assert_eq!(unreachable.len(), 1);
    assert_eq!(unreachable[0].source.port, 161);
}

#[test]
fn ping_scan_separates_live_and_dead_hosts() {
    let mut live = Simulation::new(all_alive_config());
    live.start_scan(&[ip(1)], ScanKind::Ping, &[80], TimingTier::T5)
        .unwrap();
    let log = run_to_completion(&mut live);
    let replies: Vec<_> = log
        .delivered
        .iter()
        .filter(|p| p.flags() == [Flag::Reply])
        .collect();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].destination.role, Role::Attacker);

    let mut dead = Simulation::new(SimConfig {
        alive_probability: 0.0,
        ..SimConfig::default()
    });
    dead.start_scan(&[ip(1)], ScanKind::Ping, &[80], TimingTier::T5)
        .unwrap();
    let log = run_to_completion(&mut dead);
    assert!(log.completed);
    assert!(log.delivered.iter().all(|p| p.flags() != [Flag::Reply]));
}

#[test]
fn version_scan_collects_banners_from_open_services_only() {
    let mut sim = Simulation::new(all_alive_config());
    // 80 open, 22 filtered on the server template.
    sim.start_scan(&[ip(1)], ScanKind::Version, &[80, 22], TimingTier::T5)
        .unwrap();
    let log = run_to_completion(&mut sim);

    let banners: Vec<_> = log
        .delivered
        .iter()
        .filter(|p| p.flags() == [Flag::Ack, Flag::Psh])
        .collect();
    assert_eq!(banners.len(), 1);
    assert_eq!(banners[0].source.port, 80);
    assert_eq!(banners[0].payload.as_deref(), Some("Apache/2.4.52 (Ubuntu)"));
}

#[test]
fn os_scan_reveals_the_fingerprint() {
    let mut sim = Simulation::new(all_alive_config());
    sim.start_scan(&[ip(1)], ScanKind::Os, &[80], TimingTier::T5)
        .unwrap();
    let log = run_to_completion(&mut sim);

    // Single probe, single fingerprint reply.
    let probes: Vec<_> = log
        .emitted
        .iter()
        .filter(|p| p.destination.role == Role::Target)
        .collect();
    assert_eq!(probes.len(), 1);
    assert_eq!(probes[0].flags(), [Flag::Fin, Flag::Urg, Flag::Psh]);

    let fingerprints: Vec<_> = log
        .delivered
        .iter()
        .filter(|p| p.payload.as_deref() == Some("Fingerprint: Linux 5.4"))
        .collect();
    assert_eq!(fingerprints.len(), 1);
    assert_eq!(fingerprints[0].flags(), [Flag::Rst, Flag::Ack]);
}

#[test]
fn same_tick_emissions_keep_submission_order() {
    // With two targets at T5, target one's second probe and target two's
    // first probe are both due at t=100ms; submission order breaks the tie.
    let mut sim = Simulation::new(all_alive_config());
    sim.start_scan(&[ip(1), ip(2)], ScanKind::Syn, &[80, 443], TimingTier::T5)
        .unwrap();
    let log = run_to_completion(&mut sim);

    let probes: Vec<_> = log
        .emitted
        .iter()
        .filter(|p| p.destination.role == Role::Target && p.has_flag(Flag::Syn))
        .map(|p| (p.destination.ip, p.destination.port))
        .collect();
    assert_eq!(
        probes,
        vec![(ip(1), 80), (ip(1), 443), (ip(2), 80), (ip(2), 443)]
    );
}

#[test]
fn identical_parameters_and_seed_reproduce_the_run() {
    let targets: Vec<_> = (1..=8).map(ip).collect();
    let run = |seed: u64| {
        let mut sim = Simulation::new(SimConfig {
            seed,
            ..SimConfig::default()
        });
        sim.start_scan(&targets, ScanKind::Ping, &[80], TimingTier::T5)
            .unwrap();
        run_to_completion(&mut sim).delivered_rendering()
    };

    let first = run(123);
    let second = run(123);
    assert_eq!(first, second);
}
