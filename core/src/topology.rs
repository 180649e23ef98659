//! # Virtual Network Provisioning
//!
//! Builds the target hosts a scan runs against. The layout is deterministic
//! for a given seed: OS assignment alternates by position, liveness is drawn
//! from a seeded RNG, and the port template depends on the address. Hosts at
//! `.1`, `.100` and `.254` look like infrastructure boxes running public
//! services; everything else looks like a Windows workstation.

use std::collections::BTreeMap;
use std::net::IpAddr;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::Rng;

use scansim_common::config::SimConfig;
use scansim_common::network::endpoint::Role;
use scansim_common::network::host::{Host, PortState};

/// Final octets that get the server port template.
const SERVER_OCTETS: [u8; 3] = [1, 100, 254];

/// Provisions one host per target address, in the order given.
pub fn provision_targets(ips: &[IpAddr], config: &SimConfig) -> BTreeMap<IpAddr, Host> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut hosts = BTreeMap::new();

    for (index, &ip) in ips.iter().enumerate() {
        let os = if index % 2 == 0 {
            "Linux 5.4"
        } else {
            "Windows 10"
        };
        let mut host = Host::new(ip, Role::Target, os);
        host.is_alive = rng.random_bool(config.alive_probability.clamp(0.0, 1.0));
        host.set_firewall(config.firewall_enabled);

        if is_server_address(ip) {
            host.add_port_with_version(80, PortState::Open, "http", "Apache/2.4.52 (Ubuntu)");
            host.add_port(443, PortState::Closed, "https");
            host.add_port(22, PortState::Filtered, "ssh");
            host.add_port_with_version(53, PortState::Open, "domain", "BIND 9.18.1");
        } else {
            host.add_port(135, PortState::Open, "msrpc");
            host.add_port(445, PortState::Open, "microsoft-ds");
        }

        hosts.insert(ip, host);
    }

    hosts
}

fn is_server_address(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => SERVER_OCTETS.contains(&v4.octets()[3]),
        IpAddr::V6(_) => false,
    }
}
