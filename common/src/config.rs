use std::net::{IpAddr, Ipv4Addr};

/// Knobs for building a simulation instance.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Seed for the liveness assignment; the same seed reproduces the same
    /// virtual network.
    pub seed: u64,
    /// Chance that a provisioned target answers pings at all.
    pub alive_probability: f64,
    /// Whether target firewalls start enabled.
    pub firewall_enabled: bool,
    /// Address the scanning host operates from.
    pub attacker_ip: IpAddr,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            alive_probability: 0.75,
            firewall_enabled: false,
            attacker_ip: IpAddr::V4(Ipv4Addr::new(192, 168, 1, 100)),
        }
    }
}
