//! # Virtual Host Model
//!
//! A host is an endpoint the simulation can probe: a fixed port table plus
//! the little mutable state the firewall and liveness checks need. The port
//! table is configured before a scan starts; afterwards only liveness,
//! firewall toggles and the rate-limit counters change.

use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;

use super::endpoint::Role;

/// Static per-port configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortState {
    Open,
    Closed,
    Filtered,
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PortState::Open => "open",
            PortState::Closed => "closed",
            PortState::Filtered => "filtered",
        };
        f.write_str(name)
    }
}

/// What a host knows about one of its ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortEntry {
    pub state: PortState,
    pub service: String,
    pub version: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Host {
    pub ip: IpAddr,
    pub role: Role,
    /// OS fingerprint string revealed by probe packets.
    pub os: String,
    ports: BTreeMap<u16, PortEntry>,
    pub is_alive: bool,
    pub firewall_enabled: bool,
    /// Arrival time of the most recent attacker packet, if any. `None` means
    /// the rate gate has nothing to compare against and never blocks.
    pub last_packet_time: Option<u64>,
    pub blocked_count: u32,
}

impl Host {
    pub fn new(ip: IpAddr, role: Role, os: impl Into<String>) -> Self {
        Self {
            ip,
            role,
            os: os.into(),
            ports: BTreeMap::new(),
            is_alive: true,
            firewall_enabled: false,
            last_packet_time: None,
            blocked_count: 0,
        }
    }

    /// Pre-scan port configuration. Calling again for the same port
    /// overwrites the earlier entry.
    pub fn add_port(&mut self, port: u16, state: PortState, service: impl Into<String>) {
        self.ports.insert(
            port,
            PortEntry {
                state,
                service: service.into(),
                version: None,
            },
        );
    }

    /// Like [`Host::add_port`] but with a known service version, surfaced by
    /// version scans and reports.
    pub fn add_port_with_version(
        &mut self,
        port: u16,
        state: PortState,
        service: impl Into<String>,
        version: impl Into<String>,
    ) {
        self.ports.insert(
            port,
            PortEntry {
                state,
                service: service.into(),
                version: Some(version.into()),
            },
        );
    }

    pub fn port(&self, port: u16) -> Option<&PortEntry> {
        self.ports.get(&port)
    }

    /// Resolves a port's state; unconfigured ports count as closed.
    pub fn port_state(&self, port: u16) -> PortState {
        self.ports
            .get(&port)
            .map(|entry| entry.state)
            .unwrap_or(PortState::Closed)
    }

    pub fn ports(&self) -> impl Iterator<Item = (u16, &PortEntry)> {
        self.ports.iter().map(|(port, entry)| (*port, entry))
    }

    pub fn set_firewall(&mut self, enabled: bool) {
        self.firewall_enabled = enabled;
    }
}
