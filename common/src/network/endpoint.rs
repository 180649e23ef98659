use std::fmt;
use std::net::IpAddr;

/// Which side of the simulation an endpoint belongs to.
///
/// The firewall only ever rate-limits attacker traffic, so the role travels
/// with every endpoint instead of being looked up per packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Attacker,
    Target,
}

/// One half of a packet exchange: an address, a port and a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub ip: IpAddr,
    pub port: u16,
    pub role: Role,
}

impl Endpoint {
    pub fn attacker(ip: IpAddr, port: u16) -> Self {
        Self {
            ip,
            port,
            role: Role::Attacker,
        }
    }

    pub fn target(ip: IpAddr, port: u16) -> Self {
        Self {
            ip,
            port,
            role: Role::Target,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}
