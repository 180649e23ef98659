//! # Scan Parameters
//!
//! The kinds of scans the orchestrator knows how to run and the timing
//! profiles that pace them.

use std::fmt;
use std::str::FromStr;

use crate::error::ScanConfigError;

/// Scan technique, mirroring the usual nmap switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    /// Half-open SYN scan (`-sS`); open ports are answered and then aborted
    /// with a RST.
    Syn,
    /// Full TCP connect scan (`-sT`); completes the handshake with an ACK.
    Connect,
    /// UDP probe scan (`-sU`).
    Udp,
    /// Service/version detection (`-sV`).
    Version,
    /// OS fingerprint probe (`-O`).
    Os,
    /// ICMP echo host discovery (`-sn`).
    Ping,
}

impl ScanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanKind::Syn => "syn",
            ScanKind::Connect => "connect",
            ScanKind::Udp => "udp",
            ScanKind::Version => "version",
            ScanKind::Os => "os",
            ScanKind::Ping => "ping",
        }
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanKind {
    type Err = ScanConfigError;

    /// Accepts both the plain names and the nmap-style switches.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "syn" | "-ss" => Ok(ScanKind::Syn),
            "connect" | "-st" => Ok(ScanKind::Connect),
            "udp" | "-su" => Ok(ScanKind::Udp),
            "version" | "-sv" => Ok(ScanKind::Version),
            "os" | "-o" => Ok(ScanKind::Os),
            "ping" | "-sn" => Ok(ScanKind::Ping),
            other => Err(ScanConfigError::InvalidScanKind(other.to_string())),
        }
    }
}

/// Enumerated scan-speed profile, `T0` (paranoid) through `T5` (insane).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimingTier {
    T0,
    T1,
    T2,
    #[default]
    T3,
    T4,
    T5,
}

impl TimingTier {
    /// Inter-packet delay for this tier.
    pub fn delay_ms(&self) -> u64 {
        match self {
            TimingTier::T0 => 5_000,
            TimingTier::T1 => 4_000,
            TimingTier::T2 => 2_000,
            TimingTier::T3 => 1_000,
            TimingTier::T4 => 500,
            TimingTier::T5 => 100,
        }
    }

    /// Maps a numeric `-T` level to a tier.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(TimingTier::T0),
            1 => Some(TimingTier::T1),
            2 => Some(TimingTier::T2),
            3 => Some(TimingTier::T3),
            4 => Some(TimingTier::T4),
            5 => Some(TimingTier::T5),
            _ => None,
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            TimingTier::T0 => 0,
            TimingTier::T1 => 1,
            TimingTier::T2 => 2,
            TimingTier::T3 => 3,
            TimingTier::T4 => 4,
            TimingTier::T5 => 5,
        }
    }
}

impl fmt::Display for TimingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.level())
    }
}
