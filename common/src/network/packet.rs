//! # Packet Model
//!
//! An immutable value describing one protocol exchange. Packets are built
//! once, stamped with the logical clock and the epoch of the run that
//! produced them, and never modified afterwards. The single exception is the
//! `blocked` marker, which a firewall may set at most once before delivery
//! via [`Packet::into_blocked`].

use std::collections::BTreeMap;
use std::fmt;

use super::endpoint::Endpoint;
use super::flags::{self, Flag};

/// Metadata key under which a packet advertises its scan's inter-packet
/// delay. Firewalls use it for send-time signature classification.
pub const META_TIMING: &str = "timing";

/// Delay assumed when a packet carries no timing metadata.
pub const DEFAULT_TIMING_MS: u64 = 1_000;

/// One simulated packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub source: Endpoint,
    pub destination: Endpoint,
    flags: Vec<Flag>,
    pub payload: Option<String>,
    metadata: BTreeMap<String, String>,
    /// Logical-clock milliseconds at creation.
    pub timestamp: u64,
    epoch: u64,
    blocked: bool,
}

impl Packet {
    /// Builds a packet stamped with the given creation time.
    ///
    /// Source and destination must differ; a host never talks to itself in
    /// this simulation.
    pub fn new(source: Endpoint, destination: Endpoint, flags: Vec<Flag>, timestamp: u64) -> Self {
        debug_assert!(
            source.ip != destination.ip || source.port != destination.port,
            "packet source and destination must differ"
        );
        Self {
            source,
            destination,
            flags,
            payload: None,
            metadata: BTreeMap::new(),
            timestamp,
            epoch: 0,
            blocked: false,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Records the originating scan's configured delay in the metadata map.
    pub fn with_timing(mut self, delay_ms: u64) -> Self {
        self.metadata
            .insert(META_TIMING.to_string(), delay_ms.to_string());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Tags the packet with the simulation run that produced it. Deliveries
    /// compare this against the current epoch to reject stale traffic.
    pub fn with_epoch(mut self, epoch: u64) -> Self {
        self.epoch = epoch;
        self
    }

    /// Marks the packet as dropped by a firewall. Consumed and rebuilt so the
    /// marker can only be applied while the packet is still being produced.
    pub fn into_blocked(mut self) -> Self {
        self.blocked = true;
        self
    }

    /// Builds a response travelling the opposite direction, keeping the
    /// originating packet's epoch.
    pub fn reply(&self, flags: Vec<Flag>, timestamp: u64) -> Self {
        Packet::new(self.destination, self.source, flags, timestamp).with_epoch(self.epoch)
    }

    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// The scan delay this packet advertises, falling back to the default
    /// profile when the metadata is missing or unparsable.
    pub fn timing_ms(&self) -> u64 {
        self.metadata
            .get(META_TIMING)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_TIMING_MS)
    }
}

impl fmt::Display for Packet {
    /// Canonical rendering: `src_ip:src_port -> dst_ip:dst_port [FLAGS] payload`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} [{}]",
            self.source,
            self.destination,
            flags::render(&self.flags)
        )?;
        if let Some(payload) = &self.payload {
            write!(f, " {payload}")?;
        }
        Ok(())
    }
}
