use std::fmt;

/// Protocol markers carried by a simulated packet.
///
/// A packet holds an ordered list of these; the order is the order they were
/// set in and is preserved through rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Syn,
    Ack,
    Rst,
    Fin,
    Psh,
    Urg,
    Echo,
    Reply,
    Udp,
    IcmpUnreach,
    Blocked,
}

impl Flag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Syn => "SYN",
            Flag::Ack => "ACK",
            Flag::Rst => "RST",
            Flag::Fin => "FIN",
            Flag::Psh => "PSH",
            Flag::Urg => "URG",
            Flag::Echo => "ECHO",
            Flag::Reply => "REPLY",
            Flag::Udp => "UDP",
            Flag::IcmpUnreach => "ICMP_UNREACH",
            Flag::Blocked => "BLOCKED",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders a flag list the way packet logs expect it: `SYN,ACK`.
pub fn render(flags: &[Flag]) -> String {
    flags
        .iter()
        .map(Flag::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
