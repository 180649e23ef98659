use colored::*;
use scansim_common::scan::{ScanKind, TimingTier};

/// Prints the scan kinds and timing profiles the engine supports.
pub fn info() {
    println!("{}", "scan kinds".bold());
    let kinds = [
        (ScanKind::Syn, "half-open TCP scan, aborts with RST"),
        (ScanKind::Connect, "full TCP handshake, closes with ACK"),
        (ScanKind::Udp, "UDP probes, closed ports answer ICMP unreachable"),
        (ScanKind::Version, "service probes collecting banners"),
        (ScanKind::Os, "malformed-flags fingerprint probe"),
        (ScanKind::Ping, "ICMP echo host discovery"),
    ];
    for (kind, description) in kinds {
        println!("  {:<10} {description}", kind.to_string().green());
    }

    println!();
    println!("{}", "timing profiles".bold());
    for tier in (0..=5).filter_map(TimingTier::from_level) {
        println!(
            "  {:<10} {} between packets",
            tier.to_string().green(),
            format!("{}ms", tier.delay_ms())
        );
    }
}
