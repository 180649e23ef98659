use colored::*;

pub fn header(title: &str) {
    println!();
    println!("{}", format!("── {title} ──").cyan().bold());
}

/// One delivered packet, prefixed with the logical arrival time.
pub fn packet_line(clock_ms: u64, rendered: &str) {
    println!("{} {rendered}", stamp(clock_ms));
}

/// A packet the firewall dropped before delivery.
pub fn dropped_line(clock_ms: u64, rendered: &str) {
    println!(
        "{} {} {}",
        stamp(clock_ms),
        "BLOCKED".red().bold(),
        rendered.dimmed()
    );
}

fn stamp(clock_ms: u64) -> ColoredString {
    format!("[{clock_ms:>7}ms]").dimmed()
}
