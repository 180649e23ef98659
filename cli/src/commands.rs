pub mod info;
pub mod scan;

use std::net::IpAddr;

use clap::{Args, Parser, Subcommand};
use scansim_common::scan::ScanKind;

#[derive(Parser)]
#[command(name = "scansim")]
#[command(about = "A deterministic nmap-style network scan simulator.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the scan kinds and timing profiles the engine understands
    #[command(alias = "i")]
    Info,
    /// Run a simulated scan against a virtual network
    #[command(alias = "s")]
    Scan(ScanArgs),
}

#[derive(Args)]
pub struct ScanArgs {
    /// Target addresses making up the virtual network
    #[arg(required = true)]
    pub targets: Vec<IpAddr>,

    /// Scan technique: syn, connect, udp, version, os or ping
    #[arg(short, long, default_value = "syn")]
    pub kind: ScanKind,

    /// Ports to probe
    #[arg(short, long, value_delimiter = ',', default_value = "80,443,22,53,3000")]
    pub ports: Vec<u16>,

    /// Timing template, 0 (paranoid) through 5 (insane)
    #[arg(short, long, default_value_t = 3)]
    pub timing: u8,

    /// Start with target firewalls enabled
    #[arg(long)]
    pub firewall: bool,

    /// Seed for the liveness assignment
    #[arg(long, default_value_t = 7)]
    pub seed: u64,

    /// Milliseconds of simulated time per tick
    #[arg(long, default_value_t = 100)]
    pub step: u64,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
