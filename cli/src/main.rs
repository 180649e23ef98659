mod commands;
mod terminal;

use commands::{CommandLine, Commands, info, scan};

fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    terminal::logging::init();

    match commands.command {
        Commands::Info => {
            terminal::print::header("engine reference");
            Ok(info::info())
        }
        Commands::Scan(args) => {
            terminal::print::header("starting simulated scan");
            scan::scan(args)
        }
    }
}
