use std::error::Error;

use clap::Parser;
use log::LevelFilter;

use app::App;
use console::TerminalConsole;
use store::TaskStore;

mod app;
mod console;
mod error;
mod model;
mod store;

/// Keep track of course tasks for the current session.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Do not clear the screen before each menu
    #[arg(long)]
    no_clear: bool,

    /// Log more to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logger(args.verbose);

    log::info!("Starting with an empty task list");
    let mut app = App::new(TaskStore::new(), TerminalConsole::new(!args.no_clear));
    app.run()?;
    Ok(())
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
