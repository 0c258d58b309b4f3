use std::process::exit;

use clap::Parser;
use rex::cmd_explorer::{parser::ToolOpts, run_opts};
use rex::logging::init_logging;

fn main() {
    init_logging();

    let opts = ToolOpts::parse();
    let result = run_opts(opts).and_then(|output| output.emit());
    if let Err(err) = result {
        eprintln!("rex: {}", err);
        exit(1);
    }
}
