use clap::Parser;
use restmodels::cli::{run_cli, Cli};

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run_cli(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
