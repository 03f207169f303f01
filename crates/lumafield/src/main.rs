mod cli;
mod controls;
mod run;
mod shadow;
mod surface;

use anyhow::Result;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();
    run::run(cli)
}
