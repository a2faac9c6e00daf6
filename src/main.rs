use anyhow::Result;
use cache_cleaner::cli::{self, App};

fn main() -> Result<()> {
    let cli = cli::parse_args();
    cli::init_logging(cli.verbosity, !cli.plain);

    let app = App::from_cli(&cli);
    let runtime = cli::build_runtime()?;
    runtime.block_on(cli::run(&app, &cli.command))
}
