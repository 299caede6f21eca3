use anyhow::Result;
use clap::Parser;

use athyra::{cli::Cli, runtime::Orchestrator, utils::init_logger};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    let verbose = cli.verbose;

    let orchestrator = Orchestrator::new(cli)?;
    init_logger(&orchestrator.config().logging.level, verbose);

    // Exit with appropriate code
    if !orchestrator.run().await? {
        std::process::exit(1);
    }

    Ok(())
}
