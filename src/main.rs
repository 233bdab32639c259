use clap::Parser;
use std::process;

use taskboard::cli::commands::{Cli, Commands};
use taskboard::cli::{self, Context};
use taskboard::logging;

fn main() {
    logging::init_logging();

    let cli_args = Cli::parse();
    let ctx = Context {
        json: cli_args.json,
        dir: cli_args.dir,
        yes: cli_args.yes,
    };

    let exit_code = match cli_args.command {
        Commands::Init => cli::init::run(&ctx),
        Commands::Board { expand, all } => cli::board::run(&ctx, &expand, all),
        Commands::Project(cmd) => cli::project::run(cmd, &ctx),
        Commands::Todo(cmd) => cli::todo::run(cmd, &ctx),
        Commands::Reset => cli::reset::run(&ctx),
    };

    process::exit(exit_code);
}
