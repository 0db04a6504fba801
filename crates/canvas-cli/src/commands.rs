use anyhow::Result;

use crate::args::{Cli, Commands};
use crate::context::Context;
use crate::handlers::{general, regenerate};

pub fn run(cli: Cli) -> Result<()> {
    let ctx = Context::open(cli.data_dir.as_deref())?;

    match cli.command {
        Commands::Regenerate(cmd) => regenerate::run(&ctx, cmd),
        Commands::General(cmd) => general::run(&ctx, cmd),
    }
}
