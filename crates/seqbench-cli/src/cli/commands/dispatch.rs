use super::super::args::{Cli, Command};
use crate::exit_codes::SUCCESS;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Fetch(args) => super::fetch::run(args).await,
        Command::Generate(args) => super::generate::run(args).await,
        Command::Extract(args) => super::extract::run(args),
        Command::Classify(args) => super::classify::run(args).await,
        Command::Eval(args) => super::eval::run(args).await,
        Command::Report(args) => super::report::run(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}
