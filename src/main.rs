use clap::Parser;
use gitlet_rs::cmd::{self, GitletCommand};
use gitlet_rs::error::GitletError;

#[derive(Parser, Debug)]
#[command(name = "gitlet-rs", no_binary_name = true, disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: GitletCommand,
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() {
        println!("{}", GitletError::NoCommand);
        return;
    }

    if args[0] == "restore" {
        cmd::execute_restore(&args[1..]);
        return;
    }

    match Cli::try_parse_from(&args) {
        Ok(cli) => cmd::execute(cli.command),
        Err(err) => {
            use clap::error::ErrorKind;
            match err.kind() {
                ErrorKind::InvalidSubcommand => println!("{}", GitletError::UnknownCommand),
                _ => println!("{}", GitletError::IncorrectOperands),
            }
        }
    }
}
