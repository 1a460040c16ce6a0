use crate::error::GitletError;
use crate::repo::Repository;
use clap::Subcommand;

/// Mirrors the command table of spec §6. `restore`'s two call forms
/// (`restore -- <path>` / `restore <commit> -- <path>`) don't fit clap's
/// positional model cleanly, so `main.rs` intercepts `restore` before
/// handing the rest of argv to this parser.
#[derive(Subcommand, Debug)]
pub enum GitletCommand {
    Init,
    Add {
        path: String,
    },
    Rm {
        path: String,
    },
    Commit {
        message: String,
    },
    Log,
    GlobalLog,
    Find {
        message: String,
    },
    Status,
    Branch {
        name: String,
    },
    Switch {
        name: String,
    },
    RmBranch {
        name: String,
    },
    Reset {
        commit: String,
    },
    Merge {
        branch: String,
    },
}

pub fn execute(command: GitletCommand) {
    if let Err(err) = dispatch(command) {
        println!("{}", err);
    }
}

fn dispatch(command: GitletCommand) -> Result<(), GitletError> {
    if matches!(command, GitletCommand::Init) {
        let mut repo = Repository::new()?;
        repo.init()?;
        println!(
            "Initialized empty Gitlet repository in {}",
            repo.metadata_dir_display()
        );
        return Ok(());
    }

    let mut repo = Repository::open()?;
    match command {
        GitletCommand::Init => unreachable!("handled above"),
        GitletCommand::Add { path } => repo.add(&path),
        GitletCommand::Rm { path } => repo.remove(&path),
        GitletCommand::Commit { message } => repo.commit(&message),
        GitletCommand::Log => repo.log().map(print_nonempty),
        GitletCommand::GlobalLog => repo.global_log().map(print_nonempty),
        GitletCommand::Find { message } => repo.find(&message).map(print_nonempty),
        GitletCommand::Status => repo.status().map(print_nonempty),
        GitletCommand::Branch { name } => repo.branch(&name),
        GitletCommand::Switch { name } => repo.switch(&name),
        GitletCommand::RmBranch { name } => repo.rm_branch(&name),
        GitletCommand::Reset { commit } => repo.reset(&commit),
        GitletCommand::Merge { branch } => repo.merge(&branch).map(print_nonempty),
    }
}

fn print_nonempty(message: String) {
    if !message.is_empty() {
        println!("{}", message);
    }
}

/// Handles `restore -- <path>` and `restore <commit> -- <path>` directly,
/// since clap's trailing-var-arg handling would swallow the `--` separator
/// these forms rely on to disambiguate.
pub fn execute_restore(args: &[String]) {
    if let Err(err) = dispatch_restore(args) {
        println!("{}", err);
    }
}

fn dispatch_restore(args: &[String]) -> Result<(), GitletError> {
    match args {
        [dash, path] if dash == "--" => Repository::open()?.restore(path),
        [commit, dash, path] if dash == "--" => Repository::open()?.restore_from(commit, path),
        _ => Err(GitletError::IncorrectOperands),
    }
}
