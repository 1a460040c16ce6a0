use thiserror::Error;

/// Every variant's Display text is the exact user-facing message mandated by the spec.
/// `cmd.rs` prints `{err}` verbatim and exits 0 — no variant should ever reach `main` unhandled.
#[derive(Debug, Error)]
pub enum GitletError {
    #[error("Not in an initialized Gitlet directory.")]
    NotInitialized,
    #[error("A Gitlet version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("Please enter a commit message.")]
    EmptyCommitMessage,
    #[error("No changes added to the commit.")]
    NothingToCommit,

    #[error("File does not exist.")]
    FileNotExist,
    #[error("File does not exist in that commit.")]
    FileNotInCommit,
    #[error("No reason to remove the file.")]
    NoReasonToRemove,

    #[error("No commit with that id exists.")]
    NoSuchCommit,
    #[error("Found no commit with that message.")]
    NoCommitWithMessage,

    #[error("A branch with that name already exists.")]
    BranchExists,
    #[error("No such branch exists.")]
    NoSuchBranch,
    #[error("No need to switch to the current branch.")]
    AlreadyOnBranch,
    #[error("Cannot remove the current branch.")]
    CannotRemoveCurrentBranch,

    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileInTheWay,

    #[error("You have uncommitted changes.")]
    UncommittedChanges,
    #[error("A branch with that name does not exist.")]
    MergeBranchNotFound,
    #[error("Cannot merge a branch with itself.")]
    MergeWithSelf,

    #[error("Incorrect operands.")]
    IncorrectOperands,
    #[error("Please enter a command.")]
    NoCommand,
    #[error("No command with that name exists.")]
    UnknownCommand,

    #[error("object not found: {0}")]
    ObjectNotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
