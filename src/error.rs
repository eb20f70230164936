use thiserror::Error;

/// Environment problems detected before any mutation. Always fatal and
/// always safe to abort on: nothing has been written when one fires.
#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error("this installer must be run as root")]
    InsufficientPrivilege,

    #[error("{0} is not a mount point — mount the target root first")]
    TargetNotMounted(String),

    #[error("system booted in BIOS/legacy mode — only UEFI installs are supported")]
    UnsupportedBootMode,

    #[error("no EFI system partition mounted at {0} or {1}")]
    BootPartitionNotMounted(String, String),

    #[error("EFI partition {0} is not mounted inside the target — remount it and retry")]
    BootPartitionLost(String),
}

#[derive(Debug, Error)]
pub enum InstallerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Command '{0}' failed with exit code {1}")]
    CommandFailed(String, i32),

    #[error("Command '{0}' not found — is it installed?")]
    CommandNotFound(String),

    #[error("Installation cancelled by user")]
    Cancelled,

    #[error("{0}")]
    Precondition(#[from] PreconditionError),

    #[error("Phase '{phase}' failed: {source}")]
    Phase {
        phase: &'static str,
        #[source]
        source: Box<InstallerError>,
    },

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl InstallerError {
    /// Tags an error with the sequencer phase it aborted.
    /// Cancellation is a user decision, never a phase failure.
    pub fn in_phase(self, phase: &'static str) -> Self {
        match self {
            InstallerError::Cancelled => InstallerError::Cancelled,
            other => InstallerError::Phase {
                phase,
                source: Box::new(other),
            },
        }
    }
}
