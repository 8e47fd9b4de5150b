use std::{fmt::Formatter, path::PathBuf};

use crate::openssl::Step;

/// Flag combination rejected before any subprocess runs.
#[derive(Debug, PartialEq)]
pub enum UsageError {
    /// Nothing was supplied at all
    NoArgumentsError(),

    /// Both a CA name and CA file(s) were supplied
    AmbiguousCaSourceError(),

    /// CA generation mode without a CA name or an FQDN
    MissingCaNameOrFqdnError(),

    /// Existing-CA mode without both CA files or an FQDN
    MissingCaFilesOrFqdnError(),

    /// Supplied CA key file does not exist
    CaKeyFileNotFoundError(PathBuf),

    /// Supplied CA certificate file does not exist
    CaCertFileNotFoundError(PathBuf),

    /// CA name or FQDN is absolute or contains a path separator
    InvalidIdentityError(String),
}

impl std::error::Error for UsageError {}

impl std::fmt::Display for UsageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            UsageError::NoArgumentsError() => write!(f, "no arguments supplied"),
            UsageError::AmbiguousCaSourceError() => write!(
                f,
                "there is no need to supply --cn (certificate authority name) when a --cakey (certificate authority key file) or --cacrt (certificate authority crt file) is already available"
            ),
            UsageError::MissingCaNameOrFqdnError() => write!(
                f,
                "you must supply both a --cn (certificate authority name) and --fqdn (fully qualified domain name) parameter"
            ),
            UsageError::MissingCaFilesOrFqdnError() => write!(
                f,
                "you must supply a --cakey (certificate authority key file), --cacrt (certificate authority crt file) and --fqdn (fully qualified domain name) parameter"
            ),
            UsageError::CaKeyFileNotFoundError(path) => write!(
                f,
                "the --cakey (certificate authority key file) can not be found: {:?}",
                path
            ),
            UsageError::InvalidIdentityError(identity) => write!(
                f,
                "the --cn (certificate authority name) and --fqdn (fully qualified domain name) can not contain path separators: {:?}",
                identity
            ),
            UsageError::CaCertFileNotFoundError(path) => write!(
                f,
                "the --cacrt (certificate authority crt file) can not be found: {:?}",
                path
            ),
        }
    }
}

/// Error for one external command invocation.
#[derive(Debug)]
pub enum CommandError {
    /// The program could not be started (missing binary, permissions)
    SpawnFailedError(String, std::io::Error),

    /// The program ran and exited unsuccessfully. Holds the exit code, if
    /// any, and the captured stderr.
    ExitFailureError(String, Option<i32>, String),
}

impl std::error::Error for CommandError {}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::SpawnFailedError(program, e) => {
                write!(f, "failed to execute {}: {}", program, e)
            }
            CommandError::ExitFailureError(program, Some(code), _) => {
                write!(f, "{} exited with status {}", program, code)
            }
            CommandError::ExitFailureError(program, None, _) => {
                write!(f, "{} was terminated by a signal", program)
            }
        }
    }
}

impl PartialEq for CommandError {
    fn eq(&self, other: &Self) -> bool {
        match self {
            CommandError::SpawnFailedError(p, e) => match other {
                CommandError::SpawnFailedError(other_p, other_e) => {
                    p == other_p && e.kind() == other_e.kind()
                }
                _ => false,
            },
            CommandError::ExitFailureError(p, code, stderr) => match other {
                CommandError::ExitFailureError(other_p, other_code, other_stderr) => {
                    p == other_p && code == other_code && stderr == other_stderr
                }
                _ => false,
            },
        }
    }
}

/// Top-level error of a run.
#[derive(Debug)]
pub enum EasyCertError {
    /// Command line could not be parsed (also carries --help/--version)
    ParseArgsFailedError(clap::Error),

    /// Wraps [config::ConfigError]
    LoadConfigFailedError(config::ConfigError),

    /// Wraps [UsageError]
    InvalidArgumentsError(UsageError),

    /// Output directory could not be created
    DirCreationFailedError(PathBuf, std::io::Error),

    /// A pipeline step failed
    StepFailedError(Step, CommandError),
}

impl EasyCertError {
    /// Whether this is clap's `--help`/`--version` output rather than a
    /// failure.
    pub fn is_help_or_version(&self) -> bool {
        match self {
            EasyCertError::ParseArgsFailedError(e) => matches!(
                e.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ),
            _ => false,
        }
    }

    /// Whether the usage text should accompany this error.
    pub fn wants_usage(&self) -> bool {
        match self {
            EasyCertError::ParseArgsFailedError(_) => !self.is_help_or_version(),
            EasyCertError::InvalidArgumentsError(_) => true,
            _ => false,
        }
    }
}

impl std::error::Error for EasyCertError {}

impl std::fmt::Display for EasyCertError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EasyCertError::ParseArgsFailedError(e) => write!(f, "{}", e),
            EasyCertError::LoadConfigFailedError(e) => {
                write!(f, "failed to load configuration: {}", e)
            }
            EasyCertError::InvalidArgumentsError(e) => write!(f, "{}", e),
            EasyCertError::DirCreationFailedError(path, e) => {
                write!(f, "failed to create a directory at {:?}: {}", path, e)
            }
            EasyCertError::StepFailedError(step, e) => {
                write!(f, "{}: {}", step.failure_message(), e)
            }
        }
    }
}

impl From<clap::Error> for EasyCertError {
    fn from(value: clap::Error) -> Self {
        EasyCertError::ParseArgsFailedError(value)
    }
}

impl From<config::ConfigError> for EasyCertError {
    fn from(value: config::ConfigError) -> Self {
        EasyCertError::LoadConfigFailedError(value)
    }
}

impl From<UsageError> for EasyCertError {
    fn from(value: UsageError) -> Self {
        EasyCertError::InvalidArgumentsError(value)
    }
}
