use std::{ffi::OsString, fs, path::Path};

use clap::Parser;

use crate::{
    config::{AppConfig, CliArgs, load_config, normalize_args},
    error::{EasyCertError, UsageError},
    issue::create_server_cert_key,
    naming::{CaFiles, ServerFiles},
    openssl::Step,
    provision::create_private_ca,
    runner::{CommandRunner, SystemRunner},
    validator::{CaSource, validate},
};

pub mod config;
pub mod error;
pub mod issue;
mod macros;
pub mod naming;
pub mod openssl;
pub mod provision;
pub mod runner;
pub mod validator;

pub use crate::config::usage;

/// Files produced or used by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issued {
    pub ca: CaFiles,
    /// Whether the CA was generated by this run rather than supplied
    pub ca_generated: bool,
    pub server: ServerFiles,
}

/// Parses `argv` (program name first), loads the configuration and runs the
/// pipeline with real subprocesses.
pub fn run<I, T>(argv: I) -> Result<Issued, EasyCertError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args = CliArgs::try_parse_from(normalize_args(argv))?;
    let config = load_config(args)?;

    for line in config.to_string_lines("easycert") {
        easycert_println!("{}", line);
    }

    run_with(&config, &SystemRunner)
}

/// Validates `config`, provisions a CA unless one was supplied, and issues
/// the server certificate.
pub fn run_with(config: &AppConfig, runner: &dyn CommandRunner) -> Result<Issued, EasyCertError> {
    let plan = validate(&config.identities())?;
    let settings = config.issue_settings();

    let (ca, ca_generated) = match plan.ca {
        CaSource::Generate(name) => {
            let ca = create_private_ca(&name, &settings, runner)?;
            easycert_println!("Private root certificate created: {}", ca.cert.display());
            easycert_println!("Private root key created: {}", ca.key.display());
            (ca, true)
        }
        CaSource::Existing(ca) => {
            easycert_println!("Using existing root certificate: {}", ca.cert.display());
            (ca, false)
        }
    };

    let server = create_server_cert_key(&plan.fqdn, &ca, &settings, runner)?;
    easycert_println!("Web server certificate created: {}", server.cert.display());
    easycert_println!("Web server key created: {}", server.key.display());

    Ok(Issued {
        ca,
        ca_generated,
        server,
    })
}

/// Prints the outcome of [run] and returns the process exit status: `0` on
/// success and for `--help`/`--version`, `1` otherwise.
pub fn report(result: &Result<Issued, EasyCertError>) -> u8 {
    let err = match result {
        Ok(_) => return 0,
        Err(e) => e,
    };

    match err {
        EasyCertError::ParseArgsFailedError(clap_err) => {
            let _ = clap_err.print();
        }
        EasyCertError::InvalidArgumentsError(UsageError::NoArgumentsError()) => {}
        other => easycert_eprintln!("{}", other),
    }
    if err.is_help_or_version() {
        return 0;
    }
    if err.wants_usage() {
        eprintln!();
        eprintln!("{}", usage());
    }
    1
}

/// Creates `dir` (and missing parents) readable by the owner only. An
/// existing directory is reused.
pub(crate) fn create_output_dir(dir: &Path) -> Result<(), EasyCertError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder
        .create(dir)
        .map_err(|e| EasyCertError::DirCreationFailedError(dir.to_path_buf(), e))
}

/// Runs one pipeline step, mapping a failure to the step that caused it.
pub(crate) fn run_step(
    step: Step,
    runner: &dyn CommandRunner,
    program: &str,
    args: Vec<OsString>,
) -> Result<(), EasyCertError> {
    let subcommand = args.first().map(|a| a.to_string_lossy()).unwrap_or_default();
    step_println!(step, "running {} {}", program, subcommand);
    runner.run(program, &args).map(|_| ()).map_err(|e| {
        step_eprintln!(step, "{}", step.failure_message());
        EasyCertError::StepFailedError(step, e)
    })
}
