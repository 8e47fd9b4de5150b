//! Issuance of a server certificate signed by a CA.

use crate::{
    create_output_dir,
    error::EasyCertError,
    naming::{CaFiles, ServerFiles},
    openssl::{IssueSettings, Step, genrsa_args, request_args, sign_args},
    run_step,
    runner::CommandRunner,
};

/// Generates a key, a signing request and a certificate signed by `ca` for
/// `fqdn` under `settings.output_dir`.
///
/// The signing step creates (or advances) the serial file in the host
/// directory. Stops at the first failing step.
pub fn create_server_cert_key(
    fqdn: &str,
    ca: &CaFiles,
    settings: &IssueSettings,
    runner: &dyn CommandRunner,
) -> Result<ServerFiles, EasyCertError> {
    let files = ServerFiles::derive(&settings.output_dir, fqdn, &settings.cert_extension);
    create_output_dir(&files.dir)?;

    run_step(
        Step::ServerKey,
        runner,
        &settings.program,
        genrsa_args(&files.key, settings.key_bits),
    )?;
    run_step(
        Step::ServerRequest,
        runner,
        &settings.program,
        request_args(&files.request, &files.key, fqdn),
    )?;
    run_step(
        Step::ServerCert,
        runner,
        &settings.program,
        sign_args(&files.request, &files.cert, ca, &files.serial, settings),
    )?;

    Ok(files)
}
