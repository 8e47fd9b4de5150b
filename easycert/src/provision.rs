//! Creation of a new private certificate authority.

use crate::{
    create_output_dir,
    error::EasyCertError,
    naming::CaFiles,
    openssl::{IssueSettings, Step, genrsa_args, self_signed_args},
    run_step,
    runner::CommandRunner,
};

/// Generates a CA key and a self-signed CA certificate for `ca_name` under
/// `settings.output_dir`.
///
/// Stops at the first failing step. Files written by earlier steps are left
/// in place.
pub fn create_private_ca(
    ca_name: &str,
    settings: &IssueSettings,
    runner: &dyn CommandRunner,
) -> Result<CaFiles, EasyCertError> {
    create_output_dir(&CaFiles::dir_for(&settings.output_dir, ca_name))?;
    let files = CaFiles::derive(&settings.output_dir, ca_name, &settings.cert_extension);

    run_step(
        Step::CaKey,
        runner,
        &settings.program,
        genrsa_args(&files.key, settings.key_bits),
    )?;
    run_step(
        Step::CaCert,
        runner,
        &settings.program,
        self_signed_args(&files.key, &files.cert, ca_name, settings),
    )?;

    Ok(files)
}
