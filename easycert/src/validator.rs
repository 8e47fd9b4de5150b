//! Pre-flight check of the identity flags.

use std::path::Path;

use crate::{error::UsageError, naming::CaFiles};

/// The four identity inputs. Empty values count as not supplied.
#[derive(Debug, Clone, Copy)]
pub struct Identities<'a> {
    pub ca_name: &'a str,
    pub ca_key_file: &'a Path,
    pub ca_cert_file: &'a Path,
    pub fqdn: &'a str,
}

/// Where the signing CA comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaSource {
    /// Generate a new CA with this name
    Generate(String),
    /// Use a key/certificate pair already on disk
    Existing(CaFiles),
}

/// A legal flag combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub ca: CaSource,
    pub fqdn: String,
}

/// Decides whether the combination of identities is legal.
///
/// Nothing is written and no subprocess is started. The only side effect is
/// checking that caller-supplied CA files exist.
pub fn validate(ids: &Identities) -> Result<Plan, UsageError> {
    let has_name = !ids.ca_name.is_empty();
    let has_key = !ids.ca_key_file.as_os_str().is_empty();
    let has_cert = !ids.ca_cert_file.as_os_str().is_empty();
    let has_fqdn = !ids.fqdn.is_empty();

    if !has_name && !has_key && !has_cert && !has_fqdn {
        return Err(UsageError::NoArgumentsError());
    }

    for identity in [ids.ca_name, ids.fqdn] {
        if !is_plain_identity(identity) {
            return Err(UsageError::InvalidIdentityError(identity.to_owned()));
        }
    }

    if has_name && (has_key || has_cert) {
        return Err(UsageError::AmbiguousCaSourceError());
    }

    if !has_key && !has_cert {
        if !has_name || !has_fqdn {
            return Err(UsageError::MissingCaNameOrFqdnError());
        }
        return Ok(Plan {
            ca: CaSource::Generate(ids.ca_name.to_owned()),
            fqdn: ids.fqdn.to_owned(),
        });
    }

    if !has_key || !has_cert || !has_fqdn {
        return Err(UsageError::MissingCaFilesOrFqdnError());
    }
    if !ids.ca_key_file.exists() {
        return Err(UsageError::CaKeyFileNotFoundError(
            ids.ca_key_file.to_path_buf(),
        ));
    }
    if !ids.ca_cert_file.exists() {
        return Err(UsageError::CaCertFileNotFoundError(
            ids.ca_cert_file.to_path_buf(),
        ));
    }

    Ok(Plan {
        ca: CaSource::Existing(CaFiles {
            key: ids.ca_key_file.to_path_buf(),
            cert: ids.ca_cert_file.to_path_buf(),
        }),
        fqdn: ids.fqdn.to_owned(),
    })
}

/// Identities become directory and file names under the output directory,
/// so they must not carry path separators or be absolute.
fn is_plain_identity(identity: &str) -> bool {
    !identity.contains(['/', '\\']) && !Path::new(identity).is_absolute()
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use tempfile::tempdir;

    use super::*;

    fn ids<'a>(name: &'a str, key: &'a Path, cert: &'a Path, fqdn: &'a str) -> Identities<'a> {
        Identities {
            ca_name: name,
            ca_key_file: key,
            ca_cert_file: cert,
            fqdn,
        }
    }

    #[test]
    fn nothing_supplied() {
        let empty = Path::new("");
        assert_eq!(
            validate(&ids("", empty, empty, "")),
            Err(UsageError::NoArgumentsError())
        );
    }

    #[test]
    fn name_only_mode() {
        let empty = Path::new("");
        assert_eq!(
            validate(&ids("example_com", empty, empty, "www.example.com")),
            Ok(Plan {
                ca: CaSource::Generate("example_com".to_owned()),
                fqdn: "www.example.com".to_owned(),
            })
        );
        assert_eq!(
            validate(&ids("example_com", empty, empty, "")),
            Err(UsageError::MissingCaNameOrFqdnError())
        );
        assert_eq!(
            validate(&ids("", empty, empty, "www.example.com")),
            Err(UsageError::MissingCaNameOrFqdnError())
        );
    }

    #[test]
    fn name_and_files_are_ambiguous() {
        let empty = Path::new("");
        let key = Path::new("ca.key");
        let cert = Path::new("ca.crt");
        for (k, c) in [(key, empty), (empty, cert), (key, cert)] {
            assert_eq!(
                validate(&ids("example_com", k, c, "www.example.com")),
                Err(UsageError::AmbiguousCaSourceError())
            );
        }
    }

    #[test]
    fn file_pair_mode() {
        let dir = tempdir().expect("failed to create temp dir");
        let key = dir.path().join("ca.key");
        let cert = dir.path().join("ca.crt");
        fs::write(&key, "key").expect("failed to write key");
        fs::write(&cert, "cert").expect("failed to write cert");

        assert_eq!(
            validate(&ids("", &key, &cert, "host.local")),
            Ok(Plan {
                ca: CaSource::Existing(CaFiles {
                    key: key.clone(),
                    cert: cert.clone(),
                }),
                fqdn: "host.local".to_owned(),
            })
        );
    }

    #[test]
    fn file_pair_mode_needs_every_companion() {
        let empty = Path::new("");
        let key = Path::new("ca.key");
        let cert = Path::new("ca.crt");
        for (k, c, fqdn) in [
            (key, empty, "host"),
            (empty, cert, "host"),
            (key, cert, ""),
        ] {
            assert_eq!(
                validate(&ids("", k, c, fqdn)),
                Err(UsageError::MissingCaFilesOrFqdnError())
            );
        }
    }

    #[test]
    fn missing_files_are_named() {
        let dir = tempdir().expect("failed to create temp dir");
        let key = dir.path().join("ca.key");
        let cert = dir.path().join("ca.crt");
        let absent: PathBuf = dir.path().join("absent");

        fs::write(&cert, "cert").expect("failed to write cert");
        assert_eq!(
            validate(&ids("", &key, &cert, "host")),
            Err(UsageError::CaKeyFileNotFoundError(key.clone()))
        );

        fs::write(&key, "key").expect("failed to write key");
        assert_eq!(
            validate(&ids("", &key, &absent, "host")),
            Err(UsageError::CaCertFileNotFoundError(absent.clone()))
        );
    }

    #[test]
    fn identities_with_path_separators_are_rejected() {
        let empty = Path::new("");
        for fqdn in ["/tmp/x/evil", "a/b", "..\\up", "/"] {
            assert_eq!(
                validate(&ids("acme", empty, empty, fqdn)),
                Err(UsageError::InvalidIdentityError(fqdn.to_owned()))
            );
        }
        assert_eq!(
            validate(&ids("/etc/acme", empty, empty, "host")),
            Err(UsageError::InvalidIdentityError("/etc/acme".to_owned()))
        );
        assert_eq!(
            validate(&ids("acme", empty, empty, "www.example.com")).map(|p| p.fqdn),
            Ok("www.example.com".to_owned())
        );
    }

    #[test]
    fn fqdn_is_checked_in_file_pair_mode() {
        let dir = tempdir().expect("failed to create temp dir");
        let key = dir.path().join("ca.key");
        let cert = dir.path().join("ca.crt");
        fs::write(&key, "key").expect("failed to write key");
        fs::write(&cert, "cert").expect("failed to write cert");

        assert_eq!(
            validate(&ids("", &key, &cert, "sub/host")),
            Err(UsageError::InvalidIdentityError("sub/host".to_owned()))
        );
    }
}
