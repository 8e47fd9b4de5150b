//! Derives output directories and file names from identity strings.

use std::path::{Path, PathBuf};

/// Suffix appended to the CA base name.
pub const CA_SUFFIX: &str = "_CA";

/// Name of the serial side-file written into the host directory.
pub const SERIAL_FILE_NAME: &str = "serial";

/// Turns an identity (CA name, FQDN) into a file-system friendly stem by
/// replacing every `.` with `_`.
pub fn file_stem(identity: &str) -> String {
    identity.replace('.', "_")
}

/// A CA private key and its self-signed certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaFiles {
    pub key: PathBuf,
    pub cert: PathBuf,
}

impl CaFiles {
    /// Directory a generated CA lives in: `<base>/<stem>_CA`.
    pub fn dir_for(base: impl AsRef<Path>, ca_name: &str) -> PathBuf {
        base.as_ref()
            .join(format!("{}{}", file_stem(ca_name), CA_SUFFIX))
    }

    /// Paths of a CA generated under `base`:
    /// `<stem>_CA/<stem>_CA.key` and `<stem>_CA/<stem>_CA.<cert_ext>`.
    pub fn derive(base: impl AsRef<Path>, ca_name: &str, cert_ext: &str) -> Self {
        let stem = format!("{}{}", file_stem(ca_name), CA_SUFFIX);
        let dir = base.as_ref().join(&stem);
        Self {
            key: dir.join(format!("{}.key", stem)),
            cert: dir.join(format!("{}.{}", stem, cert_ext)),
        }
    }
}

/// Artifacts issued for one server host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerFiles {
    pub dir: PathBuf,
    pub key: PathBuf,
    pub request: PathBuf,
    pub cert: PathBuf,
    pub serial: PathBuf,
}

impl ServerFiles {
    pub fn derive(base: impl AsRef<Path>, fqdn: &str, cert_ext: &str) -> Self {
        let stem = file_stem(fqdn);
        let dir = base.as_ref().join(&stem);
        Self {
            key: dir.join(format!("{}.key", stem)),
            request: dir.join(format!("{}.req", stem)),
            cert: dir.join(format!("{}.{}", stem, cert_ext)),
            serial: dir.join(SERIAL_FILE_NAME),
            dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stem_replaces_every_dot() {
        assert_eq!(file_stem("www.example.com"), "www_example_com");
        assert_eq!(file_stem("example_com"), "example_com");
        assert_eq!(file_stem("..a."), "__a_");
        assert_eq!(file_stem(""), "");
    }

    #[test]
    fn ca_files_layout() {
        let files = CaFiles::derive("out", "example.com", "crt");
        assert_eq!(files.key, Path::new("out/example_com_CA/example_com_CA.key"));
        assert_eq!(files.cert, Path::new("out/example_com_CA/example_com_CA.crt"));
        assert_eq!(
            CaFiles::dir_for("out", "example.com"),
            Path::new("out/example_com_CA")
        );
    }

    #[test]
    fn server_files_layout() {
        let files = ServerFiles::derive("", "www.example.com", "cer");
        assert_eq!(files.dir, Path::new("www_example_com"));
        assert_eq!(files.key, Path::new("www_example_com/www_example_com.key"));
        assert_eq!(files.request, Path::new("www_example_com/www_example_com.req"));
        assert_eq!(files.cert, Path::new("www_example_com/www_example_com.cer"));
        assert_eq!(files.serial, Path::new("www_example_com/serial"));
    }

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(
            ServerFiles::derive("x", "a.b", "crt"),
            ServerFiles::derive("x", "a.b", "crt")
        );
        assert_eq!(CaFiles::derive("x", "a.b", "crt"), CaFiles::derive("x", "a.b", "crt"));
    }
}
