//! Argument vectors handed to the `openssl` command-line tool.

use std::{
    ffi::OsString,
    fmt::{Display, Formatter},
    path::{Path, PathBuf},
};

use crate::naming::CaFiles;

/// One external invocation of the issuing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CaKey,
    CaCert,
    ServerKey,
    ServerRequest,
    ServerCert,
}

impl Step {
    /// Message reported when this step fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Step::CaKey => "could not create private Certificate Authority key",
            Step::CaCert => "could not create private Certificate Authority certificate",
            Step::ServerKey => "could not create private server key",
            Step::ServerRequest => "could not create private server certificate signing request",
            Step::ServerCert => "could not create private server certificate",
        }
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::CaKey => write!(f, "ca-key"),
            Step::CaCert => write!(f, "ca-cert"),
            Step::ServerKey => write!(f, "server-key"),
            Step::ServerRequest => write!(f, "server-req"),
            Step::ServerCert => write!(f, "server-cert"),
        }
    }
}

/// Knobs shared by the CA provisioner and the server issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSettings {
    /// Base directory the CA and host directories are created in.
    pub output_dir: PathBuf,
    /// External program to run.
    pub program: String,
    pub key_bits: u32,
    pub ca_validity_days: u32,
    pub server_validity_days: u32,
    /// Message digest flag without the dash, e.g. `sha256`. `None` leaves
    /// the choice to the tool.
    pub digest: Option<String>,
    /// Extension section used for the CA certificate.
    pub ca_extensions: Option<String>,
    /// File extension of issued certificates (`crt` or `cer`).
    pub cert_extension: String,
}

impl Default for IssueSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./"),
            program: "openssl".to_owned(),
            key_bits: 2048,
            ca_validity_days: 7300,
            server_validity_days: 7300,
            digest: Some("sha256".to_owned()),
            ca_extensions: Some("v3_ca".to_owned()),
            cert_extension: "crt".to_owned(),
        }
    }
}

fn subject(common_name: &str) -> OsString {
    format!("/CN={}", common_name).into()
}

/// `genrsa -out <key> <bits>`
pub fn genrsa_args(key: &Path, key_bits: u32) -> Vec<OsString> {
    vec![
        "genrsa".into(),
        "-out".into(),
        key.into(),
        key_bits.to_string().into(),
    ]
}

/// `req -x509 -new -key <key> -out <cert> -days <days> [-<digest>]
/// [-extensions <section>] -subj /CN=<ca_name>`
pub fn self_signed_args(
    key: &Path,
    cert: &Path,
    ca_name: &str,
    settings: &IssueSettings,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "req".into(),
        "-x509".into(),
        "-new".into(),
        "-key".into(),
        key.into(),
        "-out".into(),
        cert.into(),
        "-days".into(),
        settings.ca_validity_days.to_string().into(),
    ];
    if let Some(digest) = &settings.digest {
        args.push(format!("-{}", digest).into());
    }
    if let Some(section) = &settings.ca_extensions {
        args.push("-extensions".into());
        args.push(section.into());
    }
    args.push("-subj".into());
    args.push(subject(ca_name));
    args
}

/// `req -new -out <req> -key <key> -subj /CN=<fqdn>`
pub fn request_args(request: &Path, key: &Path, fqdn: &str) -> Vec<OsString> {
    vec![
        "req".into(),
        "-new".into(),
        "-out".into(),
        request.into(),
        "-key".into(),
        key.into(),
        "-subj".into(),
        subject(fqdn),
    ]
}

/// `x509 -req -in <req> -out <cert> -CAkey <ca key> -CA <ca cert>
/// -days <days> [-<digest>] -CAcreateserial -CAserial <serial>`
pub fn sign_args(
    request: &Path,
    cert: &Path,
    ca: &CaFiles,
    serial: &Path,
    settings: &IssueSettings,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "x509".into(),
        "-req".into(),
        "-in".into(),
        request.into(),
        "-out".into(),
        cert.into(),
        "-CAkey".into(),
        ca.key.as_path().into(),
        "-CA".into(),
        ca.cert.as_path().into(),
        "-days".into(),
        settings.server_validity_days.to_string().into(),
    ];
    if let Some(digest) = &settings.digest {
        args.push(format!("-{}", digest).into());
    }
    args.push("-CAcreateserial".into());
    args.push("-CAserial".into());
    args.push(serial.into());
    args
}
