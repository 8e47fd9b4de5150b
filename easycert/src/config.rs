use clap::{CommandFactory, Parser};
use config::{Config, ConfigError, File};
use easycert_macros::ToStringLines;
use serde::Deserialize;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::{openssl::IssueSettings, validator::Identities};

/// Creates a private certificate authority and a TLS server certificate
/// signed by it, by driving the openssl command-line tool.
///
/// Long flags may also be given with a single dash (`-cn`, `-fqdn`).
#[derive(Parser, Debug)]
#[command(name = "easycert", version, about, long_about = None)]
pub struct CliArgs {
    /// Certificate Authority name (can be any name, but should reflect your
    /// company name). Can not be used with --cakey/--cacrt.
    #[arg(long = "cn")]
    ca_name: Option<String>,

    /// Existing Certificate Authority key file. Can not be used with --cn.
    #[arg(long = "cakey")]
    ca_key_file: Option<String>,

    /// Existing Certificate Authority crt file. Can not be used with --cn.
    #[arg(long = "cacrt")]
    ca_cert_file: Option<String>,

    /// Fully qualified domain name of the TLS server to issue the
    /// certificate/key for.
    #[arg(long)]
    fqdn: Option<String>,

    /// Base directory for the generated directories. Default: "./".
    /// Overrides config file.
    #[arg(long)]
    output_dir: Option<String>,

    /// openssl executable. Default: "openssl". Overrides config file.
    #[arg(long)]
    openssl: Option<String>,

    /// RSA key size in bits. Default: 2048. Overrides config file.
    #[arg(long)]
    key_bits: Option<u32>,

    /// Validity of a generated CA certificate in days. Default: 7300.
    /// Overrides config file.
    #[arg(long = "ca-days")]
    ca_validity_days: Option<u32>,

    /// Validity of the server certificate in days. Default: 7300. Overrides
    /// config file.
    #[arg(long = "days")]
    server_validity_days: Option<u32>,

    /// Message digest used for signing, empty for the tool's default.
    /// Default: "sha256". Overrides config file.
    #[arg(long)]
    digest: Option<String>,

    /// Extension section applied to a generated CA certificate, empty for
    /// none. Default: "v3_ca". Overrides config file.
    #[arg(long)]
    ca_extensions: Option<String>,

    /// File extension of issued certificates ("crt" or "cer"). Default:
    /// "crt". Overrides config file.
    #[arg(long = "cert-ext")]
    cert_extension: Option<String>,

    /// conf file that sets parameters
    #[arg(long, default_value = "./conf/easycert.toml")]
    conf: String,
}

/// Effective settings of one run.
#[derive(Debug, Deserialize, Clone, ToStringLines)]
pub struct AppConfig {
    pub ca_name: String,
    pub ca_key_file: PathBuf,
    pub ca_cert_file: PathBuf,
    pub fqdn: String,
    pub output_dir: PathBuf,
    pub openssl: String,
    pub key_bits: u32,
    pub ca_validity_days: u32,
    pub server_validity_days: u32,
    pub digest: String,
    pub ca_extensions: String,
    pub cert_extension: String,
}

impl AppConfig {
    pub fn identities(&self) -> Identities<'_> {
        Identities {
            ca_name: &self.ca_name,
            ca_key_file: &self.ca_key_file,
            ca_cert_file: &self.ca_cert_file,
            fqdn: &self.fqdn,
        }
    }

    pub fn issue_settings(&self) -> IssueSettings {
        IssueSettings {
            output_dir: self.output_dir.clone(),
            program: self.openssl.clone(),
            key_bits: self.key_bits,
            ca_validity_days: self.ca_validity_days,
            server_validity_days: self.server_validity_days,
            digest: non_empty(&self.digest),
            ca_extensions: non_empty(&self.ca_extensions),
            cert_extension: self.cert_extension.clone(),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s.to_owned()) }
}

/// Loads config variables from both CLI arguments and a config file.
pub fn load_config(args: CliArgs) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder()
        .set_default("ca_name", "")?
        .set_default("ca_key_file", "")?
        .set_default("ca_cert_file", "")?
        .set_default("fqdn", "")?
        .set_default("output_dir", "./")?
        .set_default("openssl", "openssl")?
        .set_default("key_bits", 2048)?
        .set_default("ca_validity_days", 7300)?
        .set_default("server_validity_days", 7300)?
        .set_default("digest", "sha256")?
        .set_default("ca_extensions", "v3_ca")?
        .set_default("cert_extension", "crt")?
        .add_source(File::with_name(&args.conf).required(false));

    // A CA source given on the command line replaces the other kind of CA
    // source coming from the config file.
    let cli_ca_files = args.ca_key_file.is_some() || args.ca_cert_file.is_some();
    if cli_ca_files && args.ca_name.is_none() {
        builder = builder.set_override("ca_name", "")?;
    }
    if args.ca_name.is_some() && !cli_ca_files {
        builder = builder
            .set_override("ca_key_file", "")?
            .set_override("ca_cert_file", "")?;
    }

    if let Some(value) = args.ca_name {
        builder = builder.set_override("ca_name", value)?;
    }
    if let Some(value) = args.ca_key_file {
        builder = builder.set_override("ca_key_file", value)?;
    }
    if let Some(value) = args.ca_cert_file {
        builder = builder.set_override("ca_cert_file", value)?;
    }
    if let Some(value) = args.fqdn {
        builder = builder.set_override("fqdn", value)?;
    }
    if let Some(value) = args.output_dir {
        builder = builder.set_override("output_dir", value)?;
    }
    if let Some(value) = args.openssl {
        builder = builder.set_override("openssl", value)?;
    }
    if let Some(value) = args.key_bits {
        builder = builder.set_override("key_bits", u64::from(value))?;
    }
    if let Some(value) = args.ca_validity_days {
        builder = builder.set_override("ca_validity_days", u64::from(value))?;
    }
    if let Some(value) = args.server_validity_days {
        builder = builder.set_override("server_validity_days", u64::from(value))?;
    }
    if let Some(value) = args.digest {
        builder = builder.set_override("digest", value)?;
    }
    if let Some(value) = args.ca_extensions {
        builder = builder.set_override("ca_extensions", value)?;
    }
    if let Some(value) = args.cert_extension {
        builder = builder.set_override("cert_extension", value)?;
    }

    let mut config: AppConfig = builder.build()?.try_deserialize()?;

    // Replace ~ with homedir
    if let Some(resolved) = resolve_tilde(&config.output_dir) {
        config.output_dir = resolved;
    }
    if let Some(resolved) = resolve_tilde(&config.ca_key_file) {
        config.ca_key_file = resolved;
    }
    if let Some(resolved) = resolve_tilde(&config.ca_cert_file) {
        config.ca_cert_file = resolved;
    }

    Ok(config)
}

fn resolve_tilde(path: &Path) -> Option<PathBuf> {
    let rest = path.strip_prefix("~").ok()?;
    dirs::home_dir().map(|home| home.join(rest))
}

/// Rewrites single-dash long flags (`-cn x`, `-fqdn=y`) into the
/// double-dash form clap expects. The program name, short flags, values
/// and everything after `--` are left untouched.
pub fn normalize_args<I, T>(argv: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let command = CliArgs::command();
    let mut longs: Vec<&str> = command.get_arguments().filter_map(|a| a.get_long()).collect();
    longs.extend(["help", "version"]);

    let mut passthrough = false;
    argv.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            let arg: OsString = arg.into();
            if i == 0 || passthrough {
                return arg;
            }
            match arg.to_str() {
                Some("--") => {
                    passthrough = true;
                    arg
                }
                Some(s) if is_single_dash_long(s, &longs) => format!("-{}", s).into(),
                _ => arg,
            }
        })
        .collect()
}

fn is_single_dash_long(arg: &str, longs: &[&str]) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    if rest.starts_with('-') {
        return false;
    }
    let name = rest.split('=').next().unwrap_or(rest);
    name.chars().count() > 1 && longs.contains(&name)
}

/// Full usage text, as printed next to argument errors.
pub fn usage() -> String {
    CliArgs::command().render_help().to_string()
}
