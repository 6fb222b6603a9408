//! # deskwarden-license
//!
//! Vendor-side tool: generate signing keys, issue license keys, and check
//! what a customer's key contains.

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use deskwarden::crypto::keys::{fingerprint, KeyPair};
use deskwarden::policy::license::evaluate_status;
use deskwarden::{generate_license_key, verify_license_key, LicenseData, SystemClock};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Issue and inspect service desk license keys.
#[derive(Parser, Debug)]
#[command(name = "deskwarden-license", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a vendor key pair (private.pem / public.pem).
    Keygen(KeygenArgs),
    /// Sign a license key.
    Issue(IssueArgs),
    /// Verify a license key and print its claims.
    Verify(VerifyArgs),
}

#[derive(Args, Debug)]
struct KeygenArgs {
    /// Directory to write the PEM files into.
    #[arg(long)]
    out_dir: PathBuf,

    /// Overwrite existing key files.
    #[arg(long)]
    force: bool,
}

#[derive(Args, Debug)]
struct IssueArgs {
    /// PKCS#8 PEM private key file.
    #[arg(long)]
    private_key: PathBuf,

    /// Licensed company name.
    #[arg(long)]
    company: String,

    /// Customer contact e-mail.
    #[arg(long)]
    email: String,

    /// Expiration date (YYYY-MM-DD).
    #[arg(long)]
    expires: NaiveDate,

    /// Maximum active users.
    #[arg(long)]
    max_users: u32,

    /// Feature tag; repeat for several.
    #[arg(long = "feature")]
    features: Vec<String>,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// SPKI PEM public key file.
    #[arg(long)]
    public_key: PathBuf,

    /// License key; read from stdin when omitted.
    key: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Keygen(args) => keygen(args),
        Commands::Issue(args) => issue(args),
        Commands::Verify(args) => verify(args),
    }
}

fn keygen(args: KeygenArgs) -> anyhow::Result<()> {
    let private_path = args.out_dir.join("private.pem");
    let public_path = args.out_dir.join("public.pem");
    if !args.force && (private_path.exists() || public_path.exists()) {
        bail!(
            "{} already holds a key pair (use --force to replace it)",
            args.out_dir.display()
        );
    }

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let pair = KeyPair::generate();
    write_private_key(&private_path, &pair.private_key_pem()?)
        .with_context(|| format!("writing {}", private_path.display()))?;
    fs::write(&public_path, pair.public_key_pem()?)
        .with_context(|| format!("writing {}", public_path.display()))?;

    tracing::info!(fingerprint = %fingerprint(&pair.verifying_key()), "key pair generated");
    println!("{}", public_path.display());
    Ok(())
}

/// Write key material readable by the owner only.
fn write_private_key(path: &Path, pem: &str) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        let mut file = options.open(path)?;
        // `mode` only applies on creation; --force may reuse an older file.
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        file.write_all(pem.as_bytes())
    }
    #[cfg(not(unix))]
    {
        options.open(path)?.write_all(pem.as_bytes())
    }
}

fn issue(args: IssueArgs) -> anyhow::Result<()> {
    if !args.email.is_empty() && !args.email.contains('@') {
        bail!("--email {:?} is not an e-mail address", args.email);
    }

    let pem = fs::read_to_string(&args.private_key)
        .with_context(|| format!("reading {}", args.private_key.display()))?;

    let data = LicenseData {
        company_name: args.company,
        contact_email: args.email,
        expiration_date: args.expires,
        max_users: args.max_users,
        features: args.features.into_iter().collect(),
    };

    let key = generate_license_key(&data, &pem)?;
    tracing::info!(company = %data.company_name, expires = %data.expiration_date, "license issued");
    println!("{}", key);
    Ok(())
}

fn verify(args: VerifyArgs) -> anyhow::Result<()> {
    let pem = fs::read_to_string(&args.public_key)
        .with_context(|| format!("reading {}", args.public_key.display()))?;

    let key = match args.key {
        Some(key) => key,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading license key from stdin")?;
            buf
        }
    };

    let outcome = verify_license_key(&key, &pem);
    let status = evaluate_status(Some(&outcome), &SystemClock);

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "verification": outcome,
            "status": status,
        }))?
    );

    if !outcome.valid {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn private_key_written_intact() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("private.pem");
        write_private_key(&path, "first").unwrap();
        write_private_key(&path, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[cfg(unix)]
    #[test]
    fn private_key_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("private.pem");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        write_private_key(&path, "new").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn cli_parses_issue_arguments() {
        let cli = Cli::try_parse_from([
            "deskwarden-license",
            "issue",
            "--private-key",
            "k.pem",
            "--company",
            "Acme",
            "--email",
            "it@acme.test",
            "--expires",
            "2027-06-30",
            "--max-users",
            "5",
            "--feature",
            "cmdb",
            "--feature",
            "sla",
        ])
        .unwrap();
        match cli.command {
            Commands::Issue(args) => {
                assert_eq!(args.expires, NaiveDate::from_ymd_opt(2027, 6, 30).unwrap());
                assert_eq!(args.features, vec!["cmdb".to_string(), "sla".to_string()]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
