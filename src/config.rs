use crate::cache::DEFAULT_MAX_AGE;
use crate::error::{HopError, Result};
use crate::filter::AddressKind;
use crate::launcher::SshOptions;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REGION: &str = "us-west-2";

#[derive(Parser, Debug)]
#[command(name = "ec2-hop")]
#[command(about = "List EC2 instances by Name tag and ssh into one by number")]
#[command(version)]
pub struct Cli {
    /// Keywords that must all appear in the instance Name tag (case-insensitive)
    pub keywords: Vec<String>,

    /// AWS region to list instances in
    #[arg(short = 'r', long = "region", env = "AWS_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// AWS profile to use (defaults to AWS_PROFILE env var or default profile)
    #[arg(short = 'p', long = "profile")]
    pub profile: Option<String>,

    /// Inventory cache file [default: ~/.cache/ec2-hop/instances.json]
    #[arg(long = "cache-file", env = "EC2_HOP_CACHE_FILE")]
    pub cache_file: Option<PathBuf>,

    /// Seconds before the cached inventory is refreshed
    #[arg(long = "cache-ttl", env = "EC2_HOP_CACHE_TTL", default_value_t = DEFAULT_MAX_AGE.as_secs())]
    pub cache_ttl: u64,

    /// Ignore the cache and list instances from AWS
    #[arg(long = "refresh")]
    pub refresh: bool,

    /// Print the table and exit without connecting
    #[arg(short = 'l', long = "list-only")]
    pub list_only: bool,

    /// List and connect using private IP addresses
    #[arg(long = "private-ip")]
    pub private_ip: bool,

    /// Remote login user
    #[arg(short = 'u', long = "user", env = "EC2_HOP_USER", default_value = "user")]
    pub user: String,

    /// Remote ssh port
    #[arg(short = 'P', long = "port", env = "EC2_HOP_PORT", default_value_t = 22)]
    pub port: u16,

    /// Verify host keys against known_hosts (disabled by default)
    #[arg(long = "strict-host-key-checking")]
    pub strict_host_key_checking: bool,

    /// Private key passed to ssh with -i
    #[arg(short = 'i', long = "identity-file")]
    pub identity_file: Option<PathBuf>,

    /// ssh client program to run
    #[arg(long = "ssh-program", default_value = "ssh")]
    pub ssh_program: String,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    pub fn address_kind(&self) -> AddressKind {
        if self.private_ip {
            AddressKind::Private
        } else {
            AddressKind::Public
        }
    }

    pub fn cache_max_age(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn ssh_options(&self) -> SshOptions {
        SshOptions {
            program: self.ssh_program.clone(),
            user: self.user.clone(),
            port: self.port,
            strict_host_key_checking: self.strict_host_key_checking,
            identity_file: self.identity_file.clone(),
        }
    }

    pub fn cache_path(&self) -> Result<PathBuf> {
        match &self.cache_file {
            Some(path) => Ok(path.clone()),
            None => Ok(home_dir()?
                .join(".cache")
                .join("ec2-hop")
                .join("instances.json")),
        }
    }
}

fn home_dir() -> Result<PathBuf> {
    std::env::var("HOME")
        .map(PathBuf::from)
        .map_err(|_| HopError::Config("HOME is not set".to_string()))
}

/// Where the AWS SDK will look for shared credentials.
pub fn credentials_path() -> Result<PathBuf> {
    match std::env::var_os("AWS_SHARED_CREDENTIALS_FILE") {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(home_dir()?.join(".aws").join("credentials")),
    }
}

/// Startup gate: the credentials file has to exist, its contents are left to
/// the SDK.
pub fn ensure_credentials() -> Result<PathBuf> {
    let path = credentials_path()?;
    if !path.exists() {
        return Err(HopError::CredentialsNotFound { path });
    }
    Ok(path)
}
