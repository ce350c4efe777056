use crate::console::{print_debug, print_info, print_warning};
use crate::error::{HopError, Result};
use crate::filter::FilteredEntry;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Command;

#[cfg(test)]
use mockall::automock;

/// How the external ssh client is invoked.
///
/// Host-key checking is off by default; `SshConnector` warns on every
/// connection made that way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshOptions {
    pub program: String,
    pub user: String,
    pub port: u16,
    pub strict_host_key_checking: bool,
    pub identity_file: Option<PathBuf>,
}

impl Default for SshOptions {
    fn default() -> Self {
        Self {
            program: "ssh".to_string(),
            user: "user".to_string(),
            port: 22,
            strict_host_key_checking: false,
            identity_file: None,
        }
    }
}

impl SshOptions {
    /// Arguments passed to the ssh program for `address`.
    pub fn args_for(&self, address: &str) -> Vec<String> {
        let mut args = vec!["-p".to_string(), self.port.to_string()];

        if !self.strict_host_key_checking {
            args.extend([
                "-o".to_string(),
                "StrictHostKeyChecking=no".to_string(),
                "-o".to_string(),
                "UserKnownHostsFile=/dev/null".to_string(),
            ]);
        }

        if let Some(identity) = &self.identity_file {
            args.push("-i".to_string());
            args.push(identity.display().to_string());
        }

        args.push(format!("{}@{}", self.user, address));
        args
    }
}

#[cfg_attr(test, automock)]
pub trait Connector {
    /// Runs an interactive session against `address` and returns its exit code.
    fn connect(&self, address: &str) -> Result<i32>;
}

/// Runs the ssh program with the operator's terminal attached.
pub struct SshConnector {
    options: SshOptions,
    verbose: bool,
}

impl SshConnector {
    pub fn new(options: SshOptions, verbose: bool) -> Self {
        Self { options, verbose }
    }
}

impl Connector for SshConnector {
    fn connect(&self, address: &str) -> Result<i32> {
        if !self.options.strict_host_key_checking {
            print_warning(
                "Host key checking is disabled for this connection \
                 (use --strict-host-key-checking to enable it)",
            );
        }

        let args = self.options.args_for(address);
        print_debug(
            &format!("Running: {} {}", self.options.program, args.join(" ")),
            self.verbose,
        );

        // Command::status inherits stdin, stdout and stderr.
        let status = Command::new(&self.options.program)
            .args(&args)
            .status()
            .map_err(|e| HopError::Launch {
                program: self.options.program.clone(),
                reason: e.to_string(),
            })?;

        // A child killed by a signal has no code.
        Ok(status.code().unwrap_or(1))
    }
}

/// Parses the operator's choice: `\r` and `\n` are stripped from both ends,
/// the rest must be a non-negative integer.
pub fn parse_choice(raw_line: &str) -> Result<usize> {
    let trimmed = raw_line.trim_matches(['\r', '\n']);
    trimmed.parse::<usize>().map_err(|_| HopError::NotANumber {
        input: trimmed.to_string(),
    })
}

/// Ordinal → entry lookup over the same sequence the table was rendered from.
pub struct Selection<'a> {
    by_ordinal: BTreeMap<usize, &'a FilteredEntry>,
}

impl<'a> Selection<'a> {
    pub fn new(entries: &'a [FilteredEntry]) -> Self {
        Self {
            by_ordinal: entries.iter().map(|e| (e.ordinal, e)).collect(),
        }
    }

    pub fn resolve(&self, ordinal: usize) -> Result<&'a FilteredEntry> {
        self.by_ordinal
            .get(&ordinal)
            .copied()
            .ok_or(HopError::NoSuchEntry {
                ordinal,
                count: self.by_ordinal.len(),
            })
    }
}

/// Parses `raw_line`, resolves it to an entry and connects to its address.
/// Returns the session's exit code.
pub fn select_and_launch(
    entries: &[FilteredEntry],
    raw_line: &str,
    connector: &dyn Connector,
) -> Result<i32> {
    let ordinal = parse_choice(raw_line)?;
    let entry = Selection::new(entries).resolve(ordinal)?;

    print_info(&format!(
        "Connecting to [ {}) {} | {} ]",
        entry.ordinal, entry.name, entry.address
    ));

    connector.connect(&entry.address)
}
