mod cache;
mod config;
mod console;
mod error;
mod filter;
mod inventory;
mod launcher;
mod table;

use atty::Stream;
use cache::CacheStore;
use chrono::{DateTime, Local};
use clap::Parser;
use colored::*;
use config::Cli;
use console::{print_debug, print_error, print_info, print_success, print_warning};
use dialoguer::Input;
use error::{HopError, Result};
use filter::FilteredEntry;
use inventory::{FetchSettings, InventorySnapshot};
use launcher::{select_and_launch, SshConnector};
use std::io::BufRead;

async fn load_inventory(cli: &Cli) -> Result<InventorySnapshot> {
    let store = CacheStore::new(cli.cache_path()?, cli.cache_max_age());
    print_debug(
        &format!("Cache file: {}", store.path().display()),
        cli.verbose,
    );

    if let Some(mtime) = store.modified() {
        let mtime: DateTime<Local> = mtime.into();
        print_debug(
            &format!("Cache last written: {}", mtime.format("%Y-%m-%d %H:%M:%S")),
            cli.verbose,
        );
    }

    if let Some(snapshot) = store.fresh_snapshot(&cli.region, cli.refresh, cli.verbose)? {
        return Ok(snapshot);
    }

    print_info(&format!(
        "Listing instances in {}...",
        cli.region.green()
    ));
    let snapshot = inventory::fetch(&FetchSettings {
        region: cli.region.clone(),
        profile: cli.profile.clone(),
        verbose: cli.verbose,
    })
    .await?;

    if let Err(e) = store.save(&snapshot) {
        print_warning(&e.to_string());
    }

    Ok(snapshot)
}

fn read_choice() -> Result<String> {
    if atty::is(Stream::Stdin) {
        return Input::<String>::new()
            .with_prompt("Choose server to ssh")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| HopError::from_input_error(std::io::Error::from(e)));
    }

    let mut line = String::new();
    let read = std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(HopError::from_input_error)?;
    if read == 0 {
        return Err(HopError::NoInput);
    }
    Ok(line)
}

async fn run(cli: Cli) -> Result<i32> {
    let credentials = config::ensure_credentials()?;
    print_debug(
        &format!("Credentials file: {}", credentials.display()),
        cli.verbose,
    );
    print_debug(&format!("Region: {}", cli.region), cli.verbose);
    print_debug(&format!("Keywords: {:?}", cli.keywords), cli.verbose);

    let snapshot = load_inventory(&cli).await?;
    let entries: Vec<FilteredEntry> =
        filter::filter(&snapshot, &cli.keywords, cli.address_kind());

    println!("{}", table::render(&entries));

    if entries.is_empty() {
        if cli.keywords.is_empty() {
            print_warning("No instances with a Name tag and an address found");
        } else {
            print_warning(&format!(
                "No instances match all of: {}",
                cli.keywords.join(", ")
            ));
        }
        return if cli.list_only {
            Ok(0)
        } else {
            Err(HopError::NoMatches)
        };
    }

    if cli.list_only {
        return Ok(0);
    }

    let choice = read_choice()?;
    let connector = SshConnector::new(cli.ssh_options(), cli.verbose);
    let code = select_and_launch(&entries, &choice, &connector)?;

    if code == 0 {
        print_success("Session ended");
    } else {
        print_debug(&format!("ssh exited with code {}", code), cli.verbose);
    }

    Ok(code)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            print_error(&e.to_string());
            e.exit_code()
        }
    };

    std::process::exit(code);
}
