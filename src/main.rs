//! Bank Ledger CLI
//!
//! Command-line transport over the ledger core. State (accounts, admin
//! record, transaction history, signing secret) lives in a JSON file passed
//! via `--state`.
//!
//! # Usage
//!
//! ```bash
//! bank-ledger init --admin-password s3cr3t-admin
//! bank-ledger signup alice correcthorse --name "Alice"
//! bank-ledger login alice correcthorse
//! bank-ledger send --token <TOKEN> --from alice --to bob --amount 30
//! bank-ledger adjust --token <ADMIN_TOKEN> --account alice --amount -- -1000
//! bank-ledger history --account alice
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (rejected operation, missing state file, etc.)

use bank_ledger::cli;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();
    if let Err(e) = cli::run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
