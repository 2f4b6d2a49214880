//! CLI transport over the ledger core
//!
//! Each invocation loads the JSON state file into the in-memory core, runs
//! one operation through the same call surface an HTTP layer would use, and
//! writes the state back. Session tokens survive across invocations because
//! the bound session and the signing secret live in the state file.

pub mod args;

pub use args::{CliArgs, Command};

use crate::core::{
    AccountRegistry, AuthGate, JwtTokens, LedgerConfig, LedgerEngine, MemoryLog, MemoryStore,
    Sha256Hasher, TransactionLog,
};
use crate::core::traits::{AccountStore, PasswordHasher};
use crate::types::{Account, AccountId, AdminRecord, LedgerError, TransactionRecord, TxFilter};
use clap::Parser;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by the CLI layer
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("state file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("state file corrupt: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("state file not found; run 'init' first")]
    NotInitialized,

    #[error("state file already exists")]
    AlreadyInitialized,
}

/// Everything the service persists between invocations
#[derive(Debug, Serialize, Deserialize)]
pub struct LedgerState {
    /// HS256 signing secret for session tokens
    secret: String,
    admin: AdminRecord,
    accounts: Vec<Account>,
    transactions: Vec<TransactionRecord>,
}

/// Parse command-line arguments
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Execute one CLI command against the state file
pub fn run(args: CliArgs) -> Result<(), CliError> {
    if let Command::Init { admin_password } = &args.command {
        return init(&args.state, admin_password);
    }

    let state = load(&args.state)?;
    let config = LedgerConfig::default();

    let store = Arc::new(MemoryStore::with_accounts(state.accounts));
    let log = Arc::new(MemoryLog::with_entries(state.transactions));
    let hasher = Arc::new(Sha256Hasher);
    let tokens = JwtTokens::new(state.secret.as_bytes(), config.session_ttl_hours);
    let gate = AuthGate::new(Arc::clone(&store), tokens, Arc::clone(&hasher), state.admin);
    let registry = AccountRegistry::new(Arc::clone(&store), hasher, config);
    let engine = LedgerEngine::new(Arc::clone(&store), Arc::clone(&log));

    match args.command {
        Command::Init { .. } => unreachable!("handled above"),

        Command::Signup {
            username,
            password,
            name,
        } => {
            let account = registry.create(&username, &password, name)?;
            let token = gate.issue_session(&account)?;
            println!("account '{}' created, balance {}", account.id, account.balance);
            println!("token: {token}");
        }

        Command::Login { username, password } => {
            let account = registry.authenticate(&AccountId::from(username.as_str()), &password)?;
            let token = gate.issue_session(&account)?;
            println!("logged in as '{}', balance {}", account.id, account.balance);
            println!("token: {token}");
        }

        Command::AdminLogin { password } => {
            let token = gate.issue_admin_session(&password)?;
            println!("admin session opened");
            println!("token: {token}");
        }

        Command::Me { token } => {
            let principal = gate.resolve(Some(&token))?;
            match principal.account() {
                Some(id) => {
                    let account = registry
                        .find(id)
                        .ok_or_else(|| LedgerError::account_not_found(id))?;
                    let name = account.display_name.as_deref().unwrap_or("-");
                    println!(
                        "{} ({}) balance {}",
                        account.id, name, account.balance
                    );
                }
                None => println!("administrator"),
            }
        }

        Command::Send {
            token,
            from,
            to,
            amount,
        } => {
            let principal = gate.resolve(Some(&token))?;
            let result = engine.transfer(
                &principal,
                &AccountId::from(from.as_str()),
                &AccountId::from(to.as_str()),
                amount,
            )?;
            println!(
                "sent {} from '{}' (balance {}) to '{}' (balance {})",
                result.amount, result.from.id, result.from.balance, result.to.id, result.to.balance
            );
            if result.log_degraded {
                eprintln!("warning: transfer committed but was not recorded in the history");
            }
        }

        Command::Adjust {
            token,
            account,
            amount,
        } => {
            let principal = gate.resolve(Some(&token))?;
            let result = engine.adjust(&principal, &AccountId::from(account.as_str()), amount)?;
            println!(
                "{} {} on '{}', balance now {}",
                result.kind, result.applied, result.account.id, result.account.balance
            );
            if result.log_degraded {
                eprintln!("warning: adjustment committed but was not recorded in the history");
            }
        }

        Command::History { account } => {
            let filter = TxFilter {
                participant: account.map(|a| AccountId::from(a.as_str())),
                ..TxFilter::default()
            };
            for record in log.query(&filter) {
                println!(
                    "#{} {} {} -> {} {} at {}",
                    record.id,
                    record.kind,
                    record.from,
                    record.to,
                    record.amount,
                    record.timestamp.to_rfc3339()
                );
            }
        }
    }

    save(
        &args.state,
        &LedgerState {
            secret: state.secret,
            admin: gate.admin_record(),
            accounts: store.all(),
            transactions: log.snapshot(),
        },
    )
}

fn init(path: &Path, admin_password: &str) -> Result<(), CliError> {
    if path.exists() {
        return Err(CliError::AlreadyInitialized);
    }
    let mut secret = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut secret);
    let state = LedgerState {
        secret: hex::encode(secret),
        admin: AdminRecord::new(Sha256Hasher.hash(admin_password)),
        accounts: Vec::new(),
        transactions: Vec::new(),
    };
    save(path, &state)?;
    println!("initialized ledger state at {}", path.display());
    Ok(())
}

fn load(path: &Path) -> Result<LedgerState, CliError> {
    if !path.exists() {
        return Err(CliError::NotInitialized);
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn save(path: &Path, state: &LedgerState) -> Result<(), CliError> {
    std::fs::write(path, serde_json::to_string_pretty(state)?)?;
    Ok(())
}
