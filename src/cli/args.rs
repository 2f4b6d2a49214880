use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Single-ledger balance-transfer service
#[derive(Parser, Debug)]
#[command(name = "bank-ledger")]
#[command(about = "Accounts, authenticated transfers, and an append-only transfer history", long_about = None)]
pub struct CliArgs {
    /// Path to the JSON state file
    #[arg(long = "state", value_name = "FILE", default_value = "ledger.json")]
    pub state: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new state file with an admin credential
    Init {
        /// Administrator password
        #[arg(long = "admin-password", value_name = "PASSWORD")]
        admin_password: String,
    },

    /// Create a new account and open a session
    Signup {
        /// Account identifier (alphanumeric/underscore)
        username: String,
        /// Account password
        password: String,
        /// Optional display name
        #[arg(long)]
        name: Option<String>,
    },

    /// Authenticate and open a session
    Login {
        username: String,
        password: String,
    },

    /// Authenticate as the administrator
    AdminLogin {
        password: String,
    },

    /// Show the account bound to a session token
    Me {
        #[arg(long, value_name = "TOKEN")]
        token: String,
    },

    /// Transfer funds to another account
    Send {
        #[arg(long, value_name = "TOKEN")]
        token: String,
        /// Sending account (must match the session)
        #[arg(long)]
        from: String,
        /// Receiving account
        #[arg(long)]
        to: String,
        /// Amount to move
        #[arg(long)]
        amount: Decimal,
    },

    /// Administratively mint or burn balance on an account
    Adjust {
        #[arg(long, value_name = "TOKEN")]
        token: String,
        /// Target account
        #[arg(long)]
        account: String,
        /// Signed delta: positive mints, negative burns (clamped at zero)
        #[arg(long, allow_hyphen_values = true)]
        amount: Decimal,
    },

    /// Print the transfer history
    History {
        /// Only entries involving this account
        #[arg(long)]
        account: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_state_path() {
        let args = CliArgs::try_parse_from(["bank-ledger", "history"]).unwrap();
        assert_eq!(args.state, PathBuf::from("ledger.json"));
    }

    #[test]
    fn test_signup_parses_optional_name() {
        let args = CliArgs::try_parse_from([
            "bank-ledger",
            "signup",
            "alice",
            "correcthorse",
            "--name",
            "Alice",
        ])
        .unwrap();

        match args.command {
            Command::Signup {
                username,
                password,
                name,
            } => {
                assert_eq!(username, "alice");
                assert_eq!(password, "correcthorse");
                assert_eq!(name.as_deref(), Some("Alice"));
            }
            other => panic!("expected signup, got {other:?}"),
        }
    }

    #[test]
    fn test_send_parses_decimal_amount() {
        let args = CliArgs::try_parse_from([
            "bank-ledger",
            "send",
            "--token",
            "tok",
            "--from",
            "alice",
            "--to",
            "bob",
            "--amount",
            "12.5",
        ])
        .unwrap();

        match args.command {
            Command::Send { amount, .. } => assert_eq!(amount, Decimal::new(125, 1)),
            other => panic!("expected send, got {other:?}"),
        }
    }

    #[test]
    fn test_adjust_accepts_negative_amount() {
        let args = CliArgs::try_parse_from([
            "bank-ledger",
            "adjust",
            "--token",
            "tok",
            "--account",
            "alice",
            "--amount",
            "-80",
        ])
        .unwrap();

        match args.command {
            Command::Adjust { amount, .. } => assert_eq!(amount, Decimal::new(-80, 0)),
            other => panic!("expected adjust, got {other:?}"),
        }
    }

    #[rstest]
    #[case::no_command(&["bank-ledger"])]
    #[case::send_missing_amount(&["bank-ledger", "send", "--token", "t", "--from", "a", "--to", "b"])]
    #[case::bad_amount(&["bank-ledger", "send", "--token", "t", "--from", "a", "--to", "b", "--amount", "abc"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
