//! Ledger policy configuration

use rust_decimal::Decimal;

/// Policy knobs for registration and sessions
///
/// Defaults: no signup grant, 8-character minimum credential, 3-32 character
/// identifiers, 12-hour sessions.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Balance granted to a freshly created account
    pub starting_balance: Decimal,

    /// Minimum credential length accepted at signup
    pub min_credential_len: usize,

    /// Minimum identifier length
    pub min_identifier_len: usize,

    /// Maximum identifier length
    pub max_identifier_len: usize,

    /// Session token lifetime in hours
    pub session_ttl_hours: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            starting_balance: Decimal::ZERO,
            min_credential_len: 8,
            min_identifier_len: 3,
            max_identifier_len: 32,
            session_ttl_hours: 12,
        }
    }
}
