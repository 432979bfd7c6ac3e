/// Non-negative decimal amounts.
pub mod money;

/// Client identities and the balance rules of a single account.
pub mod account;

/// Ledger interface, plus "in memory" implementation.
/// This is where concurrent callers meet, so every operation here is atomic
/// per account, and transfers are atomic across both accounts.
pub mod ledger;

/// Turns raw request parameters into typed ledger calls.
pub mod command;

pub mod config;

pub mod telemetry;

/// HTTP boundary. Owns all async code; the ledger itself never awaits.
pub mod server;
