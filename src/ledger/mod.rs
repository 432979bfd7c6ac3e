use thiserror::Error;

use crate::{
    account::{AccountError, ClientId},
    money::{Money, MoneyError},
};

pub use crate::account::FundsPolicy;

pub mod in_memory;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Client {0} already exists")]
    AlreadyExists(ClientId),
    #[error("Client {0} not found")]
    ClientNotFound(ClientId),
    #[error("Insufficient funds: balance {balance} cannot cover {requested}")]
    InsufficientFunds { balance: Money, requested: Money },
    #[error(transparent)]
    Money(#[from] MoneyError),
}

impl From<AccountError> for LedgerError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InsufficientFunds { balance, requested } => {
                LedgerError::InsufficientFunds { balance, requested }
            }
            AccountError::Money(err) => LedgerError::Money(err),
        }
    }
}

/// Account store with atomic operations.
///
/// Every method is linearizable with respect to other calls touching the
/// same account(s), and leaves the store unchanged when it returns an error.
/// Calls never block on I/O, so implementations are plain synchronous code
/// that may be shared across threads.
pub trait Ledger: Send + Sync {
    /// Opens an account with a zero balance.
    fn create_client(&self, client: ClientId) -> Result<(), LedgerError>;

    fn balance(&self, client: &ClientId) -> Result<Money, LedgerError>;

    fn deposit(&self, client: &ClientId, amount: Money) -> Result<(), LedgerError>;

    fn withdraw(&self, client: &ClientId, amount: Money) -> Result<(), LedgerError>;

    /// Moves `amount` from `sender` to `receiver` as a single step: either
    /// both balances change or neither does.
    fn transfer(
        &self,
        sender: &ClientId,
        receiver: &ClientId,
        amount: Money,
    ) -> Result<(), LedgerError>;
}
