use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::{Money, MoneyError};

/// Client identity, the email address exactly as supplied.
///
/// No normalisation happens: `Ann@x.io` and `ann@x.io` are two clients.
/// The derived ordering is the canonical order in which transfers lock
/// accounts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClientId {
    fn from(email: &str) -> Self {
        Self::new(email)
    }
}

impl From<String> for ClientId {
    fn from(email: String) -> Self {
        Self(email)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// When is a balance too small to cover a debit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FundsPolicy {
    /// `balance >= amount` is enough, an account can be emptied.
    #[default]
    AllowExact,
    /// `balance <= amount` is insufficient, an account can never be emptied.
    RejectExact,
}

impl FundsPolicy {
    pub fn covers(self, balance: &Money, amount: &Money) -> bool {
        let (balance, amount) = (balance.amount(), amount.amount());
        match self {
            FundsPolicy::AllowExact => balance >= amount,
            FundsPolicy::RejectExact => balance > amount,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Insufficient funds: balance {balance} cannot cover {requested}")]
    InsufficientFunds { balance: Money, requested: Money },
    #[error(transparent)]
    Money(#[from] MoneyError),
}

#[derive(Debug, Default)]
pub struct Account {
    balance: Money,
}

impl Account {
    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn credit(&mut self, amount: &Money) -> Result<(), AccountError> {
        self.balance = self.credited(amount)?;
        Ok(())
    }

    /// Balance after crediting `amount`, without applying it.
    pub fn credited(&self, amount: &Money) -> Result<Money, AccountError> {
        Ok(self.balance.add(amount)?)
    }

    /// Stores a balance obtained from [`Account::credited`] or
    /// [`Account::debited`] while the account was still locked.
    pub(crate) fn set_balance(&mut self, balance: Money) {
        self.balance = balance;
    }

    /// Leaves the balance untouched on any error.
    pub fn debit(&mut self, amount: &Money, policy: FundsPolicy) -> Result<(), AccountError> {
        self.balance = self.debited(amount, policy)?;
        Ok(())
    }

    /// Balance after debiting `amount`, without applying it.
    pub fn debited(&self, amount: &Money, policy: FundsPolicy) -> Result<Money, AccountError> {
        let insufficient = || AccountError::InsufficientFunds {
            balance: self.balance,
            requested: *amount,
        };
        if !policy.covers(&self.balance, amount) {
            return Err(insufficient());
        }
        self.balance.subtract(amount).map_err(|err| match err {
            MoneyError::NegativeAmount(_) => insufficient(),
            other => other.into(),
        })
    }
}
