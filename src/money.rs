use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("Amount must not be negative, got {0}")]
    NegativeAmount(Decimal),
    #[error("Amount overflows the supported decimal range")]
    Overflow,
}

/// Non-negative decimal amount.
///
/// Every constructor checks the invariant, so a `Money` held anywhere in the
/// crate is known to be `>= 0`. Arithmetic never mutates in place, it returns
/// a fresh value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMoney")]
pub struct Money {
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
}

#[derive(Deserialize)]
struct RawMoney {
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
}

impl TryFrom<RawMoney> for Money {
    type Error = MoneyError;

    fn try_from(raw: RawMoney) -> Result<Self, Self::Error> {
        Money::new(raw.amount)
    }
}

impl Money {
    pub fn new(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::NegativeAmount(amount));
        }
        Ok(Self { amount })
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        match self.amount.checked_add(other.amount) {
            Some(amount) => Money::new(amount),
            None => Err(MoneyError::Overflow),
        }
    }

    /// Fails with [`MoneyError::NegativeAmount`] when `other` is larger than
    /// `self`, regardless of any check the caller already did.
    pub fn subtract(&self, other: &Money) -> Result<Money, MoneyError> {
        match self.amount.checked_sub(other.amount) {
            Some(amount) => Money::new(amount),
            None => Err(MoneyError::Overflow),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.amount, f)
    }
}

#[derive(Debug, Error)]
pub enum ParseMoneyError {
    #[error("`{0}` is not a plain decimal amount")]
    Malformed(String),
    #[error("`{input}` is not a valid decimal amount: {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },
    #[error(transparent)]
    Money(#[from] MoneyError),
}

fn is_amount_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '-' | '+')
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    /// Accepts only digits, one sign and a decimal point, and parses without
    /// rounding: input with more precision than [`Decimal`] can carry is
    /// rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if !text.chars().all(is_amount_char) {
            return Err(ParseMoneyError::Malformed(s.to_owned()));
        }
        let amount = match Decimal::from_str_exact(text) {
            Ok(amount) => amount,
            Err(source) => {
                let input = s.to_owned();
                return Err(ParseMoneyError::Invalid { input, source });
            }
        };
        Ok(Money::new(amount)?)
    }
}
