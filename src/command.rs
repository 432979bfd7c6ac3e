use thiserror::Error;

use crate::{
    account::ClientId,
    ledger::{Ledger, LedgerError},
    money::{Money, ParseMoneyError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Create,
    Balance,
    Deposit,
    Withdraw,
    Transfer,
}

/// A ledger call with its arguments already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCommand {
    Create(ClientId),
    Balance(ClientId),
    Deposit(ClientId, Money),
    Withdraw(ClientId, Money),
    Transfer {
        sender: ClientId,
        receiver: ClientId,
        amount: Money,
    },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Invalid amount for {kind:?}: {source}")]
    InvalidAmount {
        kind: CommandKind,
        #[source]
        source: ParseMoneyError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(ClientId),
    Balance(Money),
    Done,
}

impl LedgerCommand {
    pub fn create(client: &str) -> Self {
        Self::Create(client.into())
    }

    pub fn balance(client: &str) -> Self {
        Self::Balance(client.into())
    }

    pub fn deposit(client: &str, amount: &str) -> Result<Self, CommandError> {
        let amount = parse_amount(CommandKind::Deposit, amount)?;
        Ok(Self::Deposit(client.into(), amount))
    }

    pub fn withdraw(client: &str, amount: &str) -> Result<Self, CommandError> {
        let amount = parse_amount(CommandKind::Withdraw, amount)?;
        Ok(Self::Withdraw(client.into(), amount))
    }

    pub fn transfer(sender: &str, receiver: &str, amount: &str) -> Result<Self, CommandError> {
        let amount = parse_amount(CommandKind::Transfer, amount)?;
        Ok(Self::Transfer {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
        })
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Create(_) => CommandKind::Create,
            Self::Balance(_) => CommandKind::Balance,
            Self::Deposit(..) => CommandKind::Deposit,
            Self::Withdraw(..) => CommandKind::Withdraw,
            Self::Transfer { .. } => CommandKind::Transfer,
        }
    }

    pub fn execute(self, ledger: &dyn Ledger) -> Result<Outcome, LedgerError> {
        match self {
            Self::Create(client) => {
                ledger.create_client(client.clone())?;
                Ok(Outcome::Created(client))
            }
            Self::Balance(client) => Ok(Outcome::Balance(ledger.balance(&client)?)),
            Self::Deposit(client, amount) => {
                ledger.deposit(&client, amount)?;
                Ok(Outcome::Done)
            }
            Self::Withdraw(client, amount) => {
                ledger.withdraw(&client, amount)?;
                Ok(Outcome::Done)
            }
            Self::Transfer {
                sender,
                receiver,
                amount,
            } => {
                ledger.transfer(&sender, &receiver, amount)?;
                Ok(Outcome::Done)
            }
        }
    }
}

fn parse_amount(kind: CommandKind, amount: &str) -> Result<Money, CommandError> {
    amount
        .parse()
        .map_err(|source| CommandError::InvalidAmount { kind, source })
}
