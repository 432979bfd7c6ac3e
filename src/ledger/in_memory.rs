use std::collections::HashMap;

use parking_lot::{Mutex, MutexGuard, RwLock};
use tracing::debug;

use crate::{
    account::{Account, ClientId, FundsPolicy},
    money::Money,
};

use super::{Ledger, LedgerError};

/// Ledger held entirely in process memory.
///
/// The map sits behind a read-write lock and every account behind its own
/// mutex. Only `create_client` takes the map for writing; everything else
/// shares it and serialises on the accounts it touches. Transfers lock both
/// accounts in ascending [`ClientId`] order, so two opposite transfers over
/// the same pair cannot deadlock.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    accounts: RwLock<HashMap<ClientId, Mutex<Account>>>,
    policy: FundsPolicy,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: FundsPolicy) -> Self {
        Self {
            accounts: RwLock::default(),
            policy,
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }

    /// All balances as of one instant, sorted by client.
    pub fn snapshot(&self) -> Vec<(ClientId, Money)> {
        let accounts = self.accounts.read();
        let mut entries: Vec<_> = accounts.iter().collect();
        entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        let locked: Vec<(&ClientId, MutexGuard<'_, Account>)> = entries
            .into_iter()
            .map(|(client, acc)| (client, acc.lock()))
            .collect();
        locked
            .iter()
            .map(|(client, acc)| ((*client).clone(), acc.balance()))
            .collect()
    }
}

fn not_found(client: &ClientId) -> LedgerError {
    LedgerError::ClientNotFound(client.clone())
}

impl Ledger for InMemoryLedger {
    fn create_client(&self, client: ClientId) -> Result<(), LedgerError> {
        let mut accounts = self.accounts.write();
        if accounts.contains_key(&client) {
            return Err(LedgerError::AlreadyExists(client));
        }
        debug!(%client, "client created");
        accounts.insert(client, Mutex::default());
        Ok(())
    }

    fn balance(&self, client: &ClientId) -> Result<Money, LedgerError> {
        let accounts = self.accounts.read();
        let acc = accounts.get(client).ok_or_else(|| not_found(client))?;
        Ok(acc.lock().balance())
    }

    fn deposit(&self, client: &ClientId, amount: Money) -> Result<(), LedgerError> {
        let accounts = self.accounts.read();
        let acc = accounts.get(client).ok_or_else(|| not_found(client))?;
        acc.lock().credit(&amount)?;
        debug!(%client, %amount, "deposited");
        Ok(())
    }

    fn withdraw(&self, client: &ClientId, amount: Money) -> Result<(), LedgerError> {
        let accounts = self.accounts.read();
        let acc = accounts.get(client).ok_or_else(|| not_found(client))?;
        acc.lock().debit(&amount, self.policy)?;
        debug!(%client, %amount, "withdrawn");
        Ok(())
    }

    fn transfer(
        &self,
        sender: &ClientId,
        receiver: &ClientId,
        amount: Money,
    ) -> Result<(), LedgerError> {
        let accounts = self.accounts.read();
        let from = accounts.get(sender).ok_or_else(|| not_found(sender))?;
        let to = accounts.get(receiver).ok_or_else(|| not_found(receiver))?;

        if sender == receiver {
            // nothing moves, but the sender still has to be able to pay
            from.lock().debited(&amount, self.policy)?;
            return Ok(());
        }

        let (mut from, mut to) = if sender < receiver {
            let from = from.lock();
            (from, to.lock())
        } else {
            let to = to.lock();
            (from.lock(), to)
        };

        // both new balances are computed before either is stored
        let debited = from.debited(&amount, self.policy)?;
        let credited = to.credited(&amount)?;
        from.set_balance(debited);
        to.set_balance(credited);

        debug!(%sender, %receiver, %amount, "transferred");
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::money::MoneyError;

    fn money(amount: Decimal) -> Money {
        Money::new(amount).unwrap()
    }

    fn ledger_with(clients: &[(&str, Decimal)]) -> InMemoryLedger {
        let ledger = InMemoryLedger::new();
        for (client, amount) in clients {
            let id = ClientId::from(*client);
            ledger.create_client(id.clone()).unwrap();
            ledger.deposit(&id, money(*amount)).unwrap();
        }
        ledger
    }

    #[test]
    fn create_client() {
        let ledger = InMemoryLedger::new();
        assert!(ledger.is_empty());

        ledger.create_client("client".into()).unwrap();
        assert_eq!(ledger.len(), 1);
        assert!(ledger.balance(&"client".into()).unwrap().is_zero());
    }

    #[test]
    fn create_client_twice() {
        let ledger = ledger_with(&[("client1", dec!(10))]);
        let client = ClientId::from("client1");

        let err = ledger.create_client(client.clone()).unwrap_err();
        assert_eq!(err, LedgerError::AlreadyExists(client.clone()));
        assert_eq!(err.to_string(), "Client client1 already exists");
        assert_eq!(ledger.balance(&client).unwrap(), money(dec!(10)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn unknown_client() {
        let ledger = ledger_with(&[("email_1", dec!(100))]);
        let unknown = ClientId::from("email_2");
        let zero = Money::zero();

        let expected = LedgerError::ClientNotFound(unknown.clone());
        assert_eq!(ledger.balance(&unknown).unwrap_err(), expected);
        assert_eq!(ledger.deposit(&unknown, zero).unwrap_err(), expected);
        assert_eq!(ledger.withdraw(&unknown, zero).unwrap_err(), expected);
        assert_eq!(expected.to_string(), "Client email_2 not found");
        // lookups are exact, no case folding
        assert!(ledger.balance(&"EMAIL_1".into()).is_err());
    }

    #[test]
    fn deposit() {
        let ledger = ledger_with(&[("email1", dec!(100.0))]);
        let client = ClientId::from("email1");

        ledger.deposit(&client, money(dec!(50.0))).unwrap();
        assert_eq!(ledger.balance(&client).unwrap(), money(dec!(150)));
    }

    #[test]
    fn withdraw() {
        let ledger = ledger_with(&[("test", dec!(100.0))]);
        let client = ClientId::from("test");

        ledger.withdraw(&client, money(dec!(50.0))).unwrap();
        assert_eq!(ledger.balance(&client).unwrap(), money(dec!(50)));
    }

    #[test]
    fn withdraw_insufficient_funds() {
        let ledger = ledger_with(&[("schnulibuh", dec!(100))]);
        let client = ClientId::from("schnulibuh");

        let err = ledger.withdraw(&client, money(dec!(150))).unwrap_err();
        let expected = LedgerError::InsufficientFunds {
            balance: money(dec!(100)),
            requested: money(dec!(150)),
        };
        assert_eq!(err, expected);
        assert_eq!(ledger.balance(&client).unwrap(), money(dec!(100)));
    }

    #[test]
    fn withdraw_full_balance() {
        let ledger = ledger_with(&[("a", dec!(100))]);
        let a = ClientId::from("a");

        ledger.withdraw(&a, money(dec!(100))).unwrap();
        assert!(ledger.balance(&a).unwrap().is_zero());

        let strict = InMemoryLedger::with_policy(FundsPolicy::RejectExact);
        strict.create_client(a.clone()).unwrap();
        strict.deposit(&a, money(dec!(100))).unwrap();

        let err = strict.withdraw(&a, money(dec!(100))).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        assert_eq!(strict.balance(&a).unwrap(), money(dec!(100)));
    }

    #[test]
    fn transfer() {
        let ledger = ledger_with(&[("mami", dec!(100)), ("papi", dec!(100))]);
        let (mami, papi) = (ClientId::from("mami"), ClientId::from("papi"));

        ledger.transfer(&mami, &papi, money(dec!(10.0))).unwrap();
        assert_eq!(ledger.balance(&mami).unwrap(), money(dec!(90)));
        assert_eq!(ledger.balance(&papi).unwrap(), money(dec!(110)));

        // lock order must not depend on argument order
        ledger.transfer(&papi, &mami, money(dec!(60))).unwrap();
        assert_eq!(ledger.balance(&mami).unwrap(), money(dec!(150)));
        assert_eq!(ledger.balance(&papi).unwrap(), money(dec!(50)));
    }

    #[test]
    fn transfer_scenario() {
        let ledger = ledger_with(&[("a", dec!(100)), ("b", dec!(0))]);
        let (a, b) = (ClientId::from("a"), ClientId::from("b"));

        ledger.transfer(&a, &b, money(dec!(50))).unwrap();
        assert_eq!(ledger.balance(&a).unwrap(), money(dec!(50)));
        assert_eq!(ledger.balance(&b).unwrap(), money(dec!(50)));

        let err = ledger.transfer(&a, &b, money(dec!(1000))).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        assert_eq!(ledger.balance(&a).unwrap(), money(dec!(50)));
        assert_eq!(ledger.balance(&b).unwrap(), money(dec!(50)));
    }

    #[test]
    fn transfer_unknown_party() {
        let ledger = ledger_with(&[("a", dec!(100))]);
        let (a, ghost) = (ClientId::from("a"), ClientId::from("ghost"));

        let err = ledger.transfer(&a, &ghost, money(dec!(10))).unwrap_err();
        assert_eq!(err, LedgerError::ClientNotFound(ghost.clone()));
        assert_eq!(ledger.balance(&a).unwrap(), money(dec!(100)));

        let err = ledger.transfer(&ghost, &a, money(dec!(10))).unwrap_err();
        assert_eq!(err, LedgerError::ClientNotFound(ghost));
        assert_eq!(ledger.balance(&a).unwrap(), money(dec!(100)));
    }

    #[test]
    fn transfer_to_self() {
        let ledger = ledger_with(&[("a", dec!(100))]);
        let a = ClientId::from("a");

        ledger.transfer(&a, &a, money(dec!(40))).unwrap();
        assert_eq!(ledger.balance(&a).unwrap(), money(dec!(100)));

        let err = ledger.transfer(&a, &a, money(dec!(400))).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    }

    #[test]
    fn failed_credit_leaves_sender_untouched() {
        let ledger = ledger_with(&[("a", dec!(100)), ("b", Decimal::MAX)]);
        let (a, b) = (ClientId::from("a"), ClientId::from("b"));

        let err = ledger.transfer(&a, &b, money(dec!(1))).unwrap_err();
        assert_eq!(err, LedgerError::Money(MoneyError::Overflow));
        assert_eq!(ledger.balance(&a).unwrap(), money(dec!(100)));
        assert_eq!(ledger.balance(&b).unwrap(), money(Decimal::MAX));
    }

    #[test]
    fn snapshot_is_sorted() {
        let ledger = ledger_with(&[("c", dec!(3)), ("a", dec!(1)), ("b", dec!(2))]);
        let expected = vec![
            ("a".into(), money(dec!(1))),
            ("b".into(), money(dec!(2))),
            ("c".into(), money(dec!(3))),
        ];
        assert_eq!(ledger.snapshot(), expected);
    }
}
