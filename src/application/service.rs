use std::cell::Cell;
use std::path::PathBuf;

use tracing::debug;

use crate::domain::{Cents, Expense, ExpenseId, ExpenseUpdate, Ledger, validate_month};
use crate::storage::Store;

use super::{LedgerError, Result};

/// Application service providing the expense operations.
/// This is the primary interface for any client (CLI, tests, etc.).
///
/// Every operation reloads the ledger from the store; mutating operations hold the
/// store lock and write the whole ledger back before returning.
pub struct ExpenseService {
    store: Store,
    // Highest id loaded or assigned by this service, so a deleted maximum id is
    // not handed out again during the same session.
    high_water: Cell<ExpenseId>,
}

impl ExpenseService {
    /// Create a new expense service over the given store.
    pub fn new(store: Store) -> Self {
        Self {
            store,
            high_water: Cell::new(0),
        }
    }

    /// Open the expense file at `path` with default settings.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(Store::new(path))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Record a new expense and return its id.
    pub fn add(&self, description: &str, amount: Cents, date: &str) -> Result<ExpenseId> {
        // Validate before touching the store; the id is assigned below.
        let mut expense = Expense::new(0, description, amount, date)?;

        let _lock = self.store.lock()?;
        let mut ledger = self.load()?;
        expense.id = self.allocate_id(&ledger);
        let id = expense.id;
        ledger.push(expense);
        self.store.save(&ledger)?;

        debug!("Added expense {}", id);
        Ok(id)
    }

    /// Update the supplied fields of an expense.
    /// Returns the updated expense, or `None` if `id` does not exist.
    pub fn update(&self, id: ExpenseId, update: ExpenseUpdate) -> Result<Option<Expense>> {
        update.validate()?;

        let _lock = self.store.lock()?;
        let mut ledger = self.load()?;
        let updated = match ledger.update(id, &update)? {
            Some(expense) => expense.clone(),
            None => {
                debug!("Expense {} not found, nothing to update", id);
                return Ok(None);
            }
        };
        self.store.save(&ledger)?;

        debug!("Updated expense {}", id);
        Ok(Some(updated))
    }

    /// Delete an expense.
    /// Returns the removed expense, or `None` if `id` does not exist.
    pub fn delete(&self, id: ExpenseId) -> Result<Option<Expense>> {
        let _lock = self.store.lock()?;
        let mut ledger = self.load()?;
        let removed = match ledger.remove(id) {
            Some(expense) => expense,
            None => {
                debug!("Expense {} not found, nothing to delete", id);
                return Ok(None);
            }
        };
        self.store.save(&ledger)?;

        debug!("Deleted expense {}", id);
        Ok(Some(removed))
    }

    /// All expenses in insertion order. An empty ledger is not an error.
    pub fn list(&self) -> Result<Ledger> {
        self.load()
    }

    /// Sum of all expense amounts.
    pub fn total_summary(&self) -> Result<Cents> {
        self.load()?.total().ok_or(LedgerError::TotalOverflow)
    }

    /// Sum of expense amounts dated in `month` (1-12) of any year.
    pub fn monthly_summary(&self, month: u32) -> Result<Cents> {
        let month = validate_month(month)?;
        self.load()?
            .monthly_total(month)?
            .ok_or(LedgerError::TotalOverflow)
    }

    fn load(&self) -> Result<Ledger> {
        let ledger = self.store.load()?;
        self.high_water.set(self.high_water.get().max(ledger.max_id()));
        Ok(ledger)
    }

    fn allocate_id(&self, ledger: &Ledger) -> ExpenseId {
        let id = ledger.next_id().max(self.high_water.get() + 1);
        self.high_water.set(id);
        id
    }
}
