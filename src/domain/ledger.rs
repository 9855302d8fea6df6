use std::collections::HashSet;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::{Cents, Expense, ExpenseId, ExpenseUpdate, ValidationError};

/// The full ordered collection of expenses, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    expenses: Vec<Expense>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_expenses(expenses: Vec<Expense>) -> Self {
        Self { expenses }
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expense> {
        self.expenses.iter()
    }

    pub fn get(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// Highest id currently present, or 0 for an empty ledger.
    pub fn max_id(&self) -> ExpenseId {
        self.expenses.iter().map(|e| e.id).max().unwrap_or(0)
    }

    /// The id after the highest one present.
    pub fn next_id(&self) -> ExpenseId {
        self.max_id() + 1
    }

    pub fn push(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

    /// Apply `update` to the expense with `id`.
    /// Returns `Ok(None)` if no such expense exists.
    pub fn update(
        &mut self,
        id: ExpenseId,
        update: &ExpenseUpdate,
    ) -> Result<Option<&Expense>, ValidationError> {
        match self.expenses.iter_mut().find(|e| e.id == id) {
            Some(expense) => {
                expense.apply(update)?;
                Ok(Some(&*expense))
            }
            None => Ok(None),
        }
    }

    /// Remove the expense with `id`, returning it if it existed.
    pub fn remove(&mut self, id: ExpenseId) -> Option<Expense> {
        let index = self.expenses.iter().position(|e| e.id == id)?;
        Some(self.expenses.remove(index))
    }

    /// Sum of all amounts, or `None` if it does not fit in [`Cents`].
    pub fn total(&self) -> Option<Cents> {
        checked_sum(self.expenses.iter().map(|e| e.amount))
    }

    /// Sum of amounts dated in `month` (1-12), across all years.
    /// The inner `None` means the sum does not fit in [`Cents`].
    pub fn monthly_total(&self, month: u32) -> Result<Option<Cents>, ValidationError> {
        let month = validate_month(month)?;
        Ok(checked_sum(
            self.expenses
                .iter()
                .filter(|e| e.date.month() == month)
                .map(|e| e.amount),
        ))
    }

    /// Check the invariants a loaded ledger must satisfy.
    pub fn check_integrity(&self) -> Result<(), IntegrityError> {
        let mut seen = HashSet::with_capacity(self.expenses.len());
        for expense in &self.expenses {
            if expense.id == 0 {
                return Err(IntegrityError::ZeroId);
            }
            if !seen.insert(expense.id) {
                return Err(IntegrityError::DuplicateId(expense.id));
            }
            if expense.description.trim().is_empty() {
                return Err(IntegrityError::BlankDescription(expense.id));
            }
            if expense.amount == 0 {
                return Err(IntegrityError::ZeroAmount(expense.id));
            }
        }
        Ok(())
    }
}

fn checked_sum(mut amounts: impl Iterator<Item = Cents>) -> Option<Cents> {
    amounts.try_fold(0, Cents::checked_add)
}

/// Ensure `month` is a calendar month number (1-12).
pub fn validate_month(month: u32) -> Result<u32, ValidationError> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::MonthOutOfRange(month));
    }
    Ok(month)
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Expense;
    type IntoIter = std::slice::Iter<'a, Expense>;

    fn into_iter(self) -> Self::IntoIter {
        self.expenses.iter()
    }
}

impl IntoIterator for Ledger {
    type Item = Expense;
    type IntoIter = std::vec::IntoIter<Expense>;

    fn into_iter(self) -> Self::IntoIter {
        self.expenses.into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    #[error("expense ids must be positive")]
    ZeroId,

    #[error("duplicate expense id {0}")]
    DuplicateId(ExpenseId),

    #[error("expense {0} has an empty description")]
    BlankDescription(ExpenseId),

    #[error("expense {0} has a zero amount")]
    ZeroAmount(ExpenseId),
}
