use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Cents, MAX_CENTS, amount_serde, parse_cents};

pub type ExpenseId = u64;

/// Date format used on disk and accepted from the command line.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single recorded expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    #[serde(with = "amount_serde")]
    pub amount: Cents,
    pub date: NaiveDate,
}

impl Expense {
    /// Build a validated expense. The description is kept as given; only its
    /// trimmed form has to be non-empty.
    pub fn new(
        id: ExpenseId,
        description: &str,
        amount: Cents,
        date: &str,
    ) -> Result<Self, ValidationError> {
        let description = validate_description(description)?;
        let amount = validate_amount(amount)?;
        let date = parse_date(date)?;
        Ok(Self {
            id,
            description,
            amount,
            date,
        })
    }

    /// Apply every field present in `update`. Nothing is changed unless all
    /// supplied fields are valid.
    pub fn apply(&mut self, update: &ExpenseUpdate) -> Result<(), ValidationError> {
        let description = update
            .description
            .as_deref()
            .map(validate_description)
            .transpose()?;
        let amount = update.amount.map(validate_amount).transpose()?;
        let date = update.date.as_deref().map(parse_date).transpose()?;

        if let Some(description) = description {
            self.description = description;
        }
        if let Some(amount) = amount {
            self.amount = amount;
        }
        if let Some(date) = date {
            self.date = date;
        }
        Ok(())
    }
}

/// Partial update for an existing expense. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseUpdate {
    pub description: Option<String>,
    pub amount: Option<Cents>,
    pub date: Option<String>,
}

impl ExpenseUpdate {
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_amount(mut self, amount: Cents) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.amount.is_none() && self.date.is_none()
    }

    /// Check every supplied field with the same rules used for new expenses.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        if let Some(date) = &self.date {
            parse_date(date)?;
        }
        Ok(())
    }
}

/// Caller-supplied input that violates a precondition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("description required")]
    DescriptionRequired,

    #[error("amount required")]
    AmountRequired,

    #[error("invalid amount '{0}', expected a number like 12.50")]
    InvalidAmount(String),

    #[error("amount out of range: {0} cents (limit is {max})", max = MAX_CENTS)]
    AmountOutOfRange(Cents),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("month out of range: {0} (expected 1-12)")]
    MonthOutOfRange(u32),
}

fn validate_description(description: &str) -> Result<String, ValidationError> {
    if description.trim().is_empty() {
        return Err(ValidationError::DescriptionRequired);
    }
    Ok(description.to_string())
}

// Zero is treated as a missing amount.
fn validate_amount(amount: Cents) -> Result<Cents, ValidationError> {
    if amount == 0 {
        return Err(ValidationError::AmountRequired);
    }
    if amount.unsigned_abs() > MAX_CENTS.unsigned_abs() {
        return Err(ValidationError::AmountOutOfRange(amount));
    }
    Ok(amount)
}

/// Parse a user-supplied decimal amount such as `"12.50"` into cents.
pub fn parse_amount(input: &str) -> Result<Cents, ValidationError> {
    parse_cents(input).map_err(|_| ValidationError::InvalidAmount(input.to_string()))
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))
}
