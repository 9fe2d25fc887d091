// Expense entry form
//
// Only the amount is validated. Date and category go into the store exactly
// as typed, empty strings included.

use crate::context::AppContext;
use crate::db;
use crate::error::{ExpenseError, Result};
use log::{info, warn};

/// Which of the three text fields an edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Date,
    Category,
    Amount,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Date => "Date (YYYY-MM-DD)",
            FormField::Category => "Category",
            FormField::Amount => "Amount",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseForm {
    pub date: String,
    pub category: String,
    pub amount: String,
}

impl ExpenseForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Date => &self.date,
            FormField::Category => &self.category,
            FormField::Amount => &self.amount,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Date => &mut self.date,
            FormField::Category => &mut self.category,
            FormField::Amount => &mut self.amount,
        }
    }

    pub fn clear(&mut self) {
        self.date.clear();
        self.category.clear();
        self.amount.clear();
    }

    /// Validate and store the current form contents.
    ///
    /// On success the fields are cleared and the new record id is returned.
    /// An unparseable amount leaves the form and the store untouched.
    pub fn submit(&mut self, ctx: &AppContext) -> Result<i64> {
        let amount = parse_amount(&self.amount)?;
        let id = db::insert_expense(&ctx.conn, &self.date, &self.category, amount)?;

        info!("event=form_submit module=form status=ok id={}", id);
        self.clear();
        Ok(id)
    }
}

/// Parse a user-typed amount. Surrounding whitespace is ignored; anything
/// else that is not a finite number is rejected.
pub fn parse_amount(raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => {
            warn!("event=form_submit module=form status=rejected reason=invalid_amount");
            Err(ExpenseError::InvalidAmount {
                input: raw.to_string(),
            })
        }
    }
}
