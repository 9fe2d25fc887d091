// Expense table controller
//
// Rows mirror `db::list_expenses` exactly. Selection is a set of record ids,
// so it survives a refresh as long as the rows still exist.

use crate::context::AppContext;
use crate::db::{self, Expense};
use crate::error::{ExpenseError, Result};
use log::info;
use std::collections::BTreeSet;

#[derive(Debug, Default)]
pub struct TableView {
    pub rows: Vec<Expense>,
    marked: BTreeSet<i64>,
}

/// A deletion waiting for the user's yes/no answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub ids: Vec<i64>,
}

impl PendingDelete {
    pub fn prompt(&self) -> String {
        if self.ids.len() == 1 {
            "Are you sure you want to delete the selected record?".to_string()
        } else {
            format!(
                "Are you sure you want to delete the {} selected records?",
                self.ids.len()
            )
        }
    }
}

impl TableView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Throw away the displayed rows and reload them from the store.
    pub fn refresh(&mut self, ctx: &AppContext) -> Result<()> {
        self.rows.clear();
        self.rows = db::list_expenses(&ctx.conn)?;

        let present: BTreeSet<i64> = self.rows.iter().map(|e| e.id).collect();
        self.marked.retain(|id| present.contains(id));
        Ok(())
    }

    pub fn toggle_mark(&mut self, id: i64) {
        if !self.marked.remove(&id) {
            self.marked.insert(id);
        }
    }

    pub fn is_marked(&self, id: i64) -> bool {
        self.marked.contains(&id)
    }

    pub fn selection(&self) -> Vec<i64> {
        self.marked.iter().copied().collect()
    }

    pub fn clear_selection(&mut self) {
        self.marked.clear();
    }

    /// First half of "Delete Selected": refuse an empty selection, otherwise
    /// hand back what needs confirming.
    pub fn request_delete(&self, selection: &[i64]) -> Result<PendingDelete> {
        if selection.is_empty() {
            return Err(ExpenseError::EmptySelection);
        }
        Ok(PendingDelete {
            ids: selection.to_vec(),
        })
    }

    /// Second half: act on the user's answer. Returns the number of rows
    /// actually removed.
    pub fn confirm_delete(
        &mut self,
        ctx: &AppContext,
        pending: PendingDelete,
        confirmed: bool,
    ) -> Result<usize> {
        if !confirmed {
            info!("event=delete_cancel module=table count={}", pending.ids.len());
            return Ok(0);
        }

        let mut removed = 0;
        for id in &pending.ids {
            removed += db::delete_expense(&ctx.conn, *id)?;
        }

        self.refresh(ctx)?;
        Ok(removed)
    }
}
