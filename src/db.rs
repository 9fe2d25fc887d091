use crate::error::Result;
use log::{debug, info};
use rusqlite::{params, Connection};
use std::path::Path;

/// One recorded expense.
///
/// `id` is assigned by SQLite on insert and never reused for another row
/// while this one exists. `date` and `category` are stored exactly as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: i64,
    pub date: String,
    pub category: String,
    pub amount: f64,
}

/// Summed amount for one distinct category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Open (or create) the store file and make sure the schema exists.
pub fn open_database(path: &Path) -> Result<Connection> {
    info!("event=db_open module=db status=start path={}", path.display());
    let conn = Connection::open(path)?;
    setup_database(&conn)?;
    info!("event=db_open module=db status=ok path={}", path.display());
    Ok(conn)
}

/// In-memory store with the schema applied. Used by tests.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    setup_database(&conn)?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // ==========================================================================
    // Expenses Table (created once, never migrated)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS expenses (
            id INTEGER PRIMARY KEY,
            date TEXT,
            category TEXT,
            amount REAL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date)",
        [],
    )?;

    Ok(())
}

/// Insert one expense and return its new id.
pub fn insert_expense(conn: &Connection, date: &str, category: &str, amount: f64) -> Result<i64> {
    conn.execute(
        "INSERT INTO expenses (date, category, amount) VALUES (?1, ?2, ?3)",
        params![date, category, amount],
    )?;
    let id = conn.last_insert_rowid();

    info!("event=expense_insert module=db status=ok id={} category={:?}", id, category);
    Ok(id)
}

/// Delete by id. Missing ids are a no-op; returns the number of rows removed.
pub fn delete_expense(conn: &Connection, id: i64) -> Result<usize> {
    let removed = conn.execute("DELETE FROM expenses WHERE id = ?1", params![id])?;

    info!("event=expense_delete module=db status=ok id={} removed={}", id, removed);
    Ok(removed)
}

/// All expenses, newest date first (plain string ordering on `date`).
pub fn list_expenses(conn: &Connection) -> Result<Vec<Expense>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, category, amount
         FROM expenses
         ORDER BY date DESC, id DESC",
    )?;

    let expenses = stmt
        .query_map([], |row| {
            Ok(Expense {
                id: row.get(0)?,
                date: row.get(1)?,
                category: row.get(2)?,
                amount: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    debug!("event=expense_list module=db status=ok rows={}", expenses.len());
    Ok(expenses)
}

/// Sum of amounts per category, one row per distinct category.
pub fn sum_by_category(conn: &Connection) -> Result<Vec<CategoryTotal>> {
    let mut stmt = conn.prepare(
        "SELECT category, SUM(amount) as total
         FROM expenses
         GROUP BY category
         ORDER BY category",
    )?;

    let totals = stmt
        .query_map([], |row| {
            Ok(CategoryTotal {
                category: row.get(0)?,
                total: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(totals)
}

pub fn count_expenses(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(conn: &Connection) {
        insert_expense(conn, "2024-01-01", "Food", 10.0).unwrap();
        insert_expense(conn, "2024-01-02", "Food", 5.0).unwrap();
        insert_expense(conn, "2024-01-03", "Transport", 20.0).unwrap();
    }

    #[test]
    fn test_insert_then_list() {
        let conn = open_in_memory().unwrap();
        seed(&conn);

        let id = insert_expense(&conn, "2024-02-14", "Gifts", 42.5).unwrap();
        let expenses = list_expenses(&conn).unwrap();

        assert_eq!(expenses.len(), 4);
        let matching: Vec<_> = expenses.iter().filter(|e| e.id == id).collect();
        assert_eq!(matching.len(), 1, "new id should be unique");
        assert_eq!(matching[0].date, "2024-02-14");
        assert_eq!(matching[0].category, "Gifts");
        assert_eq!(matching[0].amount, 42.5);

        println!("✅ Insert/list test PASSED");
    }

    #[test]
    fn test_list_orders_by_date_descending() {
        for order in [["2024-01-01", "2024-03-01"], ["2024-03-01", "2024-01-01"]] {
            let conn = open_in_memory().unwrap();
            for date in order {
                insert_expense(&conn, date, "Misc", 1.0).unwrap();
            }

            let dates: Vec<String> = list_expenses(&conn)
                .unwrap()
                .into_iter()
                .map(|e| e.date)
                .collect();
            assert_eq!(dates, vec!["2024-03-01", "2024-01-01"]);
        }
    }

    #[test]
    fn test_list_accepts_free_form_fields() {
        let conn = open_in_memory().unwrap();
        let id = insert_expense(&conn, "", "", -3.25).unwrap();

        let expenses = list_expenses(&conn).unwrap();
        assert_eq!(
            expenses,
            vec![Expense {
                id,
                date: String::new(),
                category: String::new(),
                amount: -3.25,
            }]
        );
    }

    #[test]
    fn test_delete_existing_and_missing() {
        let conn = open_in_memory().unwrap();
        seed(&conn);

        let before = list_expenses(&conn).unwrap();
        let victim = before[1].id;

        assert_eq!(delete_expense(&conn, victim).unwrap(), 1);
        let after = list_expenses(&conn).unwrap();
        assert_eq!(after.len(), 2);
        assert!(after.iter().all(|e| e.id != victim));

        // Second delete of the same id is a no-op
        assert_eq!(delete_expense(&conn, victim).unwrap(), 0);
        assert_eq!(delete_expense(&conn, 9_999).unwrap(), 0);
        assert_eq!(list_expenses(&conn).unwrap(), after);
    }

    #[test]
    fn test_sum_by_category() {
        let conn = open_in_memory().unwrap();
        seed(&conn);

        let totals = sum_by_category(&conn).unwrap();
        assert_eq!(
            totals,
            vec![
                CategoryTotal {
                    category: "Food".to_string(),
                    total: 15.0,
                },
                CategoryTotal {
                    category: "Transport".to_string(),
                    total: 20.0,
                },
            ]
        );
    }

    #[test]
    fn test_sum_by_category_empty() {
        let conn = open_in_memory().unwrap();
        assert!(sum_by_category(&conn).unwrap().is_empty());
        assert_eq!(count_expenses(&conn).unwrap(), 0);
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expenses.db");

        let id = {
            let conn = open_database(&path).unwrap();
            insert_expense(&conn, "2024-05-01", "Rent", 900.0).unwrap()
        };

        let conn = open_database(&path).unwrap();
        let expenses = list_expenses(&conn).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].id, id);
        assert_eq!(expenses[0].category, "Rent");
        assert_eq!(count_expenses(&conn).unwrap(), 1);

        println!("✅ Persistence test PASSED");
    }
}
