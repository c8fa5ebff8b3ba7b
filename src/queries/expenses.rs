//! Expense ledger: manual expenses plus one fuel line per fill-up.

use chrono::{DateTime, Utc};

use crate::engine::{self, ledger};
use crate::error::Result;
use crate::models::{Expense, ExpenseTotals, FillUpRecord, FuelType};
use crate::FuelTracker;

pub struct ExpenseQuery<'a> {
    tracker: &'a FuelTracker,
}

impl<'a> ExpenseQuery<'a> {
    pub fn new(tracker: &'a FuelTracker) -> Self {
        Self { tracker }
    }

    /// Save a manual expense and return it with its new id.
    pub fn add_manual(
        &self,
        user_id: &str,
        title: &str,
        value: f64,
        date: DateTime<Utc>,
    ) -> Result<Expense> {
        let expense = Expense::manual(title, value, date)?;
        self.tracker.expenses.save_expense(user_id, &expense)?;
        Ok(expense)
    }

    /// Every expense, newest first.
    ///
    /// Fuel lines come from the fill-up history. A fill-up that closes a
    /// valid interval carries that interval's distance and km/L.
    pub fn history(&self, user_id: &str) -> Result<Vec<Expense>> {
        let fill_ups = self.tracker.fill_ups.list_fill_ups(user_id)?;
        let mut expenses = fuel_expenses(&fill_ups);
        expenses.extend(self.tracker.expenses.list_expenses(user_id)?);
        ledger::sort_newest_first(&mut expenses);
        Ok(expenses)
    }

    pub fn totals(&self, user_id: &str, now: DateTime<Utc>) -> Result<ExpenseTotals> {
        let expenses = self.history(user_id)?;
        Ok(engine::expense_totals(&expenses, now))
    }
}

fn fuel_expenses(fill_ups: &[FillUpRecord]) -> Vec<Expense> {
    let mut expenses: Vec<Expense> = fill_ups.iter().map(Expense::from_fill_up).collect();
    for fuel in FuelType::ALL {
        for point in engine::compute_yield(fill_ups, fuel) {
            let closing = fill_ups.iter().position(|r| std::ptr::eq(r, point.next));
            if let Some(i) = closing {
                expenses[i].km_driven = Some(point.distance_km);
                expenses[i].efficiency = Some(point.km_per_liter);
            }
        }
    }
    expenses
}
