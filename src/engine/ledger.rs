use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

use crate::models::{Expense, ExpenseTotals};

/// Sum expenses over the ledger windows ending at `now`.
///
/// Windows are "on or after" their start: the last 7 days, the last 30 days
/// and the calendar year of `now` (UTC).
pub fn expense_totals(expenses: &[Expense], now: DateTime<Utc>) -> ExpenseTotals {
    let week_start = now - Duration::days(7);
    let month_start = now - Duration::days(30);
    let year_start = Utc
        .with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let sum_since = |start: DateTime<Utc>| -> f64 {
        expenses
            .iter()
            .filter(|e| e.date >= start)
            .map(|e| e.value)
            .sum()
    };

    ExpenseTotals {
        total: expenses.iter().map(|e| e.value).sum(),
        last_week: sum_since(week_start),
        last_month: sum_since(month_start),
        year_to_date: sum_since(year_start),
    }
}

/// Newest first.
pub fn sort_newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| b.date.cmp(&a.date));
}
