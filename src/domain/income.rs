use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Order;

/// Summed order totals for one calendar month (UTC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyIncome {
    pub year: i32,
    pub month: u32,
    pub total: Decimal,
}

/// Midnight UTC on the first day of the month two months before `now`.
pub fn income_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let months = now.year() * 12 + now.month0() as i32 - 2;
    let (year, month) = (months.div_euclid(12), months.rem_euclid(12) as u32 + 1);
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Group orders created inside the income window by month of creation.
///
/// Buckets come back in chronological order, one per month that has at
/// least one order.
pub fn monthly_income<'a>(orders: impl IntoIterator<Item = &'a Order>, now: DateTime<Utc>) -> Vec<MonthlyIncome> {
    let start = income_window_start(now);
    let mut buckets: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
    for order in orders.into_iter().filter(|order| order.created_at >= start) {
        let key = (order.created_at.year(), order.created_at.month());
        let total = buckets.entry(key).or_default();
        *total = total.saturating_add(order.total_amount);
    }
    buckets
        .into_iter()
        .map(|((year, month), total)| MonthlyIncome { year, month, total })
        .collect()
}
