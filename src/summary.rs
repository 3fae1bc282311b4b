//! Pure aggregation utilities over transaction lists: period filtering,
//! income/expense/balance totals and the category and per-day groupings that
//! drive the summary cards and report charts.
//!
//! These functions have no side effects and are total over well-formed input:
//! an empty list yields empty or zero results, never an error. Records whose
//! date cannot be read are left out of date-based filtering and grouping.

use std::str::FromStr;

use serde::Serialize;
use time::{Date, Duration, Month, UtcOffset};

use crate::{
    Error,
    models::{Transaction, TransactionType},
    timezone::{format_day_month, parse_local_date},
};

/// A selector narrowing a transaction list to a calendar window.
///
/// Window boundaries are evaluated against the *local* calendar date encoded
/// in each transaction's `date` field, never a UTC-shifted interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodFilter {
    /// No filtering, the whole list.
    All,
    /// The rolling window of local dates no older than 30 days before today,
    /// inclusive.
    Last30Days,
    /// Local dates from the first day of the current local month onwards.
    ThisMonth,
    /// All local dates within one specific calendar month.
    Month {
        /// The calendar year of the month.
        year: i32,
        /// The month within `year`.
        month: Month,
    },
}

impl FromStr for PeriodFilter {
    type Err = Error;

    /// Parse the query-string forms `all`, `30days`, `thisMonth` and the
    /// literal month key `YYYY-MM`.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "all" => Ok(PeriodFilter::All),
            "30days" => Ok(PeriodFilter::Last30Days),
            "thisMonth" => Ok(PeriodFilter::ThisMonth),
            other => {
                let invalid = || Error::InvalidPeriodFilter(other.to_owned());

                let (year_text, month_text) = other.split_once('-').ok_or_else(invalid)?;
                let year: i32 = year_text.parse().map_err(|_| invalid())?;
                let month_number: u8 = month_text.parse().map_err(|_| invalid())?;
                let month = Month::try_from(month_number).map_err(|_| invalid())?;

                Ok(PeriodFilter::Month { year, month })
            }
        }
    }
}

/// One bucket of the per-category grouping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The category label.
    pub name: String,
    /// The summed amount for the category.
    pub value: f64,
}

/// One bucket of the per-day grouping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayTotal {
    /// The bucket's local date formatted as `day/month`.
    pub name: String,
    /// The summed amount for the day.
    pub total: f64,
}

/// Return the subset of `transactions` whose local calendar date falls in the
/// window selected by `period`.
///
/// `today` is the caller's local calendar date, passed explicitly so the
/// function stays pure; `local_offset` is only consulted when a recorded date
/// carries an explicit UTC offset.
pub fn filter_by_period(
    transactions: &[Transaction],
    period: PeriodFilter,
    today: Date,
    local_offset: UtcOffset,
) -> Vec<Transaction> {
    if period == PeriodFilter::All {
        return transactions.to_vec();
    }

    transactions
        .iter()
        .filter(|transaction| {
            let Ok(date) = parse_local_date(&transaction.date, local_offset) else {
                return false;
            };

            match period {
                PeriodFilter::All => true,
                PeriodFilter::Last30Days => date >= today - Duration::days(30),
                PeriodFilter::ThisMonth => date >= today.replace_day(1).unwrap_or(today),
                PeriodFilter::Month { year, month } => {
                    date.year() == year && date.month() == month
                }
            }
        })
        .cloned()
        .collect()
}

/// Sum the amounts of all income transactions in `transactions`.
///
/// Operates on exactly the slice given, with no implicit period filtering.
pub fn income(transactions: &[Transaction]) -> f64 {
    sum_of_type(transactions, TransactionType::Income)
}

/// Sum the amounts of all expense transactions in `transactions`.
pub fn expense(transactions: &[Transaction]) -> f64 {
    sum_of_type(transactions, TransactionType::Expense)
}

/// The balance of `transactions`: income minus expense.
pub fn balance(transactions: &[Transaction]) -> f64 {
    income(transactions) - expense(transactions)
}

fn sum_of_type(transactions: &[Transaction], transaction_type: TransactionType) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == transaction_type)
        .map(|transaction| transaction.amount)
        .sum()
}

/// Bucket the transactions of the given type by category, summing amounts per
/// bucket, sorted by summed value descending.
pub fn group_by_category(
    transactions: &[Transaction],
    transaction_type: TransactionType,
) -> Vec<CategoryTotal> {
    let mut buckets: Vec<CategoryTotal> = Vec::new();

    for transaction in transactions {
        if transaction.transaction_type != transaction_type {
            continue;
        }

        match buckets
            .iter_mut()
            .find(|bucket| bucket.name == transaction.category)
        {
            Some(bucket) => bucket.value += transaction.amount,
            None => buckets.push(CategoryTotal {
                name: transaction.category.clone(),
                value: transaction.amount,
            }),
        }
    }

    buckets.sort_by(|a, b| b.value.total_cmp(&a.value));

    buckets
}

/// Bucket the transactions of the given type by local calendar date, summing
/// amounts per day, keeping only the `max_days` most recent dates and
/// returning them oldest-to-newest with `day/month` labels.
///
/// Transactions whose date cannot be read are skipped.
pub fn group_by_day(
    transactions: &[Transaction],
    transaction_type: TransactionType,
    max_days: usize,
    local_offset: UtcOffset,
) -> Vec<DayTotal> {
    let mut buckets: Vec<(Date, f64)> = Vec::new();

    for transaction in transactions {
        if transaction.transaction_type != transaction_type {
            continue;
        }

        let Ok(date) = parse_local_date(&transaction.date, local_offset) else {
            continue;
        };

        match buckets.iter_mut().find(|(bucket_date, _)| *bucket_date == date) {
            Some((_, total)) => *total += transaction.amount,
            None => buckets.push((date, transaction.amount)),
        }
    }

    buckets.sort_by_key(|(date, _)| *date);

    if buckets.len() > max_days {
        buckets.drain(..buckets.len() - max_days);
    }

    buckets
        .into_iter()
        .map(|(date, total)| DayTotal {
            name: format_day_month(date),
            total,
        })
        .collect()
}

#[cfg(test)]
mod summary_tests {
    use time::{Month, UtcOffset, macros::date};

    use crate::models::{Transaction, TransactionId, TransactionType};

    use super::{
        CategoryTotal, DayTotal, PeriodFilter, balance, expense, filter_by_period,
        group_by_category, group_by_day, income,
    };

    fn transaction(
        id: &str,
        amount: f64,
        transaction_type: TransactionType,
        category: &str,
        date: &str,
    ) -> Transaction {
        Transaction {
            id: TransactionId::new(id),
            description: format!("Transaction {id}"),
            amount,
            transaction_type,
            category: category.to_owned(),
            date: date.to_owned(),
        }
    }

    /// The worked scenario: 100 income, 40 + 20 expenses over two days.
    fn sample_list() -> Vec<Transaction> {
        vec![
            transaction("1", 100.0, TransactionType::Income, "Work", "2026-01-10"),
            transaction("2", 40.0, TransactionType::Expense, "Food", "2026-01-10"),
            transaction("3", 20.0, TransactionType::Expense, "Food", "2026-01-11"),
        ]
    }

    #[test]
    fn totals_match_the_worked_scenario() {
        let transactions = sample_list();

        assert_eq!(income(&transactions), 100.0);
        assert_eq!(expense(&transactions), 60.0);
        assert_eq!(balance(&transactions), 40.0);
    }

    #[test]
    fn every_record_is_counted_exactly_once_across_the_type_partition() {
        let transactions = sample_list();

        let total: f64 = transactions.iter().map(|t| t.amount).sum();
        assert_eq!(income(&transactions) + expense(&transactions), total);
        assert_eq!(
            balance(&transactions),
            income(&transactions) - expense(&transactions)
        );
    }

    #[test]
    fn totals_of_an_empty_list_are_zero() {
        assert_eq!(income(&[]), 0.0);
        assert_eq!(expense(&[]), 0.0);
        assert_eq!(balance(&[]), 0.0);
        assert!(group_by_category(&[], TransactionType::Expense).is_empty());
        assert!(group_by_day(&[], TransactionType::Expense, 10, UtcOffset::UTC).is_empty());
    }

    #[test]
    fn expenses_group_by_category_sorted_by_value_descending() {
        let mut transactions = sample_list();
        transactions.push(transaction(
            "4",
            100.0,
            TransactionType::Expense,
            "Rent",
            "2026-01-12",
        ));

        let grouped = group_by_category(&transactions, TransactionType::Expense);

        assert_eq!(
            grouped,
            vec![
                CategoryTotal {
                    name: "Rent".to_owned(),
                    value: 100.0
                },
                CategoryTotal {
                    name: "Food".to_owned(),
                    value: 60.0
                },
            ]
        );
    }

    #[test]
    fn scenario_expenses_group_into_a_single_category_bucket() {
        let grouped = group_by_category(&sample_list(), TransactionType::Expense);

        assert_eq!(
            grouped,
            vec![CategoryTotal {
                name: "Food".to_owned(),
                value: 60.0
            }]
        );
    }

    #[test]
    fn expenses_group_by_day_oldest_to_newest() {
        let grouped = group_by_day(&sample_list(), TransactionType::Expense, 10, UtcOffset::UTC);

        assert_eq!(
            grouped,
            vec![
                DayTotal {
                    name: "10/01".to_owned(),
                    total: 40.0
                },
                DayTotal {
                    name: "11/01".to_owned(),
                    total: 20.0
                },
            ]
        );
    }

    #[test]
    fn group_by_day_keeps_the_most_recent_dates_when_truncating() {
        // 15 distinct expense dates, deliberately fed newest-first.
        let transactions: Vec<Transaction> = (1..=15)
            .rev()
            .map(|day| {
                transaction(
                    &day.to_string(),
                    1.0,
                    TransactionType::Expense,
                    "Food",
                    &format!("2026-01-{day:02}"),
                )
            })
            .collect();

        let grouped = group_by_day(&transactions, TransactionType::Expense, 10, UtcOffset::UTC);

        assert_eq!(grouped.len(), 10);
        assert_eq!(grouped.first().unwrap().name, "06/01");
        assert_eq!(grouped.last().unwrap().name, "15/01");
    }

    #[test]
    fn group_by_day_order_does_not_depend_on_input_order() {
        let mut transactions = sample_list();
        transactions.reverse();

        let grouped = group_by_day(&transactions, TransactionType::Expense, 10, UtcOffset::UTC);

        assert_eq!(grouped.first().unwrap().name, "10/01");
        assert_eq!(grouped.last().unwrap().name, "11/01");
    }

    #[test]
    fn period_filter_parses_the_query_string_forms() {
        assert_eq!("all".parse::<PeriodFilter>().unwrap(), PeriodFilter::All);
        assert_eq!(
            "30days".parse::<PeriodFilter>().unwrap(),
            PeriodFilter::Last30Days
        );
        assert_eq!(
            "thisMonth".parse::<PeriodFilter>().unwrap(),
            PeriodFilter::ThisMonth
        );
        assert_eq!(
            "2026-02".parse::<PeriodFilter>().unwrap(),
            PeriodFilter::Month {
                year: 2026,
                month: Month::February
            }
        );

        assert!("yesterday".parse::<PeriodFilter>().is_err());
        assert!("2026-13".parse::<PeriodFilter>().is_err());
        assert!("2026".parse::<PeriodFilter>().is_err());
    }

    #[test]
    fn thirty_day_window_is_inclusive_and_rolling() {
        let today = date!(2026 - 03 - 01);
        let transactions = vec![
            transaction("0", 1.0, TransactionType::Expense, "Food", "2026-01-29"),
            transaction("1", 1.0, TransactionType::Expense, "Food", "2026-01-30"),
            transaction("2", 1.0, TransactionType::Expense, "Food", "2026-01-31"),
            transaction("3", 1.0, TransactionType::Expense, "Food", "2026-03-01"),
        ];

        let filtered =
            filter_by_period(&transactions, PeriodFilter::Last30Days, today, UtcOffset::UTC);

        // 2026-01-30 is exactly 30 days before 2026-03-01 and stays inside
        // the window; 2026-01-29 is 31 days back and falls out.
        let ids: Vec<&str> = filtered.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn this_month_window_starts_at_the_first_of_the_month() {
        let today = date!(2026 - 02 - 15);
        let transactions = vec![
            transaction("1", 1.0, TransactionType::Expense, "Food", "2026-01-31"),
            transaction("2", 1.0, TransactionType::Expense, "Food", "2026-02-01"),
            transaction("3", 1.0, TransactionType::Income, "Work", "2026-02-15"),
        ];

        let filtered =
            filter_by_period(&transactions, PeriodFilter::ThisMonth, today, UtcOffset::UTC);

        let ids: Vec<&str> = filtered.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn month_key_matches_the_full_first_to_last_day_range() {
        let today = date!(2026 - 06 - 01);
        let transactions = vec![
            transaction("1", 1.0, TransactionType::Expense, "Food", "2026-01-31"),
            transaction("2", 1.0, TransactionType::Expense, "Food", "2026-02-01"),
            transaction("3", 1.0, TransactionType::Expense, "Food", "2026-02-28"),
            transaction("4", 1.0, TransactionType::Expense, "Food", "2026-03-01"),
        ];

        let period = "2026-02".parse::<PeriodFilter>().unwrap();
        let filtered = filter_by_period(&transactions, period, today, UtcOffset::UTC);

        let ids: Vec<&str> = filtered.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn bare_dates_stay_in_their_month_bucket_regardless_of_offset() {
        let today = date!(2026 - 02 - 20);
        let transactions = vec![transaction(
            "1",
            1.0,
            TransactionType::Expense,
            "Food",
            "2026-02-15",
        )];
        let period = "2026-02".parse::<PeriodFilter>().unwrap();

        for hours in [-11, 0, 13] {
            let local_offset = UtcOffset::from_hms(hours, 0, 0).unwrap();
            let filtered = filter_by_period(&transactions, period, today, local_offset);
            assert_eq!(filtered.len(), 1, "offset {hours:+}h shifted a bare date");
        }
    }

    #[test]
    fn unreadable_dates_are_excluded_from_date_based_windows() {
        let today = date!(2026 - 02 - 20);
        let transactions = vec![
            transaction("1", 1.0, TransactionType::Expense, "Food", "garbage"),
            transaction("2", 1.0, TransactionType::Expense, "Food", "2026-02-15"),
        ];

        let filtered =
            filter_by_period(&transactions, PeriodFilter::ThisMonth, today, UtcOffset::UTC);
        assert_eq!(filtered.len(), 1);

        // But "all" does no date interpretation at all.
        let all = filter_by_period(&transactions, PeriodFilter::All, today, UtcOffset::UTC);
        assert_eq!(all.len(), 2);
    }
}
