//! Implements the JSON API for the aggregate summary that drives the
//! dashboard's summary cards and report charts.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    models::TransactionType,
    providers::TransactionProvider,
    state::AppState,
    summary::{
        CategoryTotal, DayTotal, PeriodFilter, balance, expense, filter_by_period,
        group_by_category, group_by_day, income,
    },
    timezone::local_today,
};

/// How many of the most recent days the per-day groupings keep when the
/// client does not say otherwise.
pub const DEFAULT_MAX_DAYS: usize = 10;

/// The query parameters accepted by the summary endpoint.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// The period to narrow the summary to, defaulting to the whole list.
    period: Option<String>,
    /// How many of the most recent days to keep in the per-day groupings.
    max_days: Option<usize>,
}

/// The aggregate view of a transaction list over one period.
#[derive(Debug, Serialize)]
pub struct TransactionSummary {
    /// The summed income amounts.
    pub income: f64,
    /// The summed expense amounts.
    pub expense: f64,
    /// Income minus expense.
    pub balance: f64,
    /// Income bucketed by category, largest first.
    pub income_by_category: Vec<CategoryTotal>,
    /// Expenses bucketed by category, largest first.
    pub expense_by_category: Vec<CategoryTotal>,
    /// Income bucketed by day, oldest to newest.
    pub income_by_day: Vec<DayTotal>,
    /// Expenses bucketed by day, oldest to newest.
    pub expense_by_day: Vec<DayTotal>,
}

/// A handler for computing the aggregate summary of the session's
/// transactions over the requested period.
///
/// # Errors
/// This function will return an [Error::InvalidPeriodFilter] if `period` is
/// not a recognised selector.
pub async fn get_summary<P>(
    State(state): State<AppState<P>>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<TransactionSummary>, Error>
where
    P: TransactionProvider + Clone + Send + Sync,
{
    let period = match &query.period {
        Some(text) => text.parse()?,
        None => PeriodFilter::All,
    };
    let max_days = query.max_days.unwrap_or(DEFAULT_MAX_DAYS);

    let transactions = state.provider.get_all().await?;
    let today = local_today(state.local_offset);
    let filtered = filter_by_period(&transactions, period, today, state.local_offset);

    Ok(Json(TransactionSummary {
        income: income(&filtered),
        expense: expense(&filtered),
        balance: balance(&filtered),
        income_by_category: group_by_category(&filtered, TransactionType::Income),
        expense_by_category: group_by_category(&filtered, TransactionType::Expense),
        income_by_day: group_by_day(
            &filtered,
            TransactionType::Income,
            max_days,
            state.local_offset,
        ),
        expense_by_day: group_by_day(
            &filtered,
            TransactionType::Expense,
            max_days,
            state.local_offset,
        ),
    }))
}
