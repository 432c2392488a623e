//! crates/expense_tracker_core/src/view.rs
//!
//! Per-page view projections: read-only derived state computed from the
//! authoritative expense list. Everything here is pure and rebuilt from
//! scratch on every parameter change; nothing is mutated in place.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;
use std::cmp::Reverse;

use crate::domain::{Category, Expense, User};

//=========================================================================================
// Dashboard aggregation
//=========================================================================================

/// The dashboard's summary numbers, recomputed on every successful fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardStats {
    pub total: f64,
    pub count: usize,
    pub average: f64,
}

impl DashboardStats {
    /// Sums the list. The average is rounded to two decimal places and is
    /// zero for an empty list.
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let total: f64 = expenses.iter().map(|e| e.amount).sum();
        let count = expenses.len();
        let average = if count > 0 { round2(total / count as f64) } else { 0.0 };
        Self { total, count, average }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

//=========================================================================================
// List decoding
//=========================================================================================

/// Decodes the authoritative list from a fetched body: a JSON array
/// directly, or an array under a `result` wrapper. Anything else decodes
/// as an empty list.
pub fn decode_expense_list(body: &Value) -> Vec<Expense> {
    match body {
        Value::Array(items) => decode_items(items),
        Value::Object(_) => match body.get("result") {
            Some(Value::Array(items)) => decode_items(items),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Strict variant used by the dashboard: only a top-level JSON array
/// counts as a loaded list.
pub fn decode_expense_array(body: &Value) -> Option<Vec<Expense>> {
    body.as_array().map(|items| decode_items(items))
}

fn decode_items(items: &[Value]) -> Vec<Expense> {
    items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect()
}

//=========================================================================================
// Filter + search + sort
//=========================================================================================

/// The list view's category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Parses the dropdown value: `"all"` or an exact category name.
    pub fn parse(value: &str) -> Option<CategoryFilter> {
        if value.eq_ignore_ascii_case("all") {
            return Some(CategoryFilter::All);
        }
        Category::parse(value).map(CategoryFilter::Only)
    }

    fn keeps(&self, expense: &Expense) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => expense.category == *category,
        }
    }
}

/// Applies the category filter, then a case-insensitive substring search
/// against description or category name, then a stable most-recent-first
/// sort. Ties keep their original relative order; unparseable dates sort
/// after everything else. Applying this twice with the same parameters
/// yields the same list.
pub fn filter_expenses(expenses: &[Expense], filter: CategoryFilter, search: &str) -> Vec<Expense> {
    let term = search.trim().to_lowercase();
    let mut filtered: Vec<Expense> = expenses
        .iter()
        .filter(|expense| filter.keeps(expense))
        .filter(|expense| {
            term.is_empty()
                || expense.description.to_lowercase().contains(&term)
                || expense.category.as_str().to_lowercase().contains(&term)
        })
        .cloned()
        .collect();
    filtered.sort_by_cached_key(|expense| Reverse(date_sort_key(&expense.date)));
    filtered
}

/// Parses a wire date for ordering: RFC 3339 first, then a bare datetime,
/// then a bare calendar date at midnight.
fn date_sort_key(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed);
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(parsed.and_time(NaiveTime::MIN));
    }
    None
}

//=========================================================================================
// Edit buffer
//=========================================================================================

/// The modify page's editable projection of one record. Field values are
/// the strings the form works with, not the typed domain values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditBuffer {
    pub description: String,
    pub amount: String,
    pub category: String,
    pub date: String,
}

impl EditBuffer {
    /// Projects a raw record into the form: date truncated to
    /// calendar-day granularity, amount coerced to its string
    /// representation, missing fields as empty strings.
    pub fn from_value(record: &Value) -> EditBuffer {
        EditBuffer {
            description: record
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            amount: match record.get("amount") {
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::String(s)) => s.clone(),
                _ => String::new(),
            },
            category: record
                .get("category")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            date: date_only(record.get("date").and_then(Value::as_str).unwrap_or_default()),
        }
    }
}

/// Locates one record by identifier within a fetched body: array lookup
/// first, then a direct single-object match, then a `result`-wrapped
/// object. Ids compare as strings, whatever the wire type.
pub fn find_expense<'a>(body: &'a Value, id: &str) -> Option<&'a Value> {
    if let Value::Array(items) = body {
        return items.iter().find(|item| id_matches(item, id));
    }
    if body.is_object() {
        if id_matches(body, id) {
            return Some(body);
        }
        if let Some(result) = body.get("result") {
            if id_matches(result, id) {
                return Some(result);
            }
        }
    }
    None
}

fn id_matches(record: &Value, id: &str) -> bool {
    match record.get("id") {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

/// Truncates a wire date to calendar-day granularity, stripping any
/// time-of-day component.
pub fn date_only(raw: &str) -> String {
    raw.split('T').next().unwrap_or_default().to_string()
}

//=========================================================================================
// Profile projection
//=========================================================================================

/// The profile page's read-only projection of the session user.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub initial: char,
}

impl ProfileView {
    pub fn from_user(user: Option<&User>) -> ProfileView {
        let name = user
            .and_then(|u| u.name.clone())
            .filter(|n| !n.is_empty());
        let initial = name
            .as_ref()
            .and_then(|n| n.chars().next())
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('U');
        ProfileView {
            name: name.unwrap_or_else(|| "User Name".to_string()),
            email: user
                .and_then(|u| u.email.clone())
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| "user@example.com".to_string()),
            initial,
        }
    }
}
