//! Table read descriptions: filters, ordering and limits.
//!
//! A [`Query`] is a plain value that both store implementations interpret:
//! the in-memory store evaluates it against JSON rows, the hosted adapter
//! renders it as REST query parameters (`col=eq.v`, `col=in.(a,b)`,
//! `order=col.asc`).

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::model::Table;

/// Row predicate on a single column.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    Eq { column: String, value: Value },
    In { column: String, values: Vec<Value> },
}

impl Filter {
    pub fn eq(column: &str, value: impl Serialize) -> Self {
        Self::Eq { column: column.to_owned(), value: to_json(value) }
    }

    pub fn is_in<I, V>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Serialize,
    {
        Self::In { column: column.to_owned(), values: values.into_iter().map(to_json).collect() }
    }

    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            Self::Eq { column, .. } | Self::In { column, .. } => column,
        }
    }

    /// Whether `row` satisfies this predicate. A missing column never matches.
    #[must_use]
    pub fn matches(&self, row: &Value) -> bool {
        let Some(actual) = row.get(self.column()) else {
            return false;
        };
        match self {
            Self::Eq { value, .. } => actual == value,
            Self::In { values, .. } => values.iter().any(|v| v == actual),
        }
    }

    /// Render as a REST `(column, operator.value)` parameter pair.
    #[must_use]
    pub fn to_param(&self) -> (String, String) {
        match self {
            Self::Eq { column, value } => (column.clone(), format!("eq.{}", render_value(value))),
            Self::In { column, values } => {
                let list = values.iter().map(render_value).collect::<Vec<_>>().join(",");
                (column.clone(), format!("in.({list})"))
            }
        }
    }
}

/// One ordering key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// A table read: filters are AND-ed, ordering keys applied left to right.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub table: Table,
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub limit: Option<usize>,
}

impl Query {
    #[must_use]
    pub fn from(table: Table) -> Self {
        Self { table, filters: Vec::new(), order: Vec::new(), limit: None }
    }

    #[must_use]
    pub fn eq(mut self, column: &str, value: impl Serialize) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    #[must_use]
    pub fn is_in<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Serialize,
    {
        self.filters.push(Filter::is_in(column, values));
        self
    }

    #[must_use]
    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order.push(Order { column: column.to_owned(), ascending });
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }

    /// Compare two rows by this query's ordering keys.
    #[must_use]
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        for key in &self.order {
            let ord = compare_values(a.get(&key.column), b.get(&key.column));
            let ord = if key.ascending { ord } else { ord.reverse() };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    /// Apply filters, ordering and limit to a row set.
    #[must_use]
    pub fn apply<'a, I>(&self, rows: I) -> Vec<Value>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut out: Vec<Value> = rows.into_iter().filter(|r| self.matches(r)).cloned().collect();
        if !self.order.is_empty() {
            out.sort_by(|a, b| self.compare(a, b));
        }
        if let Some(limit) = self.limit {
            out.truncate(limit);
        }
        out
    }

    /// REST query parameters: `select=*`, one pair per filter, then order/limit.
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_owned(), "*".to_owned())];
        params.extend(self.filters.iter().map(Filter::to_param));
        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(|o| format!("{}.{}", o.column, if o.ascending { "asc" } else { "desc" }))
                .collect::<Vec<_>>()
                .join(",");
            params.push(("order".to_owned(), order));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_owned(), limit.to_string()));
        }
        params
    }
}

fn to_json(value: impl Serialize) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_owned(),
        other => other.to_string(),
    }
}

/// Total order over JSON column values.
///
/// Timestamps are compared as instants so differing fractional precision or
/// offsets do not reorder rows; other strings compare lexically. `null` and
/// missing values sort first.
pub(crate) fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (OffsetDateTime::parse(x, &Rfc3339), OffsetDateTime::parse(y, &Rfc3339)) {
                (Ok(tx), Ok(ty)) => tx.cmp(&ty),
                _ => x.cmp(y),
            }
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}
