//! Filter evaluation against a DataFrame.
//!
//! Translates a parsed [`FilterExpr`] into a row mask over one dataset.
//! Connectives were already folded left-to-right by the parser, so plain
//! recursive evaluation preserves the documented ordering. Column matching
//! is case-insensitive: filters are written lowercase while clinical CSV
//! headers are conventionally uppercase.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use polars::prelude::{AnyValue, BooleanChunked, Column, DataFrame, NewChunkedArray};

use tlf_filter::{CmpOp, Comparison, FilterExpr, FilterValue};

use crate::error::{DataError, Result};

/// Applies a filter to one dataset, returning the matching row subset.
///
/// Every comparison must reference `dataset`; the parser accepts
/// mixed-dataset filters, but a single tabular handle cannot evaluate them,
/// so a foreign dataset name is rejected here. The always-true predicate
/// returns the frame unchanged.
pub fn apply_filter(df: &DataFrame, filter: &FilterExpr, dataset: &str) -> Result<DataFrame> {
    if filter.is_true() {
        return Ok(df.clone());
    }

    // Bind every atom's column once, up front.
    let mut columns: BTreeMap<&str, &Column> = BTreeMap::new();
    for cmp in filter.comparisons() {
        if !cmp.dataset.eq_ignore_ascii_case(dataset) {
            return Err(DataError::DatasetMismatch {
                expected: dataset.to_string(),
                found: cmp.dataset.clone(),
            });
        }
        if !columns.contains_key(cmp.column.as_str()) {
            let column = df
                .get_columns()
                .iter()
                .find(|c| c.name().eq_ignore_ascii_case(&cmp.column))
                .ok_or_else(|| DataError::ColumnNotFound {
                    column: cmp.column.clone(),
                    dataset: dataset.to_string(),
                })?;
            columns.insert(cmp.column.as_str(), column);
        }
    }

    let mut mask = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        mask.push(eval_expr(filter, row, &columns)?);
    }

    let kept = mask.iter().filter(|&&m| m).count();
    tracing::debug!(dataset, rows = df.height(), kept, "Applied filter");

    let mask = BooleanChunked::from_slice("filter_mask".into(), &mask);
    Ok(df.filter(&mask)?)
}

fn eval_expr(
    expr: &FilterExpr,
    row: usize,
    columns: &BTreeMap<&str, &Column>,
) -> Result<bool> {
    match expr {
        FilterExpr::True => Ok(true),
        FilterExpr::Cmp(cmp) => eval_comparison(cmp, row, columns),
        FilterExpr::And(lhs, rhs) => {
            Ok(eval_expr(lhs, row, columns)? && eval_expr(rhs, row, columns)?)
        }
        FilterExpr::Or(lhs, rhs) => {
            Ok(eval_expr(lhs, row, columns)? || eval_expr(rhs, row, columns)?)
        }
    }
}

fn eval_comparison(
    cmp: &Comparison,
    row: usize,
    columns: &BTreeMap<&str, &Column>,
) -> Result<bool> {
    let column = columns
        .get(cmp.column.as_str())
        .ok_or_else(|| DataError::ColumnNotFound {
            column: cmp.column.clone(),
            dataset: cmp.dataset.clone(),
        })?;
    let actual = column.get(row)?;

    Ok(match cmp.op {
        CmpOp::Eq => value_matches(&actual, &cmp.value),
        CmpOp::Ne => !value_matches(&actual, &cmp.value),
        CmpOp::Gt => matches!(ordering(&actual, &cmp.value), Some(Ordering::Greater)),
        CmpOp::Ge => {
            matches!(ordering(&actual, &cmp.value), Some(Ordering::Greater | Ordering::Equal))
        }
        CmpOp::Lt => matches!(ordering(&actual, &cmp.value), Some(Ordering::Less)),
        CmpOp::Le => {
            matches!(ordering(&actual, &cmp.value), Some(Ordering::Less | Ordering::Equal))
        }
        CmpOp::In => is_member(&actual, &cmp.value),
        CmpOp::NotIn => !is_member(&actual, &cmp.value),
    })
}

fn is_member(actual: &AnyValue, value: &FilterValue) -> bool {
    match value {
        FilterValue::List(items) => items.iter().any(|item| value_matches(actual, item)),
        other => value_matches(actual, other),
    }
}

/// Typed equality: strings compare as strings, numeric values numerically
/// (int and float unified), `null` matches missing values.
fn value_matches(actual: &AnyValue, expected: &FilterValue) -> bool {
    match expected {
        FilterValue::Str(text) => any_to_string(actual).is_some_and(|v| v == *text),
        FilterValue::Int(num) => any_to_f64(actual).is_some_and(|v| v == *num as f64),
        FilterValue::Float(num) => any_to_f64(actual).is_some_and(|v| v == *num),
        FilterValue::Bool(flag) => matches!(actual, AnyValue::Boolean(v) if v == flag),
        FilterValue::Null => actual.is_null(),
        FilterValue::List(_) => false,
    }
}

/// Ordering against the expected value; `None` for nulls and incomparable
/// types, which makes every ordering comparison false.
fn ordering(actual: &AnyValue, expected: &FilterValue) -> Option<Ordering> {
    match expected {
        FilterValue::Int(num) => any_to_f64(actual)?.partial_cmp(&(*num as f64)),
        FilterValue::Float(num) => any_to_f64(actual)?.partial_cmp(num),
        FilterValue::Str(text) => Some(any_to_string(actual)?.as_str().cmp(text)),
        FilterValue::Bool(_) | FilterValue::Null | FilterValue::List(_) => None,
    }
}

fn any_to_f64(value: &AnyValue) -> Option<f64> {
    value.try_extract::<f64>().ok()
}

fn any_to_string(value: &AnyValue) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => Some((*s).to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        other => Some(other.to_string()),
    }
}
