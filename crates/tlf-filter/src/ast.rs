//! Filter expression AST.
//!
//! A parsed filter is a tree of atomic comparisons joined by `and`/`or`.
//! Operands associate strictly left-to-right in source order; there is no
//! `and`-over-`or` precedence and no parenthesization. The AST is
//! dataset-agnostic: translating it into an executable predicate against a
//! concrete tabular engine is the evaluation collaborator's job.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A typed scalar (or list) value on the right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    List(Vec<FilterValue>),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(value) => write!(f, "'{value}'"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Null => f.write_str("null"),
            Self::List(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Comparison operators supported by the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CmpOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    In,
    NotIn,
}

impl CmpOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::In => "in",
            Self::NotIn => "not in",
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One atomic comparison: `dataset:column OP value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub dataset: String,
    pub column: String,
    pub op: CmpOp,
    pub value: FilterValue,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {} {}", self.dataset, self.column, self.op, self.value)
    }
}

/// A parsed filter expression.
///
/// `True` is the always-true predicate: the documented meaning of an empty
/// filter string ("no restriction").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterExpr {
    True,
    Cmp(Comparison),
    And(Box<FilterExpr>, Box<FilterExpr>),
    Or(Box<FilterExpr>, Box<FilterExpr>),
}

impl FilterExpr {
    /// Whether this is the unrestricted predicate.
    pub fn is_true(&self) -> bool {
        matches!(self, Self::True)
    }

    /// Distinct dataset names referenced by the expression's atoms.
    ///
    /// The grammar permits mixed-dataset filters; callers with a
    /// single-dataset assumption use this to validate before evaluating.
    pub fn datasets(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_datasets(&mut names);
        names
    }

    fn collect_datasets<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Self::True => {}
            Self::Cmp(cmp) => {
                names.insert(cmp.dataset.as_str());
            }
            Self::And(lhs, rhs) | Self::Or(lhs, rhs) => {
                lhs.collect_datasets(names);
                rhs.collect_datasets(names);
            }
        }
    }

    /// All atomic comparisons, in source order.
    pub fn comparisons(&self) -> Vec<&Comparison> {
        let mut atoms = Vec::new();
        self.collect_comparisons(&mut atoms);
        atoms
    }

    fn collect_comparisons<'a>(&'a self, atoms: &mut Vec<&'a Comparison>) {
        match self {
            Self::True => {}
            Self::Cmp(cmp) => atoms.push(cmp),
            Self::And(lhs, rhs) | Self::Or(lhs, rhs) => {
                lhs.collect_comparisons(atoms);
                rhs.collect_comparisons(atoms);
            }
        }
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => Ok(()),
            Self::Cmp(cmp) => write!(f, "{cmp}"),
            Self::And(lhs, rhs) => write!(f, "{lhs} and {rhs}"),
            Self::Or(lhs, rhs) => write!(f, "{lhs} or {rhs}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(dataset: &str, column: &str) -> FilterExpr {
        FilterExpr::Cmp(Comparison {
            dataset: dataset.to_string(),
            column: column.to_string(),
            op: CmpOp::Eq,
            value: FilterValue::Str("Y".to_string()),
        })
    }

    #[test]
    fn datasets_deduplicates_across_atoms() {
        let expr = FilterExpr::And(
            Box::new(atom("adae", "aeser")),
            Box::new(FilterExpr::Or(
                Box::new(atom("adae", "aerel")),
                Box::new(atom("adsl", "saffl")),
            )),
        );
        let names: Vec<&str> = expr.datasets().into_iter().collect();
        assert_eq!(names, ["adae", "adsl"]);
    }

    #[test]
    fn display_renders_flat_chain() {
        let expr = FilterExpr::And(Box::new(atom("adsl", "saffl")), Box::new(atom("adsl", "sex")));
        assert_eq!(expr.to_string(), "adsl:saffl == 'Y' and adsl:sex == 'Y'");
    }

    #[test]
    fn ast_round_trips_through_json() {
        let expr = FilterExpr::Or(
            Box::new(atom("adsl", "saffl")),
            Box::new(FilterExpr::Cmp(Comparison {
                dataset: "adae".to_string(),
                column: "aerel".to_string(),
                op: CmpOp::In,
                value: FilterValue::List(vec![
                    FilterValue::Str("RELATED".to_string()),
                    FilterValue::Int(2),
                ]),
            })),
        );
        let json = serde_json::to_string(&expr).expect("serialize");
        let round: FilterExpr = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(round, expr);
    }
}
