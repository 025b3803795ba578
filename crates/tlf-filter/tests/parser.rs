//! Parser behavior tests against the documented grammar.

use proptest::prelude::*;
use tlf_filter::{CmpOp, Comparison, FilterError, FilterExpr, FilterValue, parse};

#[test]
fn single_atom() {
    let expr = parse("adsl:saffl == 'Y'").expect("parse");
    assert_eq!(
        expr,
        FilterExpr::Cmp(Comparison {
            dataset: "adsl".to_string(),
            column: "saffl".to_string(),
            op: CmpOp::Eq,
            value: FilterValue::Str("Y".to_string()),
        })
    );
}

#[test]
fn empty_and_whitespace_mean_no_restriction() {
    assert_eq!(parse("").expect("empty"), FilterExpr::True);
    assert_eq!(parse("   \t ").expect("whitespace"), FilterExpr::True);
}

#[test]
fn conjunction_with_in_list() {
    let expr = parse("adae:aeser == 'Y' and adae:aerel in ['RELATED','PROBABLY RELATED']")
        .expect("parse");

    let FilterExpr::And(lhs, rhs) = expr else {
        panic!("expected a conjunction, got {expr:?}");
    };
    assert_eq!(
        *lhs,
        FilterExpr::Cmp(Comparison {
            dataset: "adae".to_string(),
            column: "aeser".to_string(),
            op: CmpOp::Eq,
            value: FilterValue::Str("Y".to_string()),
        })
    );
    assert_eq!(
        *rhs,
        FilterExpr::Cmp(Comparison {
            dataset: "adae".to_string(),
            column: "aerel".to_string(),
            op: CmpOp::In,
            value: FilterValue::List(vec![
                FilterValue::Str("RELATED".to_string()),
                FilterValue::Str("PROBABLY RELATED".to_string()),
            ]),
        })
    );
}

#[test]
fn connectives_fold_left_to_right_without_precedence() {
    // a or b and c reads ((a or b) and c), NOT a or (b and c).
    let expr = parse("d:a == 1 or d:b == 2 and d:c == 3").expect("parse");
    let FilterExpr::And(lhs, rhs) = expr else {
        panic!("outermost connective must be the last one in source order");
    };
    assert!(matches!(*lhs, FilterExpr::Or(_, _)));
    assert!(matches!(*rhs, FilterExpr::Cmp(_)));
}

#[test]
fn connective_keywords_are_case_insensitive() {
    let expr = parse("d:a == 1 AND d:b == 2 Or d:c == 3").expect("parse");
    assert!(matches!(expr, FilterExpr::Or(_, _)));
}

#[test]
fn not_in_and_scalar_value_forms() {
    let expr = parse("adsl:agegr1 not in ['<18', 18] and adsl:dthfl != null and adsl:complfl == true")
        .expect("parse");
    let atoms = expr.comparisons();
    assert_eq!(atoms.len(), 3);
    assert_eq!(atoms[0].op, CmpOp::NotIn);
    assert_eq!(
        atoms[0].value,
        FilterValue::List(vec![
            FilterValue::Str("<18".to_string()),
            FilterValue::Int(18),
        ])
    );
    assert_eq!(atoms[1].value, FilterValue::Null);
    assert_eq!(atoms[2].value, FilterValue::Bool(true));
}

#[test]
fn bare_words_are_unquoted_literals() {
    let expr = parse("adsl:trt01a == Placebo").expect("parse");
    assert_eq!(
        expr.comparisons()[0].value,
        FilterValue::Str("Placebo".to_string())
    );
}

#[test]
fn mixed_dataset_filters_parse_and_report_datasets() {
    let expr = parse("adsl:saffl == 'Y' and adae:aeser == 'Y'").expect("parse");
    let datasets: Vec<&str> = expr.datasets().into_iter().collect();
    assert_eq!(datasets, ["adae", "adsl"]);
}

#[test]
fn missing_colon_is_a_syntax_error() {
    let err = parse("adsl_saffl == 'Y'").expect_err("should fail");
    let FilterError::Syntax { message, .. } = err;
    assert!(message.contains("':'"), "{message}");
}

#[test]
fn unbalanced_bracket_is_a_syntax_error() {
    let err = parse("adae:aerel in ['RELATED'").expect_err("should fail");
    let FilterError::Syntax { message, text, .. } = err;
    assert!(message.contains("unbalanced bracket"), "{message}");
    assert_eq!(text, "adae:aerel in ['RELATED'");
}

#[test]
fn in_requires_a_list() {
    let err = parse("adae:aerel in 'RELATED'").expect_err("should fail");
    let FilterError::Syntax { message, .. } = err;
    assert!(message.contains("bracketed list"), "{message}");
}

#[test]
fn trailing_garbage_is_rejected() {
    let err = parse("adsl:saffl == 'Y' adsl").expect_err("should fail");
    let FilterError::Syntax { position, .. } = err;
    assert_eq!(position, 18);
}

proptest! {
    // Any single well-formed atom with a quoted value parses to exactly
    // that comparison, whatever the identifiers are.
    #[test]
    fn quoted_atom_round_trips(
        dataset in "[a-z][a-z0-9_]{0,11}",
        column in "[a-z][a-z0-9_]{0,11}",
        value in "[A-Za-z0-9 ]{0,16}",
    ) {
        let text = format!("{dataset}:{column} == '{value}'");
        let expr = parse(&text).expect("parse");
        prop_assert_eq!(expr.comparisons().len(), 1);
        let atom = expr.comparisons()[0];
        prop_assert_eq!(&atom.dataset, &dataset);
        prop_assert_eq!(&atom.column, &column);
        prop_assert_eq!(&atom.value, &FilterValue::Str(value));
    }

    // Chains of N atoms produce N comparisons in source order regardless of
    // which connectives join them.
    #[test]
    fn chain_preserves_atom_count_and_order(connectives in prop::collection::vec(prop::bool::ANY, 0..6)) {
        let mut text = "d:c0 == 0".to_string();
        for (idx, use_and) in connectives.iter().enumerate() {
            let joiner = if *use_and { "and" } else { "or" };
            text.push_str(&format!(" {joiner} d:c{} == {}", idx + 1, idx + 1));
        }
        let expr = parse(&text).expect("parse");
        let atoms = expr.comparisons();
        prop_assert_eq!(atoms.len(), connectives.len() + 1);
        for (idx, atom) in atoms.iter().enumerate() {
            prop_assert_eq!(&atom.column, &format!("c{idx}"));
        }
    }
}
