use crate::{CompareOp, Record, SafeIdentifier, Value, compare, truthy};

#[test]
fn truthiness() {
    assert!(!truthy(&Value::Null));
    assert!(!truthy(&Value::from("")));
    assert!(truthy(&Value::from(" ")));
    assert!(!truthy(&Value::List(vec![])));
    assert!(truthy(&Value::from(vec![0])));
    assert!(!truthy(&Value::from(false)));
    assert!(truthy(&Value::from(true)));
    assert!(truthy(&Value::from(0)));
    assert!(truthy(&Value::from(Record::new())));
}

#[test]
fn trial_order_tries_two_char_operators_first() {
    let symbols: Vec<&str> = CompareOp::TRIAL_ORDER.iter().map(|op| op.symbol()).collect();
    assert_eq!(symbols, ["!=", "==", ">=", "<=", ">", "<"]);
}

#[test]
fn null_operands() {
    let null = Value::Null;
    let one = Value::from(1);

    assert!(compare(&null, CompareOp::Eq, &null));
    assert!(!compare(&null, CompareOp::Ne, &null));
    assert!(!compare(&null, CompareOp::Ge, &null));

    assert!(!compare(&one, CompareOp::Eq, &null));
    assert!(compare(&one, CompareOp::Ne, &null));
    assert!(compare(&null, CompareOp::Ne, &one));
    assert!(!compare(&null, CompareOp::Lt, &one));
    assert!(!compare(&one, CompareOp::Gt, &null));
    assert!(!compare(&one, CompareOp::Le, &null));
}

#[test]
fn numbers_compare_numerically() {
    assert!(compare(&Value::from(20), CompareOp::Gt, &Value::from(18)));
    assert!(!compare(&Value::from(18), CompareOp::Gt, &Value::from(18)));
    assert!(compare(&Value::from(18), CompareOp::Ge, &Value::from(18)));
    assert!(compare(&Value::from(20), CompareOp::Eq, &Value::decimal(200, 1)));
    assert!(compare(&Value::decimal(185, 1), CompareOp::Gt, &Value::from(18)));
    assert!(compare(&Value::from(17), CompareOp::Lt, &Value::decimal(175, 1)));
}

#[test]
fn right_operand_coerces_to_left() {
    assert!(compare(&Value::from(20), CompareOp::Gt, &Value::from("18")));
    assert!(compare(&Value::from(20), CompareOp::Eq, &Value::from("20")));
    assert!(compare(&Value::from(true), CompareOp::Eq, &Value::from("TRUE")));
    assert!(compare(&Value::from("7"), CompareOp::Eq, &Value::from(7)));
}

#[test]
fn coercion_failure_is_false() {
    assert!(!compare(&Value::from(1), CompareOp::Lt, &Value::from("abc")));
    assert!(!compare(&Value::from(vec![1]), CompareOp::Gt, &Value::from(0)));
    assert!(!compare(&Value::from("x"), CompareOp::Gt, &Value::from(vec![1])));
    assert!(compare(&Value::from(1), CompareOp::Ne, &Value::from("abc")));
}

#[test]
fn strings_compare_ordinally() {
    assert!(compare(&Value::from("b"), CompareOp::Gt, &Value::from("a")));
    assert!(compare(&Value::from("B"), CompareOp::Lt, &Value::from("a")));
    assert!(compare(&Value::from("ACTIVE"), CompareOp::Eq, &Value::from("ACTIVE")));
    assert!(!compare(&Value::from("ACTIVE"), CompareOp::Eq, &Value::from("active")));
}

#[test]
fn identifiers_compare_as_text() {
    let id = Value::from(SafeIdentifier::from("name").unwrap());
    assert!(compare(&id, CompareOp::Eq, &Value::from("name")));
    assert!(compare(&Value::from("name"), CompareOp::Eq, &id));
    assert!(compare(&id, CompareOp::Lt, &Value::from("zeta")));
}
