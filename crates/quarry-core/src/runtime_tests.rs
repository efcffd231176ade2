use crate::{
    GuardViolation, PlaceholderStyle, RenderContext, RenderedSql, SafeIdentifier, Value,
    guard_identifier, items, trim_set_body, trim_where_body,
};

#[test]
fn placeholder_markers() {
    let markers = |style: PlaceholderStyle| -> Vec<String> {
        (0..3).map(|i| style.marker(i)).collect()
    };

    assert_eq!(markers(PlaceholderStyle::Question), ["?", "?", "?"]);
    assert_eq!(markers(PlaceholderStyle::AtNamed), ["@p0", "@p1", "@p2"]);
    assert_eq!(markers(PlaceholderStyle::Dollar), ["$1", "$2", "$3"]);
    assert_eq!(markers(PlaceholderStyle::ColonNamed), [":p0", ":p1", ":p2"]);
}

#[test]
fn bind_numbers_parameters_in_order() {
    let cx = RenderContext::new(PlaceholderStyle::Dollar);
    let mut params = Vec::new();

    assert_eq!(cx.bind(&mut params, Value::from(1)), "$1");
    assert_eq!(cx.bind(&mut params, Value::from("x")), "$2");

    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["p0", "p1"]);
    assert_eq!(params[1].value, Value::from("x"));
}

#[test]
fn default_context_uses_question_marks() {
    assert_eq!(RenderContext::default().placeholder(), PlaceholderStyle::Question);
}

#[test]
fn where_body_strips_one_leading_junction() {
    assert_eq!(trim_where_body("  AND x=1 "), "x=1");
    assert_eq!(trim_where_body("or x=1"), "x=1");
    assert_eq!(trim_where_body("And\n  x=1"), "x=1");
    assert_eq!(trim_where_body("AND AND x=1"), "AND x=1");
    assert_eq!(trim_where_body("ANDROID=1"), "ANDROID=1");
    assert_eq!(trim_where_body("ORDER_ID=1"), "ORDER_ID=1");
    assert_eq!(trim_where_body(" \n "), "");
}

#[test]
fn set_body_strips_one_trailing_comma() {
    assert_eq!(trim_set_body("a=1,b=2,"), "a=1,b=2");
    assert_eq!(trim_set_body(" a=1 ,\n"), "a=1");
    assert_eq!(trim_set_body("a=1,,"), "a=1,");
    assert_eq!(trim_set_body("   "), "");
}

#[test]
fn guard_accepts_only_identifiers() {
    let id = Value::from(SafeIdentifier::from("created_at").unwrap());
    assert_eq!(
        guard_identifier("Users.list", "orderBy", &id).unwrap(),
        "created_at"
    );

    let err = guard_identifier("Users.list", "orderBy", &Value::from("created_at")).unwrap_err();
    assert_eq!(
        err,
        GuardViolation {
            statement: "Users.list".to_string(),
            parameter: "orderBy".to_string(),
            found: "string",
        }
    );
    insta::assert_snapshot!(
        err.to_string(),
        @"raw substitution `orderBy` in `Users.list` requires a SafeIdentifier, found string"
    );
}

#[test]
fn foreach_items() {
    assert_eq!(items(&Value::Null), None);
    assert_eq!(items(&Value::from("abc")), None);
    assert_eq!(items(&Value::from(vec![1, 2])).map(<[Value]>::len), Some(2));
}

#[test]
fn finished_sql_is_trimmed() {
    let rendered = RenderedSql::finish("\n  SELECT 1 \n", Vec::new());
    assert_eq!(rendered.sql, "SELECT 1");
    assert!(rendered.values().is_empty());
}
