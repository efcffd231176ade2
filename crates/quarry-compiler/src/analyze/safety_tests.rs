use quarry_core::SAFE_IDENTIFIER_TYPE;

use super::{UnsafeSubstitution, analyze, report_unsafe};
use crate::Config;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::test_utils::mapper_of;

fn whitelist(names: &[&str]) -> Config {
    Config::new().safe_constants(names)
}

fn finding(statement: &str, parameter: &str) -> UnsafeSubstitution {
    UnsafeSubstitution {
        namespace: "Users".into(),
        statement: statement.into(),
        parameter: parameter.into(),
    }
}

#[test]
fn raw_substitution_reported_once() {
    let mapper = mapper_of(
        "Users",
        &[("q", "SELECT * FROM ${tableName} t JOIN ${tableName} u")],
    );
    assert_eq!(analyze(&mapper, &Config::default()), vec![finding("q", "tableName")]);
}

#[test]
fn whitelist_removes_finding() {
    let mapper = mapper_of("Users", &[("q", "SELECT * FROM ${tableName}")]);
    assert!(analyze(&mapper, &whitelist(&["tableName"])).is_empty());
    assert!(analyze(&mapper, &whitelist(&["TABLENAME"])).is_empty());
    assert_eq!(analyze(&mapper, &whitelist(&["other"])).len(), 1);
}

#[test]
fn declared_safe_identifier_removes_finding() {
    let mapper = mapper_of("Users", &[("q", "ORDER BY ${col}"), ("r", "ORDER BY ${col}")]);

    let global = Config::new().param_type("col", SAFE_IDENTIFIER_TYPE);
    assert!(analyze(&mapper, &global).is_empty());

    let scoped = Config::new().statement_param_type("q", "col", SAFE_IDENTIFIER_TYPE);
    assert_eq!(analyze(&mapper, &scoped), vec![finding("r", "col")]);

    let lookalike = Config::new().param_type("col", "SafeIdentifier");
    assert_eq!(analyze(&mapper, &lookalike).len(), 2);
}

#[test]
fn bound_parameters_are_safe() {
    let mapper = mapper_of("Users", &[("q", "SELECT * FROM t WHERE id = #{id}")]);
    assert!(analyze(&mapper, &Config::default()).is_empty());
}

#[test]
fn nested_directives_are_searched() {
    let template = concat!(
        r#"<where><if test="a">${a}</if></where>"#,
        r#"<choose><when test="b">${b}</when><otherwise>${c}</otherwise></choose>"#,
        r#"<foreach collection="xs" item="x">${x.col}</foreach>"#,
        r#"<set>${d, mode=IN}</set>"#,
    );
    let mapper = mapper_of("Users", &[("q", template)]);

    let names: Vec<_> = analyze(&mapper, &Config::default())
        .into_iter()
        .map(|f| f.parameter)
        .collect();
    assert_eq!(names, vec!["a", "b", "c", "x.col", "d"]);
}

#[test]
fn findings_per_statement() {
    let mapper = mapper_of(
        "Users",
        &[("a", "${sort}"), ("b", "#{id}"), ("c", "${sort} ${dir}")],
    );
    assert_eq!(
        analyze(&mapper, &whitelist(&["dir"])),
        vec![finding("a", "sort"), finding("c", "sort")]
    );
}

#[test]
fn findings_become_warnings() {
    let mapper = mapper_of("Users", &[("q", "ORDER BY ${sort}")]);
    let findings = analyze(&mapper, &Config::default());
    let mut diag = Diagnostics::new();
    report_unsafe(&mapper, &findings, &mut diag);

    assert!(!diag.has_errors());
    assert_eq!(diag.of_kind(DiagnosticKind::UnsafeSubstitution).count(), 1);
    insta::assert_snapshot!(diag.printer().render(), @"warning at 0..16: raw substitution `sort` is not proven safe (in Users.q) (hint: bind with `#{...}`, whitelist the name as a safe constant, or pass a SafeIdentifier)");
}
