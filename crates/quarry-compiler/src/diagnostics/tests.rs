use super::*;

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.report(DiagnosticKind::EmptyChoose, 0..8).emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    assert!(diagnostics.has_fatal());
    insta::assert_snapshot!(
        diagnostics.printer().render(),
        @"error at 0..8: `<choose>` requires at least one `<when>`"
    );
}

#[test]
fn report_with_custom_message_and_owner() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnresolvedFragment, 4..20)
        .message("columns")
        .owner("Users.find")
        .emit();

    assert!(diagnostics.has_errors());
    assert!(!diagnostics.has_fatal());
    insta::assert_snapshot!(
        diagnostics.printer().render(),
        @"error at 4..20: include `columns` does not name a fragment (in Users.find) (hint: the include is replaced by a marker comment)"
    );
}

#[test]
fn warnings_are_counted_separately() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::InvalidNumber, 0..1)
        .message("soon")
        .emit();
    diagnostics
        .report(DiagnosticKind::DuplicateStatement, 2..3)
        .message("find")
        .emit();

    assert_eq!(diagnostics.warning_count(), 1);
    assert_eq!(diagnostics.error_count(), 1);
    assert_eq!(diagnostics.of_kind(DiagnosticKind::InvalidNumber).count(), 1);
    insta::assert_snapshot!(diagnostics.printer().render(), @r"
    warning at 0..1: `soon` is not a number, attribute ignored
    error at 2..3: statement `find` is already defined
    ");
}

#[test]
fn custom_message_template_falls_back_to_prefix() {
    assert_eq!(
        DiagnosticKind::MalformedXml.message(Some("unexpected end of input")),
        "malformed mapper XML: unexpected end of input"
    );
    assert_eq!(
        DiagnosticKind::CircularFragment.message(Some("a -> b -> a")),
        "circular include: a -> b -> a"
    );
    assert_eq!(DiagnosticKind::CircularFragment.message(None), "circular include");
}

#[test]
fn render_with_source() {
    let source = "<if>x</if>";
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::MissingAttribute, 0..4)
        .message("`test` on `<if>`")
        .emit();

    let rendered = diagnostics.render("users.xml", source);
    assert!(rendered.contains("missing required attribute `test` on `<if>`"));
    assert!(rendered.contains("users.xml"));
    assert!(rendered.contains("<if>x</if>"));
}

#[test]
fn render_with_source_labels_owner_and_hint() {
    let source = "<select id=\"q\">ORDER BY ${sort}</select>";
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnsafeSubstitution, 0..source.len())
        .message("sort")
        .owner("Users.q")
        .emit();
    diagnostics
        .report(DiagnosticKind::MixedLogicalOperators, 15..15)
        .message("a and b or c")
        .emit();

    let rendered = diagnostics.printer().source(source).render();
    assert!(rendered.contains("warning: raw substitution `sort` is not proven safe"));
    assert!(rendered.contains("in Users.q"));
    assert!(rendered.contains("help: bind with `#{...}`"));
    assert!(rendered.contains("help: nest `<if>` elements"));
}
