use indoc::indoc;

use super::*;
use crate::parser::parse_mapper;

fn resolve(source: &str) -> (Mapper, Diagnostics) {
    let (mapper, _) = parse_mapper(source).unwrap();
    resolve_includes(&mapper)
}

#[test]
fn splices_fragment_tree() {
    let (mapper, diag) = resolve(indoc! {r#"
        <mapper namespace="Users">
          <sql id="columns">id, ${extra}</sql>
          <select id="find">SELECT <include refid="columns"/> FROM users</select>
        </mapper>
    "#});

    assert!(diag.is_empty());
    insta::assert_snapshot!(mapper.statement("find").unwrap().root.printer().dump(), @r#"
    Mixed
      Text "SELECT "
      Mixed
        Text "id, "
        Param ${extra}
      Text " FROM users"
    "#);
}

#[test]
fn transitive_and_shared_includes() {
    let (mapper, diag) = resolve(indoc! {r#"
        <mapper namespace="N">
          <sql id="base">x</sql>
          <sql id="left"><include refid="base"/>l</sql>
          <sql id="right"><include refid="base"/>r</sql>
          <select id="q"><include refid="left"/>,<include refid="right"/></select>
        </mapper>
    "#});

    assert!(diag.is_empty());
    let root = &mapper.statement("q").unwrap().root;
    assert!(!root.has_includes());
    insta::assert_snapshot!(root.printer().dump(), @r#"
    Mixed
      Mixed
        Text "x"
        Text "l"
      Text ","
      Mixed
        Text "x"
        Text "r"
    "#);
}

#[test]
fn same_fragment_twice_in_one_statement() {
    let (mapper, diag) = resolve(indoc! {r#"
        <mapper namespace="N">
          <sql id="c">c</sql>
          <select id="q"><include refid="c"/><include refid="c"/></select>
        </mapper>
    "#});

    assert!(diag.is_empty());
    assert_eq!(
        mapper.statement("q").unwrap().root,
        Node::Mixed(vec![Node::text("c"), Node::text("c")])
    );
}

#[test]
fn unknown_fragment_becomes_marker() {
    let (mapper, diag) = resolve(indoc! {r#"
        <mapper namespace="N">
          <select id="q">SELECT <include refid="missing"/><include refid="missing"/></select>
          <select id="r">SELECT 1</select>
        </mapper>
    "#});

    assert_eq!(
        mapper.statement("q").unwrap().root,
        Node::Mixed(vec![
            Node::text("SELECT "),
            Node::text("/* unresolved include: missing */"),
            Node::text("/* unresolved include: missing */"),
        ])
    );
    assert_eq!(mapper.statement("r").unwrap().root, Node::text("SELECT 1"));

    let unresolved: Vec<_> = diag.of_kind(DiagnosticKind::UnresolvedFragment).collect();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].owner(), Some("N.q"));
    assert!(!diag.has_fatal());
}

#[test]
fn mutual_includes_become_markers() {
    let (mapper, diag) = resolve(indoc! {r#"
        <mapper namespace="N">
          <sql id="a">A<include refid="b"/></sql>
          <sql id="b">B<include refid="a"/></sql>
          <select id="q"><include refid="a"/></select>
        </mapper>
    "#});

    insta::assert_snapshot!(mapper.printer().dump(), @r#"
    Mapper N
      Fragment a
        Mixed
          Text "A"
          Mixed
            Text "B"
            Text "/* circular include: a -> b -> a */"
      Fragment b
        Mixed
          Text "B"
          Mixed
            Text "A"
            Text "/* circular include: b -> a -> b */"
      Select q
        Mixed
          Text "A"
          Mixed
            Text "B"
            Text "/* circular include: a -> b -> a */"
    "#);

    insta::assert_snapshot!(diag.printer().render(), @"error at 25..64: circular include: a -> b -> a (in N.a) (hint: the include is replaced by a marker comment)");
}

#[test]
fn self_include_is_a_cycle() {
    let (mapper, diag) = resolve(
        r#"<mapper namespace="N"><sql id="s">x<include refid="s"/></sql></mapper>"#,
    );

    assert_eq!(
        mapper.fragment("s").unwrap().root,
        Node::Mixed(vec![Node::text("x"), Node::text("/* circular include: s -> s */")])
    );
    assert_eq!(diag.of_kind(DiagnosticKind::CircularFragment).count(), 1);
}

#[test]
fn cycles_are_reported_once_per_component() {
    let (mapper, _) = parse_mapper(indoc! {r#"
        <mapper namespace="N">
          <sql id="x">x</sql>
          <sql id="c"><include refid="a"/></sql>
          <sql id="a"><include refid="b"/><include refid="x"/></sql>
          <sql id="b"><include refid="c"/></sql>
          <sql id="d"><include refid="d"/></sql>
        </mapper>
    "#})
    .unwrap();

    assert_eq!(
        fragment_cycles(&mapper),
        vec![
            vec!["c".to_string(), "a".into(), "b".into(), "c".into()],
            vec!["d".to_string(), "d".into()],
        ]
    );
}

#[test]
fn resolution_is_idempotent() {
    let (once, _) = resolve(indoc! {r#"
        <mapper namespace="N">
          <sql id="a">A<include refid="b"/></sql>
          <sql id="b">B<include refid="a"/><include refid="gone"/></sql>
          <select id="q"><where><if test="x"><include refid="a"/></if></where></select>
        </mapper>
    "#});

    let (twice, diag) = resolve_includes(&once);
    assert_eq!(once, twice);
    assert!(diag.is_empty());
}

#[test]
fn includes_inside_directives_are_resolved() {
    let (mapper, _) = resolve(indoc! {r#"
        <mapper namespace="N">
          <sql id="cond">AND x = #{x}</sql>
          <select id="q"><choose><when test="x"><include refid="cond"/></when><otherwise><include refid="cond"/></otherwise></choose><foreach collection="l" item="i"><include refid="cond"/></foreach></select>
        </mapper>
    "#});

    assert!(!mapper.statement("q").unwrap().root.has_includes());
}

#[test]
fn marker_cannot_close_the_comment() {
    assert_eq!(unresolved_marker("a*/b"), "/* unresolved include: a* /b */");
}
