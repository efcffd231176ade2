use indoc::indoc;
use quarry_core::{PlaceholderStyle, RenderContext, RenderedSql, SafeIdentifier, Value};
use serde_json::json;

use super::Interpreter;
use crate::ast::{ForEach, Node, When};
use crate::expr::ExpressionCache;
use crate::parser::parse_template;

fn render_with(cx: &RenderContext, node: &Node, param: serde_json::Value) -> RenderedSql {
    let exprs = ExpressionCache::new();
    Interpreter::new(cx, &exprs).render(node, &Value::from(param))
}

fn render(node: &Node, param: serde_json::Value) -> RenderedSql {
    render_with(&RenderContext::default(), node, param)
}

fn render_template(template: &str, param: serde_json::Value) -> RenderedSql {
    let (node, _) = parse_template(template).unwrap();
    let rendered = render(&node, param);
    RenderedSql::finish(&rendered.sql, rendered.parameters)
}

fn if_node(test: &str, children: Vec<Node>) -> Node {
    Node::If {
        test: test.into(),
        children,
    }
}

#[test]
fn where_trims_leading_keyword() {
    let node = Node::Where(vec![if_node("x != null", vec![Node::text("AND x=1")])]);

    assert_eq!(render(&node, json!({"x": 5})).sql, " WHERE x=1");
    assert_eq!(render(&node, json!({})).sql, "");
}

#[test]
fn where_strips_only_one_keyword() {
    let node = Node::Where(vec![Node::text("  or OR a = 1 ")]);
    assert_eq!(render(&node, json!({})).sql, " WHERE OR a = 1");

    let node = Node::Where(vec![Node::text("ORDER_ID = 1")]);
    assert_eq!(render(&node, json!({})).sql, " WHERE ORDER_ID = 1");
}

#[test]
fn set_trims_one_trailing_comma() {
    let node = Node::Set(vec![Node::text("a=1,"), Node::text("b=2,")]);
    assert_eq!(render(&node, json!({})).sql, " SET a=1,b=2");

    let node = Node::Set(vec![if_node("x", vec![Node::text("x=1,")])]);
    assert_eq!(render(&node, json!({})).sql, "");
}

#[test]
fn foreach_binds_each_item() {
    let node = Node::ForEach(ForEach {
        collection: "ids".into(),
        item: "id".into(),
        open: Some("(".into()),
        close: Some(")".into()),
        separator: Some(",".into()),
        children: vec![Node::bound("id")],
        ..ForEach::default()
    });

    let rendered = render(&node, json!({"ids": [1, 2, 3]}));
    assert_eq!(rendered.sql, "(?,?,?)");
    assert_eq!(
        rendered.values(),
        vec![&Value::Int(1), &Value::Int(2), &Value::Int(3)]
    );
    let names: Vec<_> = rendered.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["p0", "p1", "p2"]);
}

#[test]
fn foreach_over_empty_and_missing_collections() {
    let node = Node::ForEach(ForEach {
        collection: "ids".into(),
        item: "id".into(),
        open: Some("(".into()),
        close: Some(")".into()),
        children: vec![Node::bound("id")],
        ..ForEach::default()
    });

    assert_eq!(render(&node, json!({"ids": []})).sql, "()");
    assert_eq!(render(&node, json!({})).sql, "");
    assert_eq!(render(&node, json!({"ids": "1,2"})).sql, "");
}

#[test]
fn foreach_index_and_nested_items() {
    let rendered = render_template(
        r#"<foreach collection="users" item="u" index="i" separator=" UNION ALL ">SELECT ${i}, #{u.name}</foreach>"#,
        json!({"users": [{"name": "a"}, {"name": "b"}]}),
    );
    insta::assert_snapshot!(rendered.sql, @"SELECT 0, ? UNION ALL SELECT 1, ?");
    assert_eq!(rendered.values(), vec![&Value::from("a"), &Value::from("b")]);
}

#[test]
fn loop_item_shadows_parameter_member_and_is_dropped_after() {
    let rendered = render_template(
        r#"<foreach collection="list" item="id">#{id}</foreach>;#{id}"#,
        json!({"list": [1], "id": 99}),
    );
    assert_eq!(rendered.sql, "?;?");
    assert_eq!(rendered.values(), vec![&Value::Int(1), &Value::Int(99)]);
}

#[test]
fn choose_takes_first_true_branch() {
    let node = Node::Choose {
        whens: vec![
            When {
                test: "kind == 'a'".into(),
                children: vec![Node::text("A")],
            },
            When {
                test: "kind != null".into(),
                children: vec![Node::text("ANY")],
            },
        ],
        otherwise: Some(vec![Node::text("NONE")]),
    };

    assert_eq!(render(&node, json!({"kind": "a"})).sql, "A");
    assert_eq!(render(&node, json!({"kind": "b"})).sql, "ANY");
    assert_eq!(render(&node, json!({})).sql, "NONE");

    let no_otherwise = Node::Choose {
        whens: vec![When {
            test: "kind".into(),
            children: vec![Node::text("K")],
        }],
        otherwise: None,
    };
    assert_eq!(render(&no_otherwise, json!({})).sql, "");
}

#[test]
fn bind_is_visible_to_following_siblings() {
    let rendered = render_template(
        r#"<bind name="pattern" value="'%' + name + '%'"/>name LIKE #{pattern}"#,
        json!({"name": "bo"}),
    );
    assert_eq!(rendered.sql, "name LIKE ?");
    assert_eq!(rendered.values(), vec![&Value::from("%bo%")]);
}

#[test]
fn bind_and_loop_names_ignore_case() {
    let rendered = render_template(
        r#"<bind name="pattern" value="'%' + name + '%'"/>name LIKE #{Pattern}"#,
        json!({"name": "bo"}),
    );
    assert_eq!(rendered.values(), vec![&Value::from("%bo%")]);

    let rendered = render_template(
        r#"<foreach collection="ids" item="id" separator=",">#{ID}</foreach>"#,
        json!({"ids": [3, 4], "Id": 9}),
    );
    assert_eq!(rendered.values(), vec![&Value::Int(3), &Value::Int(4)]);
}

#[test]
fn bind_inside_if_does_not_leak() {
    let rendered = render_template(
        r#"<if test="true_flag"><bind name="x" value="'inner'"/>${x}</if>|${x}"#,
        json!({"true_flag": true, "x": "outer"}),
    );
    assert_eq!(rendered.sql, "inner|outer");
}

#[test]
fn raw_substitution_is_spliced_without_binding() {
    let table = SafeIdentifier::from("audit.events").unwrap();
    let cx = RenderContext::default();
    let exprs = ExpressionCache::new();
    let param = Value::from(
        quarry_core::Record::new()
            .with("table", table)
            .with("limit", 10),
    );
    let (node, _) = parse_template("SELECT * FROM ${table} LIMIT ${limit}").unwrap();

    let rendered = Interpreter::new(&cx, &exprs).render(&node, &param);
    assert_eq!(rendered.sql, "SELECT * FROM audit.events LIMIT 10");
    assert!(rendered.parameters.is_empty());
}

#[test]
fn missing_bound_value_is_null() {
    let rendered = render_template("a = #{missing.deep}", json!({}));
    assert_eq!(rendered.sql, "a = ?");
    assert_eq!(rendered.values(), vec![&Value::Null]);
}

#[test]
fn placeholder_options_are_ignored() {
    let rendered = render_template("id = #{id, jdbcType=INTEGER}", json!({"id": 4}));
    assert_eq!(rendered.values(), vec![&Value::Int(4)]);
}

#[test]
fn placeholder_styles_number_bound_values() {
    let (node, _) = parse_template("a = #{a} AND b = #{b}").unwrap();
    let param = json!({"a": 1, "b": 2});

    let dollar = RenderContext::new(PlaceholderStyle::Dollar);
    assert_eq!(render_with(&dollar, &node, param.clone()).sql, "a = $1 AND b = $2");

    let named = RenderContext::new(PlaceholderStyle::AtNamed);
    assert_eq!(render_with(&named, &node, param).sql, "a = @p0 AND b = @p1");
}

#[test]
fn statement_query() {
    let template = indoc! {r#"
        SELECT id, name FROM users
        <where>
          <if test="name != null">AND name LIKE #{name}</if>
          <if test="ids != null and ids.size > 0">
            AND id IN <foreach collection="ids" item="id" open="(" separator=", " close=")">#{id}</foreach>
          </if>
        </where>
        ORDER BY ${order}
    "#};

    let rendered = render_template(template, json!({"ids": [7, 8], "order": "name"}));
    insta::assert_snapshot!(rendered.sql, @r"
    SELECT id, name FROM users
     WHERE id IN (?, ?)
    ORDER BY name
    ");
    assert_eq!(rendered.values(), vec![&Value::Int(7), &Value::Int(8)]);
}
