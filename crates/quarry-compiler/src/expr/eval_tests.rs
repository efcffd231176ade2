use quarry_core::{MemberCache, Value};
use serde_json::json;

use super::*;

struct JsonEnv {
    root: Value,
    members: MemberCache,
}

impl JsonEnv {
    fn new(root: serde_json::Value) -> Self {
        Self {
            root: Value::from(root),
            members: MemberCache::new(),
        }
    }
}

impl Environment for JsonEnv {
    fn resolve(&self, path: &Path) -> Value {
        let segments: Vec<&str> = path.segments().iter().map(String::as_str).collect();
        self.members.resolve_path(&self.root, &segments)
    }
}

fn holds(test: &str, root: serde_json::Value) -> bool {
    evaluate(&parse_test(test), &JsonEnv::new(root))
}

#[test]
fn age_and_name() {
    let test = "age > 18 and name != null";
    assert!(holds(test, json!({"age": 20, "name": "Bob"})));
    assert!(!holds(test, json!({"age": 20, "name": null})));
    assert!(!holds(test, json!({"age": 20})));
    assert!(!holds(test, json!({"age": 18, "name": "Bob"})));
}

#[test]
fn disjunction() {
    let test = "role == 'admin' or owner";
    assert!(holds(test, json!({"role": "admin"})));
    assert!(holds(test, json!({"role": "guest", "owner": true})));
    assert!(!holds(test, json!({"role": "guest", "owner": false})));
}

#[test]
fn truthiness() {
    assert!(!holds("name", json!({"name": ""})));
    assert!(holds("name", json!({"name": " "})));
    assert!(!holds("ids", json!({"ids": []})));
    assert!(holds("ids", json!({"ids": [1]})));
    assert!(holds("count", json!({"count": 0})));
    assert!(holds("active", json!({"active": true})));
    assert!(!holds("active", json!({"active": false})));
    assert!(!holds("missing", json!({})));
}

#[test]
fn null_comparisons() {
    assert!(holds("name == null", json!({})));
    assert!(!holds("name != null", json!({})));
    assert!(holds("name != null", json!({"name": "x"})));
    assert!(!holds("age >= null", json!({"age": 1})));
    assert!(!holds("age >= 1", json!({})));
}

#[test]
fn coercion() {
    assert!(holds("age == '20'", json!({"age": 20})));
    assert!(holds("price >= 9.5", json!({"price": 10})));
    assert!(holds("price < 10", json!({"price": 9.99})));
    assert!(holds("flag == true", json!({"flag": "true"})));
    assert!(!holds("flag == true", json!({"flag": "TRUE"})));
    assert!(holds("status == ACTIVE", json!({"status": "ACTIVE"})));
    assert!(!holds("age > abc", json!({"age": 20})));
}

#[test]
fn paths_are_case_insensitive() {
    assert!(holds("user.firstName == 'Ann'", json!({"User": {"FirstName": "Ann"}})));
}

#[test]
fn count_aliases() {
    assert!(holds("ids.size > 2", json!({"ids": [1, 2, 3]})));
    assert!(holds("name.length == 3", json!({"name": "Bob"})));
    assert!(holds("box.size == 'L'", json!({"box": {"size": "L"}})));
}

#[test]
fn invalid_atoms_are_false() {
    assert!(!holds("a = 1", json!({"a": 1})));
    assert!(holds("a = 1 or b", json!({"a": 1, "b": true})));
}

#[test]
fn bind_values() {
    let env = JsonEnv::new(json!({"name": "bob", "n": 3, "missing": null}));
    assert_eq!(
        evaluate_bind(&parse_bind("'%' + name + '%'"), &env),
        Value::from("%bob%")
    );
    assert_eq!(evaluate_bind(&parse_bind("n"), &env), Value::Int(3));
    assert_eq!(
        evaluate_bind(&parse_bind("'x' + missing + n"), &env),
        Value::from("x3")
    );
    assert_eq!(evaluate_bind(&parse_bind("n * 2"), &env), Value::Null);
}
