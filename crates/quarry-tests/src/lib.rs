//! Statements emitted from `mappers/*.xml` at build time, and the parameter
//! types the equivalence tests render them with.

use quarry_core::{Value, parameter_accessor};

include!(concat!(env!("OUT_DIR"), "/mappers.rs"));

/// Generated source, for assertions on its shape.
pub const GENERATED: &str = include_str!(concat!(env!("OUT_DIR"), "/mappers.rs"));

#[derive(Clone, Debug, Default)]
pub struct UserSearch {
    pub name: Option<String>,
    pub active: Option<bool>,
    pub min_age: Option<i32>,
    pub ids: Option<Vec<i64>>,
    pub order: Option<String>,
}

parameter_accessor!(UserSearch {
    name,
    active,
    min_age,
    ids,
    order,
});

#[derive(Clone, Debug, Default)]
pub struct UserUpdate {
    pub id: i64,
    pub name: Option<String>,
    pub age: Option<i32>,
}

parameter_accessor!(UserUpdate { id, name, age });

#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: String,
    pub age: i32,
}

parameter_accessor!(NewUser { name, age });

impl From<NewUser> for Value {
    fn from(user: NewUser) -> Self {
        Value::snapshot(&user)
    }
}

#[derive(Clone, Debug, Default)]
pub struct NewUsers {
    pub users: Vec<NewUser>,
}

parameter_accessor!(NewUsers { users });

/// Count of `guard_identifier` calls in the generated function `name`.
pub fn guard_count(name: &str) -> usize {
    let signature = format!("pub fn {name}(");
    let Some(start) = GENERATED.find(&signature) else {
        return 0;
    };
    let body = &GENERATED[start..];
    let end = body[signature.len()..]
        .find("pub fn ")
        .map_or(body.len(), |i| i + signature.len());
    body[..end].matches("guard_identifier(").count()
}

