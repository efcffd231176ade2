//! Property access on parameter objects.
//!
//! Two layers:
//! - **Accessor**: [`ParameterAccessor`] exposes declared members of one object
//! - **Resolution**: [`MemberCache`] maps requested names onto declared names,
//!   exact match first, then ASCII case-insensitive, memoized per shape

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::RwLock;

use crate::value::{Record, Value};

/// Readable members of a parameter object.
///
/// Implement by hand, or with [`parameter_accessor!`](crate::parameter_accessor)
/// for plain structs.
pub trait ParameterAccessor {
    /// Identity of the concrete shape, used as the member cache key.
    ///
    /// `None` opts out of caching; lookups then scan `member_names` directly.
    fn shape(&self) -> Option<&str> {
        None
    }

    /// Declared member names in declaration order.
    fn member_names(&self) -> Vec<&str>;

    /// Read a member by its declared name.
    fn member(&self, name: &str) -> Option<Value>;

    /// Element count for collection-like objects.
    fn element_count(&self) -> Option<usize> {
        None
    }
}

impl ParameterAccessor for Record {
    fn shape(&self) -> Option<&str> {
        Record::shape(self)
    }

    fn member_names(&self) -> Vec<&str> {
        self.fields().iter().map(|(n, _)| n.as_str()).collect()
    }

    fn member(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl ParameterAccessor for Value {
    fn shape(&self) -> Option<&str> {
        match self {
            Value::Object(record) => record.shape(),
            _ => None,
        }
    }

    fn member_names(&self) -> Vec<&str> {
        match self {
            Value::Object(record) => record.member_names(),
            _ => Vec::new(),
        }
    }

    fn member(&self, name: &str) -> Option<Value> {
        match self {
            Value::Object(record) => ParameterAccessor::member(record, name),
            _ => None,
        }
    }

    fn element_count(&self) -> Option<usize> {
        match self {
            Value::List(items) => Some(items.len()),
            Value::String(s) => Some(s.chars().count()),
            Value::Identifier(id) => Some(id.as_str().chars().count()),
            _ => None,
        }
    }
}

/// Implement [`ParameterAccessor`] for a struct by listing its readable fields.
///
/// Every listed field type must be `Clone` and convert into [`Value`].
///
/// ```
/// use quarry_core::{parameter_accessor, ParameterAccessor, Value};
///
/// #[derive(Clone)]
/// struct UserQuery {
///     name: Option<String>,
///     age: i32,
/// }
///
/// parameter_accessor!(UserQuery { name, age });
///
/// let q = UserQuery { name: None, age: 20 };
/// assert_eq!(q.member("age"), Some(Value::Int(20)));
/// ```
#[macro_export]
macro_rules! parameter_accessor {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::ParameterAccessor for $ty {
            fn shape(&self) -> ::std::option::Option<&str> {
                ::std::option::Option::Some(::std::any::type_name::<$ty>())
            }

            fn member_names(&self) -> ::std::vec::Vec<&str> {
                ::std::vec![$(::std::stringify!($field)),*]
            }

            fn member(&self, name: &str) -> ::std::option::Option<$crate::Value> {
                match name {
                    $(
                        ::std::stringify!($field) => ::std::option::Option::Some(
                            $crate::Value::from(::std::clone::Clone::clone(&self.$field)),
                        ),
                    )*
                    _ => ::std::option::Option::None,
                }
            }
        }
    };
}

/// Requested name -> declared name table for one shape.
#[derive(Debug, Clone, Default)]
pub struct MemberTable {
    declared: IndexSet<String>,
    folded: HashMap<String, String>,
}

impl MemberTable {
    /// On case-insensitive collisions the first declared member wins.
    pub fn build<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut table = Self::default();
        for name in names {
            table
                .folded
                .entry(name.to_ascii_lowercase())
                .or_insert_with(|| name.to_string());
            table.declared.insert(name.to_string());
        }
        table
    }

    pub fn resolve<'t>(&'t self, name: &str) -> Option<&'t str> {
        if let Some(exact) = self.declared.get(name) {
            return Some(exact.as_str());
        }
        self.folded
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }
}

/// Append-only cache of member tables keyed by shape.
///
/// Safe to share across threads; a race on the same shape builds the table
/// twice and keeps the last one, which is identical.
#[derive(Debug, Default)]
pub struct MemberCache {
    tables: RwLock<HashMap<String, Arc<MemberTable>>>,
}

impl MemberCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of shapes with a cached table.
    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }

    fn table_for(&self, shape: &str, target: &dyn ParameterAccessor) -> Arc<MemberTable> {
        if let Some(table) = self.tables.read().get(shape) {
            return Arc::clone(table);
        }

        let table = Arc::new(MemberTable::build(target.member_names()));
        tracing::debug!(shape, members = table.len(), "cached member table");
        self.tables
            .write()
            .insert(shape.to_string(), Arc::clone(&table));
        table
    }

    /// Declared name for `name` on `target`, if any member matches.
    pub fn resolve_name(&self, target: &dyn ParameterAccessor, name: &str) -> Option<String> {
        match target.shape() {
            Some(shape) => self
                .table_for(shape, target)
                .resolve(name)
                .map(str::to_string),
            None => {
                let names = target.member_names();
                names
                    .iter()
                    .find(|n| **n == name)
                    .or_else(|| names.iter().find(|n| n.eq_ignore_ascii_case(name)))
                    .map(|n| n.to_string())
            }
        }
    }

    /// Read one path segment from `target`.
    pub fn member(&self, target: &dyn ParameterAccessor, name: &str) -> Option<Value> {
        let declared = self.resolve_name(target, name)?;
        target.member(&declared)
    }

    /// Read a trailing `size`/`length` segment.
    ///
    /// Countable targets yield their element count; anything else falls back
    /// to an ordinary member lookup.
    pub fn count_or_member(&self, target: &dyn ParameterAccessor, name: &str) -> Option<Value> {
        match target.element_count() {
            Some(count) => Some(Value::from(count)),
            None => self.member(target, name),
        }
    }

    /// Resolve a dotted path against `root`. Missing members resolve to `Null`.
    pub fn resolve_path(&self, root: &dyn ParameterAccessor, segments: &[&str]) -> Value {
        let Some((first, rest)) = segments.split_first() else {
            return Value::Null;
        };

        let mut current = self.segment(root, first, rest.is_empty());
        for (i, segment) in rest.iter().enumerate() {
            let last = i + 1 == rest.len();
            current = match current {
                Some(value) => self.segment(&value, segment, last),
                None => return Value::Null,
            };
        }
        current.unwrap_or_default()
    }

    fn segment(&self, target: &dyn ParameterAccessor, name: &str, last: bool) -> Option<Value> {
        if last && is_count_alias(name) {
            self.count_or_member(target, name)
        } else {
            self.member(target, name)
        }
    }
}

/// Whether a trailing path segment names the element count.
pub fn is_count_alias(segment: &str) -> bool {
    segment.eq_ignore_ascii_case("size") || segment.eq_ignore_ascii_case("length")
}
