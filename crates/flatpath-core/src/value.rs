//! Value model for nested documents
//!
//! [`Value`] is a tagged enum of scalars and two shared composite handles,
//! [`Record`] and [`Array`]. Composites are reference counted so that one
//! instance can sit under several fields, or under itself, exactly like
//! object references in a configuration loaded by a dynamic language.
//! Cloning a `Value` clones the handle and never the contents; a record
//! mutated after it was flattened is seen mutated through the flat store as
//! well.
//!
//! Identity is pointer identity, exposed as [`NodeId`]. Equality is deep
//! structural equality that short-circuits on identical handles; a pair of
//! composites met again while it is still being compared counts as equal,
//! so cyclic values compare without recursing forever.

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
pub use serde_json::Number;

use crate::error::{FlatpathError, Result};
use crate::key::KeyPath;
use crate::lineage::Lineage;

/// Identity of a composite value
///
/// Two handles have the same `NodeId` exactly when they point at the same
/// allocation. Only meaningful while the composite is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// Shared, ordered mapping from field name to field value
///
/// Field order is insertion order. A record may contain itself; such cycles
/// are never reclaimed by reference counting, so callers building
/// self-referential records should break the cycle (for example with
/// [`Record::remove`]) once they are done with it.
#[derive(Clone, Default)]
pub struct Record(Rc<RefCell<IndexMap<String, Value>>>);

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity of this record
    pub fn id(&self) -> NodeId {
        NodeId(Rc::as_ptr(&self.0) as *const () as usize)
    }

    /// Whether both handles refer to the same record
    pub fn ptr_eq(&self, other: &Record) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Insert or overwrite a field, returning the previous value
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        self.0.borrow_mut().insert(key, value)
    }

    /// Builder form of [`Record::insert`]
    pub fn with(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Handle to the value of a field
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().get(key).cloned()
    }

    /// Whether the record has a field named `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }

    /// Remove a field, keeping the order of the remaining ones
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.0.borrow_mut().shift_remove(key)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Field names in insertion order
    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    /// Snapshot of the fields in insertion order
    ///
    /// The snapshot holds handles, so nested composites stay shared. Taking
    /// a snapshot releases the interior borrow before the caller recurses,
    /// which keeps self-referential records walkable.
    pub fn fields(&self) -> Vec<(String, Value)> {
        self.0
            .borrow()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        records_eq(self, other, &Lineage::root())
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::Record(self.clone()), f)
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let fields = iter
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Record(Rc::new(RefCell::new(fields)))
    }
}

/// Shared, ordered sequence of values
#[derive(Clone, Default)]
pub struct Array(Rc<RefCell<Vec<Value>>>);

impl Array {
    /// Create an empty array
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity of this array
    pub fn id(&self) -> NodeId {
        NodeId(Rc::as_ptr(&self.0) as *const () as usize)
    }

    /// Whether both handles refer to the same array
    pub fn ptr_eq(&self, other: &Array) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Append an element
    pub fn push(&self, value: impl Into<Value>) {
        let value = value.into();
        self.0.borrow_mut().push(value);
    }

    /// Handle to the element at `index`
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Whether the array has no elements
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Snapshot of the elements, see [`Record::fields`]
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        arrays_eq(self, other, &Lineage::root())
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::Array(self.clone()), f)
    }
}

impl From<Vec<Value>> for Array {
    fn from(items: Vec<Value>) -> Self {
        Array(Rc::new(RefCell::new(items)))
    }
}

impl<V: Into<Value>> FromIterator<V> for Array {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        iter.into_iter().map(Into::into).collect::<Vec<_>>().into()
    }
}

/// A nested document value
#[derive(Clone, Default)]
pub enum Value {
    /// Absent / null
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Ordered sequence, shared by handle
    Array(Array),
    /// Field mapping, shared by handle
    Record(Record),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        values_eq(self, other, &Lineage::root())
    }
}

/// Pairs of composites currently being compared, left and right
type ComparedPairs<'a> = Lineage<'a, (NodeId, NodeId)>;

fn values_eq(left: &Value, right: &Value, compared: &ComparedPairs<'_>) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => arrays_eq(a, b, compared),
        (Value::Record(a), Value::Record(b)) => records_eq(a, b, compared),
        _ => false,
    }
}

fn records_eq(left: &Record, right: &Record, compared: &ComparedPairs<'_>) -> bool {
    let pair = (left.id(), right.id());
    if left.ptr_eq(right) || compared.contains(pair) {
        return true;
    }
    let compared = compared.with(pair);

    // Field order does not matter, as for `IndexMap` equality
    let (left, right) = (left.0.borrow(), right.0.borrow());
    left.len() == right.len()
        && left.iter().all(|(key, value)| {
            right
                .get(key)
                .is_some_and(|other| values_eq(value, other, &compared))
        })
}

fn arrays_eq(left: &Array, right: &Array, compared: &ComparedPairs<'_>) -> bool {
    let pair = (left.id(), right.id());
    if left.ptr_eq(right) || compared.contains(pair) {
        return true;
    }
    let compared = compared.with(pair);

    let (left, right) = (left.0.borrow(), right.0.borrow());
    left.len() == right.len()
        && left
            .iter()
            .zip(right.iter())
            .all(|(a, b)| values_eq(a, b, &compared))
}

/// Traversal classification of a value
///
/// Every value falls into exactly one of three kinds; `Null` and all other
/// leaves are [`Kind::Scalar`].
#[derive(Debug, Clone, Copy)]
pub enum Kind<'a> {
    Record(&'a Record),
    Array(&'a Array),
    Scalar,
}

impl Value {
    /// Parse a JSON document, preserving field order
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatpath_core::Value;
    ///
    /// let value = Value::from_json_str(r#"{"api": {"port": 8080}}"#).unwrap();
    /// assert!(value.as_record().is_some());
    /// ```
    pub fn from_json_str(input: &str) -> Result<Value> {
        let json: serde_json::Value = serde_json::from_str(input)?;
        Ok(json.into())
    }

    /// Classify this value for traversal
    pub fn kind(&self) -> Kind<'_> {
        match self {
            Value::Record(record) => Kind::Record(record),
            Value::Array(array) => Kind::Array(array),
            _ => Kind::Scalar,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Chained field access through nested records
    ///
    /// Returns `None` as soon as a segment is missing or an intermediate
    /// value is not a record. An empty segment list yields the value itself.
    pub fn lookup<S: AsRef<str>>(&self, segments: &[S]) -> Option<Value> {
        let mut current = self.clone();
        for segment in segments {
            let next = current.as_record()?.get(segment.as_ref())?;
            current = next;
        }
        Some(current)
    }

    /// Convert into a `serde_json::Value` tree
    ///
    /// Shared composites are written out once per occurrence. A value that
    /// contains itself cannot be represented as a tree and yields
    /// [`FlatpathError::CyclicValue`].
    pub fn to_json(&self) -> Result<serde_json::Value> {
        to_json_at(self, &KeyPath::root(), &Lineage::root())
    }
}

fn to_json_at(value: &Value, path: &KeyPath, lineage: &Lineage<'_>) -> Result<serde_json::Value> {
    match value {
        Value::Null => Ok(serde_json::Value::Null),
        Value::Bool(b) => Ok(serde_json::Value::Bool(*b)),
        Value::Number(n) => Ok(serde_json::Value::Number(n.clone())),
        Value::String(s) => Ok(serde_json::Value::String(s.clone())),
        Value::Array(array) => {
            if lineage.contains(array.id()) {
                return Err(FlatpathError::CyclicValue {
                    path: path.to_string(),
                });
            }
            let lineage = lineage.with(array.id());
            array
                .to_vec()
                .iter()
                .enumerate()
                .map(|(index, item)| to_json_at(item, &path.child(index.to_string()), &lineage))
                .collect::<Result<Vec<_>>>()
                .map(serde_json::Value::Array)
        }
        Value::Record(record) => {
            if lineage.contains(record.id()) {
                return Err(FlatpathError::CyclicValue {
                    path: path.to_string(),
                });
            }
            let lineage = lineage.with(record.id());
            let mut object = serde_json::Map::with_capacity(record.len());
            for (key, field) in record.fields() {
                let converted = to_json_at(&field, &path.child(key.as_str()), &lineage)?;
                object.insert(key, converted);
            }
            Ok(serde_json::Value::Object(object))
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        self.to_json()
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }
}

/// Debug view that prints `<cycle>` instead of re-entering an ancestor
struct DebugNode<'a> {
    value: &'a Value,
    lineage: Lineage<'a>,
}

impl fmt::Debug for DebugNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Array(array) => {
                if self.lineage.contains(array.id()) {
                    return f.write_str("Array(<cycle>)");
                }
                let lineage = self.lineage.with(array.id());
                let items = array.0.borrow();
                f.debug_list()
                    .entries(items.iter().map(|value| DebugNode { value, lineage }))
                    .finish()
            }
            Value::Record(record) => {
                if self.lineage.contains(record.id()) {
                    return f.write_str("Record(<cycle>)");
                }
                let lineage = self.lineage.with(record.id());
                let fields = record.0.borrow();
                f.debug_map()
                    .entries(
                        fields
                            .iter()
                            .map(|(key, value)| (key, DebugNode { value, lineage })),
                    )
                    .finish()
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        DebugNode {
            value: self,
            lineage: Lineage::root(),
        }
        .fmt(f)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Record(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Value::Array(array)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    /// Non-finite floats have no JSON number form and become `Null`
    fn from(f: f64) -> Self {
        Number::from_f64(f).map_or(Value::Null, Value::Number)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n.into())
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
