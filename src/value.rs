use crate::error::AccessError;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Array alternative: an ordered sequence that owns its elements.
pub type Array = Vec<Value>;
/// Object alternative: a key/value mapping that owns its entries.
///
/// Insertion order is not semantically significant; a `BTreeMap` keeps
/// iteration (and therefore rendering) deterministic.
pub type Object = BTreeMap<String, Value>;

/// Tag of the active alternative of a [`Value`].
///
/// Numeric representations are distinct tags: a tree holding `I32(1)` is not
/// the same value as one holding `I64(1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Bool,
    I32,
    U32,
    I64,
    U64,
    F64,
    String,
    Array,
    Object,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::I32 => "number.int32",
            Self::U32 => "number.uint32",
            Self::I64 => "number.int64",
            Self::U64 => "number.uint64",
            Self::F64 => "number.double",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A number with its concrete representation.
///
/// Equality is representation-sensitive, matching [`Value`] equality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F64(f64),
}

impl Number {
    pub fn kind(self) -> Kind {
        match self {
            Self::I32(_) => Kind::I32,
            Self::U32(_) => Kind::U32,
            Self::I64(_) => Kind::I64,
            Self::U64(_) => Kind::U64,
            Self::F64(_) => Kind::F64,
        }
    }
}

/// A dynamically typed JSON tree node.
///
/// Exactly one alternative is active at any time; switching alternatives
/// discards prior content. Containers own their children, so assignment
/// copies (or moves) whole subtrees and the tree is acyclic by construction.
///
/// Access comes in two flavors:
/// - lenient (`array_mut`, `object_mut`, `Index`/`IndexMut`): `Null` nodes
///   coerce in place to the requested container ("auto-vivification") and a
///   mismatched alternative is silently replaced — data loss by design, for
///   ergonomic chained construction;
/// - strict (`try_*`, `at*`): mismatches come back as [`AccessError`], and
///   only `Null` ever coerces.
///
/// ```
/// use lenient_json::Value;
///
/// let mut v = Value::default();
/// v["servers"][1]["port"] = 8080.into();
/// assert_eq!(v["servers"][0], Value::Null);
/// assert_eq!(v["servers"][1]["port"], Value::from(8080));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Array),
    Object(Object),
}

static NULL: Value = Value::Null;

impl Value {
    /// Builds an Array value from anything convertible to [`Value`].
    pub fn array<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Array(items.into_iter().map(Into::into).collect())
    }

    /// Builds an Object value from key/value pairs. Duplicate keys keep the
    /// last value.
    pub fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn kind(&self) -> Kind {
        match self {
            Self::Null => Kind::Null,
            Self::Bool(_) => Kind::Bool,
            Self::Number(n) => n.kind(),
            Self::String(_) => Kind::String,
            Self::Array(_) => Kind::Array,
            Self::Object(_) => Kind::Object,
        }
    }

    /// Whether the active alternative is tagged `kind`.
    pub fn holds(&self, kind: Kind) -> bool {
        self.kind() == kind
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Whether this is a leaf alternative (neither Array nor Object).
    pub fn is_scalar(&self) -> bool {
        !self.is_array() && !self.is_object()
    }

    /// Replaces the whole subtree.
    pub fn set(&mut self, value: impl Into<Value>) {
        *self = value.into();
    }

    /// Resets to Null, discarding any content.
    pub fn clear(&mut self) {
        *self = Value::Null;
    }

    /// Element count of a container; 0 for every scalar.
    pub fn len(&self) -> usize {
        match self {
            Self::Array(a) => a.len(),
            Self::Object(o) => o.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Lenient const access: `None` on any mismatch, never a coercion.

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Number(Number::I32(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::Number(Number::U32(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(Number::I64(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(Number::U64(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(Number::F64(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    // Lenient mutable access: vivifies Null, replaces anything else.

    pub fn array_mut(&mut self) -> &mut Array {
        if !self.is_array() {
            *self = Value::Array(Array::new());
        }
        match self {
            Self::Array(a) => a,
            _ => unreachable!(),
        }
    }

    pub fn object_mut(&mut self) -> &mut Object {
        if !self.is_object() {
            *self = Value::Object(Object::new());
        }
        match self {
            Self::Object(o) => o,
            _ => unreachable!(),
        }
    }

    /// Appends to the array alternative, vivifying if needed.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.array_mut().push(value.into());
    }

    // Strict access: Null still vivifies on the mutable forms, any other
    // mismatch is an error.

    pub fn try_array(&self) -> Result<&Array, AccessError> {
        match self {
            Self::Array(a) => Ok(a),
            other => Err(AccessError::TypeMismatch {
                op: "try_array",
                expected: Kind::Array,
                found: other.kind(),
            }),
        }
    }

    pub fn try_object(&self) -> Result<&Object, AccessError> {
        match self {
            Self::Object(o) => Ok(o),
            other => Err(AccessError::TypeMismatch {
                op: "try_object",
                expected: Kind::Object,
                found: other.kind(),
            }),
        }
    }

    pub fn try_array_mut(&mut self) -> Result<&mut Array, AccessError> {
        if self.is_null() {
            return Ok(self.array_mut());
        }
        match self {
            Self::Array(a) => Ok(a),
            other => Err(AccessError::TypeMismatch {
                op: "try_array_mut",
                expected: Kind::Array,
                found: other.kind(),
            }),
        }
    }

    pub fn try_object_mut(&mut self) -> Result<&mut Object, AccessError> {
        if self.is_null() {
            return Ok(self.object_mut());
        }
        match self {
            Self::Object(o) => Ok(o),
            other => Err(AccessError::TypeMismatch {
                op: "try_object_mut",
                expected: Kind::Object,
                found: other.kind(),
            }),
        }
    }

    // Checked element access: no coercion, no growth.

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.as_array().and_then(|a| a.get(index))
    }

    pub fn get_key(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|o| o.get(key))
    }

    pub fn at(&self, index: usize) -> Result<&Value, AccessError> {
        let arr = self.try_array().map_err(|e| e.context("at"))?;
        arr.get(index).ok_or(AccessError::OutOfBounds {
            op: "at",
            index,
            len: arr.len(),
        })
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut Value, AccessError> {
        let len = self.len();
        match self {
            Self::Array(a) => a.get_mut(index).ok_or(AccessError::OutOfBounds {
                op: "at_mut",
                index,
                len,
            }),
            other => Err(AccessError::TypeMismatch {
                op: "at_mut",
                expected: Kind::Array,
                found: other.kind(),
            }),
        }
    }

    pub fn at_key(&self, key: &str) -> Result<&Value, AccessError> {
        let obj = self.try_object().map_err(|e| e.context("at_key"))?;
        obj.get(key).ok_or_else(|| AccessError::KeyNotFound {
            op: "at_key",
            key: key.to_owned(),
        })
    }

    pub fn at_key_mut(&mut self, key: &str) -> Result<&mut Value, AccessError> {
        match self {
            Self::Object(o) => o.get_mut(key).ok_or_else(|| AccessError::KeyNotFound {
                op: "at_key_mut",
                key: key.to_owned(),
            }),
            other => Err(AccessError::TypeMismatch {
                op: "at_key_mut",
                expected: Kind::Object,
                found: other.kind(),
            }),
        }
    }
}

/// Missing indices and keys read as a shared immutable Null.
impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        self.get(index).unwrap_or(&NULL)
    }
}

/// Out-of-range writes grow the array with Null padding up to `index + 1`.
impl IndexMut<usize> for Value {
    fn index_mut(&mut self, index: usize) -> &mut Value {
        let arr = self.array_mut();
        if index >= arr.len() {
            arr.resize(index + 1, Value::Null);
        }
        &mut arr[index]
    }
}

impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.get_key(key).unwrap_or(&NULL)
    }
}

/// Look-up-or-insert, vivifying the node to an Object first.
impl IndexMut<&str> for Value {
    fn index_mut(&mut self, key: &str) -> &mut Value {
        self.object_mut()
            .entry(key.to_owned())
            .or_insert(Value::Null)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(Number::I32(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Number(Number::U32(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(Number::I64(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Number(Number::U64(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(Number::F64(v))
    }
}

impl From<Number> for Value {
    fn from(v: Number) -> Self {
        Value::Number(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Value::Array(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(v)
    }
}
