//! PHP value types.
//!
//! [`Value`] is the in-memory form of anything that can travel through the
//! PHP serialize format. Values are built either by the decoder or by hand
//! through the `From` conversions and the [`Array`], [`Object`] and
//! [`Field`] helpers.

use std::fmt;

use bstr::BStr;

use crate::error::{InvalidKey, TypeMismatch};

/// A PHP value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// PHP null value.
    #[default]
    Null,

    /// PHP boolean value.
    Bool(bool),

    /// PHP integer value.
    Int(i64),

    /// PHP float/double value.
    Float(f64),

    /// PHP string value (may contain non-UTF8 bytes).
    String(Vec<u8>),

    /// PHP array value (ordered map).
    Array(Array),

    /// PHP object value.
    Object(Object),
}

/// The type of a [`Value`], as PHP names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// `null`
    Null,
    /// `bool`
    Bool,
    /// `int`
    Int,
    /// `float`
    Float,
    /// `string`
    String,
    /// `array`
    Array,
    /// `object`
    Object,
}

impl Type {
    /// The lowercase PHP type name.
    pub fn name(self) -> &'static str {
        match self {
            Type::Null => "null",
            Type::Bool => "bool",
            Type::Int => "int",
            Type::Float => "float",
            Type::String => "string",
            Type::Array => "array",
            Type::Object => "object",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// A NaN float value.
    pub fn nan() -> Self {
        Value::Float(f64::NAN)
    }

    /// Positive infinity if `sign >= 0`, negative infinity otherwise.
    pub fn inf(sign: i32) -> Self {
        if sign >= 0 {
            Value::Float(f64::INFINITY)
        } else {
            Value::Float(f64::NEG_INFINITY)
        }
    }

    /// The type of this value.
    pub fn type_of(&self) -> Type {
        match self {
            Value::Null => Type::Null,
            Value::Bool(_) => Type::Bool,
            Value::Int(_) => Type::Int,
            Value::Float(_) => Type::Float,
            Value::String(_) => Type::String,
            Value::Array(_) => Type::Array,
            Value::Object(_) => Type::Object,
        }
    }

    /// Check if the value is null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if the value is a boolean.
    #[inline]
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Check if the value is an integer.
    #[inline]
    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    /// Check if the value is a float.
    #[inline]
    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Check if the value is a string.
    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Check if the value is an array.
    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Check if the value is an object.
    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    #[cold]
    fn mismatch(&self, method: &'static str) -> TypeMismatch {
        TypeMismatch {
            method,
            actual: self.type_of(),
        }
    }

    /// Get the value as a boolean.
    pub fn as_bool(&self) -> Result<bool, TypeMismatch> {
        match self {
            Value::Bool(b) => Ok(*b),
            _ => Err(self.mismatch("Value::as_bool")),
        }
    }

    /// Get the value as an integer.
    pub fn as_int(&self) -> Result<i64, TypeMismatch> {
        match self {
            Value::Int(i) => Ok(*i),
            _ => Err(self.mismatch("Value::as_int")),
        }
    }

    /// Get the value as a float. Integers are not converted.
    pub fn as_float(&self) -> Result<f64, TypeMismatch> {
        match self {
            Value::Float(f) => Ok(*f),
            _ => Err(self.mismatch("Value::as_float")),
        }
    }

    /// Get the raw bytes of a string value.
    pub fn as_bytes(&self) -> Result<&[u8], TypeMismatch> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(self.mismatch("Value::as_bytes")),
        }
    }

    /// Get the value as an array.
    pub fn as_array(&self) -> Result<&Array, TypeMismatch> {
        match self {
            Value::Array(a) => Ok(a),
            _ => Err(self.mismatch("Value::as_array")),
        }
    }

    /// Get the value as an object.
    pub fn as_object(&self) -> Result<&Object, TypeMismatch> {
        match self {
            Value::Object(o) => Ok(o),
            _ => Err(self.mismatch("Value::as_object")),
        }
    }
}

/// Renders string content as-is and every other value as `<type value>`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", BStr::new(s)),
            other => write!(f, "<{} value>", other.type_of()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(i: $t) -> Self {
                    Value::Int(i64::from(i))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f64::from(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::String(b.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::String(b)
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// An array key. PHP only allows integers and strings here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayKey {
    /// Integer key.
    Int(i64),
    /// String key (raw bytes).
    String(Vec<u8>),
}

impl ArrayKey {
    /// The type of this key.
    pub fn type_of(&self) -> Type {
        match self {
            ArrayKey::Int(_) => Type::Int,
            ArrayKey::String(_) => Type::String,
        }
    }
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKey::Int(i) => write!(f, "{}", i),
            ArrayKey::String(s) => write!(f, "{}", BStr::new(s)),
        }
    }
}

impl From<i64> for ArrayKey {
    fn from(i: i64) -> Self {
        ArrayKey::Int(i)
    }
}

impl From<i32> for ArrayKey {
    fn from(i: i32) -> Self {
        ArrayKey::Int(i64::from(i))
    }
}

impl From<&str> for ArrayKey {
    fn from(s: &str) -> Self {
        ArrayKey::String(s.as_bytes().to_vec())
    }
}

impl From<String> for ArrayKey {
    fn from(s: String) -> Self {
        ArrayKey::String(s.into_bytes())
    }
}

impl From<&[u8]> for ArrayKey {
    fn from(b: &[u8]) -> Self {
        ArrayKey::String(b.to_vec())
    }
}

impl From<ArrayKey> for Value {
    fn from(key: ArrayKey) -> Self {
        match key {
            ArrayKey::Int(i) => Value::Int(i),
            ArrayKey::String(s) => Value::String(s),
        }
    }
}

impl TryFrom<Value> for ArrayKey {
    type Error = InvalidKey;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(i) => Ok(ArrayKey::Int(i)),
            Value::String(s) => Ok(ArrayKey::String(s)),
            other => Err(InvalidKey(other.type_of())),
        }
    }
}

/// A PHP array: an ordered list of key/value pairs.
///
/// Duplicate keys are kept as they were inserted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array {
    entries: Vec<(ArrayKey, Value)>,
}

impl Array {
    /// Create an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty array with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Add a pair at the end, keeping any existing entry with the same key.
    pub fn insert(mut self, key: impl Into<ArrayKey>, value: impl Into<Value>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    pub(crate) fn push(&mut self, key: ArrayKey, value: Value) {
        self.entries.push((key, value));
    }

    /// Append values with consecutive integer keys, PHP `$a[] = $v` style.
    ///
    /// The first key is one past the largest integer key already present,
    /// or 0 when there is none or all integer keys are negative.
    pub fn append<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut next = self
            .entries
            .iter()
            .filter_map(|(k, _)| match k {
                ArrayKey::Int(i) => Some(*i),
                ArrayKey::String(_) => None,
            })
            .fold(-1, i64::max)
            .saturating_add(1);
        for value in values {
            self.entries.push((ArrayKey::Int(next), value.into()));
            next = next.saturating_add(1);
        }
        self
    }

    /// Number of pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the array has no pairs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the pairs in order.
    pub fn iter(&self) -> std::slice::Iter<'_, (ArrayKey, Value)> {
        self.entries.iter()
    }

    /// The keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &ArrayKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// The value of the first pair whose key equals `key`.
    pub fn get(&self, key: &ArrayKey) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The value of the first pair whose key is the string `name`.
    pub fn get_by_name(&self, name: impl AsRef<[u8]>) -> Option<&Value> {
        let name = name.as_ref();
        self.entries
            .iter()
            .find(|(k, _)| matches!(k, ArrayKey::String(s) if s.as_slice() == name))
            .map(|(_, v)| v)
    }

    /// The pairs as a slice.
    pub fn as_slice(&self) -> &[(ArrayKey, Value)] {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a (ArrayKey, Value);
    type IntoIter = std::slice::Iter<'a, (ArrayKey, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Array {
    type Item = (ArrayKey, Value);
    type IntoIter = std::vec::IntoIter<(ArrayKey, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(ArrayKey, Value)> for Array {
    fn from_iter<I: IntoIterator<Item = (ArrayKey, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Builds a list-style array keyed `0..n`.
impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Array::new().append(iter)
    }
}

/// A PHP object: a class name and its properties in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    name: String,
    fields: Vec<Field>,
}

impl Object {
    /// Create an object of class `name` with no properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a property at the end.
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub(crate) fn from_parts(name: String, fields: Vec<Field>) -> Self {
        Self { name, fields }
    }

    /// The class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The properties in order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The first property called `name`, whatever its visibility.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A PHP object property.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Property name, without any visibility marker.
    pub name: String,
    /// Property visibility.
    pub visibility: Visibility,
    /// Property value.
    pub value: Value,
}

impl Field {
    /// Create a property with an explicit visibility.
    pub fn new(name: impl Into<String>, value: impl Into<Value>, visibility: Visibility) -> Self {
        Self {
            name: name.into(),
            visibility,
            value: value.into(),
        }
    }

    /// Create a public property.
    pub fn public(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(name, value, Visibility::Public)
    }

    /// Create a protected property.
    pub fn protected(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(name, value, Visibility::Protected)
    }

    /// Create a private property.
    pub fn private(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(name, value, Visibility::Private)
    }
}

/// PHP property visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Public property, bare name.
    #[default]
    Public,
    /// Protected property (name prefixed with `*`).
    Protected,
    /// Private property (name prefixed with `\0ClassName\0`).
    Private,
}
