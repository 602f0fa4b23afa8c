//! PHP serialize encoder.
//!
//! Two kinds of input are accepted:
//!
//! - a [`Value`], written by [`encode`] exactly as authored;
//! - any `T: serde::Serialize`, written by [`to_bytes`] / [`to_writer`].
//!   serde's data model is folded onto PHP's: options and unit become
//!   `null`, integers of every width become `int`, sequences become
//!   list-style arrays, maps become arrays with sorted keys and structs
//!   become objects.
//!
//! A type can bypass all of this by implementing [`PhpSerialize`] and routing
//! its `Serialize` impl through [`serialize_self`]; its bytes are then copied
//! into the output untouched.
//!
//! # Map key order
//!
//! Map entries are written integer keys first, in ascending numeric order,
//! followed by string keys in byte-wise order.

use std::error::Error as StdError;
use std::io;

use serde::ser::{
    self, Impossible, Serialize, SerializeMap, SerializeSeq, SerializeStruct, SerializeTuple,
    SerializeTupleStruct,
};

#[cfg(feature = "tracing")]
use tracing::{debug, instrument, warn};

use crate::error::EncodeError;
use crate::value::{ArrayKey, Object, Value, Visibility};

// Newtype-struct name that marks pre-encoded bytes. Does not collide with any
// legitimate type name.
const RAW_TOKEN: &str = "$php_serialize_core::ser::Raw";

/// Types that produce their own PHP serialized form.
pub trait PhpSerialize {
    /// Return the complete serialized bytes of `self`.
    ///
    /// The encoder does not validate them.
    fn php_serialize(&self) -> Result<Vec<u8>, Box<dyn StdError + Send + Sync>>;
}

/// Serialize `value` through its [`PhpSerialize`] hook.
///
/// Meant for `Serialize` impls and `#[serde(serialize_with = "...")]`:
///
/// ```rust
/// use php_serialize_core::ser::{serialize_self, to_bytes, PhpSerialize};
///
/// struct Legacy;
///
/// impl PhpSerialize for Legacy {
///     fn php_serialize(&self) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
///         Ok(b"s:6:\"legacy\";".to_vec())
///     }
/// }
///
/// impl serde::Serialize for Legacy {
///     fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
///         serialize_self(self, s)
///     }
/// }
///
/// assert_eq!(to_bytes(&vec![Legacy]).unwrap(), b"a:1:{i:0;s:6:\"legacy\";}");
/// ```
pub fn serialize_self<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: ?Sized + PhpSerialize,
    S: ser::Serializer,
{
    let bytes = value
        .php_serialize()
        .map_err(|e| <S::Error as ser::Error>::custom(format!("custom serialization failed: {e}")))?;
    serializer.serialize_newtype_struct(RAW_TOKEN, &Raw(&bytes))
}

/// Wraps a reference so that it serializes through its [`PhpSerialize`] hook.
pub struct SelfSerialized<'a, T: ?Sized>(pub &'a T);

impl<T: ?Sized + PhpSerialize> Serialize for SelfSerialized<'_, T> {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_self(self.0, serializer)
    }
}

struct Raw<'a>(&'a [u8]);

impl Serialize for Raw<'_> {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.0)
    }
}

impl PhpSerialize for Value {
    fn php_serialize(&self) -> Result<Vec<u8>, Box<dyn StdError + Send + Sync>> {
        Ok(encode(self))
    }
}

/// Serializes as its own wire form, so a `Value` can sit inside host data.
impl Serialize for Value {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_self(self, serializer)
    }
}

/// Encode a [`Value`].
///
/// Arrays are written in the order of their pairs, duplicates included.
///
/// # Example
///
/// ```rust
/// use php_serialize_core::{encode, Array, Value};
///
/// let value = Value::from(Array::new().insert("id", 7));
/// assert_eq!(encode(&value), b"a:1:{s:2:\"id\";i:7;}");
/// ```
#[cfg_attr(feature = "tracing", instrument(skip_all, level = "debug"))]
pub fn encode(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    write_value(&mut out, value);

    #[cfg(feature = "tracing")]
    debug!(value_type = %value.type_of(), len = out.len(), "Encoded value");

    out
}

/// Encode any serializable host value.
///
/// # Example
///
/// ```rust
/// use php_serialize_core::to_bytes;
///
/// assert_eq!(to_bytes(&[1, 3, 5]).unwrap(), b"a:3:{i:0;i:1;i:1;i:3;i:2;i:5;}");
/// ```
#[cfg_attr(feature = "tracing", instrument(skip_all, level = "debug"))]
pub fn to_bytes<T>(value: &T) -> Result<Vec<u8>, EncodeError>
where
    T: ?Sized + Serialize,
{
    let mut out = Vec::new();
    let result = value.serialize(&mut Serializer::new(&mut out));

    #[cfg(feature = "tracing")]
    match &result {
        Ok(()) => debug!(len = out.len(), "Encode completed successfully"),
        Err(e) => warn!(error = %e, "Encode failed"),
    }

    result.map(|()| out)
}

/// Encode a host value and write it to `writer`.
///
/// The value is fully encoded before anything is written, so a failed encode
/// leaves the writer untouched.
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<(), EncodeError>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let bytes = to_bytes(value)?;
    writer.write_all(&bytes)?;
    Ok(())
}

fn write_null(out: &mut Vec<u8>) {
    out.extend_from_slice(b"N;");
}

fn write_bool(out: &mut Vec<u8>, value: bool) {
    out.extend_from_slice(if value { b"b:1;" } else { b"b:0;" });
}

fn write_int<I: ToString>(out: &mut Vec<u8>, value: I) {
    out.extend_from_slice(b"i:");
    out.extend_from_slice(value.to_string().as_bytes());
    out.push(b';');
}

fn write_float(out: &mut Vec<u8>, value: f64) {
    out.extend_from_slice(b"d:");
    out.extend_from_slice(format_float(value).as_bytes());
    out.push(b';');
}

fn write_string(out: &mut Vec<u8>, value: &[u8]) {
    out.extend_from_slice(b"s:");
    out.extend_from_slice(value.len().to_string().as_bytes());
    out.extend_from_slice(b":\"");
    out.extend_from_slice(value);
    out.extend_from_slice(b"\";");
}

fn write_array_header(out: &mut Vec<u8>, count: usize) {
    out.extend_from_slice(b"a:");
    out.extend_from_slice(count.to_string().as_bytes());
    out.extend_from_slice(b":{");
}

fn write_object_header(out: &mut Vec<u8>, name: &str, count: usize) {
    out.extend_from_slice(b"O:");
    out.extend_from_slice(name.len().to_string().as_bytes());
    out.extend_from_slice(b":\"");
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(b"\":");
    out.extend_from_slice(count.to_string().as_bytes());
    out.extend_from_slice(b":{");
}

/// Shortest decimal that reads back as the same `f64`.
///
/// The notation switch follows printf `%g` at its default precision of 6:
/// exponents outside `[-4, 6)` use scientific notation with a signed, at
/// least two-digit exponent (`1e+06`, `2.5e-07`). The digits themselves are
/// always the shortest round-trip form, never rounded to six.
pub(crate) fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NAN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF" } else { "-INF" }.to_owned();
    }
    if value == 0.0 {
        return value.to_string();
    }

    let sci = format!("{:e}", value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    if (-4..6).contains(&exponent) {
        value.to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.unsigned_abs())
    }
}

fn write_value(out: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => write_null(out),
        Value::Bool(b) => write_bool(out, *b),
        Value::Int(i) => write_int(out, *i),
        Value::Float(f) => write_float(out, *f),
        Value::String(s) => write_string(out, s),
        Value::Array(arr) => {
            write_array_header(out, arr.len());
            for (key, val) in arr {
                write_key(out, key);
                write_value(out, val);
            }
            out.push(b'}');
        }
        Value::Object(obj) => write_object(out, obj),
    }
}

fn write_key(out: &mut Vec<u8>, key: &ArrayKey) {
    match key {
        ArrayKey::Int(i) => write_int(out, *i),
        ArrayKey::String(s) => write_string(out, s),
    }
}

fn write_object(out: &mut Vec<u8>, obj: &Object) {
    write_object_header(out, obj.name(), obj.fields().len());
    for field in obj.fields() {
        match field.visibility {
            Visibility::Public => write_string(out, field.name.as_bytes()),
            Visibility::Protected => {
                let mut name = Vec::with_capacity(field.name.len() + 1);
                name.push(b'*');
                name.extend_from_slice(field.name.as_bytes());
                write_string(out, &name);
            }
            Visibility::Private => {
                write_string(out, &private_name(obj.name(), &field.name));
            }
        }
        write_value(out, &field.value);
    }
    out.push(b'}');
}

/// `\0Class\0field`, PHP's mangled form of a private property name.
fn private_name(class: &str, field: &str) -> Vec<u8> {
    let mut name = Vec::with_capacity(class.len() + field.len() + 2);
    name.push(0);
    name.extend_from_slice(class.as_bytes());
    name.push(0);
    name.extend_from_slice(field.as_bytes());
    name
}

/// serde serializer producing PHP serialize output.
///
/// Writes into a caller-owned buffer. Most callers want [`to_bytes`].
pub struct Serializer<'a> {
    out: &'a mut Vec<u8>,
    // Set while writing the payload of a `PhpSerialize` hook.
    raw: bool,
}

impl<'a> Serializer<'a> {
    /// Create a serializer appending to `out`.
    pub fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, raw: false }
    }
}

fn unsupported(what: impl Into<String>) -> EncodeError {
    EncodeError::UnsupportedType(what.into())
}

impl<'a, 'b> ser::Serializer for &'b mut Serializer<'a> {
    type Ok = ();
    type Error = EncodeError;

    type SerializeSeq = SeqSerializer<'b>;
    type SerializeTuple = SeqSerializer<'b>;
    type SerializeTupleStruct = SeqSerializer<'b>;
    type SerializeTupleVariant = Impossible<(), EncodeError>;
    type SerializeMap = MapSerializer<'b>;
    type SerializeStruct = StructSerializer<'b>;
    type SerializeStructVariant = Impossible<(), EncodeError>;

    fn serialize_bool(self, v: bool) -> Result<(), EncodeError> {
        write_bool(self.out, v);
        Ok(())
    }

    fn serialize_i8(self, v: i8) -> Result<(), EncodeError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<(), EncodeError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<(), EncodeError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<(), EncodeError> {
        write_int(self.out, v);
        Ok(())
    }

    fn serialize_i128(self, v: i128) -> Result<(), EncodeError> {
        let v = i64::try_from(v).map_err(|_| unsupported(format!("i128 value {v} out of range")))?;
        self.serialize_i64(v)
    }

    fn serialize_u8(self, v: u8) -> Result<(), EncodeError> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<(), EncodeError> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<(), EncodeError> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<(), EncodeError> {
        write_int(self.out, v);
        Ok(())
    }

    fn serialize_u128(self, v: u128) -> Result<(), EncodeError> {
        let v = u64::try_from(v).map_err(|_| unsupported(format!("u128 value {v} out of range")))?;
        self.serialize_u64(v)
    }

    fn serialize_f32(self, v: f32) -> Result<(), EncodeError> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<(), EncodeError> {
        write_float(self.out, v);
        Ok(())
    }

    fn serialize_char(self, v: char) -> Result<(), EncodeError> {
        self.serialize_str(v.encode_utf8(&mut [0u8; 4]))
    }

    fn serialize_str(self, v: &str) -> Result<(), EncodeError> {
        write_string(self.out, v.as_bytes());
        Ok(())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<(), EncodeError> {
        if std::mem::take(&mut self.raw) {
            self.out.extend_from_slice(v);
        } else {
            write_string(self.out, v);
        }
        Ok(())
    }

    fn serialize_none(self) -> Result<(), EncodeError> {
        write_null(self.out);
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), EncodeError> {
        write_null(self.out);
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<(), EncodeError> {
        write_null(self.out);
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<(), EncodeError> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        if name == RAW_TOKEN {
            self.raw = true;
            let result = value.serialize(&mut *self);
            self.raw = false;
            result
        } else {
            value.serialize(self)
        }
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        Err(unsupported(format!("enum variant {name}::{variant}")))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, EncodeError> {
        Ok(SeqSerializer::new(&mut *self.out, len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, EncodeError> {
        Ok(SeqSerializer::new(&mut *self.out, len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, EncodeError> {
        Ok(SeqSerializer::new(&mut *self.out, len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, EncodeError> {
        Err(unsupported(format!("enum variant {name}::{variant}")))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, EncodeError> {
        Ok(MapSerializer::new(&mut *self.out, len.unwrap_or(0)))
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, EncodeError> {
        Ok(StructSerializer::new(&mut *self.out, name))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, EncodeError> {
        Err(unsupported(format!("enum variant {name}::{variant}")))
    }
}

/// Writes a list-style array. Elements are buffered because the element
/// count leads the output and serde does not always know it up front.
pub struct SeqSerializer<'a> {
    out: &'a mut Vec<u8>,
    body: Vec<u8>,
    count: usize,
}

impl<'a> SeqSerializer<'a> {
    fn new(out: &'a mut Vec<u8>, len: usize) -> Self {
        Self {
            out,
            body: Vec::with_capacity(len.min(1024) * 8),
            count: 0,
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        write_int(&mut self.body, self.count);
        value.serialize(&mut Serializer::new(&mut self.body))?;
        self.count += 1;
        Ok(())
    }

    fn finish(self) -> Result<(), EncodeError> {
        write_array_header(self.out, self.count);
        self.out.extend_from_slice(&self.body);
        self.out.push(b'}');
        Ok(())
    }
}

impl SerializeSeq for SeqSerializer<'_> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<(), EncodeError> {
        self.finish()
    }
}

impl SerializeTuple for SeqSerializer<'_> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<(), EncodeError> {
        self.finish()
    }
}

impl SerializeTupleStruct for SeqSerializer<'_> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<(), EncodeError> {
        self.finish()
    }
}

/// Sort key of a map entry.
///
/// Variant order is significant: every integer key sorts before every
/// string key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Int(i64),
    Str(Vec<u8>),
}

/// Writes an associative array. Entries are buffered and sorted at `end`.
pub struct MapSerializer<'a> {
    out: &'a mut Vec<u8>,
    entries: Vec<(SortKey, Vec<u8>)>,
    pending: Option<(SortKey, Vec<u8>)>,
}

impl<'a> MapSerializer<'a> {
    fn new(out: &'a mut Vec<u8>, len: usize) -> Self {
        Self {
            out,
            entries: Vec::with_capacity(len.min(1024)),
            pending: None,
        }
    }
}

impl SerializeMap for MapSerializer<'_> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        let mut encoded = Vec::new();
        let sort = key.serialize(MapKeySerializer { out: &mut encoded })?;
        self.pending = Some((sort, encoded));
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        let (sort, mut encoded) = self
            .pending
            .take()
            .ok_or_else(|| EncodeError::Custom("map value serialized before its key".into()))?;
        value.serialize(&mut Serializer::new(&mut encoded))?;
        self.entries.push((sort, encoded));
        Ok(())
    }

    fn end(mut self) -> Result<(), EncodeError> {
        self.entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        write_array_header(self.out, self.entries.len());
        for (_, encoded) in &self.entries {
            self.out.extend_from_slice(encoded);
        }
        self.out.push(b'}');
        Ok(())
    }
}

/// Writes a struct as an object named after the Rust type.
pub struct StructSerializer<'a> {
    out: &'a mut Vec<u8>,
    name: &'static str,
    body: Vec<u8>,
    count: usize,
}

impl<'a> StructSerializer<'a> {
    fn new(out: &'a mut Vec<u8>, name: &'static str) -> Self {
        Self {
            out,
            name,
            body: Vec::new(),
            count: 0,
        }
    }
}

impl SerializeStruct for StructSerializer<'_> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), EncodeError>
    where
        T: ?Sized + Serialize,
    {
        // Lowercase-initial fields are treated as private members of the class.
        if key.as_bytes().first().is_some_and(u8::is_ascii_lowercase) {
            write_string(&mut self.body, &private_name(self.name, key));
        } else {
            write_string(&mut self.body, key.as_bytes());
        }
        value.serialize(&mut Serializer::new(&mut self.body))?;
        self.count += 1;
        Ok(())
    }

    fn end(self) -> Result<(), EncodeError> {
        write_object_header(self.out, self.name, self.count);
        self.out.extend_from_slice(&self.body);
        self.out.push(b'}');
        Ok(())
    }
}

/// Serializes a map key, returning its sort key.
struct MapKeySerializer<'a> {
    out: &'a mut Vec<u8>,
}

fn unsupported_key(what: &str) -> EncodeError {
    EncodeError::UnsupportedMapKeyType(what.to_owned())
}

impl MapKeySerializer<'_> {
    fn int(self, v: i64) -> Result<SortKey, EncodeError> {
        write_int(self.out, v);
        Ok(SortKey::Int(v))
    }

    fn uint(self, v: u64) -> Result<SortKey, EncodeError> {
        write_int(self.out, v);
        // Unsigned keys sort by their two's-complement reinterpretation.
        Ok(SortKey::Int(v as i64))
    }

    fn bytes(self, v: &[u8]) -> Result<SortKey, EncodeError> {
        write_string(self.out, v);
        Ok(SortKey::Str(v.to_vec()))
    }
}

impl ser::Serializer for MapKeySerializer<'_> {
    type Ok = SortKey;
    type Error = EncodeError;

    type SerializeSeq = Impossible<SortKey, EncodeError>;
    type SerializeTuple = Impossible<SortKey, EncodeError>;
    type SerializeTupleStruct = Impossible<SortKey, EncodeError>;
    type SerializeTupleVariant = Impossible<SortKey, EncodeError>;
    type SerializeMap = Impossible<SortKey, EncodeError>;
    type SerializeStruct = Impossible<SortKey, EncodeError>;
    type SerializeStructVariant = Impossible<SortKey, EncodeError>;

    fn serialize_bool(self, _v: bool) -> Result<SortKey, EncodeError> {
        Err(unsupported_key("bool"))
    }

    fn serialize_i8(self, v: i8) -> Result<SortKey, EncodeError> {
        self.int(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<SortKey, EncodeError> {
        self.int(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<SortKey, EncodeError> {
        self.int(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<SortKey, EncodeError> {
        self.int(v)
    }

    fn serialize_i128(self, v: i128) -> Result<SortKey, EncodeError> {
        let v = i64::try_from(v).map_err(|_| unsupported_key("i128 out of 64-bit range"))?;
        self.int(v)
    }

    fn serialize_u8(self, v: u8) -> Result<SortKey, EncodeError> {
        self.uint(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<SortKey, EncodeError> {
        self.uint(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<SortKey, EncodeError> {
        self.uint(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<SortKey, EncodeError> {
        self.uint(v)
    }

    fn serialize_u128(self, v: u128) -> Result<SortKey, EncodeError> {
        let v = u64::try_from(v).map_err(|_| unsupported_key("u128 out of 64-bit range"))?;
        self.uint(v)
    }

    fn serialize_f32(self, _v: f32) -> Result<SortKey, EncodeError> {
        Err(unsupported_key("f32"))
    }

    fn serialize_f64(self, _v: f64) -> Result<SortKey, EncodeError> {
        Err(unsupported_key("f64"))
    }

    fn serialize_char(self, v: char) -> Result<SortKey, EncodeError> {
        self.bytes(v.encode_utf8(&mut [0u8; 4]).as_bytes())
    }

    fn serialize_str(self, v: &str) -> Result<SortKey, EncodeError> {
        self.bytes(v.as_bytes())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<SortKey, EncodeError> {
        self.bytes(v)
    }

    fn serialize_none(self) -> Result<SortKey, EncodeError> {
        Err(unsupported_key("none"))
    }

    fn serialize_some<T>(self, _value: &T) -> Result<SortKey, EncodeError>
    where
        T: ?Sized + Serialize,
    {
        Err(unsupported_key("option"))
    }

    fn serialize_unit(self) -> Result<SortKey, EncodeError> {
        Err(unsupported_key("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<SortKey, EncodeError> {
        Err(unsupported_key(name))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<SortKey, EncodeError> {
        self.bytes(variant.as_bytes())
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<SortKey, EncodeError>
    where
        T: ?Sized + Serialize,
    {
        // Hook output is a complete value, never a key.
        if name == RAW_TOKEN {
            return Err(unsupported_key("custom-serialized value"));
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<SortKey, EncodeError>
    where
        T: ?Sized + Serialize,
    {
        Err(unsupported_key(name))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, EncodeError> {
        Err(unsupported_key("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, EncodeError> {
        Err(unsupported_key("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, EncodeError> {
        Err(unsupported_key(name))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, EncodeError> {
        Err(unsupported_key(name))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, EncodeError> {
        Err(unsupported_key("map"))
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, EncodeError> {
        Err(unsupported_key(name))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, EncodeError> {
        Err(unsupported_key(name))
    }
}
