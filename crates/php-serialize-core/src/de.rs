//! PHP unserialize parser.
//!
//! A single-pass recursive-descent parser over a complete in-memory buffer.
//! The cursor only moves forward; the byte under it selects the production.
//! Any failure aborts the whole parse and is reported with the byte offset
//! where it was detected.
//!
//! # Tracing Support
//!
//! Enable the `tracing` feature for detailed parsing instrumentation:
//!
//! ```toml
//! php-serialize-core = { version = "0.1", features = ["tracing"] }
//! ```

use memchr::memchr;

#[cfg(feature = "tracing")]
use tracing::{debug, instrument, trace, warn};

use crate::error::{DecodeError, ErrorKind, Result};
use crate::value::{Array, ArrayKey, Field, Object, Value, Visibility};

/// Maximum nesting depth to prevent stack overflow.
const MAX_DEPTH: usize = 512;

/// Decoder configuration options.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Maximum nesting depth for arrays and objects.
    pub max_depth: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
        }
    }
}

/// A PHP unserialize parser.
///
/// Holds the cursor for one parse; create a new one per input.
pub struct Parser<'a> {
    /// Input data.
    data: &'a [u8],
    /// Current position in the input.
    pos: usize,
    /// Parser configuration.
    config: DecoderConfig,
    /// Current nesting depth.
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser with default configuration.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_config(data, DecoderConfig::default())
    }

    /// Create a new parser with custom configuration.
    pub fn with_config(data: &'a [u8], config: DecoderConfig) -> Self {
        Self {
            data,
            pos: 0,
            config,
            depth: 0,
        }
    }

    /// Parse exactly one value spanning the whole input.
    ///
    /// If the `tracing` feature is enabled, this method will emit trace events.
    #[cfg_attr(feature = "tracing", instrument(skip(self), fields(data_len = self.data.len())))]
    pub fn parse(&mut self) -> Result<Value> {
        #[cfg(feature = "tracing")]
        debug!(data_len = self.data.len(), "Starting PHP unserialize");

        let result = self.parse_value().and_then(|value| {
            match self.data.get(self.pos) {
                None => Ok(value),
                Some(&byte) => Err(DecodeError::new(ErrorKind::TrailingData(byte as char), self.pos)
                    .with_input_preview(self.data, self.pos)),
            }
        });

        #[cfg(feature = "tracing")]
        match &result {
            Ok(value) => debug!(value_type = %value.type_of(), "Parse completed successfully"),
            Err(e) => warn!(error = %e, "Parse failed"),
        }

        result
    }

    /// Parse a single value at the current position.
    ///
    /// This is the core parsing dispatch function that routes to type-specific parsers.
    #[cfg_attr(feature = "tracing", instrument(skip(self), level = "trace", fields(pos = self.pos, depth = self.depth)))]
    fn parse_value(&mut self) -> Result<Value> {
        let type_byte = self.peek_byte()?;

        #[cfg(feature = "tracing")]
        trace!(type_marker = %char::from(type_byte), pos = self.pos, "Parsing value");

        match type_byte {
            b'N' => self.parse_null(),
            b'b' => self.parse_bool(),
            b'i' => self.parse_int(),
            b'd' => self.parse_float(),
            b's' => self.parse_string().map(Value::String),
            b'a' => self.parse_array(),
            b'O' => self.parse_object(),
            _ => {
                #[cfg(feature = "tracing")]
                warn!(type_byte = %char::from(type_byte), pos = self.pos, "Unknown type marker");
                Err(DecodeError::new(ErrorKind::UnknownType(type_byte as char), self.pos)
                    .with_input_preview(self.data, self.pos))
            }
        }
    }

    /// Parse a null value: `N;`
    fn parse_null(&mut self) -> Result<Value> {
        self.expect_byte(b'N')?;
        self.expect_byte(b';')?;
        Ok(Value::Null)
    }

    /// Parse a boolean value: `b:0;` or `b:1;`
    fn parse_bool(&mut self) -> Result<Value> {
        self.expect_byte(b'b')?;
        self.expect_byte(b':')?;
        let value_pos = self.pos;
        let value_byte = self.read_byte()?;
        self.expect_byte(b';')?;

        match value_byte {
            b'0' => Ok(Value::Bool(false)),
            b'1' => Ok(Value::Bool(true)),
            _ => Err(DecodeError::new(
                ErrorKind::InvalidBoolean((value_byte as char).to_string()),
                value_pos,
            )
            .with_input_preview(self.data, value_pos)),
        }
    }

    /// Parse an integer value: `i:<value>;`
    fn parse_int(&mut self) -> Result<Value> {
        self.expect_byte(b'i')?;
        self.expect_byte(b':')?;

        let start = self.pos;
        let value = self.read_until(b';')?;
        let int_value: i64 = parse_decimal(value)
            .ok_or_else(|| invalid_integer(value, start))?;

        self.expect_byte(b';')?;
        Ok(Value::Int(int_value))
    }

    /// Parse a float/double value: `d:<value>;`
    fn parse_float(&mut self) -> Result<Value> {
        self.expect_byte(b'd')?;
        self.expect_byte(b':')?;

        let start = self.pos;
        let value = self.read_until(b';')?;

        let float_value = match value {
            b"INF" => f64::INFINITY,
            b"-INF" => f64::NEG_INFINITY,
            b"NAN" => f64::NAN,
            // Rust also accepts "inf", "nan" and "infinity"; PHP does not.
            _ if value.is_empty()
                || !value
                    .iter()
                    .all(|b| matches!(b, b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E')) =>
            {
                return Err(invalid_float(value, start));
            }
            _ => std::str::from_utf8(value)
                .ok()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| invalid_float(value, start))?,
        };

        self.expect_byte(b';')?;
        Ok(Value::Float(float_value))
    }

    /// Parse a string value: `s:<len>:"<data>";`
    fn parse_string(&mut self) -> Result<Vec<u8>> {
        self.expect_byte(b's')?;
        self.expect_byte(b':')?;
        let bytes = self.parse_quoted()?;
        self.expect_byte(b';')?;
        Ok(bytes.to_vec())
    }

    /// Parse `<len>:"<len bytes>"`, shared by strings and object class names.
    fn parse_quoted(&mut self) -> Result<&'a [u8]> {
        let len = self.parse_length(b':')?;
        self.expect_byte(b':')?;
        self.expect_byte(b'"')?;
        let bytes = self.read_exact(len)?;
        self.expect_byte(b'"')?;
        Ok(bytes)
    }

    /// Parse an array value: `a:<count>:{<key><value>...}`
    fn parse_array(&mut self) -> Result<Value> {
        self.expect_byte(b'a')?;
        self.expect_byte(b':')?;
        let count = self.parse_length(b':')?;
        self.expect_byte(b':')?;
        self.expect_byte(b'{')?;

        self.enter()?;
        let mut items = Array::with_capacity(count.min(1024)); // Cap initial allocation

        for _ in 0..count {
            let key_pos = self.pos;
            let key = match self.parse_value()? {
                Value::Int(i) => ArrayKey::Int(i),
                Value::String(s) => ArrayKey::String(s),
                other => {
                    return Err(DecodeError::new(
                        ErrorKind::InvalidArrayKey(other.type_of()),
                        key_pos,
                    )
                    .with_input_preview(self.data, key_pos));
                }
            };

            let value = self.parse_value()?;
            items.push(key, value);
        }

        self.depth -= 1;
        self.expect_byte(b'}')?;

        Ok(Value::Array(items))
    }

    /// Parse an object value: `O:<namelen>:"<name>":<count>:{<prop>...}`
    fn parse_object(&mut self) -> Result<Value> {
        self.expect_byte(b'O')?;
        self.expect_byte(b':')?;

        let name_pos = self.pos;
        let class_name = std::str::from_utf8(self.parse_quoted()?)
            .map_err(|_| {
                DecodeError::new(ErrorKind::InvalidUtf8, name_pos)
                    .with_context("class name")
                    .with_input_preview(self.data, name_pos)
            })?
            .to_owned();

        self.expect_byte(b':')?;
        let count = self.parse_length(b':')?;
        self.expect_byte(b':')?;
        self.expect_byte(b'{')?;

        self.enter()?;
        let mut fields = Vec::with_capacity(count.min(1024));

        for _ in 0..count {
            let field = self.parse_property()?;
            fields.push(field);
        }

        self.depth -= 1;
        self.expect_byte(b'}')?;

        Ok(Value::Object(Object::from_parts(class_name, fields)))
    }

    /// Parse an object property with visibility handling.
    fn parse_property(&mut self) -> Result<Field> {
        let name_pos = self.pos;
        let raw_name = self.parse_string()?;
        let (name, visibility) = parse_property_name(&raw_name)
            .map_err(|kind| DecodeError::new(kind, name_pos).with_input_preview(self.data, name_pos))?;
        let value = self.parse_value()?;
        Ok(Field::new(name, value, visibility))
    }

    // Helper methods - marked #[inline] for performance on hot paths

    /// Track one more level of nesting.
    #[inline]
    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            #[cfg(feature = "tracing")]
            warn!(depth = self.depth, max_depth = self.config.max_depth, "Max depth exceeded");
            return Err(DecodeError::new(
                ErrorKind::MaxDepthExceeded(self.config.max_depth),
                self.pos,
            ));
        }
        Ok(())
    }

    /// Read a non-negative decimal length or count terminated by `delimiter`.
    fn parse_length(&mut self, delimiter: u8) -> Result<usize> {
        let start = self.pos;
        let bytes = self.read_until(delimiter)?;
        if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
            return Err(invalid_integer(bytes, start));
        }
        parse_decimal(bytes).ok_or_else(|| invalid_integer(bytes, start))
    }

    /// Peek at the current byte without consuming it.
    #[inline(always)]
    fn peek_byte(&self) -> Result<u8> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or_else(|| DecodeError::new(ErrorKind::UnexpectedEof, self.pos))
    }

    /// Read and consume the current byte.
    #[inline(always)]
    fn read_byte(&mut self) -> Result<u8> {
        let byte = self.peek_byte()?;
        self.pos += 1;
        Ok(byte)
    }

    /// Consume exactly `len` bytes.
    #[inline]
    fn read_exact(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                DecodeError::new(ErrorKind::UnexpectedEof, self.data.len())
                    .with_context(format!("{} bytes declared at position {}", len, self.pos))
            })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Expect a specific byte, returning an error if it doesn't match.
    #[inline]
    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        let byte = self.read_byte()?;
        if byte != expected {
            return Err(self.make_unexpected_char_error(expected, byte));
        }
        Ok(())
    }

    /// Create an unexpected character error with proper context.
    #[cold]
    #[inline(never)]
    fn make_unexpected_char_error(&self, expected: u8, found: u8) -> DecodeError {
        DecodeError::new(
            ErrorKind::UnexpectedChar {
                expected: expected as char,
                found: found as char,
            },
            self.pos - 1,
        )
        .with_input_preview(self.data, self.pos.saturating_sub(1))
    }

    /// Read bytes until the delimiter, using SIMD-accelerated search.
    ///
    /// The delimiter itself is left under the cursor.
    #[inline]
    fn read_until(&mut self, delimiter: u8) -> Result<&'a [u8]> {
        let start = self.pos;
        match memchr(delimiter, &self.data[start..]) {
            Some(offset) => {
                let result = &self.data[start..start + offset];
                self.pos = start + offset;
                Ok(result)
            }
            None => Err(self.make_delimiter_not_found_error(delimiter)),
        }
    }

    /// Create a delimiter not found error with proper context.
    #[cold]
    #[inline(never)]
    fn make_delimiter_not_found_error(&self, delimiter: u8) -> DecodeError {
        DecodeError::new(ErrorKind::UnexpectedEof, self.data.len())
            .with_context(format!(
                "looking for '{}' from position {}",
                delimiter as char, self.pos
            ))
            .with_input_preview(self.data, self.pos)
    }
}

fn parse_decimal<T: std::str::FromStr>(bytes: &[u8]) -> Option<T> {
    std::str::from_utf8(bytes).ok()?.parse().ok()
}

#[cold]
fn invalid_integer(bytes: &[u8], pos: usize) -> DecodeError {
    DecodeError::new(
        ErrorKind::InvalidInteger(String::from_utf8_lossy(bytes).into_owned()),
        pos,
    )
}

#[cold]
fn invalid_float(bytes: &[u8], pos: usize) -> DecodeError {
    DecodeError::new(
        ErrorKind::InvalidFloat(String::from_utf8_lossy(bytes).into_owned()),
        pos,
    )
}

/// Split a serialized property name into its name and visibility.
///
/// - `*name` → protected
/// - `\0<segment>\0name` → private, whatever the segment holds
/// - anything else → public
fn parse_property_name(name: &[u8]) -> std::result::Result<(String, Visibility), ErrorKind> {
    let (bare, visibility) = match name.first() {
        Some(b'*') => (&name[1..], Visibility::Protected),
        Some(0) => {
            let second_null = memchr(0, &name[1..]).ok_or_else(|| {
                ErrorKind::InvalidPropertyName(String::from_utf8_lossy(&name[1..]).into_owned())
            })?;
            (&name[2 + second_null..], Visibility::Private)
        }
        _ => (name, Visibility::Public),
    };

    let bare = std::str::from_utf8(bare).map_err(|_| ErrorKind::InvalidUtf8)?;
    Ok((bare.to_owned(), visibility))
}

/// Parse PHP serialized data from bytes.
///
/// This is the primary API for parsing PHP serialized data.
///
/// # Example
///
/// ```rust
/// use php_serialize_core::from_bytes;
///
/// let value = from_bytes(b"i:42;").unwrap();
/// assert_eq!(value.as_int(), Ok(42));
/// ```
#[inline]
pub fn from_bytes(data: &[u8]) -> Result<Value> {
    #[cfg(feature = "tracing")]
    trace!(data_len = data.len(), "from_bytes called");

    let mut parser = Parser::new(data);
    parser.parse()
}

/// Parse PHP serialized data from bytes with custom configuration.
///
/// # Example
///
/// ```rust
/// use php_serialize_core::{from_bytes_with_config, DecoderConfig};
///
/// let config = DecoderConfig { max_depth: 64 };
/// let value = from_bytes_with_config(b"i:42;", config).unwrap();
/// ```
#[inline]
pub fn from_bytes_with_config(data: &[u8], config: DecoderConfig) -> Result<Value> {
    #[cfg(feature = "tracing")]
    trace!(data_len = data.len(), ?config, "from_bytes_with_config called");

    let mut parser = Parser::with_config(data, config);
    parser.parse()
}

#[cfg(test)]
#[allow(clippy::approx_constant)]
mod tests {
    use super::*;
    use crate::ser::encode;

    fn kind(data: &[u8]) -> ErrorKind {
        from_bytes(data).unwrap_err().kind
    }

    fn roundtrip(value: Value) {
        let encoded = encode(&value);
        assert_eq!(from_bytes(&encoded).unwrap(), value, "{:?}", bstr::BStr::new(&encoded));
    }

    #[test]
    fn test_null() {
        assert_eq!(from_bytes(b"N;").unwrap(), Value::Null);
    }

    #[test]
    fn test_bool() {
        assert_eq!(from_bytes(b"b:0;").unwrap(), Value::Bool(false));
        assert_eq!(from_bytes(b"b:1;").unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_int() {
        assert_eq!(from_bytes(b"i:0;").unwrap(), Value::Int(0));
        assert_eq!(from_bytes(b"i:42;").unwrap(), Value::Int(42));
        assert_eq!(from_bytes(b"i:-5;").unwrap(), Value::Int(-5));
        assert_eq!(
            from_bytes(b"i:9223372036854775807;").unwrap(),
            Value::Int(i64::MAX)
        );
        assert_eq!(
            from_bytes(b"i:-9223372036854775808;").unwrap(),
            Value::Int(i64::MIN)
        );
    }

    #[test]
    fn test_float() {
        assert_eq!(from_bytes(b"d:0;").unwrap(), Value::Float(0.0));
        assert_eq!(from_bytes(b"d:3.14;").unwrap(), Value::Float(3.14));
        assert_eq!(from_bytes(b"d:-2.5;").unwrap(), Value::Float(-2.5));
        assert_eq!(from_bytes(b"d:1.0E+25;").unwrap(), Value::Float(1e25));
        assert_eq!(from_bytes(b"d:1e-05;").unwrap(), Value::Float(1e-5));
        assert!(matches!(from_bytes(b"d:INF;").unwrap(), Value::Float(f) if f.is_infinite() && f.is_sign_positive()));
        assert!(matches!(from_bytes(b"d:-INF;").unwrap(), Value::Float(f) if f.is_infinite() && f.is_sign_negative()));
        assert!(matches!(from_bytes(b"d:NAN;").unwrap(), Value::Float(f) if f.is_nan()));
    }

    #[test]
    fn test_float_rejects_non_php_tokens() {
        for data in [&b"d:inf;"[..], b"d:nan;", b"d:Infinity;", b"d:;", b"d:1.5x;"] {
            assert!(matches!(kind(data), ErrorKind::InvalidFloat(_)), "{:?}", data);
        }
    }

    #[test]
    fn test_string() {
        assert_eq!(from_bytes(b"s:0:\"\";").unwrap(), Value::String(Vec::new()));
        assert_eq!(from_bytes(b"s:5:\"hello\";").unwrap(), Value::from("hello"));
    }

    #[test]
    fn test_string_multibyte() {
        let value = from_bytes("s:9:\"日本語\";".as_bytes()).unwrap();
        assert_eq!(value, Value::from("日本語"));
        assert_eq!(value.to_string(), "日本語");
    }

    #[test]
    fn test_string_length_is_authoritative() {
        // Quotes and semicolons inside the payload are not delimiters.
        assert_eq!(
            from_bytes(b"s:8:\"say \"hi\"\";").unwrap(),
            Value::from("say \"hi\"")
        );
        assert_eq!(
            from_bytes(b"s:11:\"hello;world\";").unwrap(),
            Value::from("hello;world")
        );
        assert_eq!(
            from_bytes(b"s:5:\"a\x00b\x00c\";").unwrap(),
            Value::from(&b"a\x00b\x00c"[..])
        );
    }

    #[test]
    fn test_string_length_mismatch() {
        // Declared length shorter than the payload.
        let err = from_bytes("s:4:\"한글\";".as_bytes()).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnexpectedChar { expected: '"', .. }));
        assert_eq!(err.position, 9);

        // Declared length runs past the end.
        let err = from_bytes(b"s:10:\"hello").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_array_empty() {
        assert_eq!(from_bytes(b"a:0:{}").unwrap(), Value::Array(Array::new()));
    }

    #[test]
    fn test_array_indexed() {
        let value = from_bytes(b"a:2:{i:0;s:3:\"foo\";i:1;s:3:\"bar\";}").unwrap();
        let arr = value.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr.get(&ArrayKey::Int(0)), Some(&Value::from("foo")));
        assert_eq!(arr.get(&ArrayKey::Int(1)), Some(&Value::from("bar")));
    }

    #[test]
    fn test_array_associative() {
        let value = from_bytes(b"a:2:{s:4:\"name\";s:5:\"Alice\";s:3:\"age\";i:30;}").unwrap();
        let arr = value.as_array().unwrap();
        assert_eq!(arr.get_by_name("name"), Some(&Value::from("Alice")));
        assert_eq!(arr.get_by_name("age"), Some(&Value::Int(30)));
    }

    #[test]
    fn test_array_keeps_order_and_duplicates() {
        let value = from_bytes(b"a:3:{i:5;s:1:\"a\";i:1;s:1:\"b\";i:5;s:1:\"c\";}").unwrap();
        let keys: Vec<_> = value.as_array().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec![ArrayKey::Int(5), ArrayKey::Int(1), ArrayKey::Int(5)]);
        assert_eq!(
            value.as_array().unwrap().get(&ArrayKey::Int(5)),
            Some(&Value::from("a"))
        );
    }

    #[test]
    fn test_array_invalid_key() {
        let err = from_bytes(b"a:1:{d:1.5;i:1;}").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArrayKey(crate::value::Type::Float));
        assert_eq!(err.position, 5);

        assert_eq!(
            kind(b"a:1:{N;i:1;}"),
            ErrorKind::InvalidArrayKey(crate::value::Type::Null)
        );
        assert_eq!(
            kind(b"a:1:{a:0:{}i:1;}"),
            ErrorKind::InvalidArrayKey(crate::value::Type::Array)
        );
    }

    #[test]
    fn test_object() {
        let data = br#"O:8:"stdClass":2:{s:4:"name";s:5:"Alice";s:3:"age";i:30;}"#;
        let value = from_bytes(data).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.name(), "stdClass");
        assert_eq!(obj.fields().len(), 2);
        assert_eq!(obj.fields()[0].name, "name");
        assert_eq!(obj.fields()[0].visibility, Visibility::Public);
        assert_eq!(obj.fields()[1].value, Value::Int(30));
    }

    #[test]
    fn test_object_empty() {
        let value = from_bytes(b"O:3:\"Foo\":0:{}").unwrap();
        assert_eq!(value, Value::Object(Object::new("Foo")));
    }

    #[test]
    fn test_object_private_protected() {
        // \0Test\0priv = 10 bytes, *prot = 5 bytes, \0*\0old = 6 bytes
        let data = b"O:4:\"Test\":4:{s:3:\"pub\";i:1;s:10:\"\x00Test\x00priv\";i:2;\
                     s:5:\"*prot\";i:3;s:6:\"\x00*\x00old\";i:4;}";
        let value = from_bytes(data).unwrap();
        let fields = value.as_object().unwrap().fields();

        assert_eq!(fields[0], Field::public("pub", 1));
        assert_eq!(fields[1], Field::private("priv", 2));
        assert_eq!(fields[2], Field::protected("prot", 3));
        assert_eq!(fields[3], Field::private("old", 4));
    }

    #[test]
    fn test_object_nul_marker_is_always_private() {
        let value = from_bytes(b"O:1:\"A\":1:{s:6:\"\x00*\x00old\";i:4;}").unwrap();
        let field = &value.as_object().unwrap().fields()[0];
        assert_eq!(field.name, "old");
        assert_eq!(field.visibility, Visibility::Private);

        // Empty segment.
        let value = from_bytes(b"O:1:\"A\":1:{s:3:\"\x00\x00x\";N;}").unwrap();
        assert_eq!(value.as_object().unwrap().fields()[0], Field::private("x", Value::Null));
    }

    #[test]
    fn test_object_malformed_private_name() {
        let data = b"O:1:\"A\":1:{s:4:\"\x00Abc\";i:1;}";
        let err = from_bytes(data).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidPropertyName(ref n) if n == "Abc"));
        assert_eq!(err.position, 11);
    }

    #[test]
    fn test_object_field_name_must_be_string() {
        let err = from_bytes(b"O:1:\"A\":1:{i:0;i:1;}").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnexpectedChar { expected: 's', found: 'i' }));
    }

    #[test]
    fn test_object_class_name_utf8() {
        let err = from_bytes(b"O:1:\"\xff\":0:{}").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidUtf8);
        assert_eq!(err.position, 2);
        assert!(err.input_preview.is_some());

        let err = from_bytes(b"O:1:\"A\":1:{s:1:\"\xfe\";N;}").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidUtf8);
        assert_eq!(err.position, 11);
        assert!(err.input_preview.is_some());
    }

    #[test]
    fn test_nested_array_depth() {
        let mut data = String::from("s:4:\"leaf\";");
        for _ in 0..100 {
            data = format!("a:1:{{s:1:\"k\";{}}}", data);
        }
        let result = from_bytes(data.as_bytes()).unwrap();
        assert!(result.is_array());

        let config = DecoderConfig { max_depth: 10 };
        let err = from_bytes_with_config(data.as_bytes(), config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MaxDepthExceeded(10));
    }

    #[test]
    fn test_default_config() {
        assert_eq!(DecoderConfig::default().max_depth, 512);
    }

    #[test]
    fn test_error_trailing_data() {
        let err = from_bytes(b"N;x").unwrap_err();
        assert_eq!(err.kind, ErrorKind::TrailingData('x'));
        assert_eq!(err.position, 2);
        assert_eq!(kind(b"i:1;i:2;"), ErrorKind::TrailingData('i'));
    }

    #[test]
    fn test_error_invalid_bool() {
        let err = from_bytes(b"b:2;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidBoolean("2".into()));
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_error_empty_input() {
        let err = from_bytes(b"").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedEof);
        assert_eq!(err.position, 0);
    }

    #[test]
    fn test_error_invalid_type() {
        let err = from_bytes(b"X:1;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownType('X'));
        assert!(err.input_preview.is_some());
    }

    #[test]
    fn test_error_invalid_int() {
        assert_eq!(kind(b"i:abc;"), ErrorKind::InvalidInteger("abc".into()));
        assert_eq!(kind(b"i:;"), ErrorKind::InvalidInteger(String::new()));
        assert_eq!(
            kind(b"i:99999999999999999999;"),
            ErrorKind::InvalidInteger("99999999999999999999".into())
        );
    }

    #[test]
    fn test_error_negative_length() {
        assert_eq!(kind(b"s:-1:\"\";"), ErrorKind::InvalidInteger("-1".into()));
        assert_eq!(kind(b"a:-1:{}"), ErrorKind::InvalidInteger("-1".into()));
    }

    #[test]
    fn test_error_truncated() {
        assert_eq!(kind(b"N"), ErrorKind::UnexpectedEof);
        assert_eq!(kind(b"i:12"), ErrorKind::UnexpectedEof);
        assert_eq!(kind(b"a:1:{i:0;"), ErrorKind::UnexpectedEof);
        assert_eq!(kind(b"a:1:{i:0;i:1;"), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_error_expected_literal() {
        let err = from_bytes(b"a:1:[i:0;i:1;}").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UnexpectedChar {
                expected: '{',
                found: '['
            }
        );
        assert_eq!(err.position, 4);
        assert!(err.to_string().starts_with("expected '{', found '[' at position 4"));
    }

    #[test]
    fn test_roundtrip_scalars() {
        roundtrip(Value::Null);
        roundtrip(Value::Bool(true));
        roundtrip(Value::Bool(false));
        roundtrip(Value::Int(-5));
        roundtrip(Value::Int(i64::MAX));
        roundtrip(Value::Float(0.1));
        roundtrip(Value::Float(-1.5e300));
        roundtrip(Value::Float(2.5e-7));
        roundtrip(Value::inf(1));
        roundtrip(Value::inf(-1));
        roundtrip(Value::from(""));
        roundtrip(Value::from("日本語"));
        roundtrip(Value::from(&b"\x00\xff\"\";"[..]));
    }

    #[test]
    fn test_roundtrip_nan() {
        let decoded = from_bytes(&encode(&Value::nan())).unwrap();
        assert!(matches!(decoded, Value::Float(f) if f.is_nan()));
    }

    #[test]
    fn test_roundtrip_containers() {
        roundtrip(Value::Array(Array::new()));
        roundtrip(Value::Object(Object::new("Foo")));
        roundtrip(Value::from(
            Array::new()
                .insert("b", 1)
                .insert(3, Array::new().append(["x", "y"]))
                .insert("b", Value::Null),
        ));
        roundtrip(Value::from(
            Object::new("App\\Model\\User")
                .with_field(Field::public("id", 7))
                .with_field(Field::protected("email", "a@b.c"))
                .with_field(Field::private("hash", &b"\x00\x01"[..]))
                .with_field(Field::public("tags", Array::new().append(["a"]))),
        ));
    }

    #[test]
    fn test_roundtrip_visibility() {
        for visibility in [Visibility::Public, Visibility::Protected, Visibility::Private] {
            let value = Value::from(Object::new("Foo").with_field(Field::new("x", 1, visibility)));
            let decoded = from_bytes(&encode(&value)).unwrap();
            assert_eq!(decoded.as_object().unwrap().fields()[0].visibility, visibility);
        }
    }
}
