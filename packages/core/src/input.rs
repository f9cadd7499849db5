//! Values accepted by store writes and their byte encoding.

use bytes::Bytes;
use serde::Serialize;

use crate::{Error, Result};

/// A value that can be written to a store.
///
/// This is a closed set: raw bytes and strings pass through, booleans
/// become a single byte, fixed-width numbers become their big-endian binary
/// form, and anything else goes through `Structured` as JSON.
///
/// Numbers are NOT stored as text. A value written as `Input::I64(42)` will
/// not read back through `TypedValue::as_int`; write `"42"` for that.
///
/// # Example
///
/// ```rust
/// use kvlayer_core::Input;
///
/// assert_eq!(&Input::from(true).to_bytes().unwrap()[..], &[1]);
/// assert_eq!(&Input::from(258u16).to_bytes().unwrap()[..], &[1, 2]);
/// ```
pub enum Input {
    Bytes(Bytes),
    String(String),
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    /// Any serializable value; encoded as a JSON object or array.
    Structured(Box<dyn erased_serde::Serialize + Send + Sync>),
}

impl Input {
    /// Wrap a serializable value for JSON encoding.
    pub fn structured<T>(value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Input::Structured(Box::new(value))
    }

    /// Encode this value into its stored byte form.
    ///
    /// # Errors
    ///
    /// - `Serialization` if a structured value fails to serialize.
    /// - `InvalidType` if a structured value serializes to a bare scalar
    ///   (`null`, a number, a string) rather than an object or array.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let bytes = match self {
            Input::Bytes(b) => b.clone(),
            Input::String(s) => Bytes::copy_from_slice(s.as_bytes()),
            Input::Bool(b) => Bytes::from(vec![u8::from(*b)]),
            Input::I8(n) => Bytes::copy_from_slice(&n.to_be_bytes()),
            Input::I16(n) => Bytes::copy_from_slice(&n.to_be_bytes()),
            Input::I32(n) => Bytes::copy_from_slice(&n.to_be_bytes()),
            Input::I64(n) => Bytes::copy_from_slice(&n.to_be_bytes()),
            Input::U8(n) => Bytes::copy_from_slice(&n.to_be_bytes()),
            Input::U16(n) => Bytes::copy_from_slice(&n.to_be_bytes()),
            Input::U32(n) => Bytes::copy_from_slice(&n.to_be_bytes()),
            Input::U64(n) => Bytes::copy_from_slice(&n.to_be_bytes()),
            Input::F32(n) => Bytes::copy_from_slice(&n.to_be_bytes()),
            Input::F64(n) => Bytes::copy_from_slice(&n.to_be_bytes()),
            Input::Structured(value) => {
                let encoded = serde_json::to_vec(&**value).map_err(Error::serialization)?;
                match encoded.first() {
                    Some(b'{') | Some(b'[') => Bytes::from(encoded),
                    _ => {
                        return Err(Error::InvalidType {
                            message: format!(
                                "structured value must encode to an object or array, got {}",
                                String::from_utf8_lossy(&encoded)
                            ),
                        })
                    }
                }
            }
        };
        Ok(bytes)
    }

    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Input::Bytes(_) => "bytes",
            Input::String(_) => "string",
            Input::Bool(_) => "bool",
            Input::I8(_) => "i8",
            Input::I16(_) => "i16",
            Input::I32(_) => "i32",
            Input::I64(_) => "i64",
            Input::U8(_) => "u8",
            Input::U16(_) => "u16",
            Input::U32(_) => "u32",
            Input::U64(_) => "u64",
            Input::F32(_) => "f32",
            Input::F64(_) => "f64",
            Input::Structured(_) => "structured",
        }
    }
}

impl std::fmt::Debug for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Bytes(b) => f.debug_tuple("Input::Bytes").field(&b.len()).finish(),
            Input::String(s) => f.debug_tuple("Input::String").field(s).finish(),
            Input::Structured(_) => f.write_str("Input::Structured(..)"),
            other => write!(f, "Input::{}", other.kind()),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Input {
                fn from(v: $ty) -> Self {
                    Input::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    Bytes => Bytes,
}

impl From<&str> for Input {
    fn from(s: &str) -> Self {
        Input::String(s.to_string())
    }
}

impl From<&String> for Input {
    fn from(s: &String) -> Self {
        Input::String(s.clone())
    }
}

impl From<Vec<u8>> for Input {
    fn from(b: Vec<u8>) -> Self {
        Input::Bytes(Bytes::from(b))
    }
}

impl From<&[u8]> for Input {
    fn from(b: &[u8]) -> Self {
        Input::Bytes(Bytes::copy_from_slice(b))
    }
}

/// Only objects and arrays convert. Scalars and `null` are rejected here
/// rather than at encode time.
impl TryFrom<serde_json::Value> for Input {
    type Error = Error;

    fn try_from(v: serde_json::Value) -> Result<Self> {
        match v {
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                Ok(Input::structured(v))
            }
            other => Err(Error::InvalidType {
                message: format!(
                    "structured value must be an object or array, got {}",
                    other
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    #[test]
    fn bytes_pass_through() {
        let raw = Bytes::from_static(b"\x00\xffraw");
        assert_eq!(Input::from(raw.clone()).to_bytes().unwrap(), raw);
    }

    #[test]
    fn strings_encode_as_utf8() {
        let bytes = Input::from("héllo").to_bytes().unwrap();
        assert_eq!(&bytes[..], "héllo".as_bytes());
    }

    #[test]
    fn bools_encode_as_single_byte() {
        assert_eq!(&Input::from(true).to_bytes().unwrap()[..], &[1]);
        assert_eq!(&Input::from(false).to_bytes().unwrap()[..], &[0]);
    }

    #[test]
    fn integers_encode_big_endian_at_their_width() {
        assert_eq!(&Input::from(-1i8).to_bytes().unwrap()[..], &[0xff]);
        assert_eq!(&Input::from(1i32).to_bytes().unwrap()[..], &[0, 0, 0, 1]);
        assert_eq!(
            &Input::from(0x0102_0304_0506_0708u64).to_bytes().unwrap()[..],
            &[1, 2, 3, 4, 5, 6, 7, 8]
        );
        assert_eq!(Input::from(7i64).to_bytes().unwrap().len(), 8);
    }

    #[test]
    fn floats_encode_ieee_big_endian() {
        assert_eq!(
            &Input::from(1.0f32).to_bytes().unwrap()[..],
            &1.0f32.to_be_bytes()
        );
        assert_eq!(
            &Input::from(-2.5f64).to_bytes().unwrap()[..],
            &(-2.5f64).to_be_bytes()
        );
    }

    #[test]
    fn numbers_are_not_text() {
        let bytes = Input::from(42i64).to_bytes().unwrap();
        assert_ne!(&bytes[..], b"42");
    }

    #[test]
    fn structured_values_encode_as_json() {
        #[derive(Serialize)]
        struct User {
            name: String,
            age: u32,
        }

        let bytes = Input::structured(User {
            name: "Alice".into(),
            age: 30,
        })
        .to_bytes()
        .unwrap();
        assert_eq!(&bytes[..], br#"{"name":"Alice","age":30}"#);

        let list = Input::structured(vec![1, 2, 3]).to_bytes().unwrap();
        assert_eq!(&list[..], b"[1,2,3]");
    }

    #[test]
    fn structured_scalar_is_invalid_type() {
        let result = Input::structured(Option::<u8>::None).to_bytes();
        assert!(matches!(result, Err(Error::InvalidType { .. })));
    }

    #[test]
    fn json_documents_convert_but_scalars_do_not() {
        let object = Input::try_from(serde_json::json!({"id": 1})).unwrap();
        assert_eq!(&object.to_bytes().unwrap()[..], br#"{"id":1}"#);

        let list = Input::try_from(serde_json::json!(["a", "b"])).unwrap();
        assert_eq!(&list.to_bytes().unwrap()[..], br#"["a","b"]"#);

        for scalar in [
            serde_json::json!(42),
            serde_json::json!("text"),
            serde_json::json!(true),
            serde_json::Value::Null,
        ] {
            assert!(matches!(
                Input::try_from(scalar),
                Err(Error::InvalidType { .. })
            ));
        }
    }

    #[test]
    fn unserializable_map_keys_fail() {
        let mut map: HashMap<Vec<u8>, u8> = HashMap::new();
        map.insert(vec![1], 1);
        let result = Input::structured(map).to_bytes();
        assert!(matches!(result, Err(Error::Serialization { .. })));
    }

    #[test]
    fn encoding_is_deterministic() {
        let mut map = BTreeMap::new();
        map.insert("b", 2);
        map.insert("a", 1);
        let first = Input::structured(map.clone()).to_bytes().unwrap();
        let second = Input::structured(map).to_bytes().unwrap();
        assert_eq!(first, second);
    }
}
