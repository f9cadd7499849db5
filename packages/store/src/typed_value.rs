//! TypedValue - a read result converted on demand.

use std::num::IntErrorKind;

use bytes::Bytes;
use kvlayer_core::{Error, Result};
use kvlayer_scan::{Registry, Scan};

/// The result of a store read.
///
/// Holds the raw payload, or the error the read produced. Nothing is parsed
/// until an accessor asks for a specific type, and each accessor parses
/// independently; a value read as a string can still be read as an int.
///
/// If the read failed, every accessor returns that error without looking at
/// the payload. A missing key is the common case:
///
/// ```rust
/// use kvlayer_store::{Error, TypedValue};
///
/// let miss = TypedValue::not_found("user:9");
/// assert!(miss.is_not_found());
/// assert!(matches!(miss.as_string(), Err(Error::KeyNotFound { .. })));
///
/// let hit = TypedValue::new("42");
/// assert_eq!(hit.as_int().unwrap(), 42);
/// assert_eq!(hit.as_string().unwrap(), "42");
/// ```
///
/// # Scalars
///
/// `as_int`, `as_bool` and `as_float` read the payload as UTF-8 text in the
/// type's usual textual form. An empty payload is `EmptyValue`, never zero
/// or false. `as_string` and `as_bytes` never fail on content.
#[derive(Clone, Debug)]
pub struct TypedValue {
    payload: Bytes,
    error: Option<Error>,
}

impl TypedValue {
    /// Wrap a payload returned by a backend.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
            error: None,
        }
    }

    /// A read result that failed with `error`.
    pub fn from_error(error: Error) -> Self {
        Self {
            payload: Bytes::new(),
            error: Some(error),
        }
    }

    /// A read miss for `key`.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::from_error(Error::key_not_found(key))
    }

    /// The carried error, if the read failed.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Whether the read missed.
    pub fn is_not_found(&self) -> bool {
        self.error.as_ref().is_some_and(Error::is_key_not_found)
    }

    /// Convert into the payload, or the carried error.
    pub fn into_result(self) -> Result<Bytes> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.payload),
        }
    }

    fn payload(&self) -> Result<&Bytes> {
        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(&self.payload),
        }
    }

    fn text(&self, target: &'static str) -> Result<&str> {
        let payload = self.payload()?;
        if payload.is_empty() {
            return Err(Error::EmptyValue);
        }
        std::str::from_utf8(payload).map_err(|e| Error::parse_failure(target, payload, e))
    }

    /// Parse the payload as a decimal `i64`.
    pub fn as_int(&self) -> Result<i64> {
        let text = self.text("i64")?;
        text.parse::<i64>().map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Error::overflow("i64", text),
            _ => Error::parse_failure("i64", text.as_bytes(), e),
        })
    }

    /// The payload as text. Invalid UTF-8 is replaced, not rejected.
    pub fn as_string(&self) -> Result<String> {
        Ok(String::from_utf8_lossy(self.payload()?).into_owned())
    }

    /// The payload bytes, unchanged.
    pub fn as_bytes(&self) -> Result<Bytes> {
        self.payload().cloned()
    }

    /// Parse the payload as a boolean.
    ///
    /// Accepts `1`, `t`, `T`, `true`, `TRUE`, `True` and the matching false
    /// spellings `0`, `f`, `F`, `false`, `FALSE`, `False`.
    pub fn as_bool(&self) -> Result<bool> {
        let text = self.text("bool")?;
        match text {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
            "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
            _ => Err(Error::parse_failure("bool", text.as_bytes(), "invalid syntax")),
        }
    }

    /// Parse the payload as a decimal `f64`.
    ///
    /// `inf` and `nan` spellings are accepted. A finite literal too large
    /// for `f64` is `Overflow`.
    pub fn as_float(&self) -> Result<f64> {
        let text = self.text("f64")?;
        let value = text
            .parse::<f64>()
            .map_err(|e| Error::parse_failure("f64", text.as_bytes(), e))?;

        if value.is_infinite() && !is_infinity_literal(text) {
            return Err(Error::overflow("f64", text));
        }
        Ok(value)
    }

    /// Decode a JSON object payload into `dest`.
    ///
    /// Uses the process-wide descriptor registry. See
    /// [`kvlayer_scan::decode_with`] for the field matching rules.
    pub fn scan_into<T: Scan>(&self, dest: &mut T) -> Result<()> {
        self.scan_into_with(Registry::global(), dest)
    }

    /// Decode into `dest` using a specific registry.
    pub fn scan_into_with<T: Scan>(&self, registry: &Registry, dest: &mut T) -> Result<()> {
        kvlayer_scan::decode_with(registry, self.payload()?, dest)
    }

    /// Decode into a fresh `T`.
    pub fn scan<T: Scan + Default>(&self) -> Result<T> {
        let mut dest = T::default();
        self.scan_into(&mut dest)?;
        Ok(dest)
    }
}

fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

impl From<Error> for TypedValue {
    fn from(error: Error) -> Self {
        TypedValue::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvlayer_scan::scannable;

    scannable! {
        #[derive(Debug, Default, PartialEq)]
        struct User {
            #[kv = "name"]
            name: String,
            #[kv = "age"]
            age: i64,
        }
    }

    #[test]
    fn int_parses_decimal_text() {
        assert_eq!(TypedValue::new("42").as_int().unwrap(), 42);
        assert_eq!(TypedValue::new("-7").as_int().unwrap(), -7);
        assert_eq!(TypedValue::new("+7").as_int().unwrap(), 7);
        assert_eq!(
            TypedValue::new("9223372036854775807").as_int().unwrap(),
            i64::MAX
        );
    }

    #[test]
    fn int_rejects_empty_payload() {
        assert!(matches!(TypedValue::new("").as_int(), Err(Error::EmptyValue)));
    }

    #[test]
    fn int_overflow() {
        let err = TypedValue::new("9223372036854775808").as_int().unwrap_err();
        assert!(matches!(err, Error::Overflow { target: "i64", .. }));

        let err = TypedValue::new("-9223372036854775809").as_int().unwrap_err();
        assert!(matches!(err, Error::Overflow { .. }));
    }

    #[test]
    fn int_rejects_malformed_text() {
        for input in ["4.2", "forty", " 42", "0x10"] {
            let err = TypedValue::new(input).as_int().unwrap_err();
            assert!(
                matches!(err, Error::ParseFailure { target: "i64", .. }),
                "{input:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn int_rejects_invalid_utf8() {
        let err = TypedValue::new(vec![0xff, 0xfe]).as_int().unwrap_err();
        assert!(matches!(err, Error::ParseFailure { .. }));
    }

    #[test]
    fn int_does_not_read_binary_numbers() {
        let bytes = kvlayer_core::Input::from(42i64).to_bytes().unwrap();
        assert!(TypedValue::new(bytes).as_int().is_err());
    }

    #[test]
    fn bool_spellings() {
        for input in ["true", "1", "t", "T", "TRUE", "True"] {
            assert!(TypedValue::new(input).as_bool().unwrap(), "{input}");
        }
        for input in ["false", "0", "f", "F", "FALSE", "False"] {
            assert!(!TypedValue::new(input).as_bool().unwrap(), "{input}");
        }
    }

    #[test]
    fn bool_rejects_other_text() {
        for input in ["2", "yes", "tRuE"] {
            let err = TypedValue::new(input).as_bool().unwrap_err();
            assert!(matches!(err, Error::ParseFailure { target: "bool", .. }));
        }
        assert!(matches!(TypedValue::new("").as_bool(), Err(Error::EmptyValue)));
    }

    #[test]
    fn float_parsing() {
        assert_eq!(TypedValue::new("3.25").as_float().unwrap(), 3.25);
        assert_eq!(TypedValue::new("1e3").as_float().unwrap(), 1000.0);
        assert!(TypedValue::new("-inf").as_float().unwrap().is_infinite());
        assert!(TypedValue::new("NaN").as_float().unwrap().is_nan());
        assert!(matches!(TypedValue::new("").as_float(), Err(Error::EmptyValue)));
        assert!(matches!(
            TypedValue::new("abc").as_float(),
            Err(Error::ParseFailure { .. })
        ));
        assert!(matches!(
            TypedValue::new("1e400").as_float(),
            Err(Error::Overflow { .. })
        ));
    }

    #[test]
    fn string_and_bytes_never_fail_on_content() {
        let empty = TypedValue::new("");
        assert_eq!(empty.as_string().unwrap(), "");
        assert!(empty.as_bytes().unwrap().is_empty());

        let binary = TypedValue::new(vec![b'o', b'k', 0xff]);
        assert_eq!(binary.as_string().unwrap(), "ok\u{fffd}");
        assert_eq!(&binary.as_bytes().unwrap()[..], &[b'o', b'k', 0xff]);
    }

    #[test]
    fn carried_error_wins_over_payload() {
        let value = TypedValue::from_error(Error::backend("connection reset"));
        assert!(matches!(value.as_int(), Err(Error::Backend(_))));
        assert!(matches!(value.as_string(), Err(Error::Backend(_))));
        assert!(matches!(value.as_bytes(), Err(Error::Backend(_))));
        assert!(matches!(value.as_bool(), Err(Error::Backend(_))));
        assert!(matches!(value.as_float(), Err(Error::Backend(_))));
        let mut user = User::default();
        assert!(matches!(value.scan_into(&mut user), Err(Error::Backend(_))));
        assert!(value.error().is_some());
        assert!(!value.is_not_found());
    }

    #[test]
    fn not_found_is_distinguishable() {
        let value = TypedValue::not_found("missing");
        assert!(value.is_not_found());
        match value.error() {
            Some(Error::KeyNotFound { key }) => assert_eq!(key, "missing"),
            other => panic!("expected KeyNotFound, got {:?}", other),
        }
        assert!(value.into_result().unwrap_err().is_key_not_found());
    }

    #[test]
    fn text_scalars_roundtrip_through_input() {
        use kvlayer_core::Input;

        for s in ["", "Alice", "héllo wörld", "42"] {
            let bytes = Input::from(s).to_bytes().unwrap();
            assert_eq!(TypedValue::new(bytes).as_string().unwrap(), s);
        }
        for b in [true, false] {
            let bytes = Input::from(b.to_string()).to_bytes().unwrap();
            assert_eq!(TypedValue::new(bytes).as_bool().unwrap(), b);
        }
    }

    #[test]
    fn scan_into_record() {
        let value = TypedValue::new(r#"{"name":"John","age":30}"#);
        let registry = Registry::new();
        let mut user = User::default();
        value.scan_into_with(&registry, &mut user).unwrap();
        assert_eq!(
            user,
            User {
                name: "John".into(),
                age: 30
            }
        );

        let user: User = value.scan().unwrap();
        assert_eq!(user.age, 30);
    }

    #[test]
    fn scan_into_rejects_non_json() {
        let value = TypedValue::new("Alice");
        let err = value.scan::<User>().unwrap_err();
        assert!(matches!(err, Error::MalformedPayload { .. }));
    }
}
