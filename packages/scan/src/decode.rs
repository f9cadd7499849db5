//! Decoding a JSON object payload into a registered record type.

use kvlayer_core::{Error, Result};
use serde_json::{Map, Value};

use crate::registry::Registry;
use crate::resolver::{FieldDescriptor, FieldSpec};

/// A record type that can be populated field-by-field from a payload.
///
/// Implemented by the [`scannable!`](crate::scannable) macro; hand-written
/// impls must keep `fields()` and `set_field` in agreement on indices.
pub trait Scan: 'static {
    /// Name used in error messages and logs.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Declared fields, in declaration order.
    fn fields() -> &'static [FieldSpec];

    /// Coerce `value` into the field at `index` and store it.
    ///
    /// Returns `InvalidDestination` if no field exists at `index`.
    fn set_field(&mut self, index: usize, value: &Value, registry: &Registry) -> Result<()>;
}

/// A destination field type and its coercion from a JSON value.
///
/// Implemented for strings, bools, numbers, `Vec`, `Option` and every
/// record that is `Scan + Default`.
pub trait FieldValue: Sized {
    fn from_json(value: &Value, registry: &Registry) -> Result<Self>;
}

/// Decode `payload` into `dest` using the process-wide registry.
pub fn decode<T: Scan>(payload: &[u8], dest: &mut T) -> Result<()> {
    decode_with(Registry::global(), payload, dest)
}

/// Decode `payload` into `dest`.
///
/// Fields are visited in declaration order. A field whose name is absent
/// from the payload, or whose value is `null`, keeps its current value.
/// The first field that fails to coerce aborts the decode; fields set
/// before it stay set.
///
/// # Errors
///
/// - `DuplicateField` if `T` has ambiguous field names.
/// - `MalformedPayload` if `payload` is not a JSON object.
/// - `TypeMismatch` / `Overflow` from field coercion, tagged with the
///   offending field's name.
pub fn decode_with<T: Scan>(registry: &Registry, payload: &[u8], dest: &mut T) -> Result<()> {
    let fields = registry.fields::<T>()?;

    let document: Value = serde_json::from_slice(payload)
        .map_err(|e| Error::malformed_json("failed to unmarshal JSON", e))?;
    let object = match document {
        Value::Object(object) => object,
        other => {
            return Err(Error::malformed(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    decode_object(registry, &fields, &object, dest)
}

fn decode_object<T: Scan>(
    registry: &Registry,
    fields: &[FieldDescriptor],
    object: &Map<String, Value>,
    dest: &mut T,
) -> Result<()> {
    for field in fields {
        let Some(value) = field.lookup(object) else {
            continue;
        };
        if value.is_null() {
            continue;
        }

        dest.set_field(field.index, value, registry)
            .map_err(|e| e.in_field(&field.canonical_name))?;
    }

    Ok(())
}

/// Decode a nested object into a fresh `T`.
///
/// Backs the `FieldValue` impl every `Scan + Default` record gets, so
/// records can nest inside other records and `Vec`s.
pub fn nested<T: Scan + Default>(value: &Value, registry: &Registry) -> Result<T> {
    match value {
        Value::Object(object) => {
            let fields = registry.fields::<T>()?;
            let mut record = T::default();
            decode_object(registry, &fields, object, &mut record)?;
            Ok(record)
        }
        other => Err(Error::type_mismatch("object", json_kind(other))),
    }
}

/// Short name of a JSON value's kind.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl FieldValue for String {
    fn from_json(value: &Value, _registry: &Registry) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(Error::type_mismatch("string", json_kind(other))),
        }
    }
}

impl FieldValue for bool {
    fn from_json(value: &Value, _registry: &Registry) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(Error::type_mismatch("bool", json_kind(other))),
        }
    }
}

// JSON numbers arrive as i64, u64 or f64. A float is truncated toward zero
// (`30.7` becomes 30, `-12.7` becomes -12). Anything that does not fit the
// destination width after truncation is Overflow.
macro_rules! impl_field_value_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn from_json(value: &Value, _registry: &Registry) -> Result<Self> {
                    let Value::Number(n) = value else {
                        return Err(Error::type_mismatch("number", json_kind(value)));
                    };
                    let target = stringify!($ty);
                    if let Some(i) = n.as_i64() {
                        return <$ty>::try_from(i).map_err(|_| Error::overflow(target, i));
                    }
                    if let Some(u) = n.as_u64() {
                        return <$ty>::try_from(u).map_err(|_| Error::overflow(target, u));
                    }
                    let f = n.as_f64().unwrap_or(f64::NAN);
                    truncated_float(f)
                        .and_then(|i| <$ty>::try_from(i).ok())
                        .ok_or_else(|| Error::overflow(target, f))
                }
            }
        )*
    };
}

impl_field_value_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

fn truncated_float(f: f64) -> Option<i128> {
    // i128 covers the whole u64 and i64 range; anything beyond overflows.
    // NaN fails the range check.
    const LIMIT: f64 = 1.8446744073709552e19;
    if (-LIMIT..=LIMIT).contains(&f) {
        Some(f.trunc() as i128)
    } else {
        None
    }
}

impl FieldValue for f64 {
    fn from_json(value: &Value, _registry: &Registry) -> Result<Self> {
        match value {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| Error::overflow("f64", n)),
            other => Err(Error::type_mismatch("number", json_kind(other))),
        }
    }
}

impl FieldValue for f32 {
    fn from_json(value: &Value, registry: &Registry) -> Result<Self> {
        let wide = f64::from_json(value, registry)?;
        let narrow = wide as f32;
        if wide.is_finite() && narrow.is_infinite() {
            return Err(Error::overflow("f32", wide));
        }
        Ok(narrow)
    }
}

// A `null` element becomes the element type's zero value, so the list keeps
// its length and positions.
impl<T: FieldValue + Default> FieldValue for Vec<T> {
    fn from_json(value: &Value, registry: &Registry) -> Result<Self> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Null => Ok(T::default()),
                    item => T::from_json(item, registry),
                })
                .collect(),
            other => Err(Error::type_mismatch("array", json_kind(other))),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn from_json(value: &Value, registry: &Registry) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_json(other, registry).map(Some),
        }
    }
}

impl<T: Scan + Default> FieldValue for T {
    fn from_json(value: &Value, registry: &Registry) -> Result<Self> {
        nested(value, registry)
    }
}
