//! The `scannable!` registration macro.

/// Declare a record type and register its fields for decoding.
///
/// Wraps an ordinary struct definition. Each field may carry one
/// `#[kv = "name"]` attribute naming its source key; text after a `,` in
/// the tag is accepted and ignored. Untagged fields are matched by their
/// own name and its case variants.
///
/// The macro implements [`Scan`](crate::Scan) for the struct, so it can be
/// decoded in place with [`decode`](crate::decode). Records that also
/// implement `Default` get [`FieldValue`](crate::FieldValue) and can nest
/// inside other records or `Vec`s.
///
/// Other field attributes, doc comments included, are kept on the
/// generated struct. The `#[kv]` tag is consumed by the macro.
///
/// # Example
///
/// ```rust
/// use kvlayer_scan::scannable;
///
/// scannable! {
///     #[derive(Debug, Default)]
///     pub struct Address {
///         /// First line of the address.
///         #[kv = "street,omitempty"]
///         pub street: String,
///         pub city: String,
///     }
/// }
/// ```
#[macro_export]
macro_rules! scannable {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$($fattr:tt)*])*
                $fvis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $crate::__kv_struct! {
            [$(#[$meta])* $vis struct $name]
            []
            $( [$(#[$($fattr)*])*] [] { $fvis $field : $ty } )*
        }

        impl $crate::Scan for $name {
            fn fields() -> &'static [$crate::FieldSpec] {
                const FIELDS: &[$crate::FieldSpec] = &[
                    $(
                        $crate::FieldSpec::new(
                            stringify!($field),
                            $crate::__kv_tag!($(#[$($fattr)*])*),
                        ),
                    )*
                ];
                FIELDS
            }

            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn set_field(
                &mut self,
                index: usize,
                value: &$crate::serde_json::Value,
                registry: &$crate::Registry,
            ) -> $crate::Result<()> {
                let mut position = 0usize;
                $(
                    if position == index {
                        self.$field = <$ty as $crate::FieldValue>::from_json(value, registry)?;
                        return Ok(());
                    }
                    position += 1;
                )*
                Err($crate::Error::InvalidDestination {
                    message: format!(
                        "{} has no field at index {}",
                        <Self as $crate::Scan>::type_name(),
                        index
                    ),
                })
            }
        }
    };
}

// Builds the struct one field at a time. Each pending field is
// `[attributes still to sort] [attributes kept] { vis name : type }`.
#[doc(hidden)]
#[macro_export]
macro_rules! __kv_struct {
    ([$($head:tt)*] [$($done:tt)*]) => {
        $($head)* {
            $($done)*
        }
    };
    (
        [$($head:tt)*] [$($done:tt)*]
        [#[kv = $tag:literal] $($attrs:tt)*] [$($kept:tt)*] { $($field:tt)* }
        $($rest:tt)*
    ) => {
        $crate::__kv_struct! {
            [$($head)*] [$($done)*]
            [$($attrs)*] [$($kept)*] { $($field)* }
            $($rest)*
        }
    };
    (
        [$($head:tt)*] [$($done:tt)*]
        [#[$($attr:tt)*] $($attrs:tt)*] [$($kept:tt)*] { $($field:tt)* }
        $($rest:tt)*
    ) => {
        $crate::__kv_struct! {
            [$($head)*] [$($done)*]
            [$($attrs)*] [$($kept)* #[$($attr)*]] { $($field)* }
            $($rest)*
        }
    };
    (
        [$($head:tt)*] [$($done:tt)*]
        [] [$($kept:tt)*] { $fvis:vis $field:ident : $ty:ty }
        $($rest:tt)*
    ) => {
        $crate::__kv_struct! {
            [$($head)*] [$($done)* $($kept)* $fvis $field : $ty,]
            $($rest)*
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __kv_tag {
    () => {
        ::core::option::Option::None
    };
    (#[kv = $tag:literal] $($rest:tt)*) => {
        ::core::option::Option::Some($tag)
    };
    (#[$($attr:tt)*] $($rest:tt)*) => {
        $crate::__kv_tag!($($rest)*)
    };
}
