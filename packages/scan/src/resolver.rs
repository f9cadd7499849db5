//! Field descriptors: every source name a destination field answers to.

use kvlayer_core::{Error, Result};

use crate::naming::{to_camel_case, to_pascal_case, to_snake_case};

/// A field as declared on a record type.
///
/// `tag` is the raw explicit tag, including any `,option` suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub tag: Option<&'static str>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, tag: Option<&'static str>) -> Self {
        Self { name, tag }
    }
}

/// Resolved naming metadata for one destination field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Position of the field in declaration order.
    pub index: usize,
    /// The tag name (without options) or the field's own name.
    pub canonical_name: String,
    pub lower_name: String,
    pub snake_name: String,
    pub pascal_name: String,
    pub camel_name: String,
    pub has_explicit_tag: bool,
}

impl FieldDescriptor {
    fn from_spec(index: usize, spec: &FieldSpec) -> Self {
        let (canonical_name, has_explicit_tag) = match spec.tag {
            // Text after the first ',' is reserved and has no effect.
            Some(tag) => (tag.split(',').next().unwrap_or("").to_string(), true),
            None => (spec.name.to_string(), false),
        };

        Self {
            index,
            canonical_name,
            lower_name: spec.name.to_lowercase(),
            snake_name: to_snake_case(spec.name),
            pascal_name: to_pascal_case(spec.name),
            camel_name: to_camel_case(spec.name),
            has_explicit_tag,
        }
    }

    /// Source names to look up, in priority order.
    ///
    /// A tagged field answers only to its tag. An empty tag name answers to
    /// nothing.
    pub fn candidates(&self) -> Vec<&str> {
        let names: Vec<&str> = if self.has_explicit_tag {
            vec![self.canonical_name.as_str()]
        } else {
            vec![
                self.canonical_name.as_str(),
                self.lower_name.as_str(),
                self.snake_name.as_str(),
                self.pascal_name.as_str(),
                self.camel_name.as_str(),
            ]
        };
        names.into_iter().filter(|n| !n.is_empty()).collect()
    }

    /// Find this field's value in a parsed object. First match wins.
    pub fn lookup<'a>(
        &self,
        object: &'a serde_json::Map<String, serde_json::Value>,
    ) -> Option<&'a serde_json::Value> {
        self.candidates()
            .into_iter()
            .find_map(|name| object.get(name))
    }

    fn collides_with(&self, other: &FieldDescriptor) -> bool {
        if self.canonical_name == other.canonical_name {
            return true;
        }
        !self.has_explicit_tag
            && !other.has_explicit_tag
            && (self.lower_name == other.lower_name
                || self.snake_name == other.snake_name
                || self.pascal_name == other.pascal_name
                || self.camel_name == other.camel_name)
    }
}

/// Build the descriptor list for a record type.
///
/// # Errors
///
/// `DuplicateField` if two fields share a canonical name, or if two untagged
/// fields share any derived spelling. This means the type definition itself
/// is ambiguous.
pub fn resolve_fields(type_name: &str, specs: &[FieldSpec]) -> Result<Vec<FieldDescriptor>> {
    let mut fields: Vec<FieldDescriptor> = Vec::with_capacity(specs.len());

    for (index, spec) in specs.iter().enumerate() {
        let descriptor = FieldDescriptor::from_spec(index, spec);

        if fields.iter().any(|existing| descriptor.collides_with(existing)) {
            return Err(Error::DuplicateField {
                type_name: type_name.to_string(),
                field: spec.name.to_string(),
            });
        }

        fields.push(descriptor);
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn untagged(name: &'static str) -> FieldSpec {
        FieldSpec::new(name, None)
    }

    fn tagged(name: &'static str, tag: &'static str) -> FieldSpec {
        FieldSpec::new(name, Some(tag))
    }

    #[test]
    fn untagged_field_gets_all_spellings() {
        let fields = resolve_fields("User", &[untagged("user_name")]).unwrap();
        let f = &fields[0];
        assert_eq!(f.index, 0);
        assert_eq!(f.canonical_name, "user_name");
        assert_eq!(f.lower_name, "user_name");
        assert_eq!(f.snake_name, "user_name");
        assert_eq!(f.pascal_name, "UserName");
        assert_eq!(f.camel_name, "userName");
        assert!(!f.has_explicit_tag);
    }

    #[test]
    fn tag_options_are_stripped() {
        let fields = resolve_fields("User", &[tagged("name", "username,omitempty")]).unwrap();
        assert_eq!(fields[0].canonical_name, "username");
        assert!(fields[0].has_explicit_tag);
        assert_eq!(fields[0].candidates(), vec!["username"]);
    }

    #[test]
    fn empty_tag_name_matches_nothing() {
        let fields = resolve_fields("User", &[tagged("name", ",omitempty")]).unwrap();
        assert_eq!(fields[0].canonical_name, "");
        assert!(fields[0].candidates().is_empty());
    }

    #[test]
    fn identical_tags_collide() {
        let err = resolve_fields("Dup", &[tagged("Name", "name"), tagged("NaMe", "name")])
            .unwrap_err();
        match err {
            Error::DuplicateField { type_name, field } => {
                assert_eq!(type_name, "Dup");
                assert_eq!(field, "NaMe");
            }
            other => panic!("expected DuplicateField, got {:?}", other),
        }
    }

    #[test]
    fn untagged_spellings_collide() {
        let result = resolve_fields("Dup", &[untagged("Name"), untagged("NaMe")]);
        assert!(matches!(result, Err(Error::DuplicateField { .. })));
    }

    #[test]
    fn snake_and_camel_variants_collide() {
        let result = resolve_fields("Dup", &[untagged("user_name"), untagged("userName")]);
        assert!(matches!(result, Err(Error::DuplicateField { .. })));
    }

    #[test]
    fn distinct_tags_allow_similar_field_names() {
        let fields =
            resolve_fields("Ok", &[tagged("Name", "first"), tagged("NaMe", "second")]).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].index, 1);
    }

    #[test]
    fn tagged_and_untagged_compare_only_canonical_names() {
        // `Name` (untagged) lowercases to `name`, but the tag is checked by
        // canonical name only.
        let fields = resolve_fields("Ok", &[tagged("label", "name"), untagged("Name")]).unwrap();
        assert_eq!(fields.len(), 2);

        let result = resolve_fields("Dup", &[tagged("label", "Name"), untagged("Name")]);
        assert!(matches!(result, Err(Error::DuplicateField { .. })));
    }

    #[test]
    fn candidates_are_tried_in_order() {
        let fields = resolve_fields("User", &[untagged("LastName")]).unwrap();
        assert_eq!(
            fields[0].candidates(),
            vec!["LastName", "lastname", "last_name", "Lastname", "lastname"]
        );
    }

    #[test]
    fn lookup_prefers_earlier_spelling() {
        let fields = resolve_fields("User", &[untagged("user_name")]).unwrap();
        let object = serde_json::json!({"userName": "camel", "user_name": "snake"});
        let found = fields[0].lookup(object.as_object().unwrap());
        assert_eq!(found, Some(&serde_json::json!("snake")));
    }
}
