//! Built-in extractors and the static table they are registered from.

use serde_json::Value;

use super::node_names;
use super::{ExtractorDefinition, ValueExtractor, ValueReceiver};
use crate::types::{ArrayKind, Primitive, RawType, TypeVariable, known};

// ─── Arrays ──────────────────────────────────────────────────────────────────

fn extract_array_elements(value: &Value, receiver: &mut dyn ValueReceiver) {
    if let Value::Array(elements) = value {
        for (index, element) in elements.iter().enumerate() {
            receiver.indexed_value(node_names::ARRAY_ELEMENT, index, element);
        }
    }
}

/// Declares an extractor for a primitive array type.
macro_rules! primitive_array_extractor {
    ($(#[$meta:meta])* $name:ident, $label:literal, $primitive:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl ValueExtractor for $name {
            fn name(&self) -> &str {
                $label
            }

            fn definition(&self) -> ExtractorDefinition {
                ExtractorDefinition::new(
                    RawType::array_of(RawType::Primitive(Primitive::$primitive)),
                    TypeVariable::ArrayElement(ArrayKind::Primitive(Primitive::$primitive)),
                )
            }

            fn extract(&self, value: &Value, receiver: &mut dyn ValueReceiver) {
                extract_array_elements(value, receiver);
            }
        }
    };
}

primitive_array_extractor!(
    /// Extracts the elements of `byte[]`.
    ByteArrayValueExtractor, "byte-array", Byte
);
primitive_array_extractor!(
    /// Extracts the elements of `short[]`.
    ShortArrayValueExtractor, "short-array", Short
);
primitive_array_extractor!(
    /// Extracts the elements of `int[]`.
    IntArrayValueExtractor, "int-array", Int
);
primitive_array_extractor!(
    /// Extracts the elements of `long[]`.
    LongArrayValueExtractor, "long-array", Long
);
primitive_array_extractor!(
    /// Extracts the elements of `float[]`.
    FloatArrayValueExtractor, "float-array", Float
);
primitive_array_extractor!(
    /// Extracts the elements of `double[]`.
    DoubleArrayValueExtractor, "double-array", Double
);
primitive_array_extractor!(
    /// Extracts the elements of `char[]`.
    CharArrayValueExtractor, "char-array", Char
);
primitive_array_extractor!(
    /// Extracts the elements of `boolean[]`.
    BooleanArrayValueExtractor, "boolean-array", Boolean
);

/// Extracts the elements of any reference array, `Object[]` and its
/// covariant subtypes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectArrayValueExtractor;

impl ValueExtractor for ObjectArrayValueExtractor {
    fn name(&self) -> &str {
        "object-array"
    }

    fn definition(&self) -> ExtractorDefinition {
        ExtractorDefinition::new(
            RawType::array_of(RawType::Class(known::OBJECT)),
            TypeVariable::ArrayElement(ArrayKind::Reference),
        )
    }

    fn extract(&self, value: &Value, receiver: &mut dyn ValueReceiver) {
        extract_array_elements(value, receiver);
    }
}

// ─── Collections ─────────────────────────────────────────────────────────────

/// Extracts `List<E>` elements with their index.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListValueExtractor;

impl ValueExtractor for ListValueExtractor {
    fn name(&self) -> &str {
        "list-value"
    }

    fn definition(&self) -> ExtractorDefinition {
        ExtractorDefinition::new(known::LIST, known::LIST_E)
    }

    fn extract(&self, value: &Value, receiver: &mut dyn ValueReceiver) {
        if let Value::Array(elements) = value {
            for (index, element) in elements.iter().enumerate() {
                receiver.indexed_value(node_names::LIST_ELEMENT, index, element);
            }
        }
    }
}

/// Extracts `Map<K, V>` values with their key.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapValueExtractor;

impl ValueExtractor for MapValueExtractor {
    fn name(&self) -> &str {
        "map-value"
    }

    fn definition(&self) -> ExtractorDefinition {
        ExtractorDefinition::new(known::MAP, known::MAP_V)
    }

    fn extract(&self, value: &Value, receiver: &mut dyn ValueReceiver) {
        if let Value::Object(entries) = value {
            for (key, element) in entries {
                receiver.keyed_value(node_names::MAP_VALUE, key, element);
            }
        }
    }
}

/// Extracts `Map<K, V>` keys. Each key is reported under itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapKeyExtractor;

impl ValueExtractor for MapKeyExtractor {
    fn name(&self) -> &str {
        "map-key"
    }

    fn definition(&self) -> ExtractorDefinition {
        ExtractorDefinition::new(known::MAP, known::MAP_K)
    }

    fn extract(&self, value: &Value, receiver: &mut dyn ValueReceiver) {
        if let Value::Object(entries) = value {
            for key in entries.keys() {
                receiver.keyed_value(node_names::MAP_KEY, key, &Value::String(key.clone()));
            }
        }
    }
}

/// Extracts `Iterable<T>` elements without position.
#[derive(Debug, Clone, Copy, Default)]
pub struct IterableValueExtractor;

impl ValueExtractor for IterableValueExtractor {
    fn name(&self) -> &str {
        "iterable-value"
    }

    fn definition(&self) -> ExtractorDefinition {
        ExtractorDefinition::new(known::ITERABLE, known::ITERABLE_T)
    }

    fn extract(&self, value: &Value, receiver: &mut dyn ValueReceiver) {
        if let Value::Array(elements) = value {
            for element in elements {
                receiver.iterable_value(node_names::ITERABLE_ELEMENT, element);
            }
        }
    }
}

// ─── Optionals ───────────────────────────────────────────────────────────────

/// Extracts the content of `Optional<T>`; an empty optional yields `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalValueExtractor;

impl ValueExtractor for OptionalValueExtractor {
    fn name(&self) -> &str {
        "optional-value"
    }

    fn definition(&self) -> ExtractorDefinition {
        ExtractorDefinition::new(known::OPTIONAL, known::OPTIONAL_T)
    }

    fn extract(&self, value: &Value, receiver: &mut dyn ValueReceiver) {
        receiver.value(node_names::OPTIONAL_VALUE, value);
    }
}

macro_rules! primitive_optional_extractor {
    ($(#[$meta:meta])* $name:ident, $label:literal, $container:expr, $extracted:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl ValueExtractor for $name {
            fn name(&self) -> &str {
                $label
            }

            fn definition(&self) -> ExtractorDefinition {
                ExtractorDefinition::new($container, TypeVariable::AnnotatedObject)
                    .unwrap_by_default(true)
                    .extracted_type($extracted)
            }

            fn extract(&self, value: &Value, receiver: &mut dyn ValueReceiver) {
                receiver.value(node_names::OPTIONAL_VALUE, value);
            }
        }
    };
}

primitive_optional_extractor!(
    /// Unwraps `OptionalInt` to an `Integer`.
    OptionalIntValueExtractor, "optional-int", known::OPTIONAL_INT, known::INTEGER
);
primitive_optional_extractor!(
    /// Unwraps `OptionalDouble` to a `Double`.
    OptionalDoubleValueExtractor, "optional-double", known::OPTIONAL_DOUBLE, known::DOUBLE
);
primitive_optional_extractor!(
    /// Unwraps `OptionalLong` to a `Long`.
    OptionalLongValueExtractor, "optional-long", known::OPTIONAL_LONG, known::LONG
);

// ─── Table ───────────────────────────────────────────────────────────────────

/// Every built-in extractor, in registration order.
pub static BUILTIN_EXTRACTORS: &[&dyn ValueExtractor] = &[
    &ByteArrayValueExtractor,
    &ShortArrayValueExtractor,
    &IntArrayValueExtractor,
    &LongArrayValueExtractor,
    &FloatArrayValueExtractor,
    &DoubleArrayValueExtractor,
    &CharArrayValueExtractor,
    &BooleanArrayValueExtractor,
    &ObjectArrayValueExtractor,
    &ListValueExtractor,
    &MapValueExtractor,
    &MapKeyExtractor,
    &IterableValueExtractor,
    &OptionalValueExtractor,
    &OptionalIntValueExtractor,
    &OptionalDoubleValueExtractor,
    &OptionalLongValueExtractor,
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;
    use crate::extraction::{CollectingReceiver, ElementLocation};

    #[test]
    fn test_table_names_are_unique() {
        let names: HashSet<&str> = BUILTIN_EXTRACTORS.iter().map(|e| e.name()).collect();
        assert_eq!(names.len(), BUILTIN_EXTRACTORS.len());
        assert_eq!(BUILTIN_EXTRACTORS.len(), 17);
    }

    #[test]
    fn test_list_extraction() {
        let mut receiver = CollectingReceiver::default();
        ListValueExtractor.extract(&json!(["a", "b"]), &mut receiver);

        let elements = receiver.elements();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[1].node_name, "<list element>");
        assert_eq!(elements[1].location, ElementLocation::Index(1));
        assert_eq!(elements[1].value, json!("b"));
    }

    #[test]
    fn test_map_extraction() {
        let map = json!({ "one": 1, "two": 2 });

        let mut values = CollectingReceiver::default();
        MapValueExtractor.extract(&map, &mut values);
        assert!(values.elements().iter().any(|e| {
            e.location == ElementLocation::Key("two".into()) && e.value == json!(2)
        }));

        let mut keys = CollectingReceiver::default();
        MapKeyExtractor.extract(&map, &mut keys);
        assert!(keys.elements().iter().all(|e| e.node_name == "<map key>"));
        assert!(keys.elements().iter().any(|e| e.value == json!("one")));
    }

    #[test]
    fn test_optional_extraction() {
        let mut receiver = CollectingReceiver::default();
        OptionalValueExtractor.extract(&Value::Null, &mut receiver);
        assert_eq!(receiver.elements()[0].location, ElementLocation::Value);
        assert_eq!(receiver.elements()[0].value, Value::Null);
    }

    #[test]
    fn test_primitive_optional_definition() {
        let definition = OptionalIntValueExtractor.definition();
        assert!(definition.unwrap_by_default);
        assert_eq!(definition.extracted, TypeVariable::AnnotatedObject);
        assert_eq!(definition.extracted_type, Some(RawType::Class(known::INTEGER)));
    }

    #[test]
    fn test_wrong_shape_is_ignored() {
        let mut receiver = CollectingReceiver::default();
        IntArrayValueExtractor.extract(&json!({ "a": 1 }), &mut receiver);
        IterableValueExtractor.extract(&json!(3), &mut receiver);
        assert!(receiver.elements().is_empty());
    }
}
