//! Per-element record creation for top-level arrays.
//!
//! An [`ArraySchema`] drives an element [`ObjectSchema`] over every element
//! of a JSON array.  Each time the tokenizer enters an element, a fresh
//! target is created with the `materialize` constructor; once the element's
//! object has been fully read, the target is handed to `commit`, which moves
//! it into the caller's model.
//!
//! An element that fails its schema is never committed.

use crate::schema::{ObjectSchema, ObjectSeed, ParseError, Rejection, SchemaViolation, Session, ValueKind};
use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use std::fmt;

/// Moves a completed element into the parse context.
pub type Commit<T, C> = fn(T, &mut C) -> Result<(), Rejection>;

/// Schema for a top-level array of objects.
pub struct ArraySchema<T, C> {
    element: ObjectSchema<T, C>,
    materialize: fn() -> T,
    commit: Commit<T, C>,
}

impl<T, C> fmt::Debug for ArraySchema<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArraySchema")
            .field("element", &self.element)
            .finish_non_exhaustive()
    }
}

impl<T, C> ArraySchema<T, C> {
    pub fn new(element: ObjectSchema<T, C>, materialize: fn() -> T, commit: Commit<T, C>) -> Self {
        Self {
            element,
            materialize,
            commit,
        }
    }

    /// The schema applied to each element.
    pub fn element(&self) -> &ObjectSchema<T, C> {
        &self.element
    }

    /// Parse `input`, committing each element into `ctx` as soon as it is
    /// complete.
    ///
    /// Returns the number of committed elements.  On error, elements before
    /// the failing one have already been committed; discarding them is up to
    /// the caller.
    pub fn parse(&self, input: &str, ctx: &mut C) -> Result<usize, ParseError> {
        let mut session = Session::new(ctx);
        let mut de = serde_json::Deserializer::from_str(input);
        let seed = ArraySeed {
            schema: self,
            session: &mut session,
        };
        match seed.deserialize(&mut de).and_then(|count| de.end().map(|()| count)) {
            Ok(count) => Ok(count),
            Err(e) => Err(session.into_error(e)),
        }
    }
}

//  Driving

struct ArraySeed<'a, 's, T, C> {
    schema: &'a ArraySchema<T, C>,
    session: &'a mut Session<'s, C>,
}

impl<T, C> ArraySeed<'_, '_, T, C> {
    fn mismatch<E: de::Error>(self, found: ValueKind) -> E {
        self.session.violation(SchemaViolation::NotAnArray { found })
    }
}

impl<'de, T, C> DeserializeSeed<'de> for ArraySeed<'_, '_, T, C> {
    type Value = usize;

    fn deserialize<D>(self, deserializer: D) -> Result<usize, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de, T, C> Visitor<'de> for ArraySeed<'_, '_, T, C> {
    type Value = usize;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an array of objects")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<usize, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let ArraySeed { schema, session } = self;
        let mut count = 0;
        loop {
            session.element = Some(count);
            let element = ElementSeed {
                schema,
                session: &mut *session,
            };
            let Some(target) = seq.next_element_seed(element)? else {
                break;
            };
            (schema.commit)(target, &mut *session.ctx)
                .map_err(|r| session.rejection::<A::Error>(None, r))?;
            count += 1;
        }
        session.element = None;
        Ok(count)
    }

    fn visit_map<A>(self, _: A) -> Result<usize, A::Error>
    where
        A: MapAccess<'de>,
    {
        Err(self.mismatch(ValueKind::Object))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<usize, E> {
        Err(self.mismatch(ValueKind::Boolean))
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<usize, E> {
        Err(self.mismatch(ValueKind::Integer))
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<usize, E> {
        Err(self.mismatch(ValueKind::Integer))
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<usize, E> {
        Err(self.mismatch(ValueKind::Float))
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<usize, E> {
        Err(self.mismatch(ValueKind::String))
    }

    fn visit_unit<E: de::Error>(self) -> Result<usize, E> {
        Err(self.mismatch(ValueKind::Null))
    }
}

/// Creates the target for one element, then fills it.
struct ElementSeed<'a, 's, T, C> {
    schema: &'a ArraySchema<T, C>,
    session: &'a mut Session<'s, C>,
}

impl<'de, T, C> DeserializeSeed<'de> for ElementSeed<'_, '_, T, C> {
    type Value = T;

    fn deserialize<D>(self, deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut target = (self.schema.materialize)();
        ObjectSeed::new(&self.schema.element, &mut target, self.session, None)
            .deserialize(deserializer)?;
        Ok(target)
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: i32,
        on: bool,
    }

    fn blank() -> Item {
        Item { id: -1, on: false }
    }

    fn keep(item: Item, out: &mut Vec<Item>) -> Result<(), Rejection> {
        if item.id == 13 {
            return Err(Rejection::Invalid("unlucky".into()));
        }
        out.push(item);
        Ok(())
    }

    fn schema() -> ArraySchema<Item, Vec<Item>> {
        let element = ObjectSchema::<Item, Vec<Item>>::new()
            .bind_field("id", Field::Integer(|i: &mut Item, v| i.id = v))
            .bind_field("on", Field::Boolean(|i: &mut Item, v| i.on = v));
        ArraySchema::new(element, blank, keep)
    }

    #[test]
    fn each_element_gets_a_fresh_target() {
        let mut out = Vec::new();
        let count = schema()
            .parse(r#"[{"id": 1, "on": true}, {}, {"id": 3}]"#, &mut out)
            .unwrap();
        assert_eq!(count, 3);
        assert_eq!(
            out,
            [
                Item { id: 1, on: true },
                Item { id: -1, on: false },
                Item { id: 3, on: false },
            ]
        );
    }

    #[test]
    fn empty_array() {
        let mut out = Vec::new();
        assert_eq!(schema().parse("[]", &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn top_level_must_be_an_array() {
        let mut out = Vec::new();
        let err = schema().parse(r#"{"id": 1}"#, &mut out).unwrap_err();
        match err {
            ParseError::Schema { element, violation } => {
                assert_eq!(element, None);
                assert_eq!(
                    violation,
                    SchemaViolation::NotAnArray {
                        found: ValueKind::Object
                    }
                );
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn elements_must_be_objects() {
        let mut out = Vec::new();
        let err = schema().parse(r#"[{"id": 1}, 2]"#, &mut out).unwrap_err();
        match err {
            ParseError::Schema { element, violation } => {
                assert_eq!(element, Some(1));
                assert_eq!(
                    violation,
                    SchemaViolation::NotAnObject {
                        found: ValueKind::Integer
                    }
                );
            }
            other => panic!("unexpected error: {}", other),
        }
        // The first element was committed before the failure.
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn commit_rejection_is_reported_for_the_element() {
        let mut out = Vec::new();
        let err = schema()
            .parse(r#"[{"id": 1}, {"id": 13}, {"id": 2}]"#, &mut out)
            .unwrap_err();
        assert_eq!(err.to_string(), "schema violation in element 1: element rejected: unlucky");
        assert_eq!(out, [Item { id: 1, on: false }]);
    }

    fn exhausted(_: Item, _: &mut Vec<Item>) -> Result<(), Rejection> {
        let err = Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err();
        Err(Rejection::Allocation(err))
    }

    #[test]
    fn allocation_failure_in_commit_is_fatal() {
        let element = ObjectSchema::<Item, Vec<Item>>::new()
            .bind_field("id", Field::Integer(|i: &mut Item, v| i.id = v));
        let schema = ArraySchema::new(element, blank, exhausted);
        let mut out = Vec::new();
        let err = schema.parse(r#"[{"id": 1}, {"id": 2}]"#, &mut out).unwrap_err();
        assert!(matches!(err, ParseError::Allocation(_)));
        assert!(err.is_fatal());
        assert!(err.violation().is_none());
        assert!(out.is_empty());
    }

    #[test]
    fn failing_element_is_not_committed() {
        let mut out = Vec::new();
        let err = schema()
            .parse(r#"[{"id": 1}, {"id": 2, "on": "yes"}]"#, &mut out)
            .unwrap_err();
        assert!(matches!(err, ParseError::Schema { element: Some(1), .. }));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn syntax_errors_are_malformed() {
        let mut out = Vec::new();
        assert!(matches!(
            schema().parse(r#"[{"id": 1},"#, &mut out),
            Err(ParseError::Malformed(_))
        ));
        assert!(matches!(
            schema().parse("[] []", &mut out),
            Err(ParseError::Malformed(_))
        ));
        assert!(matches!(
            schema().parse("", &mut out),
            Err(ParseError::Malformed(_))
        ));
    }

    #[test]
    fn schema_reused_across_parses() {
        let schema = schema();
        let mut first = Vec::new();
        let mut second = Vec::new();
        schema.parse(r#"[{"id": 5}]"#, &mut first).unwrap();
        schema.parse(r#"[{"id": 6}, {"id": 7}]"#, &mut second).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
    }
}
