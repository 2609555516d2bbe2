//! Declarative JSON field binding.
//!
//! An [`ObjectSchema`] is a table from JSON object keys to actions on a
//! target record of type `T`:
//!
//! * [`bind_field`](ObjectSchema::bind_field) writes an integer or boolean
//!   straight into a field through a typed setter.
//! * [`bind_callback`](ObjectSchema::bind_callback) hands the value to a
//!   handler that also receives a caller-supplied context `C` (for lookups,
//!   list insertion, derived values, …).
//! * [`bind_nested`](ObjectSchema::bind_nested) descends into a nested object
//!   whose target is a field of the current record.
//!
//! Schemas are built once and then reused for every parse; only the target
//! changes.  The tokenizer is `serde_json`: the schema is driven through
//! serde's [`Visitor`] callbacks, so values are dispatched as they are read
//! and no intermediate document is built.
//!
//! # Example
//!
//! ```
//! use wsbar::schema::{Field, ObjectSchema};
//!
//! #[derive(Default)]
//! struct Point { x: i32, y: i32 }
//!
//! let schema = ObjectSchema::<Point, ()>::new()
//!     .bind_field("x", Field::Integer(|p: &mut Point, v| p.x = v))
//!     .bind_field("y", Field::Integer(|p: &mut Point, v| p.y = v));
//!
//! let mut p = Point::default();
//! schema.apply(r#"{"x": 3, "y": -4}"#, &mut p, &mut ()).unwrap();
//! assert_eq!((p.x, p.y), (3, -4));
//! ```

use log::trace;
use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::error::Category;
use std::collections::{HashMap, TryReserveError};
use std::fmt;

//  Values

/// The kind of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Array,
    Object,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Null => write!(f, "null"),
            ValueKind::Boolean => write!(f, "boolean"),
            ValueKind::Integer => write!(f, "integer"),
            ValueKind::Float => write!(f, "float"),
            ValueKind::String => write!(f, "string"),
            ValueKind::Array => write!(f, "array"),
            ValueKind::Object => write!(f, "object"),
        }
    }
}

/// A value read for a bound key.
///
/// Scalars are kept; arrays and objects are skipped over and only their
/// kind is recorded, since a scalar binding can only ever reject them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i128),
    Float(f64),
    String(String),
    Array,
    Object,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Array => ValueKind::Array,
            Value::Object => ValueKind::Object,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = Value;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "any JSON value")
            }
            fn visit_bool<E>(self, b: bool) -> Result<Value, E> {
                Ok(Value::Boolean(b))
            }
            fn visit_i64<E>(self, n: i64) -> Result<Value, E> {
                Ok(Value::Integer(n.into()))
            }
            fn visit_u64<E>(self, n: u64) -> Result<Value, E> {
                Ok(Value::Integer(n.into()))
            }
            fn visit_f64<E>(self, n: f64) -> Result<Value, E> {
                Ok(Value::Float(n))
            }
            fn visit_str<E>(self, s: &str) -> Result<Value, E> {
                Ok(Value::String(s.to_string()))
            }
            fn visit_string<E>(self, s: String) -> Result<Value, E> {
                Ok(Value::String(s))
            }
            fn visit_unit<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }
            fn visit_none<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }
            fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(Value::Array)
            }
            fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(Value::Object)
            }
        }
        deserializer.deserialize_any(V)
    }
}

//  Errors

/// Why a handler, setter, or commit step refused a value.
#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    #[error("integer {0} does not fit the field")]
    OutOfRange(i128),
    #[error("{0}")]
    Invalid(String),
    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),
}

/// A payload that is valid JSON but does not match the schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaViolation {
    #[error("expected a top-level array, found {found}")]
    NotAnArray { found: ValueKind },
    #[error("expected an object, found {found}")]
    NotAnObject { found: ValueKind },
    #[error("key `{key}` expects {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("required key `{key}` is missing")]
    MissingKey { key: &'static str },
    #[error("value for `{key}` rejected: {reason}")]
    Rejected { key: String, reason: String },
    #[error("element rejected: {reason}")]
    ElementRejected { reason: String },
    #[error("{0}")]
    Invalid(String),
}

/// Error from parsing a payload against a schema.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The text is not well-formed JSON.
    #[error("malformed payload: {0}")]
    Malformed(#[source] serde_json::Error),
    /// The JSON does not match the schema.  `element` is the index of the
    /// top-level array element being parsed, if any.
    #[error("schema violation{}: {violation}", element_suffix(.element))]
    Schema {
        element: Option<usize>,
        violation: SchemaViolation,
    },
    /// Memory for the model could not be reserved.
    #[error("allocation failed while building the model: {0}")]
    Allocation(TryReserveError),
}

impl ParseError {
    /// Whether the process should stop rather than wait for the next payload.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ParseError::Allocation(_))
    }

    /// The schema violation behind this error, if that is what it is.
    pub fn violation(&self) -> Option<&SchemaViolation> {
        match self {
            ParseError::Schema { violation, .. } => Some(violation),
            _ => None,
        }
    }
}

fn element_suffix(element: &Option<usize>) -> String {
    element
        .map(|i| format!(" in element {}", i))
        .unwrap_or_default()
}

//  Bindings

/// Typed setter for a scalar field.
pub enum Field<T> {
    Integer(fn(&mut T, i32)),
    Boolean(fn(&mut T, bool)),
}

impl<T> Field<T> {
    /// The JSON value kind this field accepts.
    pub fn kind(&self) -> ValueKind {
        match self {
            Field::Integer(_) => ValueKind::Integer,
            Field::Boolean(_) => ValueKind::Boolean,
        }
    }
}

/// Callback run for a key bound with [`ObjectSchema::bind_callback`].
pub type Handler<T, C> = fn(&mut T, &Value, &mut C) -> Result<(), Rejection>;

type Writer<T, C> = Box<dyn Fn(&mut T, &Value, &mut C) -> Result<(), Rejection>>;

enum Action<T, C> {
    Write(Writer<T, C>),
    Nested(ObjectSchema<T, C>),
}

struct Binding<T, C> {
    kind: ValueKind,
    action: Action<T, C>,
}

/// Key-to-action table for one JSON object level.
pub struct ObjectSchema<T, C> {
    bindings: HashMap<&'static str, Binding<T, C>>,
    required: Vec<&'static str>,
}

impl<T, C> fmt::Debug for ObjectSchema<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.bindings.keys().copied().collect();
        keys.sort_unstable();
        f.debug_struct("ObjectSchema")
            .field("keys", &keys)
            .field("required", &self.required)
            .finish()
    }
}

impl<T: 'static, C: 'static> Default for ObjectSchema<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static, C: 'static> ObjectSchema<T, C> {
    /// An empty schema: every key is ignored.
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            required: Vec::new(),
        }
    }

    /// Write the value of `key` into a scalar field of the target.
    ///
    /// The JSON value must be of the kind the setter takes; integers must
    /// also fit in an `i32`.
    ///
    /// # Panics
    ///
    /// If `key` is already bound.
    pub fn bind_field(self, key: &'static str, field: Field<T>) -> Self {
        let kind = field.kind();
        let write: Writer<T, C> = match field {
            Field::Integer(set) => Box::new(
                move |target: &mut T, value: &Value, _: &mut C| -> Result<(), Rejection> {
                    if let Value::Integer(n) = *value {
                        set(target, i32::try_from(n).map_err(|_| Rejection::OutOfRange(n))?);
                    }
                    Ok(())
                },
            ),
            Field::Boolean(set) => Box::new(
                move |target: &mut T, value: &Value, _: &mut C| -> Result<(), Rejection> {
                    if let Value::Boolean(b) = *value {
                        set(target, b);
                    }
                    Ok(())
                },
            ),
        };
        self.insert(key, kind, Action::Write(write))
    }

    /// Call `handler` with the target, the value, and the parse context when
    /// `key` is seen with a value of `kind`.
    ///
    /// # Panics
    ///
    /// If `key` is already bound.
    pub fn bind_callback(self, key: &'static str, kind: ValueKind, handler: Handler<T, C>) -> Self {
        self.insert(key, kind, Action::Write(Box::new(handler)))
    }

    /// Parse the object under `key` with `child`, targeting the field of the
    /// current record that `project` returns.
    ///
    /// # Panics
    ///
    /// If `key` is already bound.
    pub fn bind_nested<U: 'static>(
        self,
        key: &'static str,
        child: ObjectSchema<U, C>,
        project: fn(&mut T) -> &mut U,
    ) -> Self {
        self.insert(key, ValueKind::Object, Action::Nested(child.project(project)))
    }

    /// Make `key` mandatory: an object without it fails with
    /// [`SchemaViolation::MissingKey`].
    ///
    /// # Panics
    ///
    /// If `key` has not been bound.
    pub fn require(mut self, key: &'static str) -> Self {
        assert!(
            self.bindings.contains_key(key),
            "cannot require unbound key {:?}",
            key
        );
        if !self.required.contains(&key) {
            self.required.push(key);
        }
        self
    }

    /// Bound keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.bindings.keys().copied()
    }

    /// Parse a single JSON object from `input` into `target`.
    pub fn apply(&self, input: &str, target: &mut T, ctx: &mut C) -> Result<(), ParseError> {
        let mut session = Session::new(ctx);
        let mut de = serde_json::Deserializer::from_str(input);
        let seed = ObjectSeed::new(self, target, &mut session, None);
        match seed.deserialize(&mut de).and_then(|()| de.end()) {
            Ok(()) => Ok(()),
            Err(e) => Err(session.into_error(e)),
        }
    }

    fn insert(mut self, key: &'static str, kind: ValueKind, action: Action<T, C>) -> Self {
        let previous = self.bindings.insert(key, Binding { kind, action });
        assert!(previous.is_none(), "key {:?} bound twice", key);
        self
    }

    /// Re-target every binding at the `T` inside a `P`.
    fn project<P: 'static>(self, project: fn(&mut P) -> &mut T) -> ObjectSchema<P, C> {
        ObjectSchema {
            bindings: self
                .bindings
                .into_iter()
                .map(|(key, binding)| (key, binding.project(project)))
                .collect(),
            required: self.required,
        }
    }
}

impl<T: 'static, C: 'static> Binding<T, C> {
    fn project<P: 'static>(self, project: fn(&mut P) -> &mut T) -> Binding<P, C> {
        let action = match self.action {
            Action::Write(inner) => Action::Write(Box::new(
                move |target: &mut P, value: &Value, ctx: &mut C| -> Result<(), Rejection> {
                    inner(project(target), value, ctx)
                },
            )),
            Action::Nested(child) => Action::Nested(child.project(project)),
        };
        Binding {
            kind: self.kind,
            action,
        }
    }
}

//  Driving

pub(crate) enum Fault {
    Schema(SchemaViolation),
    Allocation(TryReserveError),
}

/// Per-parse state: the caller's context and the first fault raised by a
/// binding, which serde can only carry as a message.
pub(crate) struct Session<'a, C> {
    pub(crate) ctx: &'a mut C,
    pub(crate) element: Option<usize>,
    fault: Option<Fault>,
}

impl<'a, C> Session<'a, C> {
    pub(crate) fn new(ctx: &'a mut C) -> Self {
        Self {
            ctx,
            element: None,
            fault: None,
        }
    }

    /// Record `violation` and return a serde error that aborts the parse.
    pub(crate) fn violation<E: de::Error>(&mut self, violation: SchemaViolation) -> E {
        let err = E::custom(&violation);
        self.fault = Some(Fault::Schema(violation));
        err
    }

    /// Record a rejection from a binding on `key`, or from the element
    /// commit when `key` is `None`.
    pub(crate) fn rejection<E: de::Error>(&mut self, key: Option<&str>, rejection: Rejection) -> E {
        match rejection {
            Rejection::Allocation(alloc) => {
                let err = E::custom(&alloc);
                self.fault = Some(Fault::Allocation(alloc));
                err
            }
            other => {
                let reason = other.to_string();
                let violation = match key {
                    Some(key) => SchemaViolation::Rejected {
                        key: key.to_string(),
                        reason,
                    },
                    None => SchemaViolation::ElementRejected { reason },
                };
                self.violation(violation)
            }
        }
    }

    /// Turn the error serde surfaced into a [`ParseError`], preferring the
    /// recorded fault.
    pub(crate) fn into_error(self, err: serde_json::Error) -> ParseError {
        let element = self.element;
        match self.fault {
            Some(Fault::Schema(violation)) => ParseError::Schema { element, violation },
            Some(Fault::Allocation(alloc)) => ParseError::Allocation(alloc),
            None => match err.classify() {
                Category::Data => ParseError::Schema {
                    element,
                    violation: SchemaViolation::Invalid(err.to_string()),
                },
                Category::Syntax | Category::Eof | Category::Io => ParseError::Malformed(err),
            },
        }
    }
}

/// Seed and visitor for one object governed by `schema`.
///
/// `key` is the key the object was nested under, `None` for an array
/// element or a top-level object.
pub(crate) struct ObjectSeed<'a, 's, T, C> {
    schema: &'a ObjectSchema<T, C>,
    target: &'a mut T,
    session: &'a mut Session<'s, C>,
    key: Option<&'a str>,
}

impl<'a, 's, T, C> ObjectSeed<'a, 's, T, C> {
    pub(crate) fn new(
        schema: &'a ObjectSchema<T, C>,
        target: &'a mut T,
        session: &'a mut Session<'s, C>,
        key: Option<&'a str>,
    ) -> Self {
        Self {
            schema,
            target,
            session,
            key,
        }
    }

    fn mismatch<E: de::Error>(self, found: ValueKind) -> E {
        let violation = match self.key {
            Some(key) => SchemaViolation::TypeMismatch {
                key: key.to_string(),
                expected: ValueKind::Object,
                found,
            },
            None => SchemaViolation::NotAnObject { found },
        };
        self.session.violation(violation)
    }
}

impl<'de, T, C> DeserializeSeed<'de> for ObjectSeed<'_, '_, T, C> {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        // `deserialize_any` so that non-objects reach the visitor and can be
        // reported with their kind.
        deserializer.deserialize_any(self)
    }
}

impl<'de, T, C> Visitor<'de> for ObjectSeed<'_, '_, T, C> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a JSON object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        let ObjectSeed {
            schema,
            target,
            session,
            ..
        } = self;
        let mut seen: Vec<&'static str> = Vec::new();

        while let Some(key) = map.next_key::<String>()? {
            let Some((&bound, binding)) = schema.bindings.get_key_value(key.as_str()) else {
                trace!("ignoring unbound key {:?}", key);
                map.next_value::<IgnoredAny>()?;
                continue;
            };
            seen.push(bound);

            match &binding.action {
                Action::Write(write) => {
                    let value: Value = map.next_value()?;
                    if value.kind() != binding.kind {
                        return Err(session.violation(SchemaViolation::TypeMismatch {
                            key,
                            expected: binding.kind,
                            found: value.kind(),
                        }));
                    }
                    write(&mut *target, &value, &mut *session.ctx)
                        .map_err(|r| session.rejection::<A::Error>(Some(bound), r))?;
                }
                Action::Nested(child) => {
                    map.next_value_seed(ObjectSeed::new(
                        child,
                        &mut *target,
                        &mut *session,
                        Some(bound),
                    ))?;
                }
            }
        }

        if let Some(&missing) = schema.required.iter().find(|k| !seen.contains(k)) {
            return Err(session.violation(SchemaViolation::MissingKey { key: missing }));
        }
        Ok(())
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<(), E> {
        Err(self.mismatch(ValueKind::Boolean))
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<(), E> {
        Err(self.mismatch(ValueKind::Integer))
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<(), E> {
        Err(self.mismatch(ValueKind::Integer))
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<(), E> {
        Err(self.mismatch(ValueKind::Float))
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<(), E> {
        Err(self.mismatch(ValueKind::String))
    }

    fn visit_unit<E: de::Error>(self) -> Result<(), E> {
        Err(self.mismatch(ValueKind::Null))
    }

    fn visit_seq<A>(self, _: A) -> Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        Err(self.mismatch(ValueKind::Array))
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Inner {
        a: i32,
    }

    #[derive(Debug, Default, PartialEq)]
    struct Outer {
        n: i32,
        flag: bool,
        label: String,
        inner: Inner,
    }

    /// Records callback invocations so tests can check side effects.
    #[derive(Debug, Default)]
    struct Log {
        labels: Vec<String>,
    }

    fn on_label(target: &mut Outer, value: &Value, log: &mut Log) -> Result<(), Rejection> {
        let label = value.as_str().unwrap_or_default();
        if label == "forbidden" {
            return Err(Rejection::Invalid("label is forbidden".into()));
        }
        target.label = label.to_string();
        log.labels.push(label.to_string());
        Ok(())
    }

    fn inner(outer: &mut Outer) -> &mut Inner {
        &mut outer.inner
    }

    fn schema() -> ObjectSchema<Outer, Log> {
        let child = ObjectSchema::<Inner, Log>::new()
            .bind_field("a", Field::Integer(|i: &mut Inner, v| i.a = v));
        ObjectSchema::<Outer, Log>::new()
            .bind_field("n", Field::Integer(|o: &mut Outer, v| o.n = v))
            .bind_field("flag", Field::Boolean(|o: &mut Outer, v| o.flag = v))
            .bind_callback("label", ValueKind::String, on_label)
            .bind_nested("inner", child, inner)
    }

    fn apply(schema: &ObjectSchema<Outer, Log>, json: &str) -> Result<(Outer, Log), ParseError> {
        let mut target = Outer::default();
        let mut log = Log::default();
        schema.apply(json, &mut target, &mut log)?;
        Ok((target, log))
    }

    #[test]
    fn fields_callbacks_and_nested_objects() {
        let (o, log) = apply(
            &schema(),
            r#"{"n": 7, "flag": true, "label": "hi", "inner": {"a": -2}}"#,
        )
        .unwrap();
        assert_eq!(
            o,
            Outer {
                n: 7,
                flag: true,
                label: "hi".into(),
                inner: Inner { a: -2 },
            }
        );
        assert_eq!(log.labels, ["hi"]);
    }

    #[test]
    fn key_order_does_not_matter() {
        let (o, _) = apply(&schema(), r#"{"inner": {"a": 1}, "label": "x", "n": 2}"#).unwrap();
        assert_eq!(o.inner.a, 1);
        assert_eq!(o.label, "x");
        assert_eq!(o.n, 2);
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let (o, _) = apply(
            &schema(),
            r#"{"id": 94443, "layout": [1, {"x": 2}], "n": 3, "extra": {"deep": null}}"#,
        )
        .unwrap();
        assert_eq!(o.n, 3);
    }

    #[test]
    fn wrong_kind_is_a_type_mismatch() {
        let err = apply(&schema(), r#"{"flag": 1}"#).unwrap_err();
        assert_eq!(
            err.violation(),
            Some(&SchemaViolation::TypeMismatch {
                key: "flag".into(),
                expected: ValueKind::Boolean,
                found: ValueKind::Integer,
            })
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn float_for_integer_field_is_a_type_mismatch() {
        let err = apply(&schema(), r#"{"n": 1.5}"#).unwrap_err();
        assert!(matches!(
            err.violation(),
            Some(SchemaViolation::TypeMismatch { found: ValueKind::Float, .. })
        ));
    }

    #[test]
    fn nested_key_with_scalar_value_is_a_type_mismatch() {
        let err = apply(&schema(), r#"{"inner": 5}"#).unwrap_err();
        assert_eq!(
            err.violation(),
            Some(&SchemaViolation::TypeMismatch {
                key: "inner".into(),
                expected: ValueKind::Object,
                found: ValueKind::Integer,
            })
        );
    }

    #[test]
    fn type_mismatch_inside_nested_object() {
        let err = apply(&schema(), r#"{"inner": {"a": "one"}}"#).unwrap_err();
        assert!(matches!(
            err.violation(),
            Some(SchemaViolation::TypeMismatch { key, .. }) if key == "a"
        ));
    }

    #[test]
    fn out_of_range_integer_is_rejected() {
        let err = apply(&schema(), r#"{"n": 4294967296}"#).unwrap_err();
        assert!(matches!(
            err.violation(),
            Some(SchemaViolation::Rejected { key, .. }) if key == "n"
        ));
    }

    #[test]
    fn integer_beyond_i64_is_rejected_for_its_key() {
        let err = apply(&schema(), r#"{"n": 18446744073709551615}"#).unwrap_err();
        assert_eq!(
            err.violation(),
            Some(&SchemaViolation::Rejected {
                key: "n".into(),
                reason: "integer 18446744073709551615 does not fit the field".into(),
            })
        );
    }

    #[test]
    fn callback_rejection_carries_key_and_reason() {
        let err = apply(&schema(), r#"{"label": "forbidden"}"#).unwrap_err();
        assert_eq!(
            err.violation(),
            Some(&SchemaViolation::Rejected {
                key: "label".into(),
                reason: "label is forbidden".into(),
            })
        );
    }

    #[test]
    fn missing_required_key() {
        let schema = schema().require("label");
        let err = apply(&schema, r#"{"n": 1}"#).unwrap_err();
        assert_eq!(
            err.violation(),
            Some(&SchemaViolation::MissingKey { key: "label" })
        );
    }

    #[test]
    fn non_object_input() {
        let err = apply(&schema(), "[1, 2]").unwrap_err();
        assert_eq!(
            err.violation(),
            Some(&SchemaViolation::NotAnObject {
                found: ValueKind::Array
            })
        );
    }

    #[test]
    fn syntax_errors_are_malformed() {
        assert!(matches!(
            apply(&schema(), r#"{"n": "#),
            Err(ParseError::Malformed(_))
        ));
        assert!(matches!(
            apply(&schema(), r#"{"n": 1} trailing"#),
            Err(ParseError::Malformed(_))
        ));
    }

    #[test]
    fn schema_is_reusable() {
        let schema = schema();
        let (a, _) = apply(&schema, r#"{"n": 1}"#).unwrap();
        let (b, _) = apply(&schema, r#"{"n": 2}"#).unwrap();
        assert_eq!((a.n, b.n), (1, 2));
    }

    #[test]
    #[should_panic(expected = "bound twice")]
    fn binding_a_key_twice_panics() {
        let _ = schema().bind_field("n", Field::Integer(|o: &mut Outer, v| o.n = v));
    }

    #[test]
    #[should_panic(expected = "unbound key")]
    fn requiring_an_unbound_key_panics() {
        let _ = schema().require("nope");
    }

    #[test]
    fn debug_lists_keys() {
        let rendered = format!("{:?}", schema().require("n"));
        assert!(rendered.contains(r#"keys: ["flag", "inner", "label", "n"]"#));
        assert!(rendered.contains(r#"required: ["n"]"#));
    }
}
