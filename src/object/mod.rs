//! The one runtime object representation.
//!
//! A [`JsObject`] serves as a lexical environment, a function value and a plain data record.
//! All three share an ordered property map and an optional delegation link consulted when a
//! local lookup misses.

use crate::{
    interpreter::SystemContext,
    value::{
        error::{RuntimeError, RuntimeErrorKind},
        Value,
    },
};
use compact_str::{CompactString, ToCompactString};
use indexmap::IndexMap;
use std::{cell::RefCell, rc::Rc};

/// The invocation capability attached to function objects.
pub trait Invoker {
    fn invoke(
        &self,
        invocation: Invocation<'_>,
        context: &mut dyn SystemContext,
    ) -> Result<Value, RuntimeError>;
}

/// A single call: the function being invoked, the receiver bound to `this`, and the already
/// evaluated arguments.
pub struct Invocation<'a> {
    pub function: &'a JsObject,
    pub receiver: Value,
    pub arguments: Vec<Value>,
    /// Line of the call site.
    pub line: u32,
}

#[derive(Clone)]
enum ObjectKind {
    Environment,
    Plain,
    Function {
        name: CompactString,
        invoker: Rc<dyn Invoker>,
    },
}

struct ObjectImpl {
    kind: ObjectKind,
    properties: IndexMap<CompactString, Value>,
    parent: Option<JsObject>,
}

#[derive(Clone)]
pub struct JsObject {
    inner: Rc<RefCell<ObjectImpl>>,
}

impl JsObject {
    fn create(kind: ObjectKind, parent: Option<&JsObject>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObjectImpl {
                kind,
                properties: IndexMap::new(),
                parent: parent.cloned(),
            })),
        }
    }

    /// A scope whose misses fall back to `parent`.
    pub fn new_environment(parent: Option<&JsObject>) -> Self {
        Self::create(ObjectKind::Environment, parent)
    }

    pub fn new_object(prototype: Option<&JsObject>) -> Self {
        Self::create(ObjectKind::Plain, prototype)
    }

    pub fn new_function(name: &str, invoker: Rc<dyn Invoker>) -> Self {
        Self::create(
            ObjectKind::Function {
                name: name.to_compact_string(),
                invoker,
            },
            None,
        )
    }

    /// Sets a local slot, declaring it if needed.
    pub fn register(&self, name: &str, value: Value) {
        let mut inner = self.inner.borrow_mut();
        inner.properties.insert(name.to_compact_string(), value);
    }

    /// Resolves `name` locally and then along the delegation chain.
    ///
    /// Never fails: a name found nowhere is [`Value::Undefined`].
    pub fn lookup(&self, name: &str) -> Value {
        let mut current = self.clone();
        loop {
            let parent = {
                let inner = current.inner.borrow();
                if let Some(value) = inner.properties.get(name) {
                    return value.clone();
                }
                inner.parent.clone()
            };
            match parent {
                Some(parent) => current = parent,
                None => return Value::Undefined,
            }
        }
    }

    /// Calls the attached invoker. Objects without one are not callable.
    pub fn invoke(
        &self,
        receiver: Value,
        arguments: Vec<Value>,
        line: u32,
        context: &mut dyn SystemContext,
    ) -> Result<Value, RuntimeError> {
        // The borrow must end before user code runs, it may write to this very object.
        let invoker = match self.inner.borrow().kind {
            ObjectKind::Function { ref invoker, .. } => Some(invoker.clone()),
            _ => None,
        };
        let Some(invoker) = invoker else {
            return Err(RuntimeError::new(
                RuntimeErrorKind::InvalidCallee(Value::Object(self.clone())),
                line,
            ));
        };
        invoker.invoke(
            Invocation {
                function: self,
                receiver,
                arguments,
                line,
            },
            context,
        )
    }

    pub fn is_function(&self) -> bool {
        matches!(self.inner.borrow().kind, ObjectKind::Function { .. })
    }

    /// The function's name, `None` for environments and plain objects.
    pub fn name(&self) -> Option<CompactString> {
        match self.inner.borrow().kind {
            ObjectKind::Function { ref name, .. } => Some(name.clone()),
            _ => None,
        }
    }

    pub fn parent(&self) -> Option<JsObject> {
        self.inner.borrow().parent.clone()
    }

    /// The local properties in insertion order.
    pub fn properties(&self) -> Vec<(CompactString, Value)> {
        self.inner
            .borrow()
            .properties
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    pub fn ptr_eq(&self, other: &JsObject) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn format_short(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.borrow().kind {
            ObjectKind::Environment => write!(f, "<environment>"),
            ObjectKind::Plain => write!(f, "{{...}}"),
            ObjectKind::Function { ref name, .. } => write!(f, "<function {name}>"),
        }
    }
}

impl std::fmt::Display for JsObject {
    /// Shallow: nested objects print in short form so self references terminate.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        if !matches!(inner.kind, ObjectKind::Plain) {
            return self.format_short(f);
        }
        write!(f, "{{")?;
        for (index, (name, value)) in inner.properties.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            match value {
                Value::Object(object) => {
                    write!(f, "{name}: ")?;
                    object.format_short(f)?;
                }
                Value::String(v) => write!(f, "{name}: \"{v}\"")?,
                v => write!(f, "{name}: {v}")?,
            }
        }
        write!(f, "}}")
    }
}

impl std::fmt::Debug for JsObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JsObject(")?;
        self.format_short(f)?;
        write!(f, ")")
    }
}
