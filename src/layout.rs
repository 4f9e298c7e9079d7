//! AST value kinds for the layout language and their typed facade maps.
//!
//! A facade is the map monomorphized for one node kind: the render/release
//! pair is fixed by the type (the kind's `Render` impl and drop glue), and
//! each facade adds the aggregate queries that only make sense for that
//! kind.

use crate::bucket_hash_map::CreateError;
use crate::node_hash_map::{NodeHashMap, Render};
use std::fmt::Write as _;

/// Literal payloads an attribute can carry, mirroring what the scanner
/// produces for identifier, string, numeric, and boolean tokens.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Ident(String),
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Render for AttributeValue {
    fn render(&self, out: &mut String) {
        match self {
            AttributeValue::Ident(s) => out.push_str(s),
            AttributeValue::Str(s) => {
                let _ = write!(out, "\"{}\"", s);
            }
            AttributeValue::Int(n) => {
                let _ = write!(out, "{}", n);
            }
            AttributeValue::Float(x) => {
                let _ = write!(out, "{}", x);
            }
            AttributeValue::Bool(b) => {
                let _ = write!(out, "{}", b);
            }
        }
    }
}

/// One layout attribute of an element: the raw values as written in the
/// source, plus the resolved output form once a later pass has produced it.
#[derive(Debug, Default)]
pub struct LayoutAttribute {
    pub values: Vec<AttributeValue>,
    pub final_value: Option<String>,
}

impl LayoutAttribute {
    pub fn new(values: Vec<AttributeValue>) -> Self {
        Self {
            values,
            final_value: None,
        }
    }

    /// Whether this attribute carries at least one value of its own.
    pub fn has_any_sub_value(&self) -> bool {
        !self.values.is_empty()
    }
}

impl Render for LayoutAttribute {
    fn render(&self, out: &mut String) {
        if let Some(resolved) = &self.final_value {
            out.push_str(resolved);
            return;
        }
        if self.values.is_empty() {
            out.push_str("(no value)");
            return;
        }
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            v.render(out);
        }
    }
}

/// Facade for per-element layout attributes.
pub type LayoutAttributeMap = NodeHashMap<LayoutAttribute>;

impl NodeHashMap<LayoutAttribute> {
    /// Aggregate query: does any stored attribute carry a value?
    pub fn has_any_sub_value(&self) -> bool {
        self.any(LayoutAttribute::has_any_sub_value)
    }
}

/// One pseudo-state of a styled element (hover, focus, ...) holding its own
/// attribute map.
#[derive(Debug, Default)]
pub struct StyleState {
    pub attributes: LayoutAttributeMap,
}

impl StyleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buckets(bucket_count: usize) -> Result<Self, CreateError> {
        Ok(Self {
            attributes: LayoutAttributeMap::with_buckets(bucket_count)?,
        })
    }

    /// Whether this state carries any attribute at all.
    pub fn has_any_sub_value(&self) -> bool {
        !self.attributes.is_empty()
    }
}

impl Render for StyleState {
    // Shallow on purpose; the state's own map has its full listing.
    fn render(&self, out: &mut String) {
        let _ = write!(out, "{} attribute(s)", self.attributes.len());
    }
}

/// Facade for a styled element's pseudo-states.
pub type StyleStateMap = NodeHashMap<StyleState>;

impl NodeHashMap<StyleState> {
    /// Aggregate query: does any stored state carry attributes?
    pub fn has_any_sub_value(&self) -> bool {
        self.any(StyleState::has_any_sub_value)
    }
}
