//! Sort specifications and comparator dispatch
//!
//! A [`SortSpec`] is an explicit (member, direction, kind) value describing
//! how a collection's order index should be rebuilt. The [`SortDispatcher`]
//! resolves a spec to a binary comparator over two [`OrderRecord`]s: a
//! comparator registered for the exact spec wins, otherwise a built-in
//! comparator for the spec's kind is used. Specs naming an unregistered
//! custom comparator fail with [`SortError::ComparatorNotFound`].
//!
//! Comparisons run over the attribute snapshots captured at insertion time,
//! never over the live items.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::Result;

mod errors;
pub use errors::SortError;

/// Snapshot of the order-member values for one item, captured at insertion.
///
/// Members missing from the item at insertion time are recorded as
/// `Value::Null`.
pub type OrderRecord = BTreeMap<String, Value>;

/// Comparator over two ordering snapshots.
pub type Comparator = Box<dyn Fn(&OrderRecord, &OrderRecord) -> Ordering>;

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// How two order-member values are compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SortKind {
    /// Compare values as numbers. JSON numbers compare directly; strings are
    /// parsed, and values that are neither compare as equal.
    Numeric,
    /// Compare values as strings using ordinary lexical ordering.
    Lexicographic,
    /// Defer to a comparator registered under this spec; no built-in fallback.
    Named(String),
}

/// A complete sort specification: which member to sort on, in which
/// direction, compared how.
///
/// Descending is the exact reverse of ascending for every kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub member: String,
    pub direction: SortDirection,
    pub kind: SortKind,
}

impl SortSpec {
    pub fn new(member: impl Into<String>, direction: SortDirection, kind: SortKind) -> Self {
        Self {
            member: member.into(),
            direction,
            kind,
        }
    }
}

/// Resolves [`SortSpec`]s to comparators.
///
/// Holds the table of explicitly registered comparators. Resolution order:
/// exact-spec registration first, then the built-in comparator for the
/// spec's kind.
#[derive(Default)]
pub struct SortDispatcher {
    registry: HashMap<SortSpec, Comparator>,
}

impl SortDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `comparator` for the exact `spec`.
    ///
    /// A registered comparator takes precedence over the built-in for the
    /// spec's kind, and is the only way to satisfy a `SortKind::Named` spec.
    /// The comparator should already encode the spec's direction.
    pub fn register(
        &mut self,
        spec: SortSpec,
        comparator: impl Fn(&OrderRecord, &OrderRecord) -> Ordering + 'static,
    ) {
        self.registry.insert(spec, Box::new(comparator));
    }

    /// Checks that `spec` would resolve, without keeping the comparator.
    ///
    /// Call sites that validate a spec eagerly but apply it lazily use this
    /// instead of [`resolve`](Self::resolve).
    pub fn validate(&self, spec: &SortSpec) -> Result<()> {
        self.resolve(spec).map(|_| ())
    }

    /// Resolves `spec` to a comparator, or fails with
    /// [`SortError::ComparatorNotFound`] when the spec names a custom
    /// comparator nothing was registered for.
    pub fn resolve<'a>(
        &'a self,
        spec: &SortSpec,
    ) -> Result<Box<dyn Fn(&OrderRecord, &OrderRecord) -> Ordering + 'a>> {
        if let Some(registered) = self.registry.get(spec) {
            return Ok(Box::new(move |a, b| registered(a, b)));
        }

        let member = spec.member.clone();
        let direction = spec.direction;
        match spec.kind {
            SortKind::Numeric => Ok(Box::new(move |a, b| {
                directed(compare_numeric(a, b, &member), direction)
            })),
            SortKind::Lexicographic => Ok(Box::new(move |a, b| {
                directed(compare_lexicographic(a, b, &member), direction)
            })),
            SortKind::Named(ref name) => Err(SortError::ComparatorNotFound {
                member: spec.member.clone(),
                name: name.clone(),
            }
            .into()),
        }
    }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

fn numeric_value(record: &OrderRecord, member: &str) -> Option<f64> {
    match record.get(member) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn compare_numeric(a: &OrderRecord, b: &OrderRecord, member: &str) -> Ordering {
    match (numeric_value(a, member), numeric_value(b, member)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        // absent/non-numeric values sort before everything else
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn text_value(record: &OrderRecord, member: &str) -> String {
    match record.get(member) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn compare_lexicographic(a: &OrderRecord, b: &OrderRecord, member: &str) -> Ordering {
    text_value(a, member).cmp(&text_value(b, member))
}
