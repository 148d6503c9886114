//! Sibling ordering: single comparators and their lexicographic composition.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::node::{HasId, HasName, HasOrder};

/// Three-way comparison of two records of the same type.
///
/// Any `Fn(&N, &N) -> Ordering` is a comparator, so ad-hoc orderings need no
/// wrapper type.
pub trait Comparator<N> {
    fn compare(&self, a: &N, b: &N) -> Ordering;
}

impl<N, F> Comparator<N> for F
where
    F: Fn(&N, &N) -> Ordering,
{
    fn compare(&self, a: &N, b: &N) -> Ordering {
        self(a, b)
    }
}

/// Ascending by [`HasId::id`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ById;

impl<N: HasId> Comparator<N> for ById {
    fn compare(&self, a: &N, b: &N) -> Ordering {
        a.id().cmp(&b.id())
    }
}

/// Ascending lexicographic by [`HasName::name`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ByName;

impl<N: HasName> Comparator<N> for ByName {
    fn compare(&self, a: &N, b: &N) -> Ordering {
        a.name().cmp(b.name())
    }
}

/// Ascending by [`HasOrder::order`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ByOrder;

impl<N: HasOrder> Comparator<N> for ByOrder {
    fn compare(&self, a: &N, b: &N) -> Ordering {
        a.order().cmp(&b.order())
    }
}

/// Boxed comparator as stored by [`Composite`] and the tree builder.
pub type BoxedComparator<N> = Box<dyn Comparator<N> + Send + Sync>;

/// Evaluates its comparators left to right and returns the first non-equal result.
///
/// An empty composite considers every pair equal.
pub struct Composite<N> {
    comparators: Vec<BoxedComparator<N>>,
}

impl<N> Default for Composite<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Composite<N> {
    pub fn new() -> Self {
        Self {
            comparators: Vec::new(),
        }
    }

    /// Appends a tie-breaker evaluated after all comparators added so far.
    pub fn then<C>(mut self, comparator: C) -> Self
    where
        C: Comparator<N> + Send + Sync + 'static,
    {
        self.push(comparator);
        self
    }

    pub fn push<C>(&mut self, comparator: C)
    where
        C: Comparator<N> + Send + Sync + 'static,
    {
        self.comparators.push(Box::new(comparator));
    }

    pub fn len(&self) -> usize {
        self.comparators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comparators.is_empty()
    }
}

impl<N> Comparator<N> for Composite<N> {
    fn compare(&self, a: &N, b: &N) -> Ordering {
        self.comparators
            .iter()
            .map(|c| c.compare(a, b))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl<N> fmt::Debug for Composite<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composite")
            .field("comparators", &self.comparators.len())
            .finish()
    }
}

/// Named sort criterion, selectable from settings and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Id,
    Name,
    Order,
}

impl SortKey {
    /// Composite of the given keys in priority order, `None` when `keys` is empty.
    pub fn comparator<N>(keys: &[SortKey]) -> Option<Composite<N>>
    where
        N: HasId + HasName + HasOrder,
    {
        if keys.is_empty() {
            return None;
        }
        let composite = keys.iter().fold(Composite::new(), |acc, key| match key {
            SortKey::Id => acc.then(ById),
            SortKey::Name => acc.then(ByName),
            SortKey::Order => acc.then(ByOrder),
        });
        Some(composite)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortKey::Id => "id",
            SortKey::Name => "name",
            SortKey::Order => "order",
        };
        f.write_str(s)
    }
}
