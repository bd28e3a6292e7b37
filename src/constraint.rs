//! Named constraint predicates over a [`Configuration`]
//!
//! Each constraint is resolved against a [`Schema`] when it is added to a
//! [`ConstraintSet`]; the set's cost is the number of violated constraints.

use std::{fmt, sync::Arc};

use anyhow::Result as AnyResult;

use crate::{
    error::SearchError,
    grid::{Configuration, Schema},
    model::CostFunction,
};

/// Whether the true positions of `mask` form a single contiguous run.
///
/// A mask with zero or one true position is trivially contiguous.
pub fn adjacent(mask: &[bool]) -> bool {
    let mut positions = mask
        .iter()
        .enumerate()
        .filter_map(|(i, &set)| set.then_some(i));
    let Some(first) = positions.next() else {
        return true;
    };
    positions.zip(1..).all(|(pos, offset)| pos == first + offset)
}

/// `(category, value)` reference used to build constraints
pub type ValueRef<'a> = (&'a str, &'a str);

type Predicate = Box<dyn Fn(&Configuration) -> bool + Send + Sync>;

/// A named predicate that a configuration either satisfies or violates
pub struct Constraint {
    name: String,
    predicate: Predicate,
}

impl Constraint {
    /// Arbitrary predicate
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Configuration) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Box::new(predicate),
        }
    }

    /// `a` and `b` sit in the same slot
    pub fn same_column(schema: &Schema, a: ValueRef, b: ValueRef) -> Result<Self, SearchError> {
        let (ra, va) = schema.resolve(a.0, a.1)?;
        let (rb, vb) = schema.resolve(b.0, b.1)?;
        Ok(Self::new(
            format!("{} is with {}", a.1, b.1),
            move |cfg: &Configuration| {
                matches!(
                    (cfg.position(ra, va), cfg.position(rb, vb)),
                    (Some(pa), Some(pb)) if pa == pb
                )
            },
        ))
    }

    /// `left` sits in the slot immediately before `right`
    ///
    /// Holds when `slot(left) + 1 == slot(right)`.
    pub fn left_of(schema: &Schema, left: ValueRef, right: ValueRef) -> Result<Self, SearchError> {
        let (rl, vl) = schema.resolve(left.0, left.1)?;
        let (rr, vr) = schema.resolve(right.0, right.1)?;
        Ok(Self::new(
            format!("{} is directly left of {}", left.1, right.1),
            move |cfg: &Configuration| {
                matches!(
                    (cfg.position(rl, vl), cfg.position(rr, vr)),
                    (Some(pl), Some(pr)) if pl + 1 == pr
                )
            },
        ))
    }

    /// `value` sits in slot `column`
    pub fn at_column(schema: &Schema, value: ValueRef, column: usize) -> Result<Self, SearchError> {
        let (row, v) = schema.resolve(value.0, value.1)?;
        if column >= schema.n_cols() {
            return Err(SearchError::ColumnOutOfRange {
                column,
                n_cols: schema.n_cols(),
            });
        }
        Ok(Self::new(
            format!("{} is in slot {}", value.1, column),
            move |cfg: &Configuration| cfg.position(row, v) == Some(column),
        ))
    }

    /// `a` and `b` occupy two neighbouring slots
    pub fn next_to(schema: &Schema, a: ValueRef, b: ValueRef) -> Result<Self, SearchError> {
        let (ra, va) = schema.resolve(a.0, a.1)?;
        let (rb, vb) = schema.resolve(b.0, b.1)?;
        Ok(Self::new(
            format!("{} is next to {}", a.1, b.1),
            move |cfg: &Configuration| {
                let mask = cfg
                    .mask(ra, va)
                    .into_iter()
                    .zip(cfg.mask(rb, vb))
                    .map(|(x, y)| x || y)
                    .collect::<Vec<_>>();
                mask.iter().filter(|&&set| set).count() == 2 && adjacent(&mask)
            },
        ))
    }

    /// name used when reporting violations
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `configuration` satisfies the constraint
    pub fn holds(&self, configuration: &Configuration) -> bool {
        (self.predicate)(configuration)
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Ordered list of constraints bound to one schema
///
/// Every violated constraint adds a unit penalty to the cost; a cost of zero
/// means every constraint is satisfied.
#[derive(Debug)]
pub struct ConstraintSet {
    schema: Arc<Schema>,
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    /// Empty set for `schema`
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            constraints: Vec::new(),
        }
    }

    /// schema the constraints were resolved against
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Append an already built constraint.
    pub fn push(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Add [`Constraint::same_column`]
    pub fn same_column(mut self, a: ValueRef, b: ValueRef) -> Result<Self, SearchError> {
        let constraint = Constraint::same_column(&self.schema, a, b)?;
        self.push(constraint);
        Ok(self)
    }

    /// Add [`Constraint::left_of`]
    pub fn left_of(mut self, left: ValueRef, right: ValueRef) -> Result<Self, SearchError> {
        let constraint = Constraint::left_of(&self.schema, left, right)?;
        self.push(constraint);
        Ok(self)
    }

    /// Add [`Constraint::at_column`]
    pub fn at_column(mut self, value: ValueRef, column: usize) -> Result<Self, SearchError> {
        let constraint = Constraint::at_column(&self.schema, value, column)?;
        self.push(constraint);
        Ok(self)
    }

    /// Add [`Constraint::next_to`]
    pub fn next_to(mut self, a: ValueRef, b: ValueRef) -> Result<Self, SearchError> {
        let constraint = Constraint::next_to(&self.schema, a, b)?;
        self.push(constraint);
        Ok(self)
    }

    /// Add a custom predicate.
    pub fn custom<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Configuration) -> bool + Send + Sync + 'static,
    {
        self.push(Constraint::new(name, predicate));
        self
    }

    /// number of constraints
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// whether the set has no constraint
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// iterate over the constraints in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }

    /// Number of violated constraints.
    pub fn cost(&self, configuration: &Configuration) -> usize {
        self.constraints
            .iter()
            .filter(|c| !c.holds(configuration))
            .count()
    }

    /// Names of the violated constraints.
    pub fn violations(&self, configuration: &Configuration) -> Vec<&str> {
        self.constraints
            .iter()
            .filter(|c| !c.holds(configuration))
            .map(Constraint::name)
            .collect()
    }
}

impl CostFunction for ConstraintSet {
    type Score = usize;

    fn cost(&self, configuration: &Configuration) -> AnyResult<usize> {
        let actual = configuration.schema();
        if !Arc::ptr_eq(&self.schema, actual) && *self.schema != **actual {
            return Err(SearchError::SchemaMismatch.into());
        }
        Ok(ConstraintSet::cost(self, configuration))
    }
}
