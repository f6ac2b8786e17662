//! Null-safe search predicates.
//!
//! Each function turns an optional criterion into an optional constraint: an
//! absent input yields `None` and never an error. [`PredicateBuilder`]
//! ANDs whatever is present.

use crate::query_builder::{Column, Condition};

/// `members.username = value`
pub fn username_eq(username: Option<&str>) -> Option<Condition> {
    username.map(|name| Column::Username.eq(name))
}

/// `teams.name = value`
pub fn team_name_eq(team_name: Option<&str>) -> Option<Condition> {
    team_name.map(|name| Column::TeamName.eq(name))
}

/// `members.age >= value`
pub fn age_goe(age: Option<i32>) -> Option<Condition> {
    age.map(|age| Column::Age.goe(age))
}

/// `members.age <= value`
pub fn age_loe(age: Option<i32>) -> Option<Condition> {
    age.map(|age| Column::Age.loe(age))
}

/// Both age bounds, each only when present
pub fn age_between(goe: Option<i32>, loe: Option<i32>) -> PredicateBuilder {
    PredicateBuilder::new().and(age_goe(goe)).and(age_loe(loe))
}

/// Incremental AND-composition that ignores absent predicates.
/// With nothing attached it builds the always-true condition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredicateBuilder {
    parts: Vec<Condition>,
}

impl PredicateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, predicate: Option<Condition>) -> Self {
        if let Some(predicate) = predicate.filter(|p| !p.is_always_true()) {
            self.parts.push(predicate);
        }
        self
    }

    pub fn and_builder(mut self, other: PredicateBuilder) -> Self {
        self.parts.extend(other.parts);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// The composed predicate, or `None` when nothing was attached
    pub fn value(&self) -> Option<Condition> {
        match self.parts.as_slice() {
            [] => None,
            [single] => Some(single.clone()),
            parts => Some(Condition::And(parts.to_vec())),
        }
    }

    pub fn build(mut self) -> Condition {
        if self.parts.len() == 1 {
            return self.parts.remove(0);
        }
        Condition::And(self.parts)
    }
}

impl From<PredicateBuilder> for Condition {
    fn from(builder: PredicateBuilder) -> Self {
        builder.build()
    }
}
