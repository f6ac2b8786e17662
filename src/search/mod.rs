//! # Member Search
//!
//! Turns a [`MemberSearchCondition`] into a conjunction of only its present
//! criteria. Two strategies are offered and always select the same rows:
//!
//! - incremental: [`MemberSearchCondition::to_predicate`] through a
//!   [`PredicateBuilder`]
//! - ordered list: [`MemberSearchCondition::where_parts`], whose `None` entries
//!   are skipped by `MemberQuery::filter_all` and `QueryBuilder::where_all`

pub mod condition;
pub mod predicates;

pub use condition::MemberSearchCondition;
pub use predicates::{age_between, age_goe, age_loe, team_name_eq, username_eq, PredicateBuilder};
