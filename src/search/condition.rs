use serde::{Deserialize, Serialize};

use super::predicates::{age_between, age_goe, age_loe, team_name_eq, username_eq, PredicateBuilder};
use crate::query_builder::Condition;

/// Search criteria; every field is optional and an absent field constrains nothing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSearchCondition {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, alias = "teamName")]
    pub team_name: Option<String>,
    #[serde(default, alias = "ageGoe")]
    pub age_goe: Option<i32>,
    #[serde(default, alias = "ageLoe")]
    pub age_loe: Option<i32>,
}

impl MemberSearchCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = Some(team_name.into());
        self
    }

    pub fn with_age_goe(mut self, age: i32) -> Self {
        self.age_goe = Some(age);
        self
    }

    pub fn with_age_loe(mut self, age: i32) -> Self {
        self.age_loe = Some(age);
        self
    }

    /// True when no field would produce a constraint
    pub fn is_unconstrained(&self) -> bool {
        self.where_parts().iter().all(Option::is_none)
    }

    /// Incremental composition through [`PredicateBuilder`]
    pub fn to_builder(&self) -> PredicateBuilder {
        PredicateBuilder::new()
            .and(username_eq(self.username.as_deref()))
            .and(team_name_eq(self.team_name.as_deref()))
            .and_builder(age_between(self.age_goe, self.age_loe))
    }

    pub fn to_predicate(&self) -> Condition {
        self.to_builder().build()
    }

    /// One entry per criterion, `None` where absent; callers AND the present ones
    pub fn where_parts(&self) -> Vec<Option<Condition>> {
        vec![
            username_eq(self.username.as_deref()),
            team_name_eq(self.team_name.as_deref()),
            age_goe(self.age_goe),
            age_loe(self.age_loe),
        ]
    }
}
