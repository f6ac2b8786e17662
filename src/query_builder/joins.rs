use super::conditions::{Condition, PgQuery, Scope, TEAM_TABLE};

/// Represents the SQL JOIN kinds the member query supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    Inner,
    #[default]
    Left,
}

impl JoinType {
    pub fn to_sql(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
        }
    }
}

/// Represents a SQL JOIN clause. `filter` is ANDed into the ON clause, so on a
/// LEFT join it only nulls out the joined columns instead of dropping rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: String,
    pub on_condition: String,
    pub filter: Option<Condition>,
}

impl Join {
    /// Create an INNER JOIN
    pub fn inner(table: &str, on_condition: &str) -> Self {
        Self::new(JoinType::Inner, table, on_condition)
    }

    /// Create a LEFT JOIN
    pub fn left(table: &str, on_condition: &str) -> Self {
        Self::new(JoinType::Left, table, on_condition)
    }

    pub fn new(join_type: JoinType, table: &str, on_condition: &str) -> Self {
        Self {
            join_type,
            table: table.to_string(),
            on_condition: on_condition.to_string(),
            filter: None,
        }
    }

    /// The member → team join of the outer query
    pub fn team(join_type: JoinType) -> Self {
        Self::new(join_type, &format!("{TEAM_TABLE} t"), "m.team_id = t.id")
    }

    pub fn with_filter(mut self, filter: Condition) -> Self {
        self.filter = match self.filter.take() {
            Some(existing) => Some(existing.and(filter)),
            None => Some(filter),
        };
        self
    }

    pub fn push_sql(&self, qb: &mut PgQuery) {
        qb.push(self.join_type.to_sql())
            .push(" ")
            .push(&self.table)
            .push(" ON ")
            .push(&self.on_condition);
        if let Some(filter) = self.filter.as_ref().filter(|f| !f.is_always_true()) {
            qb.push(" AND ");
            filter.push_sql(qb, Scope::Outer);
        }
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        let mut qb = PgQuery::new("");
        self.push_sql(&mut qb);
        qb.sql().to_string()
    }
}
