use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder as SqlxQueryBuilder};
use std::cmp::Ordering;

use super::expressions::Aggregate;
use crate::error::{MemberSearchError, Result};
use crate::models::MemberTeamRow;

/// Parameterised PostgreSQL statement under construction
pub type PgQuery = SqlxQueryBuilder<'static, Postgres>;

pub const MEMBER_TABLE: &str = "members";
pub const TEAM_TABLE: &str = "teams";

/// SQL type of a column or expression, used to decode projected values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Int,
    BigInt,
    Float,
    Text,
}

/// A non-null SQL value. NULL is always `Option::None`, so a comparison
/// against NULL cannot be expressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    Int(i32),
    BigInt(i64),
    Float(f64),
    Text(String),
}

impl SqlValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            SqlValue::Int(_) => ValueType::Int,
            SqlValue::BigInt(_) => ValueType::BigInt,
            SqlValue::Float(_) => ValueType::Float,
            SqlValue::Text(_) => ValueType::Text,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(v) => Some(i64::from(*v)),
            SqlValue::BigInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Int(v) => Some(f64::from(*v)),
            SqlValue::BigInt(v) => Some(*v as f64),
            SqlValue::Float(v) => Some(*v),
            SqlValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Ordering between two values; integers of different widths compare
    /// numerically, text compares with text, anything else is incomparable.
    pub fn compare(&self, other: &SqlValue) -> Option<Ordering> {
        match (self, other) {
            (SqlValue::Text(a), SqlValue::Text(b)) => Some(a.cmp(b)),
            (SqlValue::Float(_), _) | (_, SqlValue::Float(_)) => {
                self.as_f64()?.partial_cmp(&other.as_f64()?)
            }
            _ => Some(self.as_i64()?.cmp(&other.as_i64()?)),
        }
    }

    /// Text form used by string concatenation
    pub fn to_text(&self) -> String {
        match self {
            SqlValue::Int(v) => v.to_string(),
            SqlValue::BigInt(v) => v.to_string(),
            SqlValue::Float(v) => v.to_string(),
            SqlValue::Text(s) => s.clone(),
        }
    }

    pub(crate) fn push_bind(&self, qb: &mut PgQuery) {
        match self {
            SqlValue::Int(v) => qb.push_bind(*v),
            SqlValue::BigInt(v) => qb.push_bind(*v),
            SqlValue::Float(v) => qb.push_bind(*v),
            SqlValue::Text(s) => qb.push_bind(s.clone()),
        };
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::BigInt(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

/// Which alias set a column renders with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// `members m LEFT JOIN teams t`
    Outer,
    /// `members sub LEFT JOIN teams sub_t`
    Subquery,
}

impl Scope {
    pub fn member_alias(self) -> &'static str {
        match self {
            Scope::Outer => "m",
            Scope::Subquery => "sub",
        }
    }

    pub fn team_alias(self) -> &'static str {
        match self {
            Scope::Outer => "t",
            Scope::Subquery => "sub_t",
        }
    }
}

/// Typed reference to a column of the member ⟕ team relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    MemberId,
    Username,
    Age,
    MemberTeamId,
    TeamId,
    TeamName,
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::MemberId | Column::TeamId => "id",
            Column::Username => "username",
            Column::Age => "age",
            Column::MemberTeamId => "team_id",
            Column::TeamName => "name",
        }
    }

    pub fn is_team_column(self) -> bool {
        matches!(self, Column::TeamId | Column::TeamName)
    }

    /// Whether grouping by `keys` fixes this column, including what a
    /// grouped primary key determines
    pub fn is_determined_by(self, keys: &[Column]) -> bool {
        let primary_key = if self.is_team_column() {
            Column::TeamId
        } else {
            Column::MemberId
        };
        keys.contains(&self) || keys.contains(&primary_key)
    }

    pub fn value_type(self) -> ValueType {
        match self {
            Column::MemberId | Column::MemberTeamId | Column::TeamId => ValueType::BigInt,
            Column::Age => ValueType::Int,
            Column::Username | Column::TeamName => ValueType::Text,
        }
    }

    pub fn qualified(self, scope: Scope) -> String {
        let alias = if self.is_team_column() {
            scope.team_alias()
        } else {
            scope.member_alias()
        };
        format!("{}.{}", alias, self.name())
    }

    /// Value of this column in a joined row; `None` is SQL NULL
    pub fn extract(self, row: &MemberTeamRow) -> Option<SqlValue> {
        match self {
            Column::MemberId => Some(SqlValue::BigInt(row.member_id)),
            Column::Username => row.username.clone().map(SqlValue::Text),
            Column::Age => Some(SqlValue::Int(row.age)),
            // the foreign key and the joined team id only differ when a join filter dropped the team
            Column::MemberTeamId => row.member_team_id.map(SqlValue::BigInt),
            Column::TeamId => row.team_id.map(SqlValue::BigInt),
            Column::TeamName => row.team_name.clone().map(SqlValue::Text),
        }
    }

    pub fn eq(self, value: impl Into<SqlValue>) -> Condition {
        self.compare(Operator::Eq, value)
    }

    pub fn ne(self, value: impl Into<SqlValue>) -> Condition {
        self.compare(Operator::Ne, value)
    }

    pub fn gt(self, value: impl Into<SqlValue>) -> Condition {
        self.compare(Operator::Gt, value)
    }

    pub fn goe(self, value: impl Into<SqlValue>) -> Condition {
        self.compare(Operator::Goe, value)
    }

    pub fn lt(self, value: impl Into<SqlValue>) -> Condition {
        self.compare(Operator::Lt, value)
    }

    pub fn loe(self, value: impl Into<SqlValue>) -> Condition {
        self.compare(Operator::Loe, value)
    }

    pub fn between(self, low: impl Into<SqlValue>, high: impl Into<SqlValue>) -> Condition {
        Condition::Between {
            column: self,
            low: low.into(),
            high: high.into(),
        }
    }

    pub fn in_list<V: Into<SqlValue>>(self, values: impl IntoIterator<Item = V>) -> Condition {
        Condition::In {
            column: self,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_null(self) -> Condition {
        Condition::IsNull { column: self }
    }

    pub fn is_not_null(self) -> Condition {
        Condition::IsNotNull { column: self }
    }

    pub fn compare_subquery(self, operator: Operator, subquery: Subquery) -> Condition {
        Condition::CompareSubquery {
            column: self,
            operator,
            subquery: Box::new(subquery),
        }
    }

    pub fn eq_subquery(self, subquery: Subquery) -> Condition {
        self.compare_subquery(Operator::Eq, subquery)
    }

    pub fn goe_subquery(self, subquery: Subquery) -> Condition {
        self.compare_subquery(Operator::Goe, subquery)
    }

    pub fn in_subquery(self, subquery: Subquery) -> Condition {
        Condition::InSubquery {
            column: self,
            subquery: Box::new(subquery),
        }
    }

    fn compare(self, operator: Operator, value: impl Into<SqlValue>) -> Condition {
        Condition::Compare {
            column: self,
            operator,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Goe,
    Lt,
    Loe,
}

impl Operator {
    pub fn as_sql(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Gt => ">",
            Operator::Goe => ">=",
            Operator::Lt => "<",
            Operator::Loe => "<=",
        }
    }

    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Goe => ordering != Ordering::Less,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Loe => ordering != Ordering::Greater,
        }
    }
}

/// Predicate tree over the member ⟕ team relation
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        column: Column,
        operator: Operator,
        value: SqlValue,
    },
    Between {
        column: Column,
        low: SqlValue,
        high: SqlValue,
    },
    In {
        column: Column,
        values: Vec<SqlValue>,
    },
    IsNull {
        column: Column,
    },
    IsNotNull {
        column: Column,
    },
    CompareSubquery {
        column: Column,
        operator: Operator,
        subquery: Box<Subquery>,
    },
    InSubquery {
        column: Column,
        subquery: Box<Subquery>,
    },
    /// Empty conjunction matches every row
    And(Vec<Condition>),
    /// Empty disjunction matches nothing
    Or(Vec<Condition>),
}

impl Condition {
    /// The identity filter
    pub fn always() -> Self {
        Condition::And(Vec::new())
    }

    pub fn and(self, other: Condition) -> Condition {
        match (self, other) {
            (Condition::And(mut left), Condition::And(right)) => {
                left.extend(right);
                Condition::And(left)
            }
            (Condition::And(mut left), other) => {
                left.push(other);
                Condition::And(left)
            }
            (this, Condition::And(mut right)) => {
                right.insert(0, this);
                Condition::And(right)
            }
            (this, other) => Condition::And(vec![this, other]),
        }
    }

    pub fn or(self, other: Condition) -> Condition {
        match (self, other) {
            (Condition::Or(mut left), Condition::Or(right)) => {
                left.extend(right);
                Condition::Or(left)
            }
            (Condition::Or(mut left), other) => {
                left.push(other);
                Condition::Or(left)
            }
            (this, other) => Condition::Or(vec![this, other]),
        }
    }

    pub fn is_always_true(&self) -> bool {
        match self {
            Condition::And(parts) => parts.iter().all(Condition::is_always_true),
            _ => false,
        }
    }

    pub fn push_sql(&self, qb: &mut PgQuery, scope: Scope) {
        match self {
            Condition::Compare {
                column,
                operator,
                value,
            } => {
                qb.push(column.qualified(scope))
                    .push(" ")
                    .push(operator.as_sql())
                    .push(" ");
                value.push_bind(qb);
            }
            Condition::Between { column, low, high } => {
                qb.push(column.qualified(scope)).push(" BETWEEN ");
                low.push_bind(qb);
                qb.push(" AND ");
                high.push_bind(qb);
            }
            Condition::In { column, values } => {
                if values.is_empty() {
                    qb.push("FALSE");
                    return;
                }
                qb.push(column.qualified(scope)).push(" IN (");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        qb.push(", ");
                    }
                    value.push_bind(qb);
                }
                qb.push(")");
            }
            Condition::IsNull { column } => {
                qb.push(column.qualified(scope)).push(" IS NULL");
            }
            Condition::IsNotNull { column } => {
                qb.push(column.qualified(scope)).push(" IS NOT NULL");
            }
            Condition::CompareSubquery {
                column,
                operator,
                subquery,
            } => {
                qb.push(column.qualified(scope))
                    .push(" ")
                    .push(operator.as_sql())
                    .push(" ");
                subquery.push_sql(qb);
            }
            Condition::InSubquery { column, subquery } => {
                qb.push(column.qualified(scope)).push(" IN ");
                subquery.push_sql(qb);
            }
            Condition::And(parts) => push_joined(qb, scope, parts, " AND ", "TRUE"),
            Condition::Or(parts) => push_joined(qb, scope, parts, " OR ", "FALSE"),
        }
    }

    /// SQL text with `$n` placeholders, mostly for logging and tests
    pub fn to_sql(&self, scope: Scope) -> String {
        let mut qb = PgQuery::new("");
        self.push_sql(&mut qb, scope);
        qb.sql().to_string()
    }

    /// SQL three-valued evaluation against one joined row. `universe` is every
    /// joined row of the store and feeds subqueries.
    pub fn evaluate(&self, row: &MemberTeamRow, universe: &[MemberTeamRow]) -> Option<bool> {
        match self {
            Condition::Compare {
                column,
                operator,
                value,
            } => {
                let actual = column.extract(row)?;
                Some(operator.holds(actual.compare(value)?))
            }
            Condition::Between { column, low, high } => {
                let actual = column.extract(row)?;
                let above = actual.compare(low)? != Ordering::Less;
                let below = actual.compare(high)? != Ordering::Greater;
                Some(above && below)
            }
            Condition::In { column, values } => {
                if values.is_empty() {
                    return Some(false);
                }
                let actual = column.extract(row)?;
                Some(
                    values
                        .iter()
                        .any(|v| actual.compare(v) == Some(Ordering::Equal)),
                )
            }
            Condition::IsNull { column } => Some(column.extract(row).is_none()),
            Condition::IsNotNull { column } => Some(column.extract(row).is_some()),
            Condition::CompareSubquery {
                column,
                operator,
                subquery,
            } => {
                let actual = column.extract(row)?;
                let expected = subquery.scalar(universe)?;
                Some(operator.holds(actual.compare(&expected)?))
            }
            Condition::InSubquery { column, subquery } => {
                let actual = column.extract(row)?;
                let candidates = subquery.values(universe);
                if candidates
                    .iter()
                    .flatten()
                    .any(|v| actual.compare(v) == Some(Ordering::Equal))
                {
                    Some(true)
                } else if candidates.iter().any(Option::is_none) {
                    None
                } else {
                    Some(false)
                }
            }
            Condition::And(parts) => {
                let mut unknown = false;
                for part in parts {
                    match part.evaluate(row, universe) {
                        Some(false) => return Some(false),
                        None => unknown = true,
                        Some(true) => {}
                    }
                }
                if unknown {
                    None
                } else {
                    Some(true)
                }
            }
            Condition::Or(parts) => {
                let mut unknown = false;
                for part in parts {
                    match part.evaluate(row, universe) {
                        Some(true) => return Some(true),
                        None => unknown = true,
                        Some(false) => {}
                    }
                }
                if unknown {
                    None
                } else {
                    Some(false)
                }
            }
        }
    }

    /// A row passes a WHERE clause only when the predicate is TRUE
    pub fn matches(&self, row: &MemberTeamRow, universe: &[MemberTeamRow]) -> bool {
        self.evaluate(row, universe) == Some(true)
    }

    /// Outer-query columns the predicate reads; subquery bodies are excluded
    pub fn columns(&self) -> Vec<Column> {
        match self {
            Condition::Compare { column, .. }
            | Condition::Between { column, .. }
            | Condition::In { column, .. }
            | Condition::IsNull { column }
            | Condition::IsNotNull { column }
            | Condition::CompareSubquery { column, .. }
            | Condition::InSubquery { column, .. } => vec![*column],
            Condition::And(parts) | Condition::Or(parts) => {
                parts.iter().flat_map(Condition::columns).collect()
            }
        }
    }

    /// Fails like PostgreSQL when a scalar subquery anywhere in the tree
    /// produces more than one row
    pub fn ensure_scalar_subqueries(&self, universe: &[MemberTeamRow]) -> Result<()> {
        match self {
            Condition::CompareSubquery { subquery, .. } => subquery.ensure_scalar(universe),
            Condition::InSubquery { subquery, .. } => subquery.ensure_nested(universe),
            Condition::And(parts) | Condition::Or(parts) => parts
                .iter()
                .try_for_each(|part| part.ensure_scalar_subqueries(universe)),
            _ => Ok(()),
        }
    }
}

fn push_joined(
    qb: &mut PgQuery,
    scope: Scope,
    parts: &[Condition],
    separator: &str,
    empty: &str,
) {
    match parts {
        [] => {
            qb.push(empty);
        }
        [single] => single.push_sql(qb, scope),
        _ => {
            qb.push("(");
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    qb.push(separator);
                }
                part.push_sql(qb, scope);
            }
            qb.push(")");
        }
    }
}

/// Single-column subquery over `members sub LEFT JOIN teams sub_t`.
/// Nested subqueries reuse the same aliases and must not be correlated.
#[derive(Debug, Clone, PartialEq)]
pub struct Subquery {
    column: Column,
    aggregate: Option<Aggregate>,
    conditions: Vec<Condition>,
}

impl Subquery {
    pub fn select(column: Column) -> Self {
        Self {
            column,
            aggregate: None,
            conditions: Vec::new(),
        }
    }

    pub fn select_aggregate(aggregate: Aggregate, column: Column) -> Self {
        Self {
            column,
            aggregate: Some(aggregate),
            conditions: Vec::new(),
        }
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn value_type(&self) -> ValueType {
        match self.aggregate {
            Some(aggregate) => aggregate.result_type(self.column.value_type()),
            None => self.column.value_type(),
        }
    }

    pub fn push_sql(&self, qb: &mut PgQuery) {
        qb.push("(SELECT ");
        match self.aggregate {
            Some(aggregate) => aggregate.push_sql(qb, self.column, Scope::Subquery),
            None => {
                qb.push(self.column.qualified(Scope::Subquery));
            }
        }
        qb.push(format!(
            " FROM {MEMBER_TABLE} sub LEFT JOIN {TEAM_TABLE} sub_t ON sub.team_id = sub_t.id"
        ));
        let conditions: Vec<&Condition> = self
            .conditions
            .iter()
            .filter(|c| !c.is_always_true())
            .collect();
        if !conditions.is_empty() {
            qb.push(" WHERE ");
            for (i, condition) in conditions.iter().enumerate() {
                if i > 0 {
                    qb.push(" AND ");
                }
                condition.push_sql(qb, Scope::Subquery);
            }
        }
        qb.push(")");
    }

    fn matching<'a>(&self, universe: &'a [MemberTeamRow]) -> Vec<&'a MemberTeamRow> {
        universe
            .iter()
            .filter(|row| self.conditions.iter().all(|c| c.matches(row, universe)))
            .collect()
    }

    /// Result column of the subquery, one entry per produced row
    pub fn values(&self, universe: &[MemberTeamRow]) -> Vec<Option<SqlValue>> {
        let rows = self.matching(universe);
        match self.aggregate {
            Some(aggregate) => vec![aggregate.apply(rows.iter().map(|r| self.column.extract(r)))],
            None => rows.iter().map(|r| self.column.extract(r)).collect(),
        }
    }

    /// Subqueries inside this one's own conditions
    fn ensure_nested(&self, universe: &[MemberTeamRow]) -> Result<()> {
        self.conditions
            .iter()
            .try_for_each(|c| c.ensure_scalar_subqueries(universe))
    }

    /// A non-aggregated subquery used as a value must produce at most one row
    pub fn ensure_scalar(&self, universe: &[MemberTeamRow]) -> Result<()> {
        self.ensure_nested(universe)?;
        if self.aggregate.is_none() {
            let produced = self.matching(universe).len();
            if produced > 1 {
                return Err(MemberSearchError::InvalidQuery(format!(
                    "scalar subquery on {} returned {produced} rows",
                    self.column.qualified(Scope::Subquery)
                )));
            }
        }
        Ok(())
    }

    /// Scalar result: NULL over no rows. Callers check `ensure_scalar` first.
    pub fn scalar(&self, universe: &[MemberTeamRow]) -> Option<SqlValue> {
        let mut values = self.values(universe);
        if values.len() == 1 {
            values.pop().flatten()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, username: Option<&str>, age: i32, team: Option<(i64, &str)>) -> MemberTeamRow {
        MemberTeamRow {
            member_id: id,
            username: username.map(str::to_string),
            age,
            member_team_id: team.map(|(id, _)| id),
            team_id: team.map(|(id, _)| id),
            team_name: team.map(|(_, name)| name.to_string()),
        }
    }

    #[test]
    fn test_compare_renders_bound_parameter() {
        let sql = Column::Username.eq("alice").to_sql(Scope::Outer);
        assert_eq!(sql, "m.username = $1");
    }

    #[test]
    fn test_conjunction_renders_parenthesised() {
        let condition = Column::Age.goe(5).and(Column::TeamName.eq("red"));
        assert_eq!(condition.to_sql(Scope::Outer), "(m.age >= $1 AND t.name = $2)");
    }

    #[test]
    fn test_empty_conjunction_is_true() {
        assert!(Condition::always().is_always_true());
        assert_eq!(Condition::always().to_sql(Scope::Outer), "TRUE");
        assert_eq!(Condition::Or(vec![]).to_sql(Scope::Outer), "FALSE");
    }

    #[test]
    fn test_and_flattens_nested_conjunctions() {
        let condition = Condition::always()
            .and(Column::Age.goe(1))
            .and(Column::Age.loe(9));
        assert_eq!(
            condition,
            Condition::And(vec![Column::Age.goe(1), Column::Age.loe(9)])
        );
    }

    #[test]
    fn test_comparison_against_null_column_is_unknown() {
        let r = row(1, None, 10, None);
        assert_eq!(Column::Username.eq("x").evaluate(&r, &[]), None);
        assert_eq!(Column::TeamName.is_null().evaluate(&r, &[]), Some(true));
        assert!(!Column::Username.ne("x").matches(&r, &[]));
    }

    #[test]
    fn test_or_with_unknown_and_true_is_true() {
        let r = row(1, None, 10, None);
        let condition = Column::Username.eq("x").or(Column::Age.eq(10));
        assert!(condition.matches(&r, &[]));
    }

    #[test]
    fn test_between_is_inclusive() {
        let universe = vec![row(1, Some("a"), 5, None), row(2, Some("b"), 7, None)];
        let condition = Column::Age.between(5, 6);
        assert!(condition.matches(&universe[0], &universe));
        assert!(!condition.matches(&universe[1], &universe));
    }

    #[test]
    fn test_subquery_max_age() {
        let universe = vec![
            row(1, Some("a"), 5, None),
            row(2, Some("b"), 8, None),
            row(3, Some("c"), 6, None),
        ];
        let condition =
            Column::Age.eq_subquery(Subquery::select_aggregate(Aggregate::Max, Column::Age));
        let matched: Vec<i64> = universe
            .iter()
            .filter(|r| condition.matches(r, &universe))
            .map(|r| r.member_id)
            .collect();
        assert_eq!(matched, vec![2]);
    }

    #[test]
    fn test_subquery_sql_uses_subquery_aliases() {
        let condition = Column::Age.in_subquery(Subquery::select(Column::Age).filter(Column::Age.lt(7)));
        assert_eq!(
            condition.to_sql(Scope::Outer),
            "m.age IN (SELECT sub.age FROM members sub LEFT JOIN teams sub_t ON sub.team_id = sub_t.id WHERE sub.age < $1)"
        );
    }

    #[test]
    fn test_grouped_primary_key_determines_its_table() {
        assert!(Column::TeamName.is_determined_by(&[Column::TeamName]));
        assert!(Column::TeamName.is_determined_by(&[Column::TeamId]));
        assert!(Column::Username.is_determined_by(&[Column::MemberId]));
        assert!(!Column::Username.is_determined_by(&[Column::TeamId]));
        assert!(!Column::Age.is_determined_by(&[]));
    }

    #[test]
    fn test_multi_row_scalar_subquery_is_rejected() {
        let universe = vec![row(1, Some("a"), 5, None), row(2, Some("b"), 9, None)];
        let single = Column::Age.eq_subquery(Subquery::select(Column::Age).filter(Column::Age.gt(6)));
        assert!(single.ensure_scalar_subqueries(&universe).is_ok());

        let multi = Column::Age.eq_subquery(Subquery::select(Column::Age));
        let err = multi.ensure_scalar_subqueries(&universe).unwrap_err();
        assert!(matches!(err, MemberSearchError::InvalidQuery(_)));

        let nested = Column::Age.in_subquery(Subquery::select(Column::Age).filter(multi.clone()));
        assert!(nested.ensure_scalar_subqueries(&universe).is_err());
        assert!(Column::Age
            .in_subquery(Subquery::select(Column::Age))
            .ensure_scalar_subqueries(&universe)
            .is_ok());
    }

    #[test]
    fn test_mixed_integer_widths_compare_numerically() {
        assert_eq!(
            SqlValue::Int(3).compare(&SqlValue::BigInt(3)),
            Some(Ordering::Equal)
        );
        assert_eq!(SqlValue::Int(3).compare(&SqlValue::from("3")), None);
    }
}
