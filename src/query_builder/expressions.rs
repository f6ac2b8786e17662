//! Select-list expressions, ordering and projected tuples.

use serde::Serialize;
use std::cmp::Ordering;

use super::conditions::{Column, Condition, PgQuery, Scope, SqlValue, Subquery, ValueType};
use crate::error::Result;
use crate::models::MemberTeamRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Count,
    Sum,
    Avg,
    Max,
    Min,
}

impl Aggregate {
    pub fn result_type(self, input: ValueType) -> ValueType {
        match self {
            Aggregate::Count | Aggregate::Sum => ValueType::BigInt,
            Aggregate::Avg => ValueType::Float,
            Aggregate::Max | Aggregate::Min => input,
        }
    }

    /// SUM and AVG are cast so integer inputs never come back as NUMERIC
    pub fn push_sql(self, qb: &mut PgQuery, column: Column, scope: Scope) {
        let column = column.qualified(scope);
        match self {
            Aggregate::Count => qb.push(format!("COUNT({column})")),
            Aggregate::Sum => qb.push(format!("SUM({column})::bigint")),
            Aggregate::Avg => qb.push(format!("AVG({column})::float8")),
            Aggregate::Max => qb.push(format!("MAX({column})")),
            Aggregate::Min => qb.push(format!("MIN({column})")),
        };
    }

    /// Folds column values the way the SQL aggregate does: NULLs are skipped,
    /// and every aggregate but COUNT is NULL over no values.
    pub fn apply(self, values: impl IntoIterator<Item = Option<SqlValue>>) -> Option<SqlValue> {
        let present: Vec<SqlValue> = values.into_iter().flatten().collect();
        match self {
            Aggregate::Count => Some(SqlValue::BigInt(present.len() as i64)),
            Aggregate::Sum => {
                if present.is_empty() {
                    return None;
                }
                Some(SqlValue::BigInt(
                    present.iter().filter_map(SqlValue::as_i64).sum(),
                ))
            }
            Aggregate::Avg => {
                if present.is_empty() {
                    return None;
                }
                let total: f64 = present.iter().filter_map(SqlValue::as_f64).sum();
                Some(SqlValue::Float(total / present.len() as f64))
            }
            Aggregate::Max => present
                .into_iter()
                .reduce(|a, b| if b.compare(&a) == Some(Ordering::Greater) { b } else { a }),
            Aggregate::Min => present
                .into_iter()
                .reduce(|a, b| if b.compare(&a) == Some(Ordering::Less) { b } else { a }),
        }
    }
}

/// An item of a SELECT list (or an ORDER BY key)
#[derive(Debug, Clone, PartialEq)]
pub enum SelectExpr {
    Column(Column),
    Aggregate(Aggregate, Column),
    Case(CaseExpression),
    Constant(SqlValue),
    Concat(Vec<SelectExpr>),
    Subquery(Box<Subquery>),
    Aliased(Box<SelectExpr>, String),
}

impl SelectExpr {
    pub fn constant(value: impl Into<SqlValue>) -> Self {
        SelectExpr::Constant(value.into())
    }

    pub fn subquery(subquery: Subquery) -> Self {
        SelectExpr::Subquery(Box::new(subquery))
    }

    pub fn alias(self, name: impl Into<String>) -> Self {
        SelectExpr::Aliased(Box::new(self), name.into())
    }

    /// String concatenation; non-text operands are cast to text
    pub fn concat(self, other: impl Into<SelectExpr>) -> Self {
        match self {
            SelectExpr::Concat(mut parts) => {
                parts.push(other.into());
                SelectExpr::Concat(parts)
            }
            this => SelectExpr::Concat(vec![this, other.into()]),
        }
    }

    /// The expression without its select-list alias
    pub fn unaliased(&self) -> &SelectExpr {
        match self {
            SelectExpr::Aliased(inner, _) => inner.unaliased(),
            other => other,
        }
    }

    pub fn asc(self) -> OrderBy {
        OrderBy::new(self, Direction::Asc)
    }

    pub fn desc(self) -> OrderBy {
        OrderBy::new(self, Direction::Desc)
    }

    pub fn is_aggregate(&self) -> bool {
        match self {
            SelectExpr::Aggregate(..) => true,
            SelectExpr::Concat(parts) => parts.iter().any(SelectExpr::is_aggregate),
            SelectExpr::Aliased(inner, _) => inner.is_aggregate(),
            _ => false,
        }
    }

    /// Columns read outside any aggregate or subquery
    pub fn bare_columns(&self) -> Vec<Column> {
        match self {
            SelectExpr::Column(column) => vec![*column],
            SelectExpr::Case(case) => case.columns(),
            SelectExpr::Concat(parts) => parts.iter().flat_map(SelectExpr::bare_columns).collect(),
            SelectExpr::Aliased(inner, _) => inner.bare_columns(),
            SelectExpr::Aggregate(..) | SelectExpr::Constant(_) | SelectExpr::Subquery(_) => {
                Vec::new()
            }
        }
    }

    pub fn ensure_scalar_subqueries(&self, universe: &[MemberTeamRow]) -> Result<()> {
        match self {
            SelectExpr::Subquery(subquery) => subquery.ensure_scalar(universe),
            SelectExpr::Case(case) => case
                .branches
                .iter()
                .try_for_each(|(condition, _)| condition.ensure_scalar_subqueries(universe)),
            SelectExpr::Concat(parts) => parts
                .iter()
                .try_for_each(|part| part.ensure_scalar_subqueries(universe)),
            SelectExpr::Aliased(inner, _) => inner.ensure_scalar_subqueries(universe),
            SelectExpr::Column(_) | SelectExpr::Aggregate(..) | SelectExpr::Constant(_) => Ok(()),
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            SelectExpr::Column(column) => column.value_type(),
            SelectExpr::Aggregate(aggregate, column) => aggregate.result_type(column.value_type()),
            SelectExpr::Case(case) => case.value_type(),
            SelectExpr::Constant(value) => value.value_type(),
            SelectExpr::Concat(_) => ValueType::Text,
            SelectExpr::Subquery(subquery) => subquery.value_type(),
            SelectExpr::Aliased(inner, _) => inner.value_type(),
        }
    }

    pub fn push_sql(&self, qb: &mut PgQuery, scope: Scope) {
        match self {
            SelectExpr::Column(column) => {
                qb.push(column.qualified(scope));
            }
            SelectExpr::Aggregate(aggregate, column) => aggregate.push_sql(qb, *column, scope),
            SelectExpr::Case(case) => case.push_sql(qb, scope),
            SelectExpr::Constant(value) => value.push_bind(qb),
            SelectExpr::Concat(parts) => {
                qb.push("(");
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        qb.push(" || ");
                    }
                    let part = part.unaliased();
                    if part.value_type() == ValueType::Text {
                        part.push_sql(qb, scope);
                    } else {
                        qb.push("CAST(");
                        part.push_sql(qb, scope);
                        qb.push(" AS TEXT)");
                    }
                }
                qb.push(")");
            }
            SelectExpr::Subquery(subquery) => subquery.push_sql(qb),
            SelectExpr::Aliased(inner, name) => {
                inner.push_sql(qb, scope);
                qb.push(format!(" AS \"{name}\""));
            }
        }
    }

    /// Value for a single row; aggregates see a group of one
    pub fn evaluate(&self, row: &MemberTeamRow, universe: &[MemberTeamRow]) -> Option<SqlValue> {
        self.evaluate_group(&[row], universe)
    }

    /// Value for a group of rows. Non-aggregate expressions read the first
    /// row, which is only meaningful for grouped columns.
    pub fn evaluate_group(
        &self,
        rows: &[&MemberTeamRow],
        universe: &[MemberTeamRow],
    ) -> Option<SqlValue> {
        match self {
            SelectExpr::Column(column) => column.extract(rows.first()?),
            SelectExpr::Aggregate(aggregate, column) => {
                aggregate.apply(rows.iter().map(|row| column.extract(row)))
            }
            SelectExpr::Case(case) => case.evaluate(rows.first()?, universe),
            SelectExpr::Constant(value) => Some(value.clone()),
            SelectExpr::Concat(parts) => {
                let mut text = String::new();
                for part in parts {
                    text.push_str(&part.evaluate_group(rows, universe)?.to_text());
                }
                Some(SqlValue::Text(text))
            }
            SelectExpr::Subquery(subquery) => subquery.scalar(universe),
            SelectExpr::Aliased(inner, _) => inner.evaluate_group(rows, universe),
        }
    }
}

impl From<Column> for SelectExpr {
    fn from(column: Column) -> Self {
        SelectExpr::Column(column)
    }
}

impl From<CaseExpression> for SelectExpr {
    fn from(case: CaseExpression) -> Self {
        SelectExpr::Case(case)
    }
}

impl From<&str> for SelectExpr {
    fn from(text: &str) -> Self {
        SelectExpr::constant(text)
    }
}

impl Column {
    pub fn expr(self) -> SelectExpr {
        SelectExpr::Column(self)
    }

    pub fn count(self) -> SelectExpr {
        SelectExpr::Aggregate(Aggregate::Count, self)
    }

    pub fn sum(self) -> SelectExpr {
        SelectExpr::Aggregate(Aggregate::Sum, self)
    }

    pub fn avg(self) -> SelectExpr {
        SelectExpr::Aggregate(Aggregate::Avg, self)
    }

    pub fn max(self) -> SelectExpr {
        SelectExpr::Aggregate(Aggregate::Max, self)
    }

    pub fn min(self) -> SelectExpr {
        SelectExpr::Aggregate(Aggregate::Min, self)
    }

    pub fn asc(self) -> OrderBy {
        self.expr().asc()
    }

    pub fn desc(self) -> OrderBy {
        self.expr().desc()
    }

    /// Starts a simple CASE over this column: `CASE col WHEN v THEN ...`
    pub fn case(self) -> SimpleCase {
        SimpleCase {
            subject: self,
            builder: CaseBuilder::new(),
        }
    }
}

/// `CASE WHEN .. THEN .. [ELSE ..] END`
#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpression {
    branches: Vec<(Condition, SqlValue)>,
    otherwise: Option<SqlValue>,
}

impl CaseExpression {
    pub fn value_type(&self) -> ValueType {
        self.branches
            .first()
            .map(|(_, value)| value)
            .or(self.otherwise.as_ref())
            .map_or(ValueType::Text, SqlValue::value_type)
    }

    pub fn columns(&self) -> Vec<Column> {
        self.branches
            .iter()
            .flat_map(|(condition, _)| condition.columns())
            .collect()
    }

    pub fn push_sql(&self, qb: &mut PgQuery, scope: Scope) {
        qb.push("CASE");
        for (condition, value) in &self.branches {
            qb.push(" WHEN ");
            condition.push_sql(qb, scope);
            qb.push(" THEN ");
            value.push_bind(qb);
        }
        if let Some(otherwise) = &self.otherwise {
            qb.push(" ELSE ");
            otherwise.push_bind(qb);
        }
        qb.push(" END");
    }

    pub fn evaluate(&self, row: &MemberTeamRow, universe: &[MemberTeamRow]) -> Option<SqlValue> {
        self.branches
            .iter()
            .find(|(condition, _)| condition.matches(row, universe))
            .map(|(_, value)| value.clone())
            .or_else(|| self.otherwise.clone())
    }
}

/// Searched CASE builder
#[derive(Debug, Clone, Default)]
pub struct CaseBuilder {
    branches: Vec<(Condition, SqlValue)>,
}

impl CaseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn when(self, condition: Condition) -> CaseWhen {
        CaseWhen {
            builder: self,
            condition,
        }
    }

    pub fn otherwise(self, value: impl Into<SqlValue>) -> CaseExpression {
        CaseExpression {
            branches: self.branches,
            otherwise: Some(value.into()),
        }
    }

    /// Finishes without ELSE; unmatched rows yield NULL
    pub fn end(self) -> CaseExpression {
        CaseExpression {
            branches: self.branches,
            otherwise: None,
        }
    }
}

pub struct CaseWhen {
    builder: CaseBuilder,
    condition: Condition,
}

impl CaseWhen {
    pub fn then(mut self, value: impl Into<SqlValue>) -> CaseBuilder {
        self.builder.branches.push((self.condition, value.into()));
        self.builder
    }
}

/// Simple CASE over one column, rendered as the equivalent searched CASE
pub struct SimpleCase {
    subject: Column,
    builder: CaseBuilder,
}

impl SimpleCase {
    pub fn when(self, value: impl Into<SqlValue>) -> SimpleCaseWhen {
        SimpleCaseWhen {
            case: self,
            value: value.into(),
        }
    }

    pub fn otherwise(self, value: impl Into<SqlValue>) -> CaseExpression {
        self.builder.otherwise(value)
    }

    pub fn end(self) -> CaseExpression {
        self.builder.end()
    }
}

pub struct SimpleCaseWhen {
    case: SimpleCase,
    value: SqlValue,
}

impl SimpleCaseWhen {
    pub fn then(self, result: impl Into<SqlValue>) -> SimpleCase {
        let SimpleCase { subject, builder } = self.case;
        SimpleCase {
            subject,
            builder: builder.when(subject.eq(self.value)).then(result),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub expr: SelectExpr,
    pub direction: Direction,
    pub nulls: Option<NullsOrder>,
}

impl OrderBy {
    pub fn new(expr: SelectExpr, direction: Direction) -> Self {
        Self {
            expr,
            direction,
            nulls: None,
        }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(NullsOrder::First);
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(NullsOrder::Last);
        self
    }

    /// PostgreSQL puts NULLs last ascending and first descending
    pub fn effective_nulls(&self) -> NullsOrder {
        self.nulls.unwrap_or(match self.direction {
            Direction::Asc => NullsOrder::Last,
            Direction::Desc => NullsOrder::First,
        })
    }

    /// Sort key only; an alias on the expression is not part of ORDER BY
    pub fn push_sql(&self, qb: &mut PgQuery, scope: Scope) {
        self.expr.unaliased().push_sql(qb, scope);
        qb.push(match self.direction {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        });
        match self.nulls {
            Some(NullsOrder::First) => {
                qb.push(" NULLS FIRST");
            }
            Some(NullsOrder::Last) => {
                qb.push(" NULLS LAST");
            }
            None => {}
        }
    }

    pub fn compare(&self, a: &Option<SqlValue>, b: &Option<SqlValue>) -> Ordering {
        let nulls_first = self.effective_nulls() == NullsOrder::First;
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) if nulls_first => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) if nulls_first => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => {
                let ordering = a.compare(b).unwrap_or(Ordering::Equal);
                match self.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            }
        }
    }
}

/// One projected result row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tuple {
    values: Vec<Option<SqlValue>>,
}

impl Tuple {
    pub fn new(values: Vec<Option<SqlValue>>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)?.as_ref()
    }

    pub fn get_i32(&self, index: usize) -> Option<i32> {
        i32::try_from(self.get(index)?.as_i64()?).ok()
    }

    pub fn get_i64(&self, index: usize) -> Option<i64> {
        self.get(index)?.as_i64()
    }

    pub fn get_f64(&self, index: usize) -> Option<f64> {
        self.get(index)?.as_f64()
    }

    pub fn get_str(&self, index: usize) -> Option<&str> {
        self.get(index)?.as_str()
    }

    pub fn values(&self) -> &[Option<SqlValue>] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(expr: &SelectExpr) -> String {
        let mut qb = PgQuery::new("");
        expr.push_sql(&mut qb, Scope::Outer);
        qb.sql().to_string()
    }

    fn row(age: i32, username: Option<&str>) -> MemberTeamRow {
        MemberTeamRow {
            member_id: i64::from(age),
            username: username.map(str::to_string),
            age,
            member_team_id: None,
            team_id: None,
            team_name: None,
        }
    }

    #[test]
    fn test_aggregate_rendering() {
        assert_eq!(render(&Column::MemberId.count()), "COUNT(m.id)");
        assert_eq!(render(&Column::Age.sum()), "SUM(m.age)::bigint");
        assert_eq!(render(&Column::Age.avg()), "AVG(m.age)::float8");
    }

    #[test]
    fn test_aggregate_apply_skips_nulls() {
        let values = vec![Some(SqlValue::Int(5)), None, Some(SqlValue::Int(8))];
        assert_eq!(Aggregate::Count.apply(values.clone()), Some(SqlValue::BigInt(2)));
        assert_eq!(Aggregate::Sum.apply(values.clone()), Some(SqlValue::BigInt(13)));
        assert_eq!(Aggregate::Avg.apply(values.clone()), Some(SqlValue::Float(6.5)));
        assert_eq!(Aggregate::Max.apply(values.clone()), Some(SqlValue::Int(8)));
        assert_eq!(Aggregate::Min.apply(values), Some(SqlValue::Int(5)));
        assert_eq!(Aggregate::Sum.apply(Vec::<Option<SqlValue>>::new()), None);
        assert_eq!(Aggregate::Count.apply(Vec::<Option<SqlValue>>::new()), Some(SqlValue::BigInt(0)));
    }

    #[test]
    fn test_searched_case_renders_and_evaluates() {
        let case = CaseBuilder::new()
            .when(Column::Age.between(0, 20))
            .then("0-20")
            .when(Column::Age.between(21, 30))
            .then("21-30")
            .otherwise("other");
        let expr = SelectExpr::from(case.clone());
        assert_eq!(
            render(&expr),
            "CASE WHEN m.age BETWEEN $1 AND $2 THEN $3 WHEN m.age BETWEEN $4 AND $5 THEN $6 ELSE $7 END"
        );
        assert_eq!(case.evaluate(&row(25, None), &[]), Some(SqlValue::from("21-30")));
        assert_eq!(case.evaluate(&row(40, None), &[]), Some(SqlValue::from("other")));
    }

    #[test]
    fn test_simple_case_without_else_yields_null() {
        let case = Column::Age.case().when(10).then("ten").when(20).then("twenty").end();
        assert_eq!(case.evaluate(&row(20, None), &[]), Some(SqlValue::from("twenty")));
        assert_eq!(case.evaluate(&row(5, None), &[]), None);
    }

    #[test]
    fn test_concat_casts_non_text() {
        let expr = Column::Username.expr().concat("_").concat(Column::Age);
        assert_eq!(render(&expr), "(m.username || $1 || CAST(m.age AS TEXT))");
        assert_eq!(
            expr.evaluate(&row(7, Some("kim")), &[]),
            Some(SqlValue::from("kim_7"))
        );
        assert_eq!(expr.evaluate(&row(7, None), &[]), None);
    }

    #[test]
    fn test_order_by_default_null_placement() {
        let asc = Column::Username.asc();
        assert_eq!(asc.compare(&None, &Some(SqlValue::from("a"))), Ordering::Greater);
        let desc = Column::Username.desc();
        assert_eq!(desc.compare(&None, &Some(SqlValue::from("a"))), Ordering::Less);
        let desc_nulls_last = Column::Username.desc().nulls_last();
        assert_eq!(
            desc_nulls_last.compare(&None, &Some(SqlValue::from("a"))),
            Ordering::Greater
        );
    }

    #[test]
    fn test_order_by_rendering() {
        let mut qb = PgQuery::new("");
        Column::Username.asc().nulls_last().push_sql(&mut qb, Scope::Outer);
        assert_eq!(qb.sql(), "m.username ASC NULLS LAST");
    }

    #[test]
    fn test_aliases_only_render_in_select_position() {
        let named = Column::Username.expr().alias("name");
        assert_eq!(render(&named), "m.username AS \"name\"");

        let mut qb = PgQuery::new("");
        named.clone().desc().push_sql(&mut qb, Scope::Outer);
        assert_eq!(qb.sql(), "m.username DESC");

        let joined = named.concat(Column::Age.expr().alias("years"));
        assert_eq!(render(&joined), "(m.username || CAST(m.age AS TEXT))");
    }

    #[test]
    fn test_bare_columns_skip_aggregates_and_subqueries() {
        assert_eq!(Column::Age.count().bare_columns(), Vec::<Column>::new());
        assert_eq!(SelectExpr::constant(1).bare_columns(), Vec::<Column>::new());
        let case = CaseBuilder::new().when(Column::TeamName.eq("a")).then(1).end();
        assert_eq!(SelectExpr::from(case).bare_columns(), vec![Column::TeamName]);
        assert_eq!(
            Column::Username.expr().concat(Column::Age.max()).bare_columns(),
            vec![Column::Username]
        );
    }

    #[test]
    fn test_tuple_getters() {
        let tuple = Tuple::new(vec![Some(SqlValue::from("a")), Some(SqlValue::BigInt(4)), None]);
        assert_eq!(tuple.get_str(0), Some("a"));
        assert_eq!(tuple.get_i32(1), Some(4));
        assert_eq!(tuple.get(2), None);
        assert_eq!(tuple.get(9), None);
    }
}
