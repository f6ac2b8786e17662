use super::conditions::{Column, Condition, PgQuery, Scope};
use super::expressions::{OrderBy, SelectExpr};
use super::{Join, Pagination};
use sqlx::postgres::PgRow;
use sqlx::PgPool;

/// Main query builder for member/team SQL.
/// Every value is pushed as a bound parameter; only identifiers and
/// LIMIT/OFFSET literals are written into the SQL text.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    base_table: String,
    select_fields: Vec<SelectExpr>,
    joins: Vec<Join>,
    where_clauses: Vec<Condition>,
    group_by: Vec<Column>,
    order_by: Vec<OrderBy>,
    pagination: Option<Pagination>,
}

impl QueryBuilder {
    /// Create a new query builder for the given table (with its alias)
    pub fn new(table: &str) -> Self {
        Self {
            base_table: table.to_string(),
            select_fields: Vec::new(),
            joins: Vec::new(),
            where_clauses: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            pagination: None,
        }
    }

    /// Set the select list; an empty list selects `*`
    pub fn select(mut self, fields: impl IntoIterator<Item = SelectExpr>) -> Self {
        self.select_fields = fields.into_iter().collect();
        self
    }

    /// Add a JOIN clause
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Add an INNER JOIN
    pub fn inner_join(self, table: &str, on_condition: &str) -> Self {
        self.join(Join::inner(table, on_condition))
    }

    /// Add a LEFT JOIN
    pub fn left_join(self, table: &str, on_condition: &str) -> Self {
        self.join(Join::left(table, on_condition))
    }

    /// Add a WHERE condition; always-true conditions render nothing
    pub fn where_condition(mut self, condition: Condition) -> Self {
        self.where_clauses.push(condition);
        self
    }

    /// Add every present condition, skipping the absent ones
    pub fn where_all(mut self, conditions: impl IntoIterator<Item = Option<Condition>>) -> Self {
        self.where_clauses.extend(conditions.into_iter().flatten());
        self
    }

    /// Add GROUP BY columns
    pub fn group_by(mut self, columns: &[Column]) -> Self {
        self.group_by.extend_from_slice(columns);
        self
    }

    /// Add ORDER BY clause
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Add LIMIT clause
    pub fn limit(mut self, limit: u64) -> Self {
        if let Some(ref mut pagination) = self.pagination {
            pagination.limit = Some(limit);
        } else {
            self.pagination = Some(Pagination::limit_only(limit));
        }
        self
    }

    /// Add OFFSET clause
    pub fn offset(mut self, offset: u64) -> Self {
        if let Some(ref mut pagination) = self.pagination {
            pagination.offset = Some(offset);
        } else {
            self.pagination = Some(Pagination::offset_only(offset));
        }
        self
    }

    fn effective_conditions(&self) -> impl Iterator<Item = &Condition> {
        self.where_clauses.iter().filter(|c| !c.is_always_true())
    }

    fn push_from(&self, qb: &mut PgQuery) {
        qb.push(" FROM ").push(&self.base_table);

        for join in &self.joins {
            qb.push(" ");
            join.push_sql(qb);
        }

        let mut conditions = self.effective_conditions().peekable();
        if conditions.peek().is_some() {
            qb.push(" WHERE ");
            for (i, condition) in conditions.enumerate() {
                if i > 0 {
                    qb.push(" AND ");
                }
                condition.push_sql(qb, Scope::Outer);
            }
        }
    }

    fn push_group_by(&self, qb: &mut PgQuery) {
        if !self.group_by.is_empty() {
            let columns: Vec<String> = self
                .group_by
                .iter()
                .map(|c| c.qualified(Scope::Outer))
                .collect();
            qb.push(" GROUP BY ").push(columns.join(", "));
        }
    }

    /// Build the complete parameterised statement
    pub fn build(&self) -> PgQuery {
        let mut qb = PgQuery::new("SELECT ");

        if self.select_fields.is_empty() {
            qb.push("*");
        }
        for (i, field) in self.select_fields.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            field.push_sql(&mut qb, Scope::Outer);
        }

        self.push_from(&mut qb);
        self.push_group_by(&mut qb);

        for (i, order) in self.order_by.iter().enumerate() {
            qb.push(if i == 0 { " ORDER BY " } else { ", " });
            order.push_sql(&mut qb, Scope::Outer);
        }

        if let Some(ref pagination) = self.pagination {
            qb.push(pagination.to_sql());
        }

        qb
    }

    /// Build the SQL text with `$n` placeholders
    pub fn build_sql(&self) -> String {
        self.build().sql().to_string()
    }

    /// COUNT over the same FROM/JOIN/WHERE, ignoring ordering and pagination.
    /// Grouped queries count groups.
    pub fn count_query(&self) -> PgQuery {
        if self.group_by.is_empty() {
            let mut qb = PgQuery::new("SELECT COUNT(*)");
            self.push_from(&mut qb);
            qb
        } else {
            let mut qb = PgQuery::new("SELECT COUNT(*) FROM (SELECT 1");
            self.push_from(&mut qb);
            self.push_group_by(&mut qb);
            qb.push(") grouped");
            qb
        }
    }

    /// Execute the query and return all rows
    pub async fn fetch_all<T>(&self, pool: &PgPool) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut qb = self.build();
        qb.build_query_as::<T>().fetch_all(pool).await
    }

    /// Execute the query and return optional row
    pub async fn fetch_optional<T>(&self, pool: &PgPool) -> Result<Option<T>, sqlx::Error>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut qb = self.build();
        qb.build_query_as::<T>().fetch_optional(pool).await
    }

    /// Execute the query and return raw rows, for projections decoded by position
    pub async fn fetch_rows(&self, pool: &PgPool) -> Result<Vec<PgRow>, sqlx::Error> {
        let mut qb = self.build();
        qb.build().fetch_all(pool).await
    }

    /// Execute count query
    pub async fn count(&self, pool: &PgPool) -> Result<i64, sqlx::Error> {
        let mut qb = self.count_query();
        qb.build_query_scalar::<i64>().fetch_one(pool).await
    }
}
