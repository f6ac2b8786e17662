//! # Query Execution
//!
//! [`MemberQuery`] describes a query over `members m [LEFT|INNER] JOIN teams t`
//! and a [`MemberStore`] runs it. [`PgMemberStore`] renders it to SQL through
//! the query builder; [`InMemoryMemberStore`] evaluates the same predicate tree
//! over in-process rows with the same NULL and join semantics.

use async_trait::async_trait;

use crate::error::{MemberSearchError, Result};
use crate::models::{Member, MemberTeamRow, NewMember, NewTeam, Team};
use crate::query_builder::{
    Column, Condition, Join, JoinType, OrderBy, PageRequest, Pagination, QueryBuilder, Scope,
    SelectExpr, Tuple, MEMBER_TABLE,
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryMemberStore;
pub use postgres::PgMemberStore;

/// Structured member ⟕ team query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberQuery {
    join_type: JoinType,
    join_filter: Option<Condition>,
    conditions: Vec<Condition>,
    group_by: Vec<Column>,
    order_by: Vec<OrderBy>,
    pagination: Pagination,
}

impl MemberQuery {
    /// LEFT JOIN to teams, no conditions
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner_join(mut self) -> Self {
        self.join_type = JoinType::Inner;
        self
    }

    pub fn left_join(mut self) -> Self {
        self.join_type = JoinType::Left;
        self
    }

    /// Extra ON-clause condition for the team join
    pub fn on(mut self, condition: Condition) -> Self {
        self.join_filter = Some(match self.join_filter.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        if !condition.is_always_true() {
            self.conditions.push(condition);
        }
        self
    }

    /// ANDs every present condition and skips the absent ones
    pub fn filter_all(self, conditions: impl IntoIterator<Item = Option<Condition>>) -> Self {
        conditions.into_iter().flatten().fold(self, Self::filter)
    }

    pub fn group_by(mut self, column: Column) -> Self {
        self.group_by.push(column);
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.pagination.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.pagination.limit = Some(limit);
        self
    }

    pub fn page(mut self, request: PageRequest) -> Self {
        self.pagination = request.pagination();
        self
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn join_filter(&self) -> Option<&Condition> {
        self.join_filter.as_ref()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn grouping(&self) -> &[Column] {
        &self.group_by
    }

    pub fn ordering(&self) -> &[OrderBy] {
        &self.order_by
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// The WHERE clause as a single condition
    pub fn predicate(&self) -> Condition {
        self.conditions
            .iter()
            .cloned()
            .fold(Condition::always(), Condition::and)
    }

    /// The same query with ordering and pagination removed
    pub fn without_window(&self) -> Self {
        Self {
            order_by: Vec::new(),
            pagination: Pagination::default(),
            ..self.clone()
        }
    }

    /// Entity-row fetches cannot be grouped
    pub fn ensure_row_query(&self) -> Result<()> {
        if self.group_by.is_empty() {
            Ok(())
        } else {
            Err(MemberSearchError::InvalidQuery(
                "group_by requires a tuple projection".to_string(),
            ))
        }
    }

    /// In a grouped projection every column read outside an aggregate, in the
    /// select list or the ordering, must be fixed by the grouping
    pub fn ensure_projection(&self, select: &[SelectExpr]) -> Result<()> {
        if !self.is_grouped(select) {
            return Ok(());
        }
        let exprs = select.iter().chain(self.order_by.iter().map(|order| &order.expr));
        for expr in exprs {
            if let Some(column) = expr
                .bare_columns()
                .into_iter()
                .find(|column| !column.is_determined_by(&self.group_by))
            {
                return Err(MemberSearchError::InvalidQuery(format!(
                    "{} must appear in group_by or be used in an aggregate",
                    column.qualified(Scope::Outer)
                )));
            }
        }
        Ok(())
    }

    /// True when the projection collapses rows (grouping or aggregates)
    pub fn is_grouped(&self, select: &[SelectExpr]) -> bool {
        !self.group_by.is_empty() || select.iter().any(SelectExpr::is_aggregate)
    }

    fn base_builder(&self) -> QueryBuilder {
        let mut join = Join::team(self.join_type);
        if let Some(filter) = &self.join_filter {
            join = join.with_filter(filter.clone());
        }
        QueryBuilder::new(&format!("{MEMBER_TABLE} m"))
            .join(join)
            .where_all(self.conditions.iter().cloned().map(Some))
    }

    /// SELECT for the given projection. Ungrouped queries are tie-broken by
    /// member id so that every store returns the same order.
    pub fn to_query_builder(&self, select: &[SelectExpr]) -> QueryBuilder {
        let grouped = self.is_grouped(select);
        let mut builder = self
            .base_builder()
            .select(select.iter().cloned())
            .group_by(&self.group_by);
        for order in &self.order_by {
            builder = builder.order_by(order.clone());
        }
        if !grouped {
            builder = builder.order_by(Column::MemberId.asc());
        }
        builder.paginate(self.pagination)
    }

    /// COUNT over the joined and filtered rows; grouping, ordering and
    /// pagination are ignored
    pub fn count_query_builder(&self) -> QueryBuilder {
        self.base_builder()
    }
}

/// Query-execution collaborator for members and teams
#[async_trait]
pub trait MemberStore: Send + Sync {
    async fn insert_team(&self, team: NewTeam) -> Result<Team>;

    /// Fails with `MissingTeam` when `team_id` names no team
    async fn insert_member(&self, member: NewMember) -> Result<Member>;

    /// Full-record replacement. Fails with `NotFound` for an unknown id and
    /// `MissingTeam` for an unknown team
    async fn update_member(&self, member: &Member) -> Result<Member>;

    async fn find_team(&self, id: i64) -> Result<Option<Team>>;

    async fn find_member(&self, id: i64) -> Result<Option<Member>>;

    /// Every matching joined row
    async fn fetch(&self, query: &MemberQuery) -> Result<Vec<MemberTeamRow>>;

    /// Number of rows `fetch` would return without pagination
    async fn count(&self, query: &MemberQuery) -> Result<u64>;

    /// Projected rows, one tuple value per select expression
    async fn fetch_tuples(&self, query: &MemberQuery, select: &[SelectExpr]) -> Result<Vec<Tuple>>;

    /// At most one row; more than one is an error
    async fn fetch_one(&self, query: &MemberQuery) -> Result<Option<MemberTeamRow>> {
        let mut rows = self.fetch(query).await?;
        match rows.len() {
            0 | 1 => Ok(rows.pop()),
            n => Err(MemberSearchError::NonUniqueResult(n)),
        }
    }

    /// First row, if any
    async fn fetch_first(&self, query: &MemberQuery) -> Result<Option<MemberTeamRow>> {
        let first = query.clone().limit(1);
        Ok(self.fetch(&first).await?.into_iter().next())
    }
}
