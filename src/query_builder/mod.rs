//! # Query Builder
//!
//! Typed query construction over the `members m LEFT JOIN teams t` relation.
//!
//! ## Key Components
//!
//! - [`conditions`] - columns, bound values and the WHERE predicate tree
//! - [`expressions`] - select-list items (aggregates, CASE, constants, concat,
//!   scalar subqueries), ordering and projected tuples
//! - [`joins`] - INNER/LEFT join clauses with an optional ON filter
//! - [`pagination`] - LIMIT/OFFSET plus zero-based page requests and pages
//! - [`builder`] - renders everything into a parameterised `sqlx::QueryBuilder`
//!
//! The same predicate tree renders to SQL and evaluates in memory with SQL
//! three-valued logic, so every store implementation sees one query model.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use member_search::query_builder::{Column, Join, JoinType, QueryBuilder};
//!
//! let query = QueryBuilder::new("members m")
//!     .join(Join::team(JoinType::Left))
//!     .where_condition(Column::TeamName.eq("teamA").and(Column::Age.goe(20)))
//!     .order_by(Column::Username.desc().nulls_last())
//!     .limit(10);
//! let members: Vec<MemberTeamRow> = query.fetch_all(&pool).await?;
//! ```

pub mod builder;
pub mod conditions;
pub mod expressions;
pub mod joins;
pub mod pagination;

pub use builder::QueryBuilder;
pub use conditions::{
    Column, Condition, Operator, PgQuery, Scope, SqlValue, Subquery, ValueType, MEMBER_TABLE,
    TEAM_TABLE,
};
pub use expressions::{
    Aggregate, CaseBuilder, CaseExpression, Direction, NullsOrder, OrderBy, SelectExpr, Tuple,
};
pub use joins::{Join, JoinType};
pub use pagination::{Page, PageRequest, Pagination};
