use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::time::Instant;
use tracing::{debug, instrument};

use super::{MemberQuery, MemberStore};
use crate::error::{MemberSearchError, Result};
use crate::logging::log_database_operation;
use crate::models::{Member, MemberTeamRow, NewMember, NewTeam, Team};
use crate::query_builder::{SelectExpr, SqlValue, Tuple, ValueType, MEMBER_TABLE, TEAM_TABLE};

/// PostgreSQL-backed store; every query goes through the query builder
#[derive(Debug, Clone)]
pub struct PgMemberStore {
    pool: PgPool,
}

impl PgMemberStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn check_team(&self, team_id: Option<i64>) -> Result<()> {
        if let Some(id) = team_id {
            if Team::find_by_id(&self.pool, id).await?.is_none() {
                return Err(MemberSearchError::MissingTeam(id));
            }
        }
        Ok(())
    }
}

fn elapsed_ms(started: Instant) -> Option<u64> {
    u64::try_from(started.elapsed().as_millis()).ok()
}

fn decode_value(row: &PgRow, index: usize, value_type: ValueType) -> Result<Option<SqlValue>> {
    let value = match value_type {
        ValueType::Int => row.try_get::<Option<i32>, _>(index)?.map(SqlValue::Int),
        ValueType::BigInt => row.try_get::<Option<i64>, _>(index)?.map(SqlValue::BigInt),
        ValueType::Float => row.try_get::<Option<f64>, _>(index)?.map(SqlValue::Float),
        ValueType::Text => row.try_get::<Option<String>, _>(index)?.map(SqlValue::Text),
    };
    Ok(value)
}

fn decode_tuple(row: &PgRow, select: &[SelectExpr]) -> Result<Tuple> {
    let values = select
        .iter()
        .enumerate()
        .map(|(index, expr)| decode_value(row, index, expr.value_type()))
        .collect::<Result<Vec<_>>>()?;
    Ok(Tuple::new(values))
}

#[async_trait]
impl MemberStore for PgMemberStore {
    async fn insert_team(&self, team: NewTeam) -> Result<Team> {
        let started = Instant::now();
        let team = Team::create(&self.pool, team).await?;
        log_database_operation(
            "insert",
            Some(TEAM_TABLE),
            Some(team.id),
            "success",
            elapsed_ms(started),
            None,
        );
        Ok(team)
    }

    async fn insert_member(&self, member: NewMember) -> Result<Member> {
        let started = Instant::now();
        self.check_team(member.team_id).await?;
        let member = Member::create(&self.pool, member).await?;
        log_database_operation(
            "insert",
            Some(MEMBER_TABLE),
            Some(member.id),
            "success",
            elapsed_ms(started),
            None,
        );
        Ok(member)
    }

    async fn update_member(&self, member: &Member) -> Result<Member> {
        let started = Instant::now();
        self.check_team(member.team_id).await?;
        let updated = Member::update(&self.pool, member)
            .await?
            .ok_or(MemberSearchError::NotFound {
                entity: "Member",
                id: member.id,
            })?;
        log_database_operation(
            "update",
            Some(MEMBER_TABLE),
            Some(updated.id),
            "success",
            elapsed_ms(started),
            None,
        );
        Ok(updated)
    }

    async fn find_team(&self, id: i64) -> Result<Option<Team>> {
        Ok(Team::find_by_id(&self.pool, id).await?)
    }

    async fn find_member(&self, id: i64) -> Result<Option<Member>> {
        Ok(Member::find_by_id(&self.pool, id).await?)
    }

    #[instrument(skip(self, query))]
    async fn fetch(&self, query: &MemberQuery) -> Result<Vec<MemberTeamRow>> {
        query.ensure_row_query()?;
        let started = Instant::now();
        let builder = query.to_query_builder(&MemberTeamRow::projection());
        debug!(sql = %builder.build_sql(), "fetching member rows");
        let rows: Vec<MemberTeamRow> = builder.fetch_all(&self.pool).await?;
        let details = format!("{} rows", rows.len());
        log_database_operation(
            "fetch",
            Some(MEMBER_TABLE),
            None,
            "success",
            elapsed_ms(started),
            Some(&details),
        );
        Ok(rows)
    }

    #[instrument(skip(self, query))]
    async fn count(&self, query: &MemberQuery) -> Result<u64> {
        let started = Instant::now();
        let total = query.count_query_builder().count(&self.pool).await?;
        log_database_operation(
            "count",
            Some(MEMBER_TABLE),
            None,
            "success",
            elapsed_ms(started),
            None,
        );
        Ok(u64::try_from(total).unwrap_or_default())
    }

    #[instrument(skip(self, query, select))]
    async fn fetch_tuples(&self, query: &MemberQuery, select: &[SelectExpr]) -> Result<Vec<Tuple>> {
        query.ensure_projection(select)?;
        let started = Instant::now();
        let builder = query.to_query_builder(select);
        debug!(sql = %builder.build_sql(), "fetching projection");
        let rows = builder.fetch_rows(&self.pool).await?;
        let tuples = rows
            .iter()
            .map(|row| decode_tuple(row, select))
            .collect::<Result<Vec<_>>>()?;
        let details = format!("{} tuples", tuples.len());
        log_database_operation(
            "fetch_tuples",
            Some(MEMBER_TABLE),
            None,
            "success",
            elapsed_ms(started),
            Some(&details),
        );
        Ok(tuples)
    }
}
