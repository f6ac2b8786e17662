use async_trait::async_trait;
use parking_lot::RwLock;
use std::cmp::Ordering;
use tracing::debug;

use super::{MemberQuery, MemberStore};
use crate::error::{MemberSearchError, Result};
use crate::models::{Member, MemberTeamRow, NewMember, NewTeam, Team};
use crate::query_builder::{JoinType, OrderBy, SelectExpr, SqlValue, Tuple};

#[derive(Debug, Default)]
struct StoreState {
    teams: Vec<Team>,
    members: Vec<Member>,
    next_team_id: i64,
    next_member_id: i64,
}

impl StoreState {
    fn team(&self, id: i64) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    fn check_team(&self, team_id: Option<i64>) -> Result<()> {
        match team_id {
            Some(id) if self.team(id).is_none() => Err(MemberSearchError::MissingTeam(id)),
            _ => Ok(()),
        }
    }

    /// `members LEFT JOIN teams`, the relation subqueries read from
    fn universe(&self) -> Vec<MemberTeamRow> {
        self.members
            .iter()
            .map(|m| MemberTeamRow::new(m, m.team_id.and_then(|id| self.team(id))))
            .collect()
    }
}

/// In-process store evaluating queries with PostgreSQL semantics.
/// Rows come back in insertion (id) order unless the query orders them.
#[derive(Debug, Default)]
pub struct InMemoryMemberStore {
    state: RwLock<StoreState>,
}

impl InMemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member_count(&self) -> usize {
        self.state.read().members.len()
    }

    /// Joined and filtered rows, before ordering and pagination. `exprs` are
    /// the select and ordering expressions the caller will evaluate; their
    /// scalar subqueries are checked along with the predicates'.
    fn select_rows<'a>(
        &self,
        query: &MemberQuery,
        exprs: impl IntoIterator<Item = &'a SelectExpr>,
    ) -> Result<(Vec<MemberTeamRow>, Vec<MemberTeamRow>)> {
        let state = self.state.read();
        let universe = state.universe();
        let predicate = query.predicate();

        predicate.ensure_scalar_subqueries(&universe)?;
        if let Some(filter) = query.join_filter() {
            filter.ensure_scalar_subqueries(&universe)?;
        }
        for expr in exprs {
            expr.ensure_scalar_subqueries(&universe)?;
        }

        let rows = universe
            .iter()
            .filter_map(|row| {
                let joined = match query.join_filter() {
                    Some(filter) if row.team_id.is_some() && !filter.matches(row, &universe) => {
                        row.clone().without_team()
                    }
                    _ => row.clone(),
                };
                if query.join_type() == JoinType::Inner && joined.team_id.is_none() {
                    return None;
                }
                predicate.matches(&joined, &universe).then_some(joined)
            })
            .collect();

        Ok((rows, universe))
    }
}

fn compare_by(
    ordering: &[OrderBy],
    a: &[Option<SqlValue>],
    b: &[Option<SqlValue>],
) -> Ordering {
    ordering
        .iter()
        .zip(a.iter().zip(b.iter()))
        .map(|(order, (a, b))| order.compare(a, b))
        .find(|o| *o != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Stable sort by precomputed keys, so ties keep their incoming order
fn sort_by_keys<T>(items: Vec<T>, keys: Vec<Vec<Option<SqlValue>>>, ordering: &[OrderBy]) -> Vec<T> {
    if ordering.is_empty() {
        return items;
    }
    let mut keyed: Vec<(Vec<Option<SqlValue>>, T)> = keys.into_iter().zip(items).collect();
    keyed.sort_by(|(a, _), (b, _)| compare_by(ordering, a, b));
    keyed.into_iter().map(|(_, item)| item).collect()
}

#[async_trait]
impl MemberStore for InMemoryMemberStore {
    async fn insert_team(&self, team: NewTeam) -> Result<Team> {
        let mut state = self.state.write();
        state.next_team_id += 1;
        let team = Team {
            id: state.next_team_id,
            name: team.name,
        };
        state.teams.push(team.clone());
        debug!(team_id = team.id, "inserted team");
        Ok(team)
    }

    async fn insert_member(&self, member: NewMember) -> Result<Member> {
        let mut state = self.state.write();
        state.check_team(member.team_id)?;
        state.next_member_id += 1;
        let member = Member {
            id: state.next_member_id,
            username: member.username,
            age: member.age,
            team_id: member.team_id,
        };
        state.members.push(member.clone());
        debug!(member_id = member.id, "inserted member");
        Ok(member)
    }

    async fn update_member(&self, member: &Member) -> Result<Member> {
        let mut state = self.state.write();
        state.check_team(member.team_id)?;
        let stored = state
            .members
            .iter_mut()
            .find(|m| m.id == member.id)
            .ok_or(MemberSearchError::NotFound {
                entity: "Member",
                id: member.id,
            })?;
        *stored = member.clone();
        Ok(member.clone())
    }

    async fn find_team(&self, id: i64) -> Result<Option<Team>> {
        Ok(self.state.read().team(id).cloned())
    }

    async fn find_member(&self, id: i64) -> Result<Option<Member>> {
        Ok(self.state.read().members.iter().find(|m| m.id == id).cloned())
    }

    async fn fetch(&self, query: &MemberQuery) -> Result<Vec<MemberTeamRow>> {
        query.ensure_row_query()?;
        let order_keys = query.ordering().iter().map(|order| &order.expr);
        let (rows, universe) = self.select_rows(query, order_keys)?;
        let keys: Vec<Vec<Option<SqlValue>>> = rows
            .iter()
            .map(|row| {
                query
                    .ordering()
                    .iter()
                    .map(|order| order.expr.evaluate(row, &universe))
                    .collect()
            })
            .collect();
        let sorted = sort_by_keys(rows, keys, query.ordering());
        Ok(query.pagination().apply(sorted))
    }

    async fn count(&self, query: &MemberQuery) -> Result<u64> {
        let (rows, _) = self.select_rows(&query.without_window(), std::iter::empty())?;
        Ok(rows.len() as u64)
    }

    async fn fetch_tuples(&self, query: &MemberQuery, select: &[SelectExpr]) -> Result<Vec<Tuple>> {
        query.ensure_projection(select)?;
        let exprs = select
            .iter()
            .chain(query.ordering().iter().map(|order| &order.expr));
        let (rows, universe) = self.select_rows(query, exprs)?;

        let groups: Vec<Vec<&MemberTeamRow>> = if !query.grouping().is_empty() {
            let mut groups: Vec<(Vec<Option<SqlValue>>, Vec<&MemberTeamRow>)> = Vec::new();
            for row in &rows {
                let key: Vec<Option<SqlValue>> =
                    query.grouping().iter().map(|c| c.extract(row)).collect();
                match groups.iter().position(|(k, _)| *k == key) {
                    Some(i) => groups[i].1.push(row),
                    None => groups.push((key, vec![row])),
                }
            }
            groups.into_iter().map(|(_, members)| members).collect()
        } else if query.is_grouped(select) {
            vec![rows.iter().collect()]
        } else {
            rows.iter().map(|row| vec![row]).collect()
        };

        let keys: Vec<Vec<Option<SqlValue>>> = groups
            .iter()
            .map(|group| {
                query
                    .ordering()
                    .iter()
                    .map(|order| order.expr.evaluate_group(group, &universe))
                    .collect()
            })
            .collect();
        let sorted = sort_by_keys(groups, keys, query.ordering());

        let tuples = query
            .pagination()
            .apply(sorted)
            .into_iter()
            .map(|group| {
                Tuple::new(
                    select
                        .iter()
                        .map(|expr| expr.evaluate_group(&group, &universe))
                        .collect(),
                )
            })
            .collect();
        Ok(tuples)
    }
}
