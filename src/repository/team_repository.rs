use std::sync::Arc;

use crate::error::{MemberSearchError, Result};
use crate::models::{Member, NewTeam, Team};
use crate::query_builder::Column;
use crate::store::{MemberQuery, MemberStore};

#[derive(Debug)]
pub struct TeamRepository<S> {
    store: Arc<S>,
}

impl<S> Clone for TeamRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: MemberStore> TeamRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn save(&self, team: NewTeam) -> Result<Team> {
        self.store.insert_team(team).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Team>> {
        self.store.find_team(id).await
    }

    /// Members currently pointing at the team, in id order. A team never
    /// stores its members; this is always a fresh lookup.
    pub async fn members(&self, team_id: i64) -> Result<Vec<Member>> {
        if self.find_by_id(team_id).await?.is_none() {
            return Err(MemberSearchError::NotFound {
                entity: "Team",
                id: team_id,
            });
        }
        let query = MemberQuery::new().filter(Column::MemberTeamId.eq(team_id));
        let rows = self.store.fetch(&query).await?;
        Ok(rows.into_iter().map(Member::from).collect())
    }
}
