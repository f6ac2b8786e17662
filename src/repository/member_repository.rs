use std::sync::Arc;
use tracing::debug;

use crate::error::{MemberSearchError, Result};
use crate::models::{Member, MemberTeamRow, NewMember};
use crate::query_builder::{Column, Page, PageRequest};
use crate::search::MemberSearchCondition;
use crate::store::{MemberQuery, MemberStore};

/// Member persistence plus criteria search.
/// Search results come back in member id order.
#[derive(Debug)]
pub struct MemberRepository<S> {
    store: Arc<S>,
}

impl<S> Clone for MemberRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: MemberStore> MemberRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn save(&self, member: NewMember) -> Result<Member> {
        self.store.insert_member(member).await
    }

    pub async fn update(&self, member: &Member) -> Result<Member> {
        self.store.update_member(member).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Member>> {
        self.store.find_member(id).await
    }

    /// Like `find_by_id`, but a missing member is an error
    pub async fn get(&self, id: i64) -> Result<Member> {
        self.find_by_id(id)
            .await?
            .ok_or(MemberSearchError::NotFound {
                entity: "Member",
                id,
            })
    }

    pub async fn find_all(&self) -> Result<Vec<Member>> {
        self.find_members(MemberQuery::new()).await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Vec<Member>> {
        self.find_members(MemberQuery::new().filter(Column::Username.eq(username)))
            .await
    }

    /// Members of a team, looked up through `members.team_id`
    pub async fn find_by_team(&self, team_id: i64) -> Result<Vec<Member>> {
        self.find_members(MemberQuery::new().filter(Column::MemberTeamId.eq(team_id)))
            .await
    }

    async fn find_members(&self, query: MemberQuery) -> Result<Vec<Member>> {
        let rows = self.store.fetch(&query).await?;
        Ok(rows.into_iter().map(Member::from).collect())
    }

    /// Search composed incrementally through a `PredicateBuilder`
    pub async fn search_by_builder(
        &self,
        condition: &MemberSearchCondition,
    ) -> Result<Vec<MemberTeamRow>> {
        let query = MemberQuery::new().filter(condition.to_predicate());
        debug!(?condition, "searching members with predicate builder");
        self.store.fetch(&query).await
    }

    /// Search composed from the ordered list of optional predicates
    pub async fn search(&self, condition: &MemberSearchCondition) -> Result<Vec<MemberTeamRow>> {
        let query = MemberQuery::new().filter_all(condition.where_parts());
        debug!(?condition, "searching members with where parts");
        self.store.fetch(&query).await
    }

    /// One page of results; the total always comes from a separate count query
    pub async fn search_page_simple(
        &self,
        condition: &MemberSearchCondition,
        request: PageRequest,
    ) -> Result<Page<MemberTeamRow>> {
        let query = MemberQuery::new().filter_all(condition.where_parts());
        let content = self.store.fetch(&query.clone().page(request)).await?;
        let total = self.store.count(&query).await?;
        Ok(Page::new(content, request, total))
    }

    /// One page of results; the count query only runs when the total cannot
    /// be derived from the page content
    pub async fn search_page_complex(
        &self,
        condition: &MemberSearchCondition,
        request: PageRequest,
    ) -> Result<Page<MemberTeamRow>> {
        let query = MemberQuery::new().filter_all(condition.where_parts());
        let content = self.store.fetch(&query.clone().page(request)).await?;
        Page::with_lazy_total(content, request, || self.store.count(&query)).await
    }
}
