mod common;

use std::sync::Arc;

use common::strategies::*;
use member_search::models::{NewMember, NewTeam};
use member_search::query_builder::PageRequest;
use member_search::repository::MemberRepository;
use member_search::search::MemberSearchCondition;
use member_search::store::{InMemoryMemberStore, MemberStore};
use member_search::MemberTeamRow;
use proptest::prelude::*;

fn build_repository(specs: &[MemberSpec]) -> MemberRepository<InMemoryMemberStore> {
    tokio_test::block_on(async {
        let store = Arc::new(InMemoryMemberStore::new());
        let mut team_ids = Vec::new();
        for name in TEAM_NAMES {
            team_ids.push(store.insert_team(NewTeam::new(name)).await.unwrap().id);
        }
        for spec in specs {
            let member = NewMember {
                username: spec.username.clone(),
                age: spec.age,
                team_id: spec.team.map(|i| team_ids[i]),
            };
            store.insert_member(member).await.unwrap();
        }
        MemberRepository::new(store)
    })
}

/// Straightforward reading of the criteria against the generated members
fn expected_usernames(specs: &[MemberSpec], condition: &MemberSearchCondition) -> Vec<Option<String>> {
    specs
        .iter()
        .filter(|spec| {
            condition.username.as_deref().map_or(true, |u| spec.username.as_deref() == Some(u))
                && condition.team_name.as_deref()
                    .map_or(true, |t| spec.team.map(|i| TEAM_NAMES[i]) == Some(t))
                && condition.age_goe.map_or(true, |goe| spec.age >= goe)
                && condition.age_loe.map_or(true, |loe| spec.age <= loe)
        })
        .map(|spec| spec.username.clone())
        .collect()
}

fn usernames(rows: &[MemberTeamRow]) -> Vec<Option<String>> {
    rows.iter().map(|r| r.username.clone()).collect()
}

proptest! {
    /// Property: search returns exactly the members satisfying every present criterion, in insertion order
    #[test]
    fn search_matches_reference_filter(
        specs in member_specs_strategy(),
        condition in search_condition_strategy(),
    ) {
        let repository = build_repository(&specs);
        let rows = tokio_test::block_on(repository.search(&condition)).unwrap();
        prop_assert_eq!(usernames(&rows), expected_usernames(&specs, &condition));
    }

    /// Property: both composition strategies select the same rows
    #[test]
    fn composition_strategies_agree(
        specs in member_specs_strategy(),
        condition in search_condition_strategy(),
    ) {
        let repository = build_repository(&specs);
        let by_list = tokio_test::block_on(repository.search(&condition)).unwrap();
        let by_builder = tokio_test::block_on(repository.search_by_builder(&condition)).unwrap();
        prop_assert_eq!(by_list, by_builder);
    }

    /// Property: pages partition the full result and report its size
    #[test]
    fn pages_partition_the_result(
        specs in member_specs_strategy(),
        condition in search_condition_strategy(),
        size in 1u32..6,
    ) {
        let repository = build_repository(&specs);
        let all = tokio_test::block_on(repository.search(&condition)).unwrap();

        let mut collected = Vec::new();
        let mut request = PageRequest::of(0, size);
        loop {
            let simple = tokio_test::block_on(repository.search_page_simple(&condition, request)).unwrap();
            let complex = tokio_test::block_on(repository.search_page_complex(&condition, request)).unwrap();
            prop_assert_eq!(simple.total_elements, all.len() as u64);
            prop_assert_eq!(&complex, &simple);
            if simple.content.is_empty() {
                break;
            }
            collected.extend(simple.content);
            request = request.next();
        }
        prop_assert_eq!(collected, all);
    }
}
