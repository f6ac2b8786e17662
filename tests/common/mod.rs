#![allow(dead_code)]

pub mod strategies;

use std::sync::Arc;

use member_search::models::{Member, NewMember, NewTeam, Team};
use member_search::repository::{MemberRepository, TeamRepository};
use member_search::store::{InMemoryMemberStore, MemberStore};

/// teamA: member1 (10), member2 (20); teamB: member3 (30), member4 (40)
pub struct Fixture {
    pub store: Arc<InMemoryMemberStore>,
    pub team_a: Team,
    pub team_b: Team,
    pub members: Vec<Member>,
}

impl Fixture {
    pub fn member_repository(&self) -> MemberRepository<InMemoryMemberStore> {
        MemberRepository::new(self.store.clone())
    }

    pub fn team_repository(&self) -> TeamRepository<InMemoryMemberStore> {
        TeamRepository::new(self.store.clone())
    }
}

pub async fn four_members() -> Fixture {
    let store = Arc::new(InMemoryMemberStore::new());
    let team_a = store.insert_team(NewTeam::new("teamA")).await.unwrap();
    let team_b = store.insert_team(NewTeam::new("teamB")).await.unwrap();

    let mut members = Vec::new();
    for (name, age, team) in [
        ("member1", 10, &team_a),
        ("member2", 20, &team_a),
        ("member3", 30, &team_b),
        ("member4", 40, &team_b),
    ] {
        members.push(
            store
                .insert_member(NewMember::new(name, age).in_team(team.id))
                .await
                .unwrap(),
        );
    }

    Fixture {
        store,
        team_a,
        team_b,
        members,
    }
}

/// A(5, T1), B(6, T1), C(7, T2)
pub async fn three_members() -> Fixture {
    let store = Arc::new(InMemoryMemberStore::new());
    let team_a = store.insert_team(NewTeam::new("T1")).await.unwrap();
    let team_b = store.insert_team(NewTeam::new("T2")).await.unwrap();

    let mut members = Vec::new();
    for (name, age, team) in [("A", 5, &team_a), ("B", 6, &team_a), ("C", 7, &team_b)] {
        members.push(
            store
                .insert_member(NewMember::new(name, age).in_team(team.id))
                .await
                .unwrap(),
        );
    }

    Fixture {
        store,
        team_a,
        team_b,
        members,
    }
}

pub fn usernames<'a, I, T>(rows: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a T>,
    T: HasUsername + 'a,
{
    rows.into_iter()
        .map(|row| row.username().unwrap_or("<null>").to_string())
        .collect()
}

pub trait HasUsername {
    fn username(&self) -> Option<&str>;
}

impl HasUsername for Member {
    fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}

impl HasUsername for member_search::MemberTeamRow {
    fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}
