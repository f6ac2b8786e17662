//! Sample data for the `local` profile

use tracing::info;

use crate::error::Result;
use crate::models::{NewMember, NewTeam, Team};
use crate::store::MemberStore;

pub const SAMPLE_MEMBER_COUNT: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub teams: Vec<Team>,
    pub members_created: usize,
}

/// Creates `TeamA` and `TeamB` and members `member0..member99` aged by
/// index, even indexes in `TeamA` and odd ones in `TeamB`
pub async fn seed_sample_data<S: MemberStore + ?Sized>(store: &S) -> Result<SeedSummary> {
    let team_a = store.insert_team(NewTeam::new("TeamA")).await?;
    let team_b = store.insert_team(NewTeam::new("TeamB")).await?;

    for i in 0..SAMPLE_MEMBER_COUNT {
        let team = if i % 2 == 0 { &team_a } else { &team_b };
        store
            .insert_member(NewMember::new(format!("member{i}"), i).in_team(team.id))
            .await?;
    }

    info!(
        teams = 2,
        members = SAMPLE_MEMBER_COUNT,
        "sample data seeded"
    );

    Ok(SeedSummary {
        teams: vec![team_a, team_b],
        members_created: SAMPLE_MEMBER_COUNT as usize,
    })
}
