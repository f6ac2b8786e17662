use member_search::search::MemberSearchCondition;
use proptest::prelude::*;

pub const TEAM_NAMES: [&str; 3] = ["teamA", "teamB", "teamC"];

/// (username, age, index into `TEAM_NAMES` or no team)
#[derive(Debug, Clone)]
pub struct MemberSpec {
    pub username: Option<String>,
    pub age: i32,
    pub team: Option<usize>,
}

pub fn member_spec_strategy() -> impl Strategy<Value = MemberSpec> {
    (
        prop::option::weighted(0.9, prop_oneof![4 => "[a-d]{1,2}", 1 => Just(String::new())]),
        0i32..60,
        prop::option::weighted(0.8, 0usize..TEAM_NAMES.len()),
    )
        .prop_map(|(username, age, team)| MemberSpec {
            username,
            age,
            team,
        })
}

pub fn member_specs_strategy() -> impl Strategy<Value = Vec<MemberSpec>> {
    prop::collection::vec(member_spec_strategy(), 0..25)
}

/// Empty and blank strings are real values and must match by equality
pub fn search_condition_strategy() -> impl Strategy<Value = MemberSearchCondition> {
    (
        prop::option::of(prop_oneof!["[a-d]{1,2}", Just(String::new()), Just("  ".to_string())]),
        prop::option::of(prop_oneof![
            Just("teamA".to_string()),
            Just("teamB".to_string()),
            Just("teamC".to_string()),
            Just("nobody".to_string()),
            Just(String::new()),
        ]),
        prop::option::of(0i32..60),
        prop::option::of(0i32..60),
    )
        .prop_map(|(username, team_name, age_goe, age_loe)| MemberSearchCondition {
            username,
            team_name,
            age_goe,
            age_loe,
        })
}
