use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Member, Team};
use crate::query_builder::{Column, SelectExpr, Tuple};

/// One member joined with its (optional) team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MemberTeamRow {
    pub member_id: i64,
    pub username: Option<String>,
    pub age: i32,
    /// `members.team_id`, kept even when the join rejected the team
    pub member_team_id: Option<i64>,
    pub team_id: Option<i64>,
    pub team_name: Option<String>,
}

impl MemberTeamRow {
    pub fn new(member: &Member, team: Option<&Team>) -> Self {
        Self {
            member_id: member.id,
            username: member.username.clone(),
            age: member.age,
            member_team_id: member.team_id,
            team_id: team.map(|t| t.id),
            team_name: team.map(|t| t.name.clone()),
        }
    }

    /// Select list matching the field names of this row
    pub fn projection() -> Vec<SelectExpr> {
        vec![
            Column::MemberId.expr().alias("member_id"),
            Column::Username.expr().alias("username"),
            Column::Age.expr().alias("age"),
            Column::MemberTeamId.expr().alias("member_team_id"),
            Column::TeamId.expr().alias("team_id"),
            Column::TeamName.expr().alias("team_name"),
        ]
    }

    /// Drop the joined team columns, e.g. when a join filter rejected the team
    pub fn without_team(mut self) -> Self {
        self.team_id = None;
        self.team_name = None;
        self
    }
}

impl From<MemberTeamRow> for Member {
    fn from(row: MemberTeamRow) -> Self {
        Member {
            id: row.member_id,
            username: row.username,
            age: row.age,
            team_id: row.member_team_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDto {
    pub username: Option<String>,
    pub age: i32,
}

impl From<&MemberTeamRow> for MemberDto {
    fn from(row: &MemberTeamRow) -> Self {
        Self {
            username: row.username.clone(),
            age: row.age,
        }
    }
}

impl MemberDto {
    /// Builds from a `(username, age)` tuple
    pub fn from_tuple(tuple: &Tuple) -> Option<Self> {
        Some(Self {
            username: tuple.get_str(0).map(str::to_string),
            age: tuple.get_i32(1)?,
        })
    }
}

/// Projection whose field names differ from the entity's
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub name: Option<String>,
    pub age: i32,
}

impl UserDto {
    /// Builds from a `(name, age)` tuple
    pub fn from_tuple(tuple: &Tuple) -> Option<Self> {
        Some(Self {
            name: tuple.get_str(0).map(str::to_string),
            age: tuple.get_i32(1)?,
        })
    }
}
