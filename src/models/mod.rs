pub mod member;
pub mod member_team;
pub mod team;

pub use member::{Member, NewMember};
pub use member_team::{MemberDto, MemberTeamRow, UserDto};
pub use team::{NewTeam, Team};
