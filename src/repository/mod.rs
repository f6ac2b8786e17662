//! Repositories wiring search criteria and pagination to a [`MemberStore`](crate::store::MemberStore)

pub mod member_repository;
pub mod team_repository;

pub use member_repository::MemberRepository;
pub use team_repository::TeamRepository;
