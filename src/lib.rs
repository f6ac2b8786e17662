#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Member Search
//!
//! Type-safe member/team search over PostgreSQL.
//!
//! ## Overview
//!
//! Members optionally belong to a team. Searches take a
//! [`MemberSearchCondition`] whose fields are all optional and combine only
//! the present ones, so an empty condition matches every member. Queries are
//! expressed with a typed DSL and run through a [`MemberStore`]: either
//! PostgreSQL via SQLx or an in-memory store with the same semantics.
//!
//! ## Module Organization
//!
//! - [`query_builder`] - columns, conditions, select expressions and SQL rendering
//! - [`search`] - search criteria and null-safe predicate composition
//! - [`store`] - query execution against PostgreSQL or memory
//! - [`repository`] - member and team repositories, paged search
//! - [`models`] - entities and projections
//! - [`database`] - connection pool and migrations
//! - [`config`] - layered configuration
//! - [`logging`] - tracing setup
//! - [`seed`] - sample data for the `local` profile
//! - [`error`] - structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use member_search::models::{NewMember, NewTeam};
//! use member_search::repository::{MemberRepository, TeamRepository};
//! use member_search::search::MemberSearchCondition;
//! use member_search::store::InMemoryMemberStore;
//!
//! # async fn example() -> member_search::Result<()> {
//! let store = Arc::new(InMemoryMemberStore::new());
//! let teams = TeamRepository::new(store.clone());
//! let members = MemberRepository::new(store);
//!
//! let team = teams.save(NewTeam::new("teamA")).await?;
//! members.save(NewMember::new("member1", 10).in_team(team.id)).await?;
//!
//! let condition = MemberSearchCondition::new().with_team_name("teamA").with_age_goe(5);
//! let found = members.search(&condition).await?;
//! assert_eq!(found.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test                             # unit and in-memory integration tests
//! cargo test --features postgres-tests   # also PostgreSQL tests (needs DATABASE_URL)
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod query_builder;
pub mod repository;
pub mod search;
pub mod seed;
pub mod store;

pub use crate::config::{AppConfig, DatabaseConfig, LoggingConfig};
pub use error::{MemberSearchError, Result};
pub use models::{Member, MemberDto, MemberTeamRow, NewMember, NewTeam, Team, UserDto};
pub use query_builder::{Column, Condition, Page, PageRequest, QueryBuilder, SelectExpr, Tuple};
pub use repository::{MemberRepository, TeamRepository};
pub use search::{MemberSearchCondition, PredicateBuilder};
pub use store::{InMemoryMemberStore, MemberQuery, MemberStore, PgMemberStore};
