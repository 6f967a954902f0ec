pub mod auth;
pub mod profile;
pub mod shared;
pub mod team;
pub mod vote;
pub mod voting_config;
