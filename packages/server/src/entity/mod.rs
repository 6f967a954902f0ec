pub mod profile;
pub mod team;
pub mod user;
pub mod vote;
pub mod voting_config;
