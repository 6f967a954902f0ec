mod auth;
mod common;
mod vote;
mod voting_config;
