pub mod account;
pub mod hash;
pub mod jwt;
