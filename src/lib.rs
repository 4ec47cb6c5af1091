pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod services;
pub mod sites;
pub mod sources;
pub mod storage;
pub mod syndication;
