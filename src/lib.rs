pub mod auth;
pub mod banner;
pub mod config;
pub mod consts;
pub mod error;
pub mod estimate;
pub mod extract;
pub mod prompts;
pub mod provider;
pub mod report;
pub mod spinner;
