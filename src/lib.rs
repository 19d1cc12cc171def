pub mod clients;
pub mod config;
pub mod corpus;
pub mod error;
pub mod models;
pub mod processor;
pub mod scrapers;
pub mod store;
pub mod viewer;
