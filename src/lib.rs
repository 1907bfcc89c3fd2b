pub mod analyzers;
pub mod calendar;
pub mod config;
pub mod error;
pub mod fetch;
pub mod hours;
pub mod infra;
pub mod live;
pub mod output;
pub mod parser;
pub mod patterns;
pub mod report;
pub mod services;
pub mod stats;
pub mod summary;
pub mod tables;
