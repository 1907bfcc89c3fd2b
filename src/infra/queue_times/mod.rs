pub mod client;

pub use client::QueueTimesClient;
