pub mod park_api;

pub use park_api::ParkDataApi;
