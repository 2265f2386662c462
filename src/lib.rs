pub mod aggregate;
pub mod config;
pub mod country_map;
pub mod dataset;
pub mod error;
pub mod export;
pub mod fake_data;
pub mod sentiment;
pub mod state;
pub mod summary;
