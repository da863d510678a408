//! Shared test harness: mock upstream, config builder, test server

pub mod config;
pub mod mock_upstream;
pub mod server;
