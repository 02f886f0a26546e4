pub mod config;
pub mod db;
pub mod extractors;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod routes;
pub mod state;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod test_support;
