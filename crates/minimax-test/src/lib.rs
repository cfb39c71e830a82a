//! Shared test fixtures for minimax crates.
//!
//! This crate only depends on `minimax-core`, so every other crate can use it
//! as a dev-dependency without cycles.
//!
//! - [`knowledge`] - knowledge builders from compact edge lists
//! - [`oracle`] - oracles over small hand-written profiles
//! - [`ranks`] - partial orders with known worst and best ranks
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! minimax-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use minimax_test::knowledge::{empty_knowledge, with_edges};
//! use minimax_test::ranks::x_above_y_13;
//! ```

pub mod knowledge;
pub mod oracle;
pub mod ranks;

pub use knowledge::{alt, complete_knowledge, empty_knowledge, voter, with_edges};
pub use oracle::oracle;
pub use ranks::RankFixture;
