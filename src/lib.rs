//! End-to-end scenarios for the pet-store HTTP API.
//!
//! The library holds everything the runner needs: the resource model, the
//! sample fixture, a small HTTP client, assertions and the scenario
//! catalogue. `src/main.rs` wires it to the command line.

pub mod cli;
pub mod environment;
pub mod error;
pub mod fixture;
pub mod history;
pub mod http;
pub mod logging;
pub mod model;
pub mod scenarios;
pub mod storage;
pub mod testing;

pub use environment::SuiteConfig;
pub use error::{Result, SuiteError};
pub use http::client::PetStoreClient;
pub use scenarios::{Scenario, run_suite};
pub use testing::RunReport;
