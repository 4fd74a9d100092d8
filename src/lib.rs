//! # stedi-runner
//!
//! Browse and run a fixed catalog of Stedi healthcare API sample requests.
//!
//! ## Features
//! - 21 catalog entries covering claim status, eligibility, claims, reports,
//!   coordination of benefits, insurance discovery and payers
//! - Default payloads recovered statically from each request's script
//! - Payload editing with last-good-value retention
//! - Single runs, dry runs and sequential batch runs
//! - Command line and terminal UI front ends
//!
//! ## Architecture
//! - `extract` / `script` - payload recovery and the restricted evaluator
//! - `executors` / `catalog` - static request data
//! - `runner` - session state, single and batch execution
//! - `network` - `Transport` trait and the reqwest implementation
//! - `cli`, `app`, `ui` - front ends

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod executors;
pub mod extract;
pub mod models;
pub mod network;
pub mod runner;
pub mod script;
pub mod ui;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogEntry};
pub use credentials::{CredentialResolver, CredentialSource};
pub use error::RunnerError;
pub use extract::extract_payload;
pub use models::{HttpMethod, RequestPlan, RequestResult, ResponseBody};
pub use network::{HttpTransport, Transport};
pub use runner::{BatchReport, Runner};
