//! FitClub client core
//!
//! The state and synchronization layer of a fitness-community application:
//! session handling, per-screen view-models, form validation, and a typed
//! gateway to the hosted record store and object storage. Persistence,
//! authentication, file storage, and email delivery are external services;
//! this crate is the layer that keeps locally-held screen state consistent
//! with them.
//!
//! # Modules
//!
//! - `config`: Configuration management
//! - `error`: Error taxonomy and the partial-success report
//! - `models`: Users, measurements, posts, comments
//! - `gateway`: RecordStore trait, HTTP implementation, typed facade
//! - `session`: The process-wide session state holder
//! - `forms`: Form controllers and validation
//! - `vm`: Per-screen view-models (measurements, blog feed, profile, files)
//! - `services`: Email delivery and the admin invitation flow

pub mod config;
pub mod error;
pub mod forms;
pub mod gateway;
pub mod models;
pub mod services;
pub mod session;
pub mod vm;

pub use config::Config;
pub use error::{AppError, Result};
