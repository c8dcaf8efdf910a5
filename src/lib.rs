//! Gestion Scolarité Library
//!
//! University enrollment management: students, enrollments, role-based
//! access and the business error taxonomy every operation reports through.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod store;

pub use config::{Config, ConfigError};
pub use domain::{BusinessError, BusinessErrorKind, BusinessResult, Cause, ErrorCode};
pub use error::{AppError, AppResult};
