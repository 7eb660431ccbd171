//! Template package generation
//!
//! Ties geometry derivation, the format renderers and PDF inspection
//! together behind one request-level API and a command-driven worker.

pub mod assets;
pub mod config;
pub mod package;
pub mod summary;
mod types;
pub mod worker;

pub use assets::{GuideFile, TemplateAssets};
pub use config::ServiceConfig;
pub use package::{PackageEntry, TemplatePackage, generate_package, generate_package_at};
pub use summary::summary_text;
pub use types::*;
pub use worker::{TemplateCommand, TemplateUpdate, worker_task};
