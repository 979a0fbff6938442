//! envdoc library - expose modules for testing
//!
//! The binary wires these together: [`sources`] reads product files from a
//! git clone or a working tree, [`driver`] runs one product through the
//! extractor and writes its documents, and [`commands`] holds the subcommand
//! handlers.

pub mod commands;
pub mod common;
pub mod driver;
pub mod errors;
pub mod sources;

pub use common::GlobalOpts;
pub use errors::DriverError;
