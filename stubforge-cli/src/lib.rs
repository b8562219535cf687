//! stubforge CLI library

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::cognitive_complexity)]
#![allow(clippy::multiple_crate_versions)]

pub mod commands;
pub mod project;
pub mod writer;

pub use commands::{MakeCommand, StubsCommand};
pub use project::Project;
pub use writer::{FileWriter, WriteMode, WriteOutcome};
