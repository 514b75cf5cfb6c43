//! Plugin implementations for the two input paths
//!
//! `architecture` turns free-text descriptions into positioned diagrams;
//! `dsl` compiles the declarative diagram language. The orchestrator runs
//! either path end to end.

pub mod architecture;
pub mod dsl;
pub mod orchestrator;

pub use architecture::*;
pub use dsl::*;
pub use orchestrator::*;
