pub mod extraction;
pub mod parsing;
pub mod analysis;
pub mod enrichment;
pub mod orchestrator;

pub use orchestrator::*;
