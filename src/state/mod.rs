//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: Tracks which phase of the run the engine is in
//! - `VisitedMap`: The deduplicated store of every film resolved during a run

mod crawl_phase;
mod visited;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use visited::VisitedMap;
