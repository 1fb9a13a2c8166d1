//! Candidate ranking pipeline: per-mode parallel routing and top-N selection

mod engine;
mod processor;
mod request;
mod select;

pub use engine::{EngineStats, RankingEngine};
pub use processor::CandidateProcessor;
pub use request::RankRequest;
pub use select::{Selection, select_top_n};
