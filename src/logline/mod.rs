//! Classification of recognized game-log lines.
//!
//! This module provides:
//! - The dated event pattern registry (`PatternRegistry`)
//! - Line splitting and pattern matching (`LogLinePatternMatcher`)

pub mod matcher;
pub mod patterns;

pub use matcher::{LogLinePatternMatcher, PatternMatch};
pub use patterns::{EventPatternSpec, PatternRegistry};
