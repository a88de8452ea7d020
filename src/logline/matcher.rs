use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::patterns::PatternRegistry;

/// One (pattern, line) hit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternMatch {
    /// Name of the matching pattern
    pub pattern: String,
    /// Index into the non-empty lines of the text
    pub line_index: usize,
    /// Named capture groups that participated in the match
    pub captures: BTreeMap<String, String>,
}

/// Splits on `\n` and drops empty lines. Lines are not trimmed.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').filter(|line| !line.is_empty()).collect()
}

/// Tests every line of a text against every registered pattern.
///
/// Matching is anchored at the start of the line only; trailing content is
/// ignored. A line may match several patterns and every hit is reported.
#[derive(Clone, Debug)]
pub struct LogLinePatternMatcher {
    registry: Arc<PatternRegistry>,
}

impl LogLinePatternMatcher {
    pub fn new(registry: Arc<PatternRegistry>) -> Self {
        Self { registry }
    }

    pub fn match_text(&self, text: &str) -> Vec<PatternMatch> {
        split_lines(text)
            .into_iter()
            .enumerate()
            .flat_map(|(index, line)| self.match_line(index, line))
            .collect()
    }

    pub fn match_line(&self, line_index: usize, line: &str) -> Vec<PatternMatch> {
        let mut found = Vec::new();

        for pattern in self.registry.iter() {
            debug!("searching for pattern {} in {}", pattern.name, line);
            let Some(caps) = pattern.regex.captures(line) else {
                continue;
            };

            let captures = pattern
                .regex
                .capture_names()
                .flatten()
                .filter_map(|name| caps.name(name).map(|m| (name.to_string(), m.as_str().to_string())))
                .collect();

            info!("Pattern \"{}\" matched for line: {}", pattern.name, line);
            found.push(PatternMatch {
                pattern: pattern.name.clone(),
                line_index,
                captures,
            });
        }

        info!("Found {} pattern(s) matching this line.", found.len());
        found
    }
}
