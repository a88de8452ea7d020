//! Event pattern registry.
//!
//! Every in-game log entry starts with the game date, e.g.
//! `3:45, 12 June, 1939`, followed by an event-specific message. A pattern
//! is the date prefix plus one event body with named capture groups.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// Hour 0-23 without leading zero, two-digit minute.
const TIME_REGEX: &str = r"(?P<hour>[0-9]|1[0-9]|2[0-3]):(?P<minute>[0-5][0-9])";
/// Day of month 1-31 without leading zero.
const DAY_REGEX: &str = r"(?P<day>[1-9]|1[0-9]|2[0-9]|3[0-1])";
const MONTH_REGEX: &str = r"(?P<month>January|February|March|April|May|June|July|August|September|October|November|December)";
/// Years the game can display: 1926 through 1948.
const YEAR_REGEX: &str = r"(?P<year>19(?:2[6-9]|3[0-9]|4[0-8]))";

/// Naval battle result, e.g. `We sank the Bismarck.`
pub const NAVAL_BATTLE_OVER: &str = "NAVALBATTLEOVER_LOG";

/// Returns the `H:MM, D Month, YYYY` prefix shared by all patterns.
pub fn date_prefix() -> String {
    format!("{}, {} {}, {}", TIME_REGEX, DAY_REGEX, MONTH_REGEX, YEAR_REGEX)
}

/// Uncompiled pattern: a name and the event body that follows the date.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatternSpec {
    pub name: String,
    pub body: String,
}

impl EventPatternSpec {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }
}

/// Built-in patterns, in registration order.
pub fn default_event_patterns() -> Vec<EventPatternSpec> {
    vec![EventPatternSpec::new(
        NAVAL_BATTLE_OVER,
        r"We (?P<RESULT>[\w ]*) the (?P<NAME>[\w ]*)\.",
    )]
}

/// A compiled pattern, anchored at the start of a line.
#[derive(Clone, Debug)]
pub struct EventPattern {
    pub name: String,
    pub regex: Regex,
}

/// Ordered, immutable list of compiled event patterns.
#[derive(Clone, Debug, Default)]
pub struct PatternRegistry {
    patterns: Vec<EventPattern>,
}

impl PatternRegistry {
    /// Compiles `specs` in order. Any invalid body is a configuration error.
    pub fn compile(specs: &[EventPatternSpec]) -> PipelineResult<Self> {
        let prefix = date_prefix();
        let patterns = specs
            .iter()
            .map(|spec| {
                let source = format!("^{} {}", prefix, spec.body);
                Regex::new(&source)
                    .map(|regex| EventPattern {
                        name: spec.name.clone(),
                        regex,
                    })
                    .map_err(|e| {
                        PipelineError::Config(format!("event pattern {}: {}", spec.name, e))
                    })
            })
            .collect::<PipelineResult<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Built-in patterns followed by `extra`.
    pub fn with_defaults(extra: &[EventPatternSpec]) -> PipelineResult<Self> {
        let mut specs = default_event_patterns();
        specs.extend_from_slice(extra);
        Self::compile(&specs)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naval() -> Regex {
        PatternRegistry::with_defaults(&[])
            .unwrap()
            .iter()
            .next()
            .unwrap()
            .regex
            .clone()
    }

    #[test]
    fn test_year_range_is_inclusive() {
        let regex = naval();
        for year in [1926, 1930, 1939, 1948] {
            let line = format!("3:45, 12 June, {} We sank the Bismarck.", year);
            assert!(regex.is_match(&line), "{} should match", year);
        }
        for year in [1925, 1949, 1950, 2026] {
            let line = format!("3:45, 12 June, {} We sank the Bismarck.", year);
            assert!(!regex.is_match(&line), "{} should not match", year);
        }
    }

    #[test]
    fn test_time_and_day_bounds() {
        let regex = naval();
        assert!(regex.is_match("0:00, 1 January, 1936 We sank the Hood."));
        assert!(regex.is_match("23:59, 31 December, 1936 We sank the Hood."));
        assert!(!regex.is_match("24:00, 1 January, 1936 We sank the Hood."));
        assert!(!regex.is_match("03:45, 1 January, 1936 We sank the Hood."));
        assert!(!regex.is_match("3:5, 1 January, 1936 We sank the Hood."));
        assert!(!regex.is_match("3:45, 0 January, 1936 We sank the Hood."));
        assert!(!regex.is_match("3:45, 32 January, 1936 We sank the Hood."));
        assert!(!regex.is_match("3:45, 1 Jan, 1936 We sank the Hood."));
    }

    #[test]
    fn test_registry_keeps_order() {
        let extra = vec![
            EventPatternSpec::new("B", "b"),
            EventPatternSpec::new("A", "a"),
        ];
        let registry = PatternRegistry::with_defaults(&extra).unwrap();
        let names: Vec<&str> = registry.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, vec![NAVAL_BATTLE_OVER, "B", "A"]);
    }

    #[test]
    fn test_invalid_body_is_config_error() {
        let result = PatternRegistry::compile(&[EventPatternSpec::new("BROKEN", "(unclosed")]);
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }
}
