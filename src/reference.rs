//! Static reference data loaded once at startup.
//!
//! The province list comes from the mod's localisation CSV, where each
//! usable row reads `generic_name;english_name;...`.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::error::{PipelineError, PipelineResult};

static PROVINCE_ROW: OnceLock<Regex> = OnceLock::new();

fn province_row() -> &'static Regex {
    PROVINCE_ROW.get_or_init(|| {
        Regex::new(r"^(?P<generic_name>[^;]*);(?P<english>[^;]*);.*").expect("static regex")
    })
}

/// English province names in file order, duplicates included.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProvinceList {
    names: Vec<String>,
}

impl ProvinceList {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Parses localisation CSV content. Rows that do not have at least
    /// two `;`-separated fields followed by a third `;` are skipped.
    pub fn parse(content: &str) -> Self {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let names = content
            .split('\n')
            .filter_map(|line| province_row().captures(line))
            .filter_map(|caps| caps.name("english").map(|m| m.as_str().to_string()))
            .collect();

        Self { names }
    }

    pub fn load(path: &Path) -> PipelineResult<Self> {
        info!("generating provinces list from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        let list = Self::parse(&content);
        info!("{} provinces found", list.len());
        for name in list.names.iter().take(11) {
            debug!("province: {}", name);
        }
        Ok(list)
    }

    /// Fails unless at least one province name is known.
    pub fn ensure_ready(&self) -> PipelineResult<()> {
        if self.names.is_empty() {
            return Err(PipelineError::Initialization(
                "provinces list not generated".to_string(),
            ));
        }
        Ok(())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
