//! Serializable snapshot of a registry.
//!
//! `StatsSummary` resolves tag identifiers to names so the result can be
//! serialized to JSON or consumed by templates without the registry.

use serde::{Deserialize, Serialize};

use crate::stats::StatsRegistry;

/// One value under a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSummary {
    pub name: String,
    pub count: u64,
}

/// One tag with its values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSummary {
    pub name: String,
    pub count: u64,
    pub values: Vec<ValueSummary>,
}

/// Numbers observed for one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSummary {
    pub tag: String,
    pub min: i64,
    pub max: i64,
    pub numbers: Vec<i64>,
}

/// Everything aggregated from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    /// Tags in first-seen order
    pub tags: Vec<TagSummary>,
    /// Ranges in the order their first number was seen
    pub ranges: Vec<RangeSummary>,
}

impl StatsSummary {
    /// Build a summary from a registry.
    pub fn from_registry(registry: &StatsRegistry) -> Self {
        let tags = registry
            .tags()
            .iter()
            .map(|tag| TagSummary {
                name: tag.name.clone(),
                count: tag.count,
                values: tag
                    .values()
                    .iter()
                    .map(|v| ValueSummary {
                        name: v.name.clone(),
                        count: v.count,
                    })
                    .collect(),
            })
            .collect();

        let ranges = registry
            .ranges()
            .iter()
            .filter_map(|range| {
                let tag = registry.tag_by_id(range.tag)?;
                Some(RangeSummary {
                    tag: tag.name.clone(),
                    min: range.min()?,
                    max: range.max()?,
                    numbers: range.numbers.clone(),
                })
            })
            .collect();

        StatsSummary { tags, ranges }
    }
}

impl From<&StatsRegistry> for StatsSummary {
    fn from(registry: &StatsRegistry) -> Self {
        Self::from_registry(registry)
    }
}
