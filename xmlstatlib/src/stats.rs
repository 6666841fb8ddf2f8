//! Core data structures for tag statistics.
//!
//! [`StatsRegistry`] owns every aggregated [`Tag`], [`Value`] and
//! [`NumberRange`]. Lookups go through hash maps keyed by name while the
//! backing vectors keep first-seen order, which is the display order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Stable identifier of a tag inside one registry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagId(usize);

impl TagId {
    /// Position of the tag in first-seen order
    pub fn index(self) -> usize {
        self.0
    }
}

/// Aggregated record for one distinct element name.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    /// Element name, trimmed
    pub name: String,
    /// Number of nodes visited with this name
    pub count: u64,
    values: Vec<Value>,
    value_index: HashMap<String, usize>,
}

impl Tag {
    fn new(name: String) -> Self {
        Self {
            name,
            count: 1,
            values: Vec::new(),
            value_index: HashMap::new(),
        }
    }

    /// Distinct values seen under this tag, in first-seen order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Look up a value by its normalized text
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.value_index.get(name).map(|&i| &self.values[i])
    }

    /// True when no value node was ever seen for this tag
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Aggregated record for one distinct normalized text under a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    /// Normalized text content
    pub name: String,
    /// Occurrences of this text under its tag
    pub count: u64,
    /// Owning tag
    pub tag: TagId,
}

/// Every integer observed for one tag, in visit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberRange {
    /// Tag the numbers were observed under
    pub tag: TagId,
    /// Parsed integers, duplicates retained
    pub numbers: Vec<i64>,
}

impl NumberRange {
    /// Smallest recorded number
    pub fn min(&self) -> Option<i64> {
        self.numbers.iter().copied().min()
    }

    /// Largest recorded number
    pub fn max(&self) -> Option<i64> {
        self.numbers.iter().copied().max()
    }

    /// A range is worth showing only when it spans more than one distinct number.
    pub fn is_displayable(&self) -> bool {
        match (self.min(), self.max()) {
            (Some(min), Some(max)) => self.numbers.len() > 1 && min != max,
            _ => false,
        }
    }
}

/// Registry of aggregated tags, values and number ranges.
#[derive(Debug, Clone, Default)]
pub struct StatsRegistry {
    tags: Vec<Tag>,
    tag_index: HashMap<String, TagId>,
    ranges: Vec<NumberRange>,
    range_index: HashMap<TagId, usize>,
}

impl StatsRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more occurrence of `name`, creating the tag on first sight.
    pub fn upsert_tag(&mut self, name: &str) -> TagId {
        let name = name.trim();
        if let Some(&id) = self.tag_index.get(name) {
            self.tags[id.0].count += 1;
            return id;
        }

        let id = TagId(self.tags.len());
        self.tags.push(Tag::new(name.to_string()));
        self.tag_index.insert(name.to_string(), id);
        id
    }

    /// Count one more occurrence of `raw_text` under `tag`.
    ///
    /// The text is normalized with [`normalize_text`] before lookup, and
    /// uniqueness is scoped to the tag. The normalized text is also offered
    /// to range tracking; text that is not an integer is ignored there.
    ///
    /// Returns `None`, leaving the registry untouched, when `tag` was not
    /// issued by this registry (for example an id kept across [`clear`]).
    ///
    /// [`clear`]: StatsRegistry::clear
    pub fn upsert_value(&mut self, tag: TagId, raw_text: &str) -> Option<&Value> {
        if tag.0 >= self.tags.len() {
            return None;
        }
        let name = normalize_text(raw_text);
        self.track_number(tag, &name);

        let entry = self.tags.get_mut(tag.0)?;
        let index = match entry.value_index.get(&name).copied() {
            Some(i) => {
                entry.values[i].count += 1;
                i
            }
            None => {
                let i = entry.values.len();
                entry.value_index.insert(name.clone(), i);
                entry.values.push(Value {
                    name,
                    count: 1,
                    tag,
                });
                i
            }
        };
        entry.values.get(index)
    }

    fn track_number(&mut self, tag: TagId, text: &str) {
        let Some(number) = parse_integer(text) else {
            return;
        };

        match self.range_index.get(&tag).copied() {
            Some(i) => self.ranges[i].numbers.push(number),
            None => {
                self.range_index.insert(tag, self.ranges.len());
                self.ranges.push(NumberRange {
                    tag,
                    numbers: vec![number],
                });
            }
        }
    }

    /// Remove everything, ready for an independent run.
    pub fn clear(&mut self) {
        self.tags.clear();
        self.tag_index.clear();
        self.ranges.clear();
        self.range_index.clear();
    }

    /// All tags in first-seen order
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Look up a tag by name
    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tag_index.get(name.trim()).map(|&id| &self.tags[id.0])
    }

    /// Look up a tag by id
    pub fn tag_by_id(&self, id: TagId) -> Option<&Tag> {
        self.tags.get(id.0)
    }

    /// Identifier of a tag by name
    pub fn tag_id(&self, name: &str) -> Option<TagId> {
        self.tag_index.get(name.trim()).copied()
    }

    /// Tags without any value, in first-seen order
    pub fn empty_tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter().filter(|t| t.is_empty())
    }

    /// Tags carrying at least one value, in first-seen order
    pub fn value_tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter().filter(|t| !t.is_empty())
    }

    /// Every value across all tags, grouped by tag
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.tags.iter().flat_map(|t| t.values.iter())
    }

    /// Number ranges in the order their first number was seen
    pub fn ranges(&self) -> &[NumberRange] {
        &self.ranges
    }

    /// Number range recorded for a tag, if any
    pub fn range(&self, tag: TagId) -> Option<&NumberRange> {
        self.range_index.get(&tag).map(|&i| &self.ranges[i])
    }

    /// Number of distinct tags
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// True when nothing has been aggregated
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Collapse runs of whitespace to a single space and trim both ends.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a whole string as a base-10 signed integer.
///
/// Partial parses, floats and digit separators are rejected.
pub fn parse_integer(text: &str) -> Option<i64> {
    text.parse().ok()
}
