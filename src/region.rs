//! Region extraction
//!
//! Resolves free-form location labels ("Jersey City, NJ/USA") into canonical
//! region codes using an alias table, falling back to the rightmost non-empty
//! field of the label.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Characters treated as field separators in addition to commas
const FIELD_SEPARATORS: [char; 2] = ['-', '/'];

/// Mapping from canonical region code to the alias tokens that resolve to it.
///
/// Codes and aliases are stored uppercased and trimmed. Iteration follows the
/// sorted order of canonical codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Vec<String>>",
    into = "BTreeMap<String, BTreeSet<String>>"
)]
pub struct AliasTable {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl From<BTreeMap<String, Vec<String>>> for AliasTable {
    fn from(raw: BTreeMap<String, Vec<String>>) -> Self {
        let mut table = Self::new();
        for (canonical, aliases) in &raw {
            for alias in aliases {
                table.insert(canonical, alias);
            }
        }
        table
    }
}

impl From<AliasTable> for BTreeMap<String, BTreeSet<String>> {
    fn from(table: AliasTable) -> Self {
        table.entries
    }
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an alias for a canonical region code
    pub fn insert(&mut self, canonical: &str, alias: &str) {
        let alias = normalize(alias);
        if alias.is_empty() {
            return;
        }
        self.entries
            .entry(normalize(canonical))
            .or_default()
            .insert(alias);
    }

    /// Builder-style variant of [`AliasTable::insert`] for a batch of aliases
    pub fn with_aliases<'a>(
        mut self,
        canonical: &str,
        aliases: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        for alias in aliases {
            self.insert(canonical, alias);
        }
        self
    }

    /// Iterate `(canonical, aliases)` pairs in lookup order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Canonical code for an already-normalized token, if any entry lists it
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.iter()
            .find(|(_, aliases)| aliases.contains(token))
            .map(|(canonical, _)| canonical)
    }

    /// Number of canonical regions in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of alias tokens across all regions
    pub fn alias_count(&self) -> usize {
        self.entries.values().map(BTreeSet::len).sum()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Serialize to JSON (`{"NY": ["NEW YORK", "USA"]}`)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON, normalizing every code and alias
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let table: Self = serde_json::from_str(json)?;
        log::debug!(
            "loaded alias table with {} regions and {} aliases",
            table.len(),
            table.alias_count()
        );
        Ok(table)
    }
}

/// Resolves raw location labels against a borrowed alias table
#[derive(Debug, Clone, Copy)]
pub struct RegionExtractor<'a> {
    aliases: &'a AliasTable,
}

impl<'a> RegionExtractor<'a> {
    pub fn new(aliases: &'a AliasTable) -> Self {
        Self { aliases }
    }

    /// Extract the canonical region code from a raw location label.
    ///
    /// Fields are scanned right to left; the first field listed as an alias
    /// wins. Without an alias match the rightmost non-empty field is returned.
    pub fn extract(&self, raw_region: Option<&str>) -> Option<String> {
        let raw = raw_region.filter(|s| !s.is_empty())?;
        let tokens = tokenize(raw);

        for token in tokens.iter().rev() {
            if let Some(canonical) = self.aliases.resolve(token) {
                return Some(canonical.to_string());
            }
        }

        tokens.into_iter().rev().find(|t| !t.is_empty())
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Split a label into trimmed, uppercased fields (empty fields are kept)
fn tokenize(raw: &str) -> Vec<String> {
    let normalized = normalize(raw).replace(FIELD_SEPARATORS, ",");
    normalized
        .split(',')
        .map(|part| part.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ny_table() -> AliasTable {
        AliasTable::new().with_aliases("NY", ["NEW YORK", "USA"])
    }

    #[test]
    fn test_absent_or_empty_label() {
        let table = AliasTable::new();
        let extractor = RegionExtractor::new(&table);

        assert_eq!(extractor.extract(None), None);
        assert_eq!(extractor.extract(Some("")), None);
    }

    #[test]
    fn test_alias_resolution_scans_right_to_left() {
        let table = ny_table();
        let extractor = RegionExtractor::new(&table);

        assert_eq!(
            extractor.extract(Some("New York - NY/USA")),
            Some("NY".to_string())
        );
    }

    #[test]
    fn test_rightmost_alias_wins() {
        let table = AliasTable::new()
            .with_aliases("NJ", ["JERSEY CITY"])
            .with_aliases("NY", ["MANHATTAN"]);
        let extractor = RegionExtractor::new(&table);

        assert_eq!(
            extractor.extract(Some("Jersey City, Manhattan")),
            Some("NY".to_string())
        );
        assert_eq!(
            extractor.extract(Some("Manhattan, Jersey City")),
            Some("NJ".to_string())
        );
    }

    #[test]
    fn test_fallback_to_last_non_empty_field() {
        let table = AliasTable::new();
        let extractor = RegionExtractor::new(&table);

        assert_eq!(
            extractor.extract(Some("  jersey city, nj  ")),
            Some("NJ".to_string())
        );
        assert_eq!(extractor.extract(Some("Hoboken, NJ, ")), Some("NJ".to_string()));
        assert_eq!(extractor.extract(Some("Albany/NY")), Some("NY".to_string()));
    }

    #[test]
    fn test_only_separators_yields_none() {
        let table = AliasTable::new();
        let extractor = RegionExtractor::new(&table);

        assert_eq!(extractor.extract(Some(" , - / ")), None);
        assert_eq!(extractor.extract(Some("   ")), None);
    }

    #[test]
    fn test_aliases_are_normalized_on_insert() {
        let mut table = AliasTable::new();
        table.insert(" ny ", " new york ");
        table.insert("ny", "");

        assert_eq!(table.len(), 1);
        assert_eq!(table.alias_count(), 1);
        assert_eq!(table.resolve("NEW YORK"), Some("NY"));
    }

    #[test]
    fn test_alias_table_json_roundtrip() {
        let table = ny_table().with_aliases("NJ", ["NEW JERSEY"]);
        let json = table.to_json().unwrap();
        let loaded = AliasTable::from_json(&json).unwrap();

        assert_eq!(loaded, table);
    }

    #[test]
    fn test_alias_table_from_lowercase_json() {
        let loaded = AliasTable::from_json(r#"{"nj": ["new jersey", "Garden State"]}"#).unwrap();

        assert_eq!(loaded.resolve("GARDEN STATE"), Some("NJ"));
        assert_eq!(loaded.alias_count(), 2);
    }

    #[test]
    fn test_plain_deserialize_normalizes() {
        let table: AliasTable = serde_json::from_str(r#"{"ny": ["new york"]}"#).unwrap();
        let extractor = RegionExtractor::new(&table);

        assert_eq!(extractor.extract(Some("New York")), Some("NY".to_string()));
    }

    #[test]
    fn test_embedded_table_normalizes() {
        #[derive(Deserialize)]
        struct Settings {
            aliases: AliasTable,
        }

        let settings: Settings =
            serde_json::from_str(r#"{"aliases": {" nj ": ["Jersey City", ""]}}"#).unwrap();

        assert_eq!(settings.aliases.resolve("JERSEY CITY"), Some("NJ"));
        assert_eq!(settings.aliases.alias_count(), 1);
        assert_eq!(
            serde_json::to_value(&settings.aliases).unwrap(),
            serde_json::json!({"NJ": ["JERSEY CITY"]})
        );
    }
}
