// ABOUTME: Recipe model as an ordered composition of material percentages
// ABOUTME: Validates base/oxide partitions into a single CompositionEntry sequence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::material::{normalize_material_name, MaterialCategory};
use crate::constants::composition::{BASE_PERCENT_TOLERANCE, BASE_PERCENT_TOTAL};
use crate::errors::{AppError, AppResult};

/// Material name → percentage pairs, kept in the order they were listed
///
/// Serialized as a JSON object. Entries are never merged or sorted, so a
/// composition keeps the order its author wrote it in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Percentages(Vec<(String, f64)>);

impl Percentages {
    /// Percentage of a material, matched exactly
    #[must_use]
    pub fn get(&self, material: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(name, _)| name == material)
            .map(|&(_, percentage)| percentage)
    }

    /// Iterate over `(name, percentage)` pairs in listed order
    pub fn iter(&self) -> <&Self as IntoIterator>::IntoIter {
        self.into_iter()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no material is listed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

type EntryView<'a> = fn(&'a (String, f64)) -> (&'a str, f64);

impl<'a> IntoIterator for &'a Percentages {
    type Item = (&'a str, f64);
    type IntoIter = std::iter::Map<std::slice::Iter<'a, (String, f64)>, EntryView<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        let view: EntryView<'a> = |(name, percentage)| (name.as_str(), *percentage);
        self.0.iter().map(view)
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Percentages {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, percentage)| (name.into(), percentage))
                .collect(),
        )
    }
}

impl Serialize for Percentages {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, percentage) in &self.0 {
            map.serialize_entry(name, percentage)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Percentages {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PercentagesVisitor;

        impl<'de> Visitor<'de> for PercentagesVisitor {
            type Value = Percentages;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of material names to percentages")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, f64>()? {
                    entries.push(entry);
                }
                Ok(Percentages(entries))
            }
        }

        deserializer.deserialize_map(PercentagesVisitor)
    }
}

/// One material of a recipe with its percentage contribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionEntry {
    /// Normalised material name
    pub material: String,
    /// Partition the entry belongs to in the recipe
    pub category: MaterialCategory,
    /// Percentage of the target mass
    pub percentage: f64,
}

/// A named glaze recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier
    pub id: Uuid,
    /// Unique recipe name
    pub name: String,
    /// Base entries first, then oxides, each partition in submitted order
    pub composition: Vec<CompositionEntry>,
    /// Optional link to a web description of the recipe
    pub description_url: Option<String>,
    /// Optional link to the production log document
    pub production_doc_url: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Recipe {
    /// Base partition in composition order
    #[must_use]
    pub fn base(&self) -> Percentages {
        self.partition(MaterialCategory::Base)
    }

    /// Oxide partition in composition order
    #[must_use]
    pub fn oxides(&self) -> Percentages {
        self.partition(MaterialCategory::Oxide)
    }

    fn partition(&self, category: MaterialCategory) -> Percentages {
        self.composition
            .iter()
            .filter(|entry| entry.category == category)
            .map(|entry| (entry.material.clone(), entry.percentage))
            .collect()
    }
}

/// Validate the base and oxide partitions and flatten them into one sequence
///
/// Rules:
/// - `base` must be non-empty and its percentages must sum to 100
/// - every percentage must be finite and non-negative
/// - a material may appear only once across both partitions, after
///   case-insensitive normalisation
///
/// # Errors
///
/// Returns a validation error describing the first broken rule
pub fn build_composition(
    base: &Percentages,
    oxides: &Percentages,
) -> AppResult<Vec<CompositionEntry>> {
    if base.is_empty() {
        return Err(AppError::invalid_input(
            "Field 'base' must contain at least one material",
        ));
    }

    let total_base: f64 = base.iter().map(|(_, percentage)| percentage).sum();
    if (total_base - BASE_PERCENT_TOTAL).abs() > BASE_PERCENT_TOLERANCE {
        return Err(AppError::out_of_range(format!(
            "Base percentages must sum to 100 %, got {total_base} %"
        ))
        .with_details(serde_json::json!({ "base_total": total_base })));
    }

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(base.len() + oxides.len());
    let partitions = [
        (MaterialCategory::Base, base),
        (MaterialCategory::Oxide, oxides),
    ];

    for (category, partition) in partitions {
        for (name, percentage) in partition {
            let material = normalize_material_name(name);
            if material.is_empty() {
                return Err(AppError::invalid_input(
                    "Composition contains an empty material name",
                ));
            }
            if !percentage.is_finite() || percentage < 0.0 {
                return Err(AppError::out_of_range(format!(
                    "Percentage for '{material}' must be a non-negative number, got {percentage}"
                )));
            }
            if !seen.insert(material.clone()) {
                return Err(AppError::invalid_input(format!(
                    "Material '{material}' appears more than once in the composition"
                )));
            }
            entries.push(CompositionEntry {
                material,
                category,
                percentage,
            });
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    fn map(pairs: &[(&str, f64)]) -> Percentages {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_build_composition_keeps_listed_order() {
        let entries = build_composition(
            &map(&[("Silice", 40.0), ("kaolin", 60.0)]),
            &map(&[("Oxyde de fer", 3.5)]),
        )
        .unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.material.as_str()).collect();
        assert_eq!(names, vec!["silice", "kaolin", "oxyde de fer"]);
        assert_eq!(entries[2].category, MaterialCategory::Oxide);
    }

    #[test]
    fn test_base_must_sum_to_hundred() {
        let err = build_composition(&map(&[("kaolin", 60.0), ("silice", 30.0)]), &map(&[]))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert_eq!(err.details["base_total"], 90.0);
    }

    #[test]
    fn test_float_representation_of_hundred_is_accepted() {
        let entries = build_composition(
            &map(&[("a", 33.3), ("b", 33.3), ("c", 33.4)]),
            &map(&[]),
        )
        .unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn test_empty_base_is_rejected() {
        let err = build_composition(&map(&[]), &map(&[("cobalt", 1.0)])).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_duplicate_material_across_partitions_is_rejected() {
        let err = build_composition(&map(&[("Kaolin", 100.0)]), &map(&[("kaolin ", 2.0)]))
            .unwrap_err();
        assert!(err.message.contains("kaolin"));
    }

    #[test]
    fn test_negative_oxide_percentage_is_rejected() {
        let err =
            build_composition(&map(&[("kaolin", 100.0)]), &map(&[("rutile", -1.0)])).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_recipe_partitions() {
        let recipe = Recipe {
            id: Uuid::new_v4(),
            name: "Celadon".to_owned(),
            composition: build_composition(
                &map(&[("kaolin", 60.0), ("silice", 40.0)]),
                &map(&[("fer", 2.0)]),
            )
            .unwrap(),
            description_url: None,
            production_doc_url: None,
            created_at: Utc::now(),
        };

        assert_eq!(recipe.base().len(), 2);
        assert_eq!(recipe.oxides().get("fer"), Some(2.0));
    }

    #[test]
    fn test_percentages_deserialize_in_document_order() {
        let parsed: Percentages =
            serde_json::from_str(r#"{"silice": 40, "kaolin": 55.5, "craie": 4.5}"#).unwrap();
        let names: Vec<&str> = parsed.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["silice", "kaolin", "craie"]);
        assert_eq!(parsed.get("kaolin"), Some(55.5));

        let json = serde_json::to_string(&parsed).unwrap();
        assert!(json.starts_with(r#"{"silice":40"#));
    }
}
