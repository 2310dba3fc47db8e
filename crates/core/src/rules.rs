//! Targeting rule data and the evaluation context it is matched against.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// The four-dimensional targeting predicate carried by a condition.
///
/// An empty set means "no restriction on this dimension", never "matches
/// nothing". Sets are ordered so the serialized form is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleSet {
    pub countries: BTreeSet<String>,
    pub company_ids: BTreeSet<i64>,
    #[serde(deserialize_with = "identifier_set")]
    pub driver_ids: BTreeSet<String>,
    #[serde(deserialize_with = "identifier_set")]
    pub vehicle_ids: BTreeSet<String>,
}

impl RuleSet {
    /// `true` when no dimension carries a restriction.
    pub fn is_unrestricted(&self) -> bool {
        self.countries.is_empty()
            && self.company_ids.is_empty()
            && self.driver_ids.is_empty()
            && self.vehicle_ids.is_empty()
    }

    /// Union every dimension of `other` into `self`.
    pub fn union_with(&mut self, other: &RuleSet) {
        self.countries.extend(other.countries.iter().cloned());
        self.company_ids.extend(other.company_ids.iter().copied());
        self.driver_ids.extend(other.driver_ids.iter().cloned());
        self.vehicle_ids.extend(other.vehicle_ids.iter().cloned());
    }

    /// Canonical form: country codes trimmed and upper-cased, identifiers
    /// trimmed, blank entries dropped.
    pub fn normalized(self) -> Self {
        Self {
            countries: self
                .countries
                .into_iter()
                .filter_map(|c| normalize_country(&c))
                .collect(),
            company_ids: self.company_ids,
            driver_ids: self
                .driver_ids
                .into_iter()
                .filter_map(|d| normalize_identifier(&d))
                .collect(),
            vehicle_ids: self
                .vehicle_ids
                .into_iter()
                .filter_map(|v| normalize_identifier(&v))
                .collect(),
        }
    }
}

/// Trim and upper-case a country code. Blank input yields `None`.
pub fn normalize_country(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_uppercase())
}

/// Trim a driver or vehicle identifier. Blank input yields `None`.
pub fn normalize_identifier(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdentifierInput {
    Text(String),
    Integer(i64),
}

/// Driver and vehicle ids arrive as strings or integers; both are kept as text.
fn identifier_set<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeSet<String>, D::Error> {
    let items = Vec::<IdentifierInput>::deserialize(deserializer)?;
    Ok(items
        .into_iter()
        .map(|item| match item {
            IdentifierInput::Text(s) => s,
            IdentifierInput::Integer(n) => n.to_string(),
        })
        .collect())
}

/// The identity tuple a caller is evaluated as.
///
/// Every field is optional here; an absent field cannot satisfy a rule that
/// restricts its dimension. The public update check requires all four.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationContext {
    pub country: Option<String>,
    pub company_id: Option<i64>,
    pub driver_id: Option<String>,
    pub vehicle_id: Option<String>,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_country(mut self, country: impl AsRef<str>) -> Self {
        self.country = normalize_country(country.as_ref());
        self
    }

    pub fn with_company_id(mut self, company_id: i64) -> Self {
        self.company_id = Some(company_id);
        self
    }

    pub fn with_driver_id(mut self, driver_id: impl AsRef<str>) -> Self {
        self.driver_id = normalize_identifier(driver_id.as_ref());
        self
    }

    pub fn with_vehicle_id(mut self, vehicle_id: impl AsRef<str>) -> Self {
        self.vehicle_id = normalize_identifier(vehicle_id.as_ref());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set<T: Ord + Clone>(items: &[T]) -> BTreeSet<T> {
        items.iter().cloned().collect()
    }

    #[test]
    fn default_rule_set_is_unrestricted() {
        assert!(RuleSet::default().is_unrestricted());
    }

    #[test]
    fn numeric_driver_and_vehicle_ids_deserialize_as_text() {
        let body = serde_json::json!({"driverIds": [42, "d1"], "vehicleIds": [7]});
        let rules: RuleSet = serde_json::from_value(body).unwrap();
        assert_eq!(rules.driver_ids, set(&["42".to_string(), "d1".to_string()]));
        assert_eq!(rules.vehicle_ids, set(&["7".to_string()]));
        assert!(rules.countries.is_empty());
    }

    #[test]
    fn any_populated_dimension_restricts() {
        let rules = RuleSet {
            vehicle_ids: set(&["v1".to_string()]),
            ..Default::default()
        };
        assert!(!rules.is_unrestricted());
    }

    #[test]
    fn union_merges_each_dimension_independently() {
        let mut a = RuleSet {
            countries: set(&["US".to_string()]),
            company_ids: set(&[1]),
            ..Default::default()
        };
        let b = RuleSet {
            countries: set(&["CA".to_string()]),
            driver_ids: set(&["d1".to_string()]),
            ..Default::default()
        };
        a.union_with(&b);
        assert_eq!(a.countries, set(&["CA".to_string(), "US".to_string()]));
        assert_eq!(a.company_ids, set(&[1]));
        assert_eq!(a.driver_ids, set(&["d1".to_string()]));
        assert!(a.vehicle_ids.is_empty());
    }

    #[test]
    fn normalization_uppercases_countries_and_drops_blanks() {
        let rules = RuleSet {
            countries: set(&[" us".to_string(), "".to_string(), "US".to_string()]),
            driver_ids: set(&[" d1 ".to_string(), "  ".to_string()]),
            ..Default::default()
        }
        .normalized();
        assert_eq!(rules.countries, set(&["US".to_string()]));
        assert_eq!(rules.driver_ids, set(&["d1".to_string()]));
    }

    #[test]
    fn deserializes_canonical_shape_with_missing_dimensions() {
        let rules: RuleSet =
            serde_json::from_str(r#"{"countries":["US"],"companyIds":[7]}"#).unwrap();
        assert_eq!(rules.countries, set(&["US".to_string()]));
        assert_eq!(rules.company_ids, set(&[7]));
        assert!(rules.driver_ids.is_empty());
        assert!(rules.vehicle_ids.is_empty());
    }

    #[test]
    fn context_builder_normalizes_inputs() {
        let ctx = EvaluationContext::new()
            .with_country("de ")
            .with_company_id(3)
            .with_driver_id(" 42")
            .with_vehicle_id("");
        assert_eq!(ctx.country.as_deref(), Some("DE"));
        assert_eq!(ctx.company_id, Some(3));
        assert_eq!(ctx.driver_id.as_deref(), Some("42"));
        assert_eq!(ctx.vehicle_id, None);
    }
}
