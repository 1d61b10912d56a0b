// ABOUTME: Inventory stock-keeping units and description-to-SKU inference
// ABOUTME: Fixed keyword rules map free-text line items onto tracked units

use serde::{Deserialize, Serialize};

/// Tracked inventory units. Line items are mapped onto these by keyword,
/// with `GenericLabel` as the catch-all for unrecognized descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sku {
    LabelRoll,
    SleevePack,
    NeckBand,
    GenericLabel,
}

impl Sku {
    pub const ALL: [Sku; 4] = [
        Sku::LabelRoll,
        Sku::SleevePack,
        Sku::NeckBand,
        Sku::GenericLabel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sku::LabelRoll => "label_roll",
            Sku::SleevePack => "sleeve_pack",
            Sku::NeckBand => "neck_band",
            Sku::GenericLabel => "generic_label",
        }
    }

    /// Infer the unit for a line-item description. First match wins.
    pub fn from_description(description: &str) -> Sku {
        let normalized = description.to_lowercase();
        if normalized.contains("shrink sleeve") || normalized.contains("sleeve") {
            Sku::SleevePack
        } else if normalized.contains("neck band") || normalized.contains("bands") {
            Sku::NeckBand
        } else if normalized.contains("label") {
            Sku::LabelRoll
        } else {
            Sku::GenericLabel
        }
    }

    /// Stock level a freshly seeded pool starts with.
    pub fn default_level(&self) -> i64 {
        match self {
            Sku::LabelRoll => 5000,
            Sku::SleevePack => 3000,
            Sku::NeckBand => 4000,
            Sku::GenericLabel => 2000,
        }
    }
}

impl std::fmt::Display for Sku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_inference_first_match_wins() {
        assert_eq!(
            Sku::from_description("Shrink sleeve labels 330ml"),
            Sku::SleevePack
        );
        assert_eq!(Sku::from_description("Sleeve wrap"), Sku::SleevePack);
        assert_eq!(Sku::from_description("Tamper neck bands"), Sku::NeckBand);
        assert_eq!(Sku::from_description("Premium label rolls"), Sku::LabelRoll);
        assert_eq!(Sku::from_description("Pallet wrap"), Sku::GenericLabel);
    }

    #[test]
    fn test_inference_is_case_insensitive() {
        assert_eq!(Sku::from_description("NECK BAND kit"), Sku::NeckBand);
        assert_eq!(Sku::from_description("LABELS"), Sku::LabelRoll);
    }

    #[test]
    fn test_serde_tokens() {
        let token = serde_json::to_string(&Sku::SleevePack).unwrap();
        assert_eq!(token, "\"sleeve_pack\"");
        let parsed: Sku = serde_json::from_str("\"neck_band\"").unwrap();
        assert_eq!(parsed, Sku::NeckBand);
    }
}
