//! The per-item unit-price instruction.

use crate::extract::MaterialItem;

/// Assumed when the extraction produced no specifications for an item.
const DEFAULT_SPEC: &str = "standard grade";

pub fn build_pricing_prompt(item: &MaterialItem) -> String {
    let specifications = item.specifications.as_deref().unwrap_or(DEFAULT_SPEC);

    format!(
        r#"Based on typical 2025 market prices, estimate the cost per {unit} for: {material} - {item_name}.

Consider:
- Material: {material}
- Specifications: {specifications}
- Unit: {unit}

Respond ONLY with a JSON object:
{{
  "item": "{item_name}",
  "unit_price_usd": estimated price as a number,
  "price_range_low": lower estimate,
  "price_range_high": higher estimate,
  "assumptions": "brief explanation of estimate basis"
}}

DO NOT OUTPUT ANYTHING OTHER THAN VALID JSON."#,
        unit = item.unit,
        material = item.material,
        item_name = item.item_name,
        specifications = specifications,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{Category, Unit};

    fn tile_item(specifications: Option<&str>) -> MaterialItem {
        MaterialItem {
            category: Category::Flooring,
            item_name: "floor tile".to_string(),
            material: "ceramic tile".to_string(),
            quantity: 20.0,
            unit: Unit::Sqm,
            location: "bathroom".to_string(),
            specifications: specifications.map(str::to_string),
            dimensions: None,
        }
    }

    #[test]
    fn prompt_embeds_material_name_and_unit() {
        let prompt = build_pricing_prompt(&tile_item(None));
        assert!(prompt.contains("cost per sqm"));
        assert!(prompt.contains("ceramic tile - floor tile"));
        assert!(prompt.contains("- Unit: sqm"));
    }

    #[test]
    fn missing_specifications_default_to_standard_grade() {
        let prompt = build_pricing_prompt(&tile_item(None));
        assert!(prompt.contains("- Specifications: standard grade"));
    }

    #[test]
    fn explicit_specifications_are_used() {
        let prompt = build_pricing_prompt(&tile_item(Some("60x60cm porcelain, matte")));
        assert!(prompt.contains("- Specifications: 60x60cm porcelain, matte"));
        assert!(!prompt.contains("standard grade"));
    }

    #[test]
    fn prompt_names_the_reply_fields() {
        let prompt = build_pricing_prompt(&tile_item(None));
        for field in [
            "unit_price_usd",
            "price_range_low",
            "price_range_high",
            "assumptions",
        ] {
            assert!(prompt.contains(field), "missing field: {field}");
        }
    }

    #[test]
    fn prompt_forbids_prose() {
        let prompt = build_pricing_prompt(&tile_item(None));
        assert!(prompt.contains("DO NOT OUTPUT ANYTHING OTHER THAN VALID JSON."));
    }
}
