//! Price enrichment: one pricing call per extracted item, sequential with a
//! fixed pacing delay, aggregated into a single cost estimate.
//!
//! Per-item failures never abort the batch — the item is kept in the output
//! as a degraded entry with zero cost and an error marker.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{CONTINGENCY_RATE, MAX_PRICED_ITEMS, PRICING_MAX_TOKENS, PRICING_PACING};
use crate::error::Result;
use crate::extract::MaterialItem;
use crate::prompts::pricing::build_pricing_prompt;
use crate::provider::{Provider, Request, extract_json};

/// Marker for an item whose pricing call failed at the HTTP level.
const ESTIMATION_FAILED: &str = "Price estimation failed";
/// Marker for an item whose pricing reply was not valid JSON.
const PARSING_FAILED: &str = "Price parsing failed";

/// Low/high bounds around a unit-price estimate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

/// A material item with its pricing result attached. Degraded entries carry
/// `unit_price = 0`, `total_cost = 0`, and an `error` marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedItem {
    #[serde(flatten)]
    pub item: MaterialItem,
    pub unit_price: f64,
    pub total_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assumptions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PricedItem {
    fn from_quote(item: &MaterialItem, quote: PriceQuote) -> Self {
        Self {
            item: item.clone(),
            unit_price: quote.unit_price_usd,
            total_cost: item.quantity * quote.unit_price_usd,
            price_range: Some(PriceRange {
                low: quote.price_range_low,
                high: quote.price_range_high,
            }),
            assumptions: Some(quote.assumptions),
            error: None,
        }
    }

    fn degraded(item: &MaterialItem, marker: &str) -> Self {
        Self {
            item: item.clone(),
            unit_price: 0.0,
            total_cost: 0.0,
            price_range: None,
            assumptions: None,
            error: Some(marker.to_string()),
        }
    }

    /// True when the pricing call failed and the cost fields are zeroed.
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// The final aggregate. Built once, after the whole batch completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostEstimate {
    pub items: Vec<PricedItem>,
    pub subtotal: f64,
    pub contingency: f64,
    pub grand_total: f64,
}

pub struct EstimateConfig {
    /// Items beyond this index are silently dropped (cost control).
    pub max_items: usize,
    /// Wait between consecutive pricing calls.
    pub pacing: Duration,
    /// Fraction of the subtotal added as contingency.
    pub contingency_rate: f64,
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            max_items: MAX_PRICED_ITEMS,
            pacing: PRICING_PACING,
            contingency_rate: CONTINGENCY_RATE,
        }
    }
}

/// The pricing batch. Wires a [`Provider`] to the per-item loop.
pub struct Estimator {
    provider: Arc<dyn Provider>,
    config: EstimateConfig,
}

impl Estimator {
    pub fn new(provider: Arc<dyn Provider>, config: EstimateConfig) -> Self {
        Self { provider, config }
    }

    /// Price the first `max_items` items, in order, one call each.
    pub async fn run(&self, items: &[MaterialItem]) -> Result<CostEstimate> {
        let selected = &items[..items.len().min(self.config.max_items)];
        let mut priced: Vec<PricedItem> = Vec::with_capacity(selected.len());

        for (i, item) in selected.iter().enumerate() {
            println!(
                "[item {}/{}] pricing {} ({})",
                i + 1,
                selected.len(),
                item.item_name,
                item.material
            );

            let entry = match self.price_item(item).await {
                Ok(entry) => entry,
                // Transport-level failure: contain it, keep going
                Err(_) => PricedItem::degraded(item, ESTIMATION_FAILED),
            };

            match &entry.error {
                None => println!(
                    "  ✓ {} per {} → {}",
                    crate::consts::format_usd(entry.unit_price),
                    entry.item.unit,
                    crate::consts::format_usd(entry.total_cost)
                ),
                Some(marker) => println!("  ✗ {marker}"),
            }

            priced.push(entry);

            if i + 1 < selected.len() {
                tokio::time::sleep(self.config.pacing).await;
            }
        }

        let subtotal: f64 = priced.iter().map(|p| p.total_cost).sum();
        let contingency = subtotal * self.config.contingency_rate;

        Ok(CostEstimate {
            items: priced,
            subtotal,
            contingency,
            grand_total: subtotal + contingency,
        })
    }

    async fn price_item(&self, item: &MaterialItem) -> Result<PricedItem> {
        let request = Request::text(build_pricing_prompt(item), PRICING_MAX_TOKENS);
        let reply = self.provider.complete(request).await?;

        let json = extract_json(&reply.text);
        Ok(match serde_json::from_str::<PriceQuote>(json) {
            Ok(quote) => PricedItem::from_quote(item, quote),
            Err(_) => PricedItem::degraded(item, PARSING_FAILED),
        })
    }
}

// --- Pricing reply shape ---

#[derive(Deserialize)]
struct PriceQuote {
    unit_price_usd: f64,
    price_range_low: f64,
    price_range_high: f64,
    #[serde(default)]
    assumptions: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{Category, Unit};

    fn item(name: &str, quantity: f64) -> MaterialItem {
        MaterialItem {
            category: Category::Flooring,
            item_name: name.to_string(),
            material: "ceramic tile".to_string(),
            quantity,
            unit: Unit::Sqm,
            location: "bathroom".to_string(),
            specifications: None,
            dimensions: None,
        }
    }

    #[test]
    fn quote_computes_total_cost() {
        let quote = PriceQuote {
            unit_price_usd: 15.0,
            price_range_low: 12.0,
            price_range_high: 18.0,
            assumptions: "mid-grade".to_string(),
        };
        let priced = PricedItem::from_quote(&item("floor tile", 20.0), quote);
        assert_eq!(priced.unit_price, 15.0);
        assert_eq!(priced.total_cost, 300.0);
        let range = priced.price_range.unwrap();
        assert_eq!(range.low, 12.0);
        assert_eq!(range.high, 18.0);
        assert!(!priced.is_degraded());
    }

    #[test]
    fn degraded_item_has_zero_cost_and_marker() {
        let priced = PricedItem::degraded(&item("floor tile", 20.0), ESTIMATION_FAILED);
        assert_eq!(priced.unit_price, 0.0);
        assert_eq!(priced.total_cost, 0.0);
        assert!(priced.price_range.is_none());
        assert_eq!(priced.error.as_deref(), Some("Price estimation failed"));
        assert!(priced.is_degraded());
    }

    #[test]
    fn quote_parses_without_assumptions() {
        let quote: PriceQuote = serde_json::from_str(
            r#"{"unit_price_usd": 8.5, "price_range_low": 7, "price_range_high": 10}"#,
        )
        .unwrap();
        assert_eq!(quote.unit_price_usd, 8.5);
        assert_eq!(quote.assumptions, "");
    }

    #[test]
    fn quote_missing_price_is_a_parse_failure() {
        let result: std::result::Result<PriceQuote, _> =
            serde_json::from_str(r#"{"assumptions": "no idea"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn priced_item_serializes_flattened() {
        let priced = PricedItem::from_quote(
            &item("floor tile", 2.0),
            PriceQuote {
                unit_price_usd: 10.0,
                price_range_low: 9.0,
                price_range_high: 11.0,
                assumptions: "retail".to_string(),
            },
        );
        let value = serde_json::to_value(&priced).unwrap();
        // Item fields sit next to the pricing fields, not nested
        assert_eq!(value["item_name"], "floor tile");
        assert_eq!(value["unit_price"], 10.0);
        assert_eq!(value["total_cost"], 20.0);
        assert_eq!(value["price_range"]["low"], 9.0);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn default_config_matches_policy() {
        let config = EstimateConfig::default();
        assert_eq!(config.max_items, 10);
        assert_eq!(config.pacing, Duration::from_millis(1000));
        assert_eq!(config.contingency_rate, 0.15);
    }
}
