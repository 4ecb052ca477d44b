//! Terminal rendering of analysis results and cost estimates.

use crate::consts::format_usd;
use crate::estimate::CostEstimate;
use crate::extract::DrawingAnalysis;

/// Print the extracted item list with drawing metadata.
pub fn print_analysis(analysis: &DrawingAnalysis) {
    println!("\nExtracted materials");
    println!("{}", "─".repeat(60));
    println!("drawing type: {}", analysis.drawing_type);
    if !analysis.rooms.is_empty() {
        println!("rooms:        {}", analysis.rooms.join(", "));
    }
    println!("items:        {}", analysis.items.len());
    println!("{}", "─".repeat(60));

    for item in &analysis.items {
        println!(
            "[{}] {} — {}, {} {} ({})",
            item.category, item.item_name, item.material, item.quantity, item.unit, item.location
        );
        if let Some(specs) = &item.specifications {
            println!("    specs: {specs}");
        }
        if let Some(dimensions) = &item.dimensions {
            println!("    dims:  {dimensions}");
        }
    }

    if let Some(notes) = &analysis.notes {
        println!("{}", "─".repeat(60));
        println!("notes: {notes}");
    }
}

/// Print the itemized estimate with totals. Degraded entries stay visible
/// so the user can see which line items lack a reliable price.
pub fn print_estimate(estimate: &CostEstimate) {
    println!("\nCost estimate");
    println!("{}", "═".repeat(60));

    for priced in &estimate.items {
        match &priced.error {
            None => {
                println!(
                    "{} — {} {} × {}/{} = {}",
                    priced.item.item_name,
                    priced.item.quantity,
                    priced.item.unit,
                    format_usd(priced.unit_price),
                    priced.item.unit,
                    format_usd(priced.total_cost),
                );
                if let Some(range) = &priced.price_range {
                    println!(
                        "    range: {} – {}",
                        format_usd(range.low),
                        format_usd(range.high)
                    );
                }
                if let Some(assumptions) = &priced.assumptions {
                    println!("    basis: {assumptions}");
                }
            }
            Some(marker) => {
                println!("{} — ✗ {}", priced.item.item_name, marker);
            }
        }
    }

    println!("{}", "─".repeat(60));
    println!("subtotal:          {:>14}", format_usd(estimate.subtotal));
    println!(
        "contingency (15%): {:>14}",
        format_usd(estimate.contingency)
    );
    println!("{}", "─".repeat(60));
    println!("grand total:       {:>14}", format_usd(estimate.grand_total));
    println!(
        "\nNote: prices are model estimates from typical market rates; actual\ncosts vary by location, supplier, and specification."
    );
}
