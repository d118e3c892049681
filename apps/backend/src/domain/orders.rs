//! Order line items as stored in the `orders.items` jsonb column.

use serde::{Deserialize, Serialize};

/// A single purchased line item. Prices are integer minor units
/// (cents), no floats anywhere in the money path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub price: i64,
}

/// Validate a submitted item list: non-empty, every name non-blank,
/// every price non-negative. Returns the offending reason.
pub fn validate_items(items: &[OrderItem]) -> Result<(), String> {
    if items.is_empty() {
        return Err("Order must contain at least one item".to_string());
    }
    for (idx, item) in items.iter().enumerate() {
        if item.name.trim().is_empty() {
            return Err(format!("Item {} has an empty name", idx + 1));
        }
        if item.price < 0 {
            return Err(format!("Item {} has a negative price", idx + 1));
        }
    }
    Ok(())
}

/// Sum of item prices, saturating so a hostile payload cannot overflow.
pub fn items_total(items: &[OrderItem]) -> i64 {
    items.iter().fold(0i64, |acc, i| acc.saturating_add(i.price))
}
