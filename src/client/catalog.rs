use std::collections::HashSet;

use crate::models::Product;

/// Products as the storefront shows them: one card per name (compared
/// case-insensitively, first occurrence wins), optionally capped.
pub fn storefront_listing(products: Vec<Product>, limit: Option<usize>) -> Vec<Product> {
    let mut seen = HashSet::new();
    let unique = products
        .into_iter()
        .filter(|p| seen.insert(p.name.trim().to_lowercase()));
    match limit {
        Some(n) if n > 0 => unique.take(n).collect(),
        _ => unique.collect(),
    }
}
