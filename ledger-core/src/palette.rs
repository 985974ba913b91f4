//! Deterministic category -> color assignment over a fixed discrete palette.
//!
//! Categories are sorted before palette indices are assigned so the same
//! dataset always yields the same colors, regardless of input row order.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// The tab20 qualitative palette as hex strings.
pub const PALETTE: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728",
    "#ff9896", "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2",
    "#7f7f7f", "#c7c7c7", "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

/// Mapping from category label to a display color, built once per run over
/// the full unsplit dataset so a category keeps one color across both the
/// gain and spend bars.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryColorMap {
    colors: BTreeMap<String, String>,
}

impl CategoryColorMap {
    /// Assign a color to every distinct category, in sorted order, cycling
    /// the palette when there are more categories than colors.
    pub fn from_transactions(txns: &[Transaction]) -> Self {
        let categories: BTreeSet<&str> = txns.iter().map(|t| t.category.as_str()).collect();
        let colors = categories
            .into_iter()
            .enumerate()
            .map(|(i, cat)| (cat.to_string(), PALETTE[i % PALETTE.len()].to_string()))
            .collect();
        Self { colors }
    }

    pub fn get(&self, category: &str) -> Option<&str> {
        self.colors.get(category).map(String::as_str)
    }

    /// Distinct categories in assignment (sorted) order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.colors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
