//! Causal attention weights over the sample history.
//!
//! Row `r` is the query at sample `r`; column `c` is the key at sample `c`.
//! Only `c <= r` is defined (no attention to the future). Weight decays
//! with distance from the diagonal according to a power law whose exponent
//! is set by the attention bias.

use umwelt_core::types::HISTORY_CAPACITY;

/// Grid side length for a history of `len` samples.
pub fn grid_size(len: usize) -> usize {
    len.min(HISTORY_CAPACITY)
}

/// Exponent of the recency falloff: 10.5 at bias 0, 0.5 at bias 1.
pub fn falloff_exponent(attention_bias: f64) -> f64 {
    (1.05 - attention_bias) * 10.0
}

/// Attention weight for cell `(row, column)`, or `None` above the diagonal.
pub fn weight(row: usize, column: usize, attention_bias: f64) -> Option<f64> {
    if column > row {
        return None;
    }
    let recency = 1.0 - (row - column) as f64 / HISTORY_CAPACITY as f64;
    Some(recency.max(0.0).powf(falloff_exponent(attention_bias)))
}

/// One filled cell of the attention matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttentionCell {
    pub row: usize,
    pub column: usize,
    pub weight: f64,
}

/// Every causal cell of a `count x count` grid, row by row.
///
/// A pure function of history length and bias.
pub fn causal_cells(history_len: usize, attention_bias: f64) -> impl Iterator<Item = AttentionCell> {
    let count = grid_size(history_len);
    (0..count).flat_map(move |row| {
        (0..=row).filter_map(move |column| {
            weight(row, column, attention_bias).map(|weight| AttentionCell { row, column, weight })
        })
    })
}
