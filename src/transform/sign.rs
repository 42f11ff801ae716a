use super::SankeyResult;

/// Replaces every non-positive score by its magnitude.
///
/// Source and target stay as they are, so a credit is drawn in the same
/// direction as a burden.
pub fn flip_negative_values(mut result: SankeyResult) -> SankeyResult {
    for score in result.scores.iter_mut().filter(|s| **s <= 0.0) {
        *score = score.abs();
    }
    result
}
