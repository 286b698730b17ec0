use serde::Serialize;

use crate::model::ComparisonResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    pub count_a: usize,
    pub count_b: usize,
    /// Absolute difference between the two record counts.
    pub row_count_delta: usize,
    pub only_in_a: usize,
    pub only_in_b: usize,
    pub differences: usize,
    pub identical: bool,
}

impl ComparisonResult {
    /// Compute summary counts for reporting.
    pub fn summary(&self) -> ComparisonSummary {
        ComparisonSummary {
            count_a: self.count_a,
            count_b: self.count_b,
            row_count_delta: self.count_a.abs_diff(self.count_b),
            only_in_a: self.only_in_a.len(),
            only_in_b: self.only_in_b.len(),
            differences: self.differences.len(),
            identical: self.is_identical(),
        }
    }
}
