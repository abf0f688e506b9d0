use serde::Serialize;

use crate::ComparisonResult;

/// Coarse band a score falls into, used for cell coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    /// `>= 8` is high, `>= 5` medium, everything else (NaN included) low.
    pub fn of(score: f64) -> Self {
        if score >= 8.0 {
            ScoreTier::High
        } else if score >= 5.0 {
            ScoreTier::Medium
        } else {
            ScoreTier::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreTier::High => "high",
            ScoreTier::Medium => "medium",
            ScoreTier::Low => "low",
        }
    }
}

/// Presentation attributes of one (criterion, item) cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellView<'a> {
    pub criterion: usize,
    pub item: usize,
    pub score: f64,
    pub description: &'a str,
    pub tier: ScoreTier,
    pub winning: bool,
}

/// Read-only view of a result as a criteria × items grid.
#[derive(Debug, Clone, Copy)]
pub struct TableProjection<'a> {
    result: &'a ComparisonResult,
}

impl<'a> TableProjection<'a> {
    pub fn new(result: &'a ComparisonResult) -> Self {
        Self { result }
    }

    pub fn headers(&self) -> &'a [String] {
        &self.result.items
    }

    pub fn cell(&self, criterion: usize, item: usize) -> Option<CellView<'a>> {
        let c = self.result.criteria.get(criterion)?;
        if item >= self.result.items.len() {
            return None;
        }
        let score = c.score(item);
        Some(CellView {
            criterion,
            item,
            score,
            description: c.description(item),
            tier: ScoreTier::of(score),
            winning: c.winner_index == Some(item),
        })
    }

    /// Cells of one criterion in item order.
    pub fn row(&self, criterion: usize) -> Vec<CellView<'a>> {
        (0..self.result.items.len())
            .filter_map(|item| self.cell(criterion, item))
            .collect()
    }

    /// `(criterion name, cells)` for every criterion, in display order.
    pub fn rows(&self) -> Vec<(&'a str, Vec<CellView<'a>>)> {
        self.result
            .criteria
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.as_str(), self.row(i)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ComparisonCriterion;
    use pretty_assertions::assert_eq;

    fn cost() -> ComparisonResult {
        ComparisonResult {
            items: vec!["A".into(), "B".into()],
            summary: String::new(),
            verdict: String::new(),
            criteria: vec![ComparisonCriterion {
                name: "Cost".into(),
                descriptions: vec!["cheap".into(), "pricey".into()],
                scores: vec![9.0, 3.0],
                winner_index: Some(0),
            }],
        }
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(ScoreTier::of(8.0), ScoreTier::High);
        assert_eq!(ScoreTier::of(10.0), ScoreTier::High);
        assert_eq!(ScoreTier::of(7.99), ScoreTier::Medium);
        assert_eq!(ScoreTier::of(5.0), ScoreTier::Medium);
        assert_eq!(ScoreTier::of(4.99), ScoreTier::Low);
        assert_eq!(ScoreTier::of(0.0), ScoreTier::Low);
    }

    #[test]
    fn winner_cell_is_marked() {
        let result = cost();
        let table = TableProjection::new(&result);

        let a = table.cell(0, 0).unwrap();
        assert_eq!(a.tier, ScoreTier::High);
        assert!(a.winning);
        assert_eq!(a.description, "cheap");

        let b = table.cell(0, 1).unwrap();
        assert_eq!(b.tier, ScoreTier::Low);
        assert!(!b.winning);
    }

    #[test]
    fn tie_marks_nobody() {
        let mut result = cost();
        result.criteria[0].winner_index = None;
        let table = TableProjection::new(&result);
        assert!(table.row(0).iter().all(|cell| !cell.winning));
    }

    #[test]
    fn out_of_bounds_cells_are_absent() {
        let result = cost();
        let table = TableProjection::new(&result);
        assert!(table.cell(1, 0).is_none());
        assert!(table.cell(0, 2).is_none());
    }

    #[test]
    fn rows_follow_criteria_order() {
        let mut result = cost();
        let speed = ComparisonCriterion {
            name: "Speed".into(),
            ..result.criteria[0].clone()
        };
        result.criteria.push(speed);
        let table = TableProjection::new(&result);
        let names: Vec<&str> = table.rows().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["Cost", "Speed"]);
        assert_eq!(table.headers(), &["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn projection_leaves_result_untouched() {
        let result = cost();
        let before = result.clone();
        let _ = TableProjection::new(&result).rows();
        assert_eq!(result, before);
    }
}
