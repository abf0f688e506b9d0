//! Radar (spider) chart geometry.
//!
//! Criterion `i` of `n` sits at angle `i * 2π/n - π/2`, so criterion 0 points straight
//! up and the rest follow clockwise in screen coordinates (y grows downward). A score
//! `s` lies at radius `s / 10 * plot_radius` from the center.

use std::f64::consts::{FRAC_PI_2, TAU};

use serde::Serialize;

use crate::{ComparisonResult, MAX_SCORE};

/// Score levels of the background rings. The last one is the outer boundary.
pub const GRID_LEVELS: [f64; 5] = [2.0, 4.0, 6.0, 8.0, 10.0];

/// Score level at which criterion labels are anchored, just outside the outer ring.
pub const LABEL_LEVEL: f64 = 12.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRing {
    pub level: f64,
    pub points: Vec<Point>,
}

impl GridRing {
    pub fn is_outer(&self) -> bool {
        self.level >= MAX_SCORE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spoke {
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelAnchor {
    pub criterion: usize,
    pub at: Point,
}

/// One item's polygon: a vertex per criterion, in criterion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemShape {
    pub item: usize,
    pub vertices: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarPlot {
    pub size: f64,
    pub center: Point,
    pub radius: f64,
    pub grid: Vec<GridRing>,
    pub spokes: Vec<Spoke>,
    pub labels: Vec<LabelAnchor>,
    pub shapes: Vec<ItemShape>,
}

impl RadarPlot {
    fn empty(size: f64, center: Point, radius: f64) -> Self {
        Self {
            size,
            center,
            radius,
            grid: Vec::new(),
            spokes: Vec::new(),
            labels: Vec::new(),
            shapes: Vec::new(),
        }
    }

    /// True when there were no criteria to plot.
    pub fn is_empty(&self) -> bool {
        self.spokes.is_empty()
    }
}

/// Anything that can lay out a comparison as a radial chart.
pub trait RadialProjector {
    fn project(&self, result: &ComparisonResult) -> RadarPlot;
}

/// Angular width of one criterion's slice, defined only when there is at least one.
pub fn slice_angle(n: usize) -> Option<f64> {
    (n > 0).then(|| TAU / n as f64)
}

/// Angle of criterion `index` out of `n`, measured from the positive x axis.
pub fn axis_angle(index: usize, n: usize) -> Option<f64> {
    slice_angle(n).map(|slice| index as f64 * slice - FRAC_PI_2)
}

/// Hand-rolled SVG-space projection on a square canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarProjector {
    /// Canvas width and height.
    pub size: f64,
    /// Space kept free between the outer ring and the canvas edge.
    pub padding: f64,
}

impl Default for PolarProjector {
    fn default() -> Self {
        Self {
            size: 300.0,
            padding: 40.0,
        }
    }
}

impl PolarProjector {
    pub fn new(size: f64, padding: f64) -> Self {
        Self { size, padding }
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.size / 2.0,
            y: self.size / 2.0,
        }
    }

    pub fn plot_radius(&self) -> f64 {
        (self.size / 2.0 - self.padding).max(0.0)
    }

    /// Position of `score` on the axis of criterion `index` of `n`.
    pub fn point(&self, score: f64, index: usize, n: usize) -> Option<Point> {
        let angle = axis_angle(index, n)?;
        let r = (score / MAX_SCORE) * self.plot_radius();
        let c = self.center();
        Some(Point {
            x: c.x + r * angle.cos(),
            y: c.y + r * angle.sin(),
        })
    }

    fn ring(&self, level: f64, n: usize) -> Vec<Point> {
        (0..n).filter_map(|i| self.point(level, i, n)).collect()
    }
}

impl RadialProjector for PolarProjector {
    fn project(&self, result: &ComparisonResult) -> RadarPlot {
        let n = result.criteria.len();
        let center = self.center();
        let mut plot = RadarPlot::empty(self.size, center, self.plot_radius());
        if n == 0 {
            return plot;
        }

        plot.grid = GRID_LEVELS
            .iter()
            .map(|&level| GridRing {
                level,
                points: self.ring(level, n),
            })
            .collect();

        plot.spokes = self
            .ring(MAX_SCORE, n)
            .into_iter()
            .map(|to| Spoke { from: center, to })
            .collect();

        plot.labels = self
            .ring(LABEL_LEVEL, n)
            .into_iter()
            .enumerate()
            .map(|(criterion, at)| LabelAnchor { criterion, at })
            .collect();

        plot.shapes = (0..result.items.len())
            .map(|item| ItemShape {
                item,
                vertices: result
                    .criteria
                    .iter()
                    .enumerate()
                    .filter_map(|(i, c)| self.point(c.score(item), i, n))
                    .collect(),
            })
            .collect();

        plot
    }
}
