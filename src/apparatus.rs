use serde::{Deserialize, Serialize};

use crate::values::Point;

/// Fixed dimensions of the instrument, in millimeters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Apparatus {
    /// Length of the sample cell along the beam axis.
    pub cell_length: f64,
    /// Full width of the sample cell.
    pub cell_width: f64,
    /// Length of the coil along the beam axis.
    pub coil_length: f64,
    /// Full width of the coil.
    pub coil_width: f64,
    /// Full height of the detector.
    pub detector_width: f64,
}

impl Default for Apparatus {
    fn default() -> Self {
        Self {
            cell_length: 80.0,
            cell_width: 42.0,
            coil_length: 300.0,
            coil_width: 200.0,
            detector_width: 256.0,
        }
    }
}

/// Per-call positions, in millimeters. The sample always sits at the origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Placement {
    /// Distance of the cell center from the sample along the beam axis.
    pub cell_x: f64,
    /// Vertical offset of the cell center from the beam axis.
    pub cell_y: f64,
    /// Distance of the detector from the sample.
    pub detector_x: f64,
    /// Full width of the sample, centered on the beam axis.
    pub sample_width: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            cell_x: 0.0,
            cell_y: 0.0,
            detector_x: 1000.0,
            sample_width: 10.0,
        }
    }
}

impl Placement {
    pub fn new(cell_x: f64, detector_x: f64, sample_width: f64) -> Self {
        Self {
            cell_x,
            cell_y: 0.0,
            detector_x,
            sample_width,
        }
    }

    pub fn with_cell_y(self, cell_y: f64) -> Self {
        Self { cell_y, ..self }
    }

    pub fn cell_center(&self) -> Point {
        Point(self.cell_x, self.cell_y)
    }
}

/// One of the two edges of the sample or the cell aperture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Bottom,
}

impl Edge {
    pub fn sign(self) -> f64 {
        match self {
            Edge::Top => 1.0,
            Edge::Bottom => -1.0,
        }
    }
}

impl Apparatus {
    /// Edge of the sample, which is centered on the beam axis at the origin.
    pub fn sample_edge(&self, placement: &Placement, edge: Edge) -> Point {
        Point(0.0, edge.sign() * placement.sample_width / 2.0)
    }

    /// Downstream corner of the cell on the given side.
    pub fn cell_corner(&self, placement: &Placement, edge: Edge) -> Point {
        Point(
            placement.cell_x + self.cell_length / 2.0,
            placement.cell_y + edge.sign() * self.cell_width / 2.0,
        )
    }
}
