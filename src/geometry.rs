//! Scattering angles and detector coverage.
//!
//! Every function here is a pure function of its inputs. Degenerate layouts are not rejected:
//! they produce `NaN` or infinite values, which are passed on to the renderer as they are.

use serde::Serialize;

use crate::{
    apparatus::{Apparatus, Edge, Placement},
    values::{serialize_number, Point},
};

/// A ray from an edge of the sample through a corner of the cell, extended to the detector plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Ray {
    pub from: Edge,
    pub through: Edge,
    pub sample_edge: Point,
    pub cell_corner: Point,
    pub detector_point: Point,
    /// Direction of the ray in radians, counterclockwise from the beam axis.
    #[serde(serialize_with = "serialize_number")]
    pub angle: f64,
}

impl Ray {
    /// Traces the ray from `sample_edge` through `cell_corner` to the plane `x = detector_x`.
    ///
    /// The extrapolation uses the tangent of the direction angle, evaluated as `Δy/Δx` so that
    /// it diverges exactly when the cell corner lies on the sample plane.
    pub fn trace(
        from: Edge,
        through: Edge,
        sample_edge: Point,
        cell_corner: Point,
        detector_x: f64,
    ) -> Ray {
        let direction = cell_corner - sample_edge;
        let detector_y = sample_edge.y() + (detector_x - sample_edge.x()) * direction.slope();
        Ray {
            from,
            through,
            sample_edge,
            cell_corner,
            detector_point: Point(detector_x, detector_y),
            angle: direction.angle(),
        }
    }

    /// Whether the ray joins opposite edges of the sample and the cell.
    pub fn is_crossed(&self) -> bool {
        self.from != self.through
    }

    pub fn polyline(&self) -> [Point; 3] {
        [self.sample_edge, self.cell_corner, self.detector_point]
    }
}

/// The four sample-edge to cell-corner rays.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RayFan {
    pub top_top: Ray,
    pub bottom_bottom: Ray,
    pub top_bottom: Ray,
    pub bottom_top: Ray,
}

impl RayFan {
    /// Rays in display order: the two direct rays, then the two crossed rays.
    pub fn rays(&self) -> [Ray; 4] {
        [
            self.top_top,
            self.bottom_bottom,
            self.top_bottom,
            self.bottom_top,
        ]
    }

    pub fn direct(&self) -> [Ray; 2] {
        [self.top_top, self.bottom_bottom]
    }
}

/// Results of one layout, for annotation and rendering.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Calculation {
    /// Analytic scattering angle for an on-axis cell, in radians.
    #[serde(serialize_with = "serialize_number")]
    pub scattering_angle: f64,
    /// Width illuminated on the detector by the direct rays of an on-axis cell.
    #[serde(serialize_with = "serialize_number")]
    pub detector_coverage: f64,
    pub rays: RayFan,
}

impl Apparatus {
    /// Scattering angle in radians between the beam axis and the ray from a sample edge to the
    /// same-side downstream corner of an on-axis cell.
    pub fn scattering_angle(&self, cell_x: f64, sample_width: f64) -> f64 {
        ((self.cell_width / 2.0 - sample_width / 2.0) / (cell_x + self.cell_length / 2.0)).atan()
    }

    /// Vertical span on the detector plane between the direct rays through an on-axis cell.
    pub fn detector_coverage(&self, cell_x: f64, detector_x: f64, sample_width: f64) -> f64 {
        let placement = Placement::new(cell_x, detector_x, sample_width);
        let top = self.trace(&placement, Edge::Top, Edge::Top);
        let bottom = self.trace(&placement, Edge::Bottom, Edge::Bottom);
        (top.detector_point.y() - bottom.detector_point.y()).abs()
    }

    /// Traces all four edge combinations, with the cell shifted vertically by `cell_y`.
    pub fn extended_rays(&self, placement: &Placement) -> RayFan {
        RayFan {
            top_top: self.trace(placement, Edge::Top, Edge::Top),
            bottom_bottom: self.trace(placement, Edge::Bottom, Edge::Bottom),
            top_bottom: self.trace(placement, Edge::Top, Edge::Bottom),
            bottom_top: self.trace(placement, Edge::Bottom, Edge::Top),
        }
    }

    pub fn calculate(&self, placement: &Placement) -> Calculation {
        Calculation {
            scattering_angle: self.scattering_angle(placement.cell_x, placement.sample_width),
            detector_coverage: self.detector_coverage(
                placement.cell_x,
                placement.detector_x,
                placement.sample_width,
            ),
            rays: self.extended_rays(placement),
        }
    }

    fn trace(&self, placement: &Placement, from: Edge, through: Edge) -> Ray {
        Ray::trace(
            from,
            through,
            self.sample_edge(placement, from),
            self.cell_corner(placement, through),
            placement.detector_x,
        )
    }
}
