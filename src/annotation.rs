use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Calculation, Ray, RayFan},
    values::{fixed_one, round_tenth, shortest},
};

/// Which set of rays is reported as the primary scattering path, chosen by the side of the beam
/// axis the cell center is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryPath {
    /// The cell is above the beam axis; the top rays are reported.
    Above,
    /// The cell is centered on the beam axis; both paths are symmetric, and the top rays are
    /// reported with a `±` prefix.
    OnAxis,
    /// The cell is below the beam axis (or the offset is not a number); the bottom rays are
    /// reported.
    Below,
}

impl PrimaryPath {
    pub fn from_offset(cell_y: f64) -> Self {
        if cell_y > 0.0 {
            Self::Above
        } else if cell_y == 0.0 {
            Self::OnAxis
        } else {
            Self::Below
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Above => "Scattering Angle 1",
            Self::OnAxis => "Scattering Angle",
            Self::Below => "Scattering Angle 2",
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            Self::OnAxis => "±",
            Self::Above | Self::Below => "",
        }
    }

    pub fn ray(self, rays: &RayFan) -> &Ray {
        match self {
            Self::Above | Self::OnAxis => &rays.top_top,
            Self::Below => &rays.bottom_bottom,
        }
    }
}

/// How the results are summarized in the annotation box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AnnotationStyle {
    /// Reports the primary ray of a possibly displaced cell and the coverage as a `±` half
    /// width; all four rays are drawn.
    #[default]
    OffAxis,
    /// Reports the analytic angle and the full coverage width of an on-axis cell; only the
    /// direct rays are drawn.
    OnAxis,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Annotation {
    pub lines: Vec<String>,
}

impl Annotation {
    pub fn new(style: AnnotationStyle, cell_y: f64, calculation: &Calculation) -> Self {
        let lines = match style {
            AnnotationStyle::OffAxis => {
                let path = PrimaryPath::from_offset(cell_y);
                let angle = path.ray(&calculation.rays).angle;
                // the coverage is rounded for display before it is halved
                let half_width = round_tenth(calculation.detector_coverage) / 2.0;
                vec![
                    format!(
                        "{}: {}{}°",
                        path.label(),
                        path.prefix(),
                        fixed_one(angle.to_degrees())
                    ),
                    format!("Detector Coverage: ±{}mm", shortest(half_width)),
                ]
            }
            AnnotationStyle::OnAxis => vec![
                format!(
                    "Scattering Angle: {}°",
                    fixed_one(calculation.scattering_angle.to_degrees())
                ),
                format!(
                    "Detector Coverage: {}mm",
                    fixed_one(calculation.detector_coverage)
                ),
            ],
        };
        Self { lines }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::{Annotation, AnnotationStyle, PrimaryPath};
    use crate::apparatus::{Apparatus, Placement};

    #[test_case(50.0, PrimaryPath::Above; "above")]
    #[test_case(0.0, PrimaryPath::OnAxis; "zero")]
    #[test_case(-0.0, PrimaryPath::OnAxis; "negative zero")]
    #[test_case(-0.5, PrimaryPath::Below; "below")]
    #[test_case(f64::NAN, PrimaryPath::Below; "nan")]
    fn path_selection(cell_y: f64, expected: PrimaryPath) {
        assert_eq!(PrimaryPath::from_offset(cell_y), expected);
    }

    fn annotate(style: AnnotationStyle, placement: Placement) -> Vec<String> {
        let calculation = Apparatus::default().calculate(&placement);
        Annotation::new(style, placement.cell_y, &calculation).lines
    }

    #[test]
    fn displaced_cell_reports_top_ray() {
        let placement = Placement::new(0.0, 1000.0, 10.0).with_cell_y(50.0);
        let rays = Apparatus::default().extended_rays(&placement);
        let lines = annotate(AnnotationStyle::OffAxis, placement);
        assert_eq!(
            lines[0],
            format!(
                "Scattering Angle 1: {:.1}°",
                rays.top_top.angle.to_degrees()
            )
        );
        assert_eq!(lines[0], "Scattering Angle 1: 58.8°");
        assert!(!lines[0].contains('±'));
    }

    #[test]
    fn centered_cell_reports_top_ray_with_plus_minus() {
        let lines = annotate(AnnotationStyle::OffAxis, Placement::new(0.0, 1000.0, 10.0));
        assert_eq!(
            lines,
            ["Scattering Angle: ±21.8°", "Detector Coverage: ±405mm"]
        );
    }

    #[test]
    fn lowered_cell_reports_bottom_ray() {
        let placement = Placement::new(0.0, 1000.0, 10.0).with_cell_y(-50.0);
        let lines = annotate(AnnotationStyle::OffAxis, placement);
        // bottom edge (0, -5) through (40, -71)
        assert_eq!(lines[0], "Scattering Angle 2: -58.8°");
    }

    #[test]
    fn half_width_is_taken_after_rounding() {
        // coverage of 1050 with a point sample
        let lines = annotate(AnnotationStyle::OffAxis, Placement::new(0.0, 1000.0, 0.0));
        assert_eq!(lines[1], "Detector Coverage: ±525mm");
        // 2 * (0.5 + 900 * 20.5 / 100) = 370
        let lines = annotate(AnnotationStyle::OffAxis, Placement::new(60.0, 900.0, 1.0));
        assert_eq!(lines[1], "Detector Coverage: ±185mm");
        // 2 * (5 + 333 * 16 / 40) = 276.4
        let lines = annotate(AnnotationStyle::OffAxis, Placement::new(0.0, 333.0, 10.0));
        assert_eq!(lines[1], "Detector Coverage: ±138.2mm");
    }

    #[test]
    fn on_axis_style_reports_full_width() {
        let placement = Placement::new(0.0, 1000.0, 10.0).with_cell_y(50.0);
        let lines = annotate(AnnotationStyle::OnAxis, placement);
        assert_eq!(
            lines,
            ["Scattering Angle: 21.8°", "Detector Coverage: 810.0mm"]
        );
    }

    #[test]
    fn degenerate_layout_is_spelled_out() {
        let lines = annotate(AnnotationStyle::OnAxis, Placement::new(-40.0, 1000.0, 10.0));
        assert_eq!(
            lines,
            ["Scattering Angle: 90.0°", "Detector Coverage: Infinitymm"]
        );
    }
}
