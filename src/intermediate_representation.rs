use serde::{Deserialize, Serialize};
use svg::node::element::path::Data;

use crate::{
    annotation::{Annotation, AnnotationStyle},
    apparatus::{Apparatus, Placement},
    geometry::{Calculation, Ray},
    values::Point,
};

/// Margin around the layout, in millimeters.
const MARGIN: f64 = 50.0;
/// Height of the annotation box's top edge above the tallest element.
const ANNOTATION_OFFSET: f64 = 30.0;
/// Thickness of the detector strip.
const DETECTOR_THICKNESS: f64 = 1.0;

/// Options that affect the presentation but not the calculation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayOptions {
    pub annotation: AnnotationStyle,
    pub legend: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            annotation: AnnotationStyle::default(),
            legend: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TraceStyle {
    pub stroke: &'static str,
    pub stroke_width: f64,
    pub dotted: bool,
    pub fill: Option<&'static str>,
}

impl TraceStyle {
    const SAMPLE: Self = Self::outline("purple", 2.0).filled("rgba(128,0,128,0.3)");
    const CELL: Self = Self::outline("blue", 2.0);
    const COIL: Self = Self::outline("green", 2.0);
    const DETECTOR: Self = Self::outline("red", 2.0).filled("rgba(255,0,0,0.3)");
    const DIRECT_RAY: Self = Self::ray("red");
    const CROSSED_RAY: Self = Self::ray("black");

    const fn outline(stroke: &'static str, stroke_width: f64) -> Self {
        Self {
            stroke,
            stroke_width,
            dotted: false,
            fill: None,
        }
    }

    const fn ray(stroke: &'static str) -> Self {
        Self {
            stroke,
            stroke_width: 1.0,
            dotted: true,
            fill: None,
        }
    }

    const fn filled(self, fill: &'static str) -> Self {
        Self {
            fill: Some(fill),
            ..self
        }
    }
}

/// A named polyline with its presentation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    pub points: Vec<Point>,
    pub style: TraceStyle,
}

impl Trace {
    fn new(name: impl Into<String>, points: Vec<Point>, style: TraceStyle) -> Self {
        Self {
            name: name.into(),
            points,
            style,
        }
    }

    fn ray(index: usize, ray: &Ray) -> Self {
        let style = if ray.is_crossed() {
            TraceStyle::CROSSED_RAY
        } else {
            TraceStyle::DIRECT_RAY
        };
        Self::new(
            format!("Scattering Angle {index}"),
            ray.polyline().to_vec(),
            style,
        )
    }

    /// Path data in screen coordinates, ending at the last finite vertex. Filled traces are
    /// closed.
    pub fn to_svg(&self) -> Data {
        let mut points = self.points.iter().copied().take_while(|point| point.is_finite());
        let Some(first) = points.next() else {
            return Data::new();
        };
        let data = points.fold(Data::new().move_to(first), |data, point| {
            data.line_to(point)
        });
        if self.style.fill.is_some() {
            data.close()
        } else {
            data
        }
    }
}

/// Everything needed to draw one layout, in model coordinates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scene {
    pub traces: Vec<Trace>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub annotation: Annotation,
    /// Top left corner of the annotation box.
    pub annotation_anchor: Point,
    pub show_legend: bool,
    pub calculation: Calculation,
}

impl Scene {
    pub fn new(apparatus: &Apparatus, placement: &Placement, options: &DisplayOptions) -> Self {
        let placement = match options.annotation {
            AnnotationStyle::OffAxis => *placement,
            AnnotationStyle::OnAxis => placement.with_cell_y(0.0),
        };
        let calculation = apparatus.calculate(&placement);
        log::debug!("{calculation:?}");

        let mut traces = vec![
            Trace::new(
                "Sample",
                sample_vertices(placement.sample_width),
                TraceStyle::SAMPLE,
            ),
            Trace::new(
                "Cell",
                rectangle(
                    placement.cell_center(),
                    apparatus.cell_length,
                    apparatus.cell_width,
                ),
                TraceStyle::CELL,
            ),
            Trace::new(
                "Coil",
                rectangle(
                    placement.cell_center(),
                    apparatus.coil_length,
                    apparatus.coil_width,
                ),
                TraceStyle::COIL,
            ),
            Trace::new(
                "Detector",
                detector_vertices(placement.detector_x, apparatus.detector_width),
                TraceStyle::DETECTOR,
            ),
        ];
        let rays = match options.annotation {
            AnnotationStyle::OffAxis => calculation.rays.rays().to_vec(),
            AnnotationStyle::OnAxis => calculation.rays.direct().to_vec(),
        };
        traces.extend(
            rays.iter()
                .enumerate()
                .map(|(i, ray)| Trace::ray(i + 1, ray)),
        );

        let extent = (apparatus.detector_width / 2.0).max(placement.sample_width);
        Scene {
            traces,
            x_range: (-MARGIN, placement.detector_x + MARGIN),
            y_range: (-extent - MARGIN, extent + MARGIN),
            annotation: Annotation::new(options.annotation, placement.cell_y, &calculation),
            annotation_anchor: Point(0.0, extent + ANNOTATION_OFFSET),
            show_legend: options.legend,
            calculation,
        }
    }
}

fn sample_vertices(sample_width: f64) -> Vec<Point> {
    vec![Point(0.0, -sample_width / 2.0), Point(0.0, sample_width / 2.0)]
}

/// Closed outline of an axis-aligned rectangle, counterclockwise from the lower left corner.
fn rectangle(center: Point, length: f64, width: f64) -> Vec<Point> {
    let half = Point(length / 2.0, width / 2.0);
    let lower_left = center - half;
    let upper_right = center + half;
    vec![
        lower_left,
        Point(upper_right.x(), lower_left.y()),
        upper_right,
        Point(lower_left.x(), upper_right.y()),
        lower_left,
    ]
}

/// Upper and lower halves of the detector strip, joined at the beam axis.
fn detector_vertices(detector_x: f64, detector_width: f64) -> Vec<Point> {
    let back = detector_x + DETECTOR_THICKNESS;
    let half = detector_width / 2.0;
    vec![
        Point(detector_x, 0.0),
        Point(back, 0.0),
        Point(back, half),
        Point(detector_x, half),
        Point(detector_x, 0.0),
        Point(detector_x, -half),
        Point(back, -half),
        Point(back, 0.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::{DisplayOptions, Scene, TraceStyle};
    use crate::{
        annotation::AnnotationStyle,
        apparatus::{Apparatus, Placement},
        values::Point,
    };

    fn layout(placement: Placement, annotation: AnnotationStyle) -> Scene {
        Scene::new(
            &Apparatus::default(),
            &placement,
            &DisplayOptions {
                annotation,
                legend: true,
            },
        )
    }

    #[test]
    fn trace_order_and_vertex_counts() {
        let scene = layout(Placement::default(), AnnotationStyle::OffAxis);
        let summary: Vec<_> = scene
            .traces
            .iter()
            .map(|trace| (trace.name.as_str(), trace.points.len()))
            .collect();
        assert_eq!(
            summary,
            [
                ("Sample", 2),
                ("Cell", 5),
                ("Coil", 5),
                ("Detector", 8),
                ("Scattering Angle 1", 3),
                ("Scattering Angle 2", 3),
                ("Scattering Angle 3", 3),
                ("Scattering Angle 4", 3),
            ]
        );
        assert_eq!(scene.traces[4].style, TraceStyle::DIRECT_RAY);
        assert_eq!(scene.traces[6].style, TraceStyle::CROSSED_RAY);
    }

    #[test]
    fn shapes_follow_the_cell() {
        let placement = Placement::new(100.0, 800.0, 10.0).with_cell_y(20.0);
        let scene = layout(placement, AnnotationStyle::OffAxis);
        assert_eq!(
            scene.traces[1].points,
            [
                Point(60.0, -1.0),
                Point(140.0, -1.0),
                Point(140.0, 41.0),
                Point(60.0, 41.0),
                Point(60.0, -1.0),
            ]
        );
        assert_eq!(scene.traces[2].points[0], Point(-50.0, -80.0));
        assert_eq!(scene.traces[2].points[2], Point(250.0, 120.0));
        assert_eq!(scene.traces[3].points[2], Point(801.0, 128.0));
        assert_eq!(scene.traces[3].points[6], Point(801.0, -128.0));
    }

    #[test]
    fn ranges() {
        let scene = layout(Placement::default(), AnnotationStyle::OffAxis);
        assert_eq!(scene.x_range, (-50.0, 1050.0));
        assert_eq!(scene.y_range, (-178.0, 178.0));
        assert_eq!(scene.annotation_anchor, Point(0.0, 158.0));

        let wide = Placement {
            sample_width: 300.0,
            ..Placement::default()
        };
        let scene = layout(wide, AnnotationStyle::OffAxis);
        assert_eq!(scene.y_range, (-350.0, 350.0));
    }

    #[test]
    fn on_axis_style_centers_the_cell() {
        let placement = Placement::default().with_cell_y(30.0);
        let scene = layout(placement, AnnotationStyle::OnAxis);
        assert_eq!(scene.traces.len(), 6);
        assert_eq!(scene.traces[1].points[0], Point(-40.0, -21.0));
        assert_eq!(
            scene.calculation.rays.top_top.cell_corner,
            Point(40.0, 21.0)
        );
    }

    #[test]
    fn svg_path_data() {
        let scene = layout(Placement::default(), AnnotationStyle::OffAxis);
        // filled traces are closed
        let sample = scene.traces[0].to_svg();
        assert_eq!(sample.len(), 3);
        let ray = scene.traces[4].to_svg();
        assert_eq!(ray.len(), 3);
    }

    #[test]
    fn diverging_rays_end_at_the_cell() {
        let scene = layout(Placement::new(-40.0, 1000.0, 10.0), AnnotationStyle::OffAxis);
        for trace in &scene.traces[4..] {
            assert!(!trace.points[2].is_finite(), "{trace:?}");
            // move to the sample edge, line to the cell corner
            assert_eq!(trace.to_svg().len(), 2);
        }
    }

    #[test]
    fn non_finite_results_survive_the_dump() {
        let scene = layout(Placement::new(-40.0, 1000.0, 10.0), AnnotationStyle::OffAxis);
        let json = serde_json::to_value(&scene).unwrap();
        let calculation = &json["calculation"];
        assert_eq!(calculation["detector_coverage"], "Infinity");
        assert_eq!(
            calculation["rays"]["top_top"]["detector_point"],
            serde_json::json!([1000.0, "Infinity"])
        );
        assert_eq!(
            calculation["rays"]["bottom_bottom"]["detector_point"],
            serde_json::json!([1000.0, "-Infinity"])
        );
        assert_eq!(json["traces"][4]["points"][2][1], "Infinity");

        // a sample as wide as the cell leaves the direct rays without a direction
        let scene = layout(Placement::new(-40.0, 1000.0, 42.0), AnnotationStyle::OffAxis);
        let json = serde_json::to_value(&scene).unwrap();
        assert_eq!(json["calculation"]["detector_coverage"], "NaN");
        assert_eq!(
            json["calculation"]["rays"]["top_top"]["detector_point"][1],
            "NaN"
        );

        let scene = layout(Placement::default(), AnnotationStyle::OffAxis);
        let json = serde_json::to_value(&scene).unwrap();
        assert_eq!(json["calculation"]["detector_coverage"], 810.0);
    }
}
