use std::ops;

use serde::{Serialize, Serializer};
use svg::node::element::path::Parameters;

/// A point in model coordinates, in millimeters, with `x` along the beam axis and `y` pointing
/// up.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point(
    #[serde(serialize_with = "serialize_number")] pub f64,
    #[serde(serialize_with = "serialize_number")] pub f64,
);

impl Point {
    pub fn x(self) -> f64 {
        self.0
    }

    pub fn y(self) -> f64 {
        self.1
    }

    /// Direction angle of the vector in radians, measured counterclockwise from the beam axis.
    pub fn angle(self) -> f64 {
        self.1.atan2(self.0)
    }

    /// Slope `dy/dx` of the vector. Diverges to infinity for a vertical vector.
    pub fn slope(self) -> f64 {
        self.1 / self.0
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }

    /// Converts to SVG user coordinates, where `y` points down the page.
    pub fn screen(self) -> (f64, f64) {
        (self.0, -self.1)
    }
}

impl ops::Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point(self.0 + other.0, self.1 + other.1)
    }
}

impl ops::Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point(self.0 - other.0, self.1 - other.1)
    }
}

/// Path parameters are always in screen coordinates.
impl From<Point> for Parameters {
    fn from(point: Point) -> Parameters {
        Parameters::from(point.screen())
    }
}

/// Formats a number the way the annotation displays it: fixed to one decimal place, with
/// non-finite values spelled out.
pub fn fixed_one(x: f64) -> String {
    if x.is_finite() {
        to_fixed_one(x)
    } else {
        shortest(x)
    }
}

/// Formats a number with the shortest representation that round-trips.
pub fn shortest(x: f64) -> String {
    if x.is_nan() {
        String::from("NaN")
    } else if x == f64::INFINITY {
        String::from("Infinity")
    } else if x == f64::NEG_INFINITY {
        String::from("-Infinity")
    } else {
        format!("{x}")
    }
}

/// Rounds to one decimal place, matching the displayed value of [`fixed_one`].
pub fn round_tenth(x: f64) -> f64 {
    if x.is_finite() {
        to_fixed_one(x).parse().unwrap_or(x)
    } else {
        x
    }
}

/// One decimal place, with exact ties rounded away from zero.
fn to_fixed_one(x: f64) -> String {
    // only multiples of 1/4 with an odd numerator are exactly halfway between tenths
    let quarters = x * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        let tenths = (x.abs() * 10.0).ceil();
        let sign = if x < 0.0 { "-" } else { "" };
        format!("{sign}{:.1}", tenths / 10.0)
    } else {
        format!("{x:.1}")
    }
}

/// Serializes finite numbers as numbers and the rest by name, since JSON has no representation
/// for them.
pub fn serialize_number<S: Serializer>(x: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if x.is_finite() {
        serializer.serialize_f64(*x)
    } else {
        serializer.serialize_str(&shortest(*x))
    }
}
