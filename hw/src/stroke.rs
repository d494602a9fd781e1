//! Strokes as they are captured and written to disk.
//!
//! A [StrokeElement] is one stylus sample. Coordinates are device-local, pressure is normalized to
//! 0.0..=1.0, the timestamp counts seconds from the start of its stroke, and altitude/azimuth are
//! radians. Only `x` and `y` are required when reading a dataset back in; a missing pressure is
//! taken to be [DEFAULT_PRESSURE] and the remaining fields stay `None`.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{Display, Formatter};

pub const DEFAULT_PRESSURE: f32 = 1.0;

fn default_pressure() -> f32 {
    DEFAULT_PRESSURE
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePos {
    pub x: f32,
    pub y: f32,
}

impl Display for StrokePos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.02},{:.02}", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeElement {
    #[serde(serialize_with = "finite_f32")]
    pub x: f32,
    #[serde(serialize_with = "finite_f32")]
    pub y: f32,
    #[serde(default = "default_pressure", serialize_with = "finite_f32")]
    pub pressure: f32,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "finite_opt_f64"
    )]
    pub timestamp: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "finite_opt_f32"
    )]
    pub altitude: Option<f32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "finite_opt_f32"
    )]
    pub azimuth: Option<f32>,
}

impl Default for StrokeElement {
    fn default() -> Self {
        Self::new(0., 0.)
    }
}

impl StrokeElement {
    pub fn new(x: f32, y: f32) -> Self {
        StrokeElement {
            x,
            y,
            pressure: DEFAULT_PRESSURE,
            timestamp: None,
            altitude: None,
            azimuth: None,
        }
    }

    pub fn with_pressure(self, pressure: f32) -> Self {
        StrokeElement { pressure, ..self }
    }

    pub fn with_timestamp(self, timestamp: f64) -> Self {
        StrokeElement {
            timestamp: Some(timestamp),
            ..self
        }
    }

    pub fn with_tilt(self, altitude: f32, azimuth: f32) -> Self {
        StrokeElement {
            altitude: Some(altitude),
            azimuth: Some(azimuth),
            ..self
        }
    }

    pub fn pos(&self) -> StrokePos {
        StrokePos {
            x: self.x,
            y: self.y,
        }
    }
}

impl From<&StrokeElement> for StrokePos {
    fn from(elt: &StrokeElement) -> StrokePos {
        elt.pos()
    }
}

impl Display for StrokeElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.02},{:.02},{:.02}", self.x, self.y, self.pressure)
    }
}

fn non_finite<E: serde::ser::Error>(value: f64) -> E {
    E::custom(format!("cannot store non-finite value {value}"))
}

fn finite_f32<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f32(*value)
    } else {
        Err(non_finite(*value as f64))
    }
}

fn finite_opt_f32<S: Serializer>(value: &Option<f32>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(value) if !value.is_finite() => Err(non_finite(*value as f64)),
        Some(value) => serializer.serialize_some(value),
        None => serializer.serialize_none(),
    }
}

fn finite_opt_f64<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(value) if !value.is_finite() => Err(non_finite(*value)),
        Some(value) => serializer.serialize_some(value),
        None => serializer.serialize_none(),
    }
}

/// Axis-aligned box around some points, in stroke coordinates.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: StrokePos,
    pub max: StrokePos,
}

impl Bounds {
    pub fn around(pos: StrokePos) -> Self {
        Bounds { min: pos, max: pos }
    }

    pub fn include(&mut self, pos: StrokePos) {
        self.min.x = self.min.x.min(pos.x);
        self.min.y = self.min.y.min(pos.y);
        self.max.x = self.max.x.max(pos.x);
        self.max.y = self.max.y.max(pos.y);
    }

    pub fn union(mut self, other: Bounds) -> Bounds {
        self.include(other.min);
        self.include(other.max);
        self
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

impl Display for Bounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} .. {}]", self.min, self.max)
    }
}

/// One pen-down to pen-up gesture. Written to disk as a bare array of points.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stroke {
    points: Vec<StrokeElement>,
}

impl Stroke {
    pub fn with_points(points: Vec<StrokeElement>) -> Self {
        Stroke { points }
    }

    pub fn points(&self) -> &[StrokeElement] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        bounds_of(&self.points)
    }

    pub fn touches(&self, pos: StrokePos, radius: f32) -> bool {
        touches(&self.points, pos, radius)
    }
}

pub fn bounds_of(points: &[StrokeElement]) -> Option<Bounds> {
    let mut points = points.iter().map(StrokePos::from);
    let mut bounds = Bounds::around(points.next()?);
    points.for_each(|pos| bounds.include(pos));
    Some(bounds)
}

/// Whether any sample lies within `radius` of `pos`.
pub fn touches(points: &[StrokeElement], pos: StrokePos, radius: f32) -> bool {
    let radius2 = radius * radius;
    points.iter().any(|point| {
        let dx = point.x - pos.x;
        let dy = point.y - pos.y;
        dx * dx + dy * dy <= radius2
    })
}

impl From<Vec<StrokeElement>> for Stroke {
    fn from(points: Vec<StrokeElement>) -> Self {
        Stroke::with_points(points)
    }
}

/// Everything drawn for one label, in drawing order. Later strokes render on top.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Drawing {
    strokes: Vec<Stroke>,
}

impl Drawing {
    pub fn new(strokes: Vec<Stroke>) -> Self {
        Drawing { strokes }
    }

    pub fn empty() -> Self {
        Drawing::default()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn into_strokes(self) -> Vec<Stroke> {
        self.strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Stroke::len).sum()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.strokes
            .iter()
            .flat_map(Stroke::bounds)
            .reduce(Bounds::union)
    }
}

impl From<Vec<Stroke>> for Drawing {
    fn from(strokes: Vec<Stroke>) -> Self {
        Drawing::new(strokes)
    }
}

impl FromIterator<Stroke> for Drawing {
    fn from_iter<I: IntoIterator<Item = Stroke>>(iter: I) -> Self {
        Drawing::new(iter.into_iter().collect())
    }
}
