use macroquad::math::{vec2, Vec2};

use crate::error::PointsError;

/// Integer vertex of a polygon or polyline, relative to the object's origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal offset in pixels.
    pub x: i32,
    /// Vertical offset in pixels.
    pub y: i32,
}

impl Point {
    /// Point at `(x, y)`.
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// As a Macroquad vector.
    pub fn to_vec2(self) -> Vec2 {
        vec2(self.x as f32, self.y as f32)
    }
}

/// Decode a TMX `points` attribute such as `"0,0 10,0 10,10"`.
///
/// Points are separated by single spaces and coordinates by a single comma.
pub fn decode_points(raw: &str) -> Result<Vec<Point>, PointsError> {
    raw.split(' ').map(parse_point).collect()
}

fn parse_point(token: &str) -> Result<Point, PointsError> {
    let bad = || PointsError {
        token: token.to_owned(),
    };

    let mut fields = token.split(',');
    let (Some(x), Some(y), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(bad());
    };

    Ok(Point {
        x: x.parse().map_err(|_| bad())?,
        y: y.parse().map_err(|_| bad())?,
    })
}
