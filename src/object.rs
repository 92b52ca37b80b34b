use std::fmt;

use macroquad::math::{vec2, Circle, Rect, Vec2};

use crate::error::{MapError, PointsError};
use crate::geometry::{decode_points, Point};
use crate::gid::{DecodedTile, Gid};
use crate::property::Properties;

/// A `<polygon>` outline. Points are decoded on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Polygon {
    /// Raw `points` attribute.
    pub points: String,
}

impl Polygon {
    /// Decode the vertices, relative to the object's position.
    pub fn points(&self) -> Result<Vec<Point>, PointsError> {
        decode_points(&self.points)
    }
}

/// A `<polyline>` path. Points are decoded on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Polyline {
    /// Raw `points` attribute.
    pub points: String,
}

impl Polyline {
    /// Decode the vertices, relative to the object's position.
    pub fn points(&self) -> Result<Vec<Point>, PointsError> {
        decode_points(&self.points)
    }
}

/// Shape of an object, fixed by which sub-element the `<object>` carried.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ObjectShape {
    /// No shape element; also used by tile objects.
    #[default]
    Rectangle,
    /// `<ellipse/>`
    Ellipse,
    /// `<point/>`
    Point,
    /// `<polygon points=".."/>`
    Polygon(Polygon),
    /// `<polyline points=".."/>`
    Polyline(Polyline),
}

impl ObjectShape {
    /// The variant without its payload.
    pub fn kind(&self) -> ShapeKind {
        match self {
            ObjectShape::Rectangle => ShapeKind::Rectangle,
            ObjectShape::Ellipse => ShapeKind::Ellipse,
            ObjectShape::Point => ShapeKind::Point,
            ObjectShape::Polygon(_) => ShapeKind::Polygon,
            ObjectShape::Polyline(_) => ShapeKind::Polyline,
        }
    }
}

/// Fieldless mirror of [`ObjectShape`], used in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// See [`ObjectShape::Rectangle`].
    Rectangle,
    /// See [`ObjectShape::Ellipse`].
    Ellipse,
    /// See [`ObjectShape::Point`].
    Point,
    /// See [`ObjectShape::Polygon`].
    Polygon,
    /// See [`ObjectShape::Polyline`].
    Polyline,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Point => "point",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Polyline => "polyline",
        })
    }
}

/// An axis-aligned ellipse in map pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    /// Center of the bounding box.
    pub center: Vec2,
    /// Half width and half height.
    pub radii: Vec2,
}

impl Ellipse {
    /// Circle with the mean of both radii, for code that only handles circles.
    pub fn bounding_circle(&self) -> Circle {
        Circle::new(self.center.x, self.center.y, (self.radii.x + self.radii.y) / 2.0)
    }
}

/// A free-form object in an object group. Positions are map pixels, as in Tiled.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// Unique object id within the map.
    pub id: u32,
    /// Object name, may be empty.
    pub name: String,
    /// The `type` (or `class`) attribute.
    pub kind: String,
    /// Left edge, or bottom-left for tile objects.
    pub x: f32,
    /// Top edge, or bottom edge for tile objects.
    pub y: f32,
    /// Width in pixels, 0 if absent.
    pub width: f32,
    /// Height in pixels, 0 if absent.
    pub height: f32,
    /// Clockwise rotation in degrees.
    pub rotation: f32,
    /// Set for tile objects.
    pub gid: Option<Gid>,
    /// `gid` resolved against the map's tilesets.
    pub tile: Option<DecodedTile>,
    /// Defaults to true.
    pub visible: bool,
    /// Custom properties.
    pub properties: Properties,
    /// Geometry, decided when the document was parsed.
    pub shape: ObjectShape,
}

impl Object {
    /// Which shape this object has.
    pub fn shape_kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    fn mismatch(&self, expected: ShapeKind) -> MapError {
        MapError::ShapeMismatch {
            object: self.name.clone(),
            expected,
            found: self.shape.kind(),
        }
    }

    /// Bounds of a rectangle object.
    pub fn rect(&self) -> Result<Rect, MapError> {
        match self.shape {
            ObjectShape::Rectangle => Ok(Rect::new(self.x, self.y, self.width, self.height)),
            _ => Err(self.mismatch(ShapeKind::Rectangle)),
        }
    }

    /// Tiled stores ellipses by their bounding box; `x`/`y` is its top-left corner.
    pub fn ellipse(&self) -> Result<Ellipse, MapError> {
        match self.shape {
            ObjectShape::Ellipse => Ok(Ellipse {
                center: vec2(self.x + self.width / 2.0, self.y + self.height / 2.0),
                radii: vec2(self.width / 2.0, self.height / 2.0),
            }),
            _ => Err(self.mismatch(ShapeKind::Ellipse)),
        }
    }

    /// Position of a point object.
    pub fn point(&self) -> Result<Vec2, MapError> {
        match self.shape {
            ObjectShape::Point => Ok(vec2(self.x, self.y)),
            _ => Err(self.mismatch(ShapeKind::Point)),
        }
    }

    /// Vertices of a polygon object.
    pub fn polygon_points(&self) -> Result<Vec<Point>, MapError> {
        match &self.shape {
            ObjectShape::Polygon(polygon) => Ok(polygon.points()?),
            _ => Err(self.mismatch(ShapeKind::Polygon)),
        }
    }

    /// Vertices of a polyline object.
    pub fn polyline_points(&self) -> Result<Vec<Point>, MapError> {
        match &self.shape {
            ObjectShape::Polyline(polyline) => Ok(polyline.points()?),
            _ => Err(self.mismatch(ShapeKind::Polyline)),
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object{{{}, Name: '{}'}}", self.shape.kind(), self.name)
    }
}

/// An `<objectgroup>` layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectGroup {
    /// Layer name.
    pub name: String,
    /// Display colour, e.g. `"#a0a0a4"`.
    pub color: Option<String>,
    /// 0.0 to 1.0, defaults to 1.0.
    pub opacity: f32,
    /// Defaults to true.
    pub visible: bool,
    /// Horizontal draw offset in pixels.
    pub offset_x: f32,
    /// Vertical draw offset in pixels.
    pub offset_y: f32,
    /// Custom properties.
    pub properties: Properties,
    /// Objects in document order.
    pub objects: Vec<Object>,
}

impl ObjectGroup {
    /// First object called `name`.
    pub fn object_by_name(&self, name: &str) -> Option<&Object> {
        self.objects.iter().find(|o| o.name == name)
    }
}
