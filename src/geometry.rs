//! Geometry primitives: points, axis-aligned rectangles and the distance functions used by the
//! nearest-neighbor search.
//!
//! Coordinates follow the record format: the `x` axis is latitude and the `y` axis is longitude.

use geo_traits::{
    CoordTrait, Dimensions, GeometryTrait, GeometryType, RectTrait,
    UnimplementedGeometryCollection, UnimplementedLine, UnimplementedLineString,
    UnimplementedMultiLineString, UnimplementedMultiPoint, UnimplementedMultiPolygon,
    UnimplementedPoint, UnimplementedPolygon, UnimplementedTriangle,
};

use crate::error::{QuadtreeError, Result};
use crate::r#type::IndexableNum;

/// A position, stored as (latitude, longitude).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point<N: IndexableNum = f32> {
    latitude: N,
    longitude: N,
}

impl<N: IndexableNum> Point<N> {
    /// Create a new point.
    pub fn new(latitude: N, longitude: N) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a new point, checking that both coordinates are finite.
    ///
    /// No record lies at a finite distance from a NaN or infinite target, so such points cannot
    /// be used as queries.
    pub fn try_new(latitude: N, longitude: N) -> Result<Self> {
        if !(latitude.is_finite() && longitude.is_finite()) {
            return Err(QuadtreeError::InvalidPoint {
                latitude: latitude.to_f64().unwrap_or(f64::NAN),
                longitude: longitude.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Create a point from any geo-traits coordinate, reading `x` as latitude and `y` as
    /// longitude.
    pub fn from_coord(coord: &impl CoordTrait<T = N>) -> Self {
        Self::new(coord.x(), coord.y())
    }

    #[inline]
    pub fn latitude(&self) -> N {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> N {
        self.longitude
    }
}

impl<N: IndexableNum> CoordTrait for Point<N> {
    type T = N;

    fn dim(&self) -> Dimensions {
        Dimensions::Xy
    }

    fn x(&self) -> Self::T {
        self.latitude
    }

    fn y(&self) -> Self::T {
        self.longitude
    }

    fn nth_or_panic(&self, n: usize) -> Self::T {
        match n {
            0 => self.latitude,
            1 => self.longitude,
            _ => panic!("Invalid index of coord"),
        }
    }
}

/// An axis-aligned rectangle with inclusive bounds.
///
/// Invariant: `min_x <= max_x` and `min_y <= max_y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle<N: IndexableNum = f32> {
    min_x: N,
    min_y: N,
    max_x: N,
    max_y: N,
}

impl<N: IndexableNum> Rectangle<N> {
    /// Create a new rectangle.
    ///
    /// # Panics
    ///
    /// If a minimum is greater than its maximum, or any coordinate is NaN. Use
    /// [`Rectangle::try_new`] to validate untrusted input.
    pub fn new(min_x: N, min_y: N, max_x: N, max_y: N) -> Self {
        match Self::try_new(min_x, min_y, max_x, max_y) {
            Ok(rect) => rect,
            Err(err) => panic!("{err}"),
        }
    }

    /// Create a new rectangle, checking that `min_x <= max_x` and `min_y <= max_y`.
    pub fn try_new(min_x: N, min_y: N, max_x: N, max_y: N) -> Result<Self> {
        // Written so that NaN coordinates fail the check as well.
        if !(min_x <= max_x && min_y <= max_y) {
            let f = |n: N| n.to_f64().unwrap_or(f64::NAN);
            return Err(QuadtreeError::InvalidBounds {
                min_x: f(min_x),
                min_y: f(min_y),
                max_x: f(max_x),
                max_y: f(max_y),
            });
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// The whole globe: latitude in `[-90, 90]` and longitude in `[-180, 180]`.
    pub fn world() -> Self {
        // Both supported coordinate types represent these values exactly.
        let deg = |v: f32| N::from_f32(v).unwrap_or_else(N::zero);
        Self::unchecked(deg(-90.0), deg(-180.0), deg(90.0), deg(180.0))
    }

    /// Create a rectangle from any geo-traits rectangle.
    pub fn from_rect(rect: &impl RectTrait<T = N>) -> Result<Self> {
        Self::try_new(
            rect.min().x(),
            rect.min().y(),
            rect.max().x(),
            rect.max().y(),
        )
    }

    #[inline]
    pub fn min_x(&self) -> N {
        self.min_x
    }

    #[inline]
    pub fn min_y(&self) -> N {
        self.min_y
    }

    #[inline]
    pub fn max_x(&self) -> N {
        self.max_x
    }

    #[inline]
    pub fn max_y(&self) -> N {
        self.max_y
    }

    #[inline]
    pub fn width(&self) -> N {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> N {
        self.max_y - self.min_y
    }

    /// The midpoint of the rectangle on both axes.
    #[inline]
    pub fn center(&self) -> Point<N> {
        Point::new(
            N::midpoint(self.min_x, self.max_x),
            N::midpoint(self.min_y, self.max_y),
        )
    }

    /// Returns `true` if the point lies inside the rectangle or on its boundary.
    #[inline]
    pub fn contains(&self, point: &Point<N>) -> bool {
        point.latitude >= self.min_x
            && point.latitude <= self.max_x
            && point.longitude >= self.min_y
            && point.longitude <= self.max_y
    }

    /// Split the rectangle at its center into four quadrants, in NW, NE, SW, SE order.
    ///
    /// NW and NE share `min_y..=mid_y`, SW and SE share `mid_y..=max_y`; the western quadrants
    /// span `min_x..=mid_x` and the eastern ones `mid_x..=max_x`.
    pub fn quadrants(&self) -> [Rectangle<N>; 4] {
        let Point {
            latitude: mid_x,
            longitude: mid_y,
        } = self.center();
        // The midpoint of two ordered finite values lies between them, so these keep the
        // min <= max invariant.
        [
            Rectangle::unchecked(self.min_x, self.min_y, mid_x, mid_y),
            Rectangle::unchecked(mid_x, self.min_y, self.max_x, mid_y),
            Rectangle::unchecked(self.min_x, mid_y, mid_x, self.max_y),
            Rectangle::unchecked(mid_x, mid_y, self.max_x, self.max_y),
        ]
    }

    #[inline]
    fn unchecked(min_x: N, min_y: N, max_x: N, max_y: N) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<N: IndexableNum> GeometryTrait for Rectangle<N> {
    type T = N;
    type PointType<'b>
        = UnimplementedPoint<N>
    where
        Self: 'b;
    type LineStringType<'b>
        = UnimplementedLineString<N>
    where
        Self: 'b;
    type PolygonType<'b>
        = UnimplementedPolygon<N>
    where
        Self: 'b;
    type MultiPointType<'b>
        = UnimplementedMultiPoint<N>
    where
        Self: 'b;
    type MultiLineStringType<'b>
        = UnimplementedMultiLineString<N>
    where
        Self: 'b;
    type MultiPolygonType<'b>
        = UnimplementedMultiPolygon<N>
    where
        Self: 'b;
    type GeometryCollectionType<'b>
        = UnimplementedGeometryCollection<N>
    where
        Self: 'b;
    type RectType<'b>
        = Rectangle<N>
    where
        Self: 'b;
    type TriangleType<'b>
        = UnimplementedTriangle<N>
    where
        Self: 'b;
    type LineType<'b>
        = UnimplementedLine<N>
    where
        Self: 'b;

    fn dim(&self) -> Dimensions {
        Dimensions::Xy
    }

    fn as_type(
        &self,
    ) -> GeometryType<
        '_,
        UnimplementedPoint<N>,
        UnimplementedLineString<N>,
        UnimplementedPolygon<N>,
        UnimplementedMultiPoint<N>,
        UnimplementedMultiLineString<N>,
        UnimplementedMultiPolygon<N>,
        UnimplementedGeometryCollection<N>,
        Rectangle<N>,
        UnimplementedTriangle<N>,
        UnimplementedLine<N>,
    > {
        GeometryType::Rect(self)
    }
}

impl<N: IndexableNum> RectTrait for Rectangle<N> {
    type CoordType<'a>
        = Point<N>
    where
        Self: 'a;

    fn min(&self) -> Self::CoordType<'_> {
        Point::new(self.min_x, self.min_y)
    }

    fn max(&self) -> Self::CoordType<'_> {
        Point::new(self.max_x, self.max_y)
    }
}

/// Squared euclidean distance between two points.
#[inline]
pub fn squared_distance<N: IndexableNum>(p1: &Point<N>, p2: &Point<N>) -> N {
    let dx = p2.latitude - p1.latitude;
    let dy = p2.longitude - p1.longitude;
    dx * dx + dy * dy
}

/// The rectangle distance used to decide whether a child node can hold a closer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundMetric {
    /// Squared distance to the farthest corner of the rectangle.
    ///
    /// Used by [`SearchStrategy::COMPATIBLE`][crate::quadtree::SearchStrategy::COMPATIBLE].
    /// It is **not** a lower bound on the distance to any point inside the rectangle, so
    /// searches using it can skip the subtree that holds the true nearest record.
    FarthestCorner,

    /// Squared distance to the nearest point of the rectangle: a proper lower bound.
    #[default]
    Nearest,
}

impl BoundMetric {
    /// Squared distance from `point` to `rect` under this metric.
    #[inline]
    pub fn squared_distance<N: IndexableNum>(&self, rect: &Rectangle<N>, point: &Point<N>) -> N {
        match self {
            BoundMetric::FarthestCorner => squared_distance_to_farthest_corner(rect, point),
            BoundMetric::Nearest => squared_distance_to_rectangle(rect, point),
        }
    }
}

/// Squared distance from a point to the nearest point inside the rectangle. Zero when the
/// rectangle contains the point.
#[inline]
pub fn squared_distance_to_rectangle<N: IndexableNum>(rect: &Rectangle<N>, point: &Point<N>) -> N {
    let dx = axis_dist(point.latitude, rect.min_x, rect.max_x);
    let dy = axis_dist(point.longitude, rect.min_y, rect.max_y);
    dx * dx + dy * dy
}

/// Squared distance from a point to the rectangle corner farthest away from it.
#[inline]
pub fn squared_distance_to_farthest_corner<N: IndexableNum>(
    rect: &Rectangle<N>,
    point: &Point<N>,
) -> N {
    let dx = (point.latitude - rect.min_x)
        .abs()
        .max((point.latitude - rect.max_x).abs());
    let dy = (point.longitude - rect.min_y)
        .abs()
        .max((point.longitude - rect.max_y).abs());
    dx * dx + dy * dy
}

/// 1D distance from a value to a range.
#[inline]
fn axis_dist<N: IndexableNum>(k: N, min: N, max: N) -> N {
    if k < min {
        min - k
    } else if k <= max {
        N::zero()
    } else {
        k - max
    }
}
