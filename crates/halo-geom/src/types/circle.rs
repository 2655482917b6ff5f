// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

/// Bounding circle in physical coordinates.
///
/// Invariants:
/// - `radius` is finite and `>= 0`.
/// - Centre components are finite.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circle {
    x: f64,
    y: f64,
    radius: f64,
}

impl Circle {
    /// Constructs a circle from its centre and radius.
    ///
    /// # Panics
    /// Panics if `radius` is negative or NaN.
    #[must_use]
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        assert!(radius >= 0.0, "invalid circle: radius {radius} < 0");
        Self { x, y, radius }
    }

    /// Constructs a circle, returning `None` for non-finite components or a
    /// negative radius.
    #[must_use]
    pub fn checked(x: f64, y: f64, radius: f64) -> Option<Self> {
        if x.is_finite() && y.is_finite() && radius.is_finite() && radius >= 0.0 {
            Some(Self { x, y, radius })
        } else {
            None
        }
    }

    /// Zero-radius circle located at `(x, y)`.
    #[must_use]
    pub const fn point(x: f64, y: f64) -> Self {
        Self { x, y, radius: 0.0 }
    }

    /// Centre x coordinate.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Centre y coordinate.
    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Euclidean distance between the two centres.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Returns `true` if the circles overlap (inclusive on the boundary).
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let reach = self.radius + other.radius;
        dx * dx + dy * dy <= reach * reach
    }

    /// Returns `true` if the point lies inside or on the circle.
    #[must_use]
    pub fn contains_point(&self, px: f64, py: f64) -> bool {
        let dx = px - self.x;
        let dy = py - self.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    /// Returns `true` if `other` lies entirely inside this circle.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.distance_to(other) + other.radius <= self.radius
    }

    /// Smallest circle enclosing both `self` and `other`.
    ///
    /// When one circle already contains the other the containing circle is
    /// returned unchanged. Otherwise the result spans the two extreme points
    /// on the line through both centres, padded by a few ulps of the
    /// coordinate magnitude so both inputs stay contained after rounding.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let d = self.distance_to(other);
        if d + other.radius <= self.radius {
            return *self;
        }
        if d + self.radius <= other.radius {
            return *other;
        }
        // d > 0 here: coincident centres always hit one of the branches above.
        let radius = (d + self.radius + other.radius) * 0.5;
        let t = (radius - self.radius) / d;
        let magnitude = self
            .x
            .abs()
            .max(self.y.abs())
            .max(other.x.abs())
            .max(other.y.abs())
            + radius;
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            radius: radius + magnitude * 4.0 * f64::EPSILON,
        }
    }

    /// Relative cost proxy used by the insertion heuristic (`radius²`).
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.radius * self.radius
    }

    /// Scales centre and radius uniformly by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            radius: self.radius * factor,
        }
    }
}
