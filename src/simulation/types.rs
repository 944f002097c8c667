//! Core types for the traffic simulation
//!
//! Plain 2D geometry shared by the road graph, the physics bodies and the
//! steering model.

use std::ops::{Add, AddAssign, Mul, Sub};

use super::error::{SimError, SimResult};

/// A unique identifier for agents spawned into a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub usize);

/// Which graph an agent navigates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    /// Vehicles drive on the road graph
    Roads,
    /// Pedestrians walk on the sidewalk graph
    Sidewalks,
}

/// A 2D point or vector in world units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(&self, other: &Vector2) -> f64 {
        (*other - *self).length()
    }

    pub fn dot(&self, other: &Vector2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product
    pub fn cross(&self, other: &Vector2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn scale(&self, factor: f64) -> Vector2 {
        Vector2::new(self.x * factor, self.y * factor)
    }

    /// Unit vector in the same direction
    ///
    /// Fails with [`SimError::DegenerateVector`] for the zero vector.
    pub fn try_normalize(&self) -> SimResult<Vector2> {
        let length = self.length();
        if length == 0.0 || !length.is_finite() {
            return Err(SimError::DegenerateVector);
        }
        Ok(self.scale(1.0 / length))
    }

    /// Unit vector, or zero when there is no direction to speak of
    pub fn normalize_or_zero(&self) -> Vector2 {
        self.try_normalize().unwrap_or(Vector2::ZERO)
    }

    /// Same direction, length capped at `max_length`
    pub fn clamp_length(&self, max_length: f64) -> Vector2 {
        let length = self.length();
        if length > max_length && length > 0.0 {
            self.scale(max_length / length)
        } else {
            *self
        }
    }

    /// Rotate counter-clockwise by `degrees`
    pub fn rotate(&self, degrees: f64) -> Vector2 {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Vector2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Unit forward axis of a body with the given rotation
    ///
    /// Rotation 0 faces `+y`, positive rotation turns counter-clockwise.
    pub fn forward(rotation: f64) -> Vector2 {
        Vector2::new(0.0, 1.0).rotate(rotation)
    }

    /// Rotation (degrees) whose forward axis points along this vector
    pub fn heading(&self) -> SimResult<f64> {
        if self.length() == 0.0 {
            return Err(SimError::DegenerateVector);
        }
        Ok((-self.x).atan2(self.y).to_degrees())
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Vector2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;

    fn mul(self, rhs: f64) -> Vector2 {
        self.scale(rhs)
    }
}

/// Shortest signed angular difference, wrapped into `(-180, 180]`
///
/// Exactly ±180 both map to `180`.
pub fn simplify_angle(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Whether segment `a1-a2` touches segment `b1-b2`
///
/// Touching endpoints and collinear overlap count as an intersection.
pub fn segments_intersect(a1: Vector2, a2: Vector2, b1: Vector2, b2: Vector2) -> bool {
    let d1 = orientation(b1, b2, a1);
    let d2 = orientation(b1, b2, a2);
    let d3 = orientation(a1, a2, b1);
    let d4 = orientation(a1, a2, b2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(b1, b2, a1))
        || (d2 == 0.0 && on_segment(b1, b2, a2))
        || (d3 == 0.0 && on_segment(a1, a2, b1))
        || (d4 == 0.0 && on_segment(a1, a2, b2))
}

fn orientation(origin: Vector2, end: Vector2, point: Vector2) -> f64 {
    (end - origin).cross(&(point - origin))
}

/// Assumes `point` is collinear with the segment
fn on_segment(start: Vector2, end: Vector2, point: Vector2) -> bool {
    point.x >= start.x.min(end.x)
        && point.x <= start.x.max(end.x)
        && point.y >= start.y.min(end.y)
        && point.y <= start.y.max(end.y)
}
