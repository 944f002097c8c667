//! Physics bodies and collision tests
//!
//! All overlap tests are inclusive: bodies that merely touch collide.

use super::types::{segments_intersect, Vector2};

/// Collision shape in body-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f64 },
    /// Axis-aligned in local space; `half_extents.y` runs along the forward axis
    Rectangle { half_extents: Vector2 },
}

/// A shape placed in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub shape: Shape,
    pub position: Vector2,
    /// Degrees, counter-clockwise, 0 facing `+y`
    pub rotation: f64,
}

impl Body {
    pub fn new(shape: Shape, position: Vector2, rotation: f64) -> Self {
        Self {
            shape,
            position,
            rotation,
        }
    }

    pub fn circle(position: Vector2, radius: f64) -> Self {
        Self::new(Shape::Circle { radius }, position, 0.0)
    }

    pub fn rectangle(position: Vector2, half_extents: Vector2, rotation: f64) -> Self {
        Self::new(Shape::Rectangle { half_extents }, position, rotation)
    }

    /// Convert a world point into this body's local frame
    fn to_local(&self, point: Vector2) -> Vector2 {
        (point - self.position).rotate(-self.rotation)
    }

    /// World-space corners of a rectangle, counter-clockwise; empty for circles
    pub fn vertices(&self) -> Vec<Vector2> {
        match self.shape {
            Shape::Circle { .. } => Vec::new(),
            Shape::Rectangle { half_extents } => {
                let Vector2 { x, y } = half_extents;
                [
                    Vector2::new(-x, -y),
                    Vector2::new(x, -y),
                    Vector2::new(x, y),
                    Vector2::new(-x, y),
                ]
                .into_iter()
                .map(|corner| self.position + corner.rotate(self.rotation))
                .collect()
            }
        }
    }

    fn edges(&self) -> Vec<(Vector2, Vector2)> {
        let vertices = self.vertices();
        (0..vertices.len())
            .map(|i| (vertices[i], vertices[(i + 1) % vertices.len()]))
            .collect()
    }

    /// Whether `point` lies inside or on the boundary
    pub fn contains_point(&self, point: &Vector2) -> bool {
        match self.shape {
            Shape::Circle { radius } => self.position.distance(point) <= radius,
            Shape::Rectangle { half_extents } => {
                let local = self.to_local(*point);
                local.x.abs() <= half_extents.x && local.y.abs() <= half_extents.y
            }
        }
    }

    /// Distance from the centre to the farthest boundary point
    pub fn bounding_radius(&self) -> f64 {
        match self.shape {
            Shape::Circle { radius } => radius,
            Shape::Rectangle { half_extents } => half_extents.length(),
        }
    }

    pub fn collides_with(&self, other: &Body) -> bool {
        let reach = self.bounding_radius() + other.bounding_radius();
        if self.position.distance(&other.position) > reach {
            return false;
        }

        match (self.shape, other.shape) {
            (Shape::Circle { radius: a }, Shape::Circle { radius: b }) => {
                self.position.distance(&other.position) <= a + b
            }
            (Shape::Circle { radius }, Shape::Rectangle { half_extents }) => {
                circle_touches_rectangle(self.position, radius, other, half_extents)
            }
            (Shape::Rectangle { half_extents }, Shape::Circle { radius }) => {
                circle_touches_rectangle(other.position, radius, self, half_extents)
            }
            (Shape::Rectangle { .. }, Shape::Rectangle { .. }) => {
                rectangles_touch(self, other)
            }
        }
    }
}

fn circle_touches_rectangle(
    center: Vector2,
    radius: f64,
    rectangle: &Body,
    half_extents: Vector2,
) -> bool {
    let local = rectangle.to_local(center);
    let closest = Vector2::new(
        local.x.clamp(-half_extents.x, half_extents.x),
        local.y.clamp(-half_extents.y, half_extents.y),
    );
    local.distance(&closest) <= radius
}

fn rectangles_touch(a: &Body, b: &Body) -> bool {
    let b_edges = b.edges();
    let edges_cross = a.edges().iter().any(|(a1, a2)| {
        b_edges
            .iter()
            .any(|(b1, b2)| segments_intersect(*a1, *a2, *b1, *b2))
    });

    edges_cross
        || a.vertices().iter().any(|vertex| b.contains_point(vertex))
        || b.vertices().iter().any(|vertex| a.contains_point(vertex))
}
