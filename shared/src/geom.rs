use serde::{Deserialize, Serialize};

///Represents a position in continuous 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point2D {
    ///Value along the x-axis.
    pub x: f64,
    ///Value along the y-axis.
    /// Positive direction is down, matching map coordinates.
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    ///Returns the displacement vector from this point to `other`.
    pub fn vector_to(&self, other: Point2D) -> Vec2D {
        Vec2D {
            x: other.x - self.x,
            y: other.y - self.y,
        }
    }
}

///Represents a displacement in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec2D {
    pub x: f64,
    pub y: f64,
}

impl Vec2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    ///Returns the dot product of two vectors.
    pub fn dot(&self, other: &Vec2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    ///Returns the squared length of the vector.
    pub fn sq_length(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_vector_to() {
        let a = Point2D::new(1.0, 2.0);
        let b = Point2D::new(4.0, -2.0);
        let v = a.vector_to(b);
        assert_approx_eq!(v.x, 3.0, 1e-10);
        assert_approx_eq!(v.y, -4.0, 1e-10);
    }

    #[test]
    fn test_dot_product() {
        let u = Vec2D::new(3.0, -4.0);
        let v = Vec2D::new(2.0, 5.0);
        assert_approx_eq!(u.dot(&v), -14.0, 1e-10);
        assert_approx_eq!(v.dot(&u), -14.0, 1e-10);
    }

    #[test]
    fn test_sq_length() {
        let v = Vec2D::new(3.0, -4.0);
        assert_approx_eq!(v.sq_length(), 25.0, 1e-10);
        assert_approx_eq!(Vec2D::default().sq_length(), 0.0, 1e-10);
    }
}
