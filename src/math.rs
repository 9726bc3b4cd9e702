//! Linear algebra type aliases.

pub use na::{Point3, Vector3};

/// The scalar type used throughout this crate.
pub type Real = f32;

/// The default tolerance used for geometric operations.
pub const DEFAULT_EPSILON: Real = Real::EPSILON;

/// The dimension of the space.
pub const DIM: usize = 3;

/// The point type.
pub use Point3 as Point;

/// The vector type.
pub use Vector3 as Vector;
