//! Shapes supported by voxelize3d.

pub use self::triangle::Triangle;

mod triangle;
