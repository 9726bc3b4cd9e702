//! Non-persistent geometric queries.

pub use self::intersection_test::intersection_test_aabb_triangle;

pub mod intersection_test;
