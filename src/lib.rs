/*!
voxelize3d
==========

**voxelize3d** is a 3-dimensional surface voxelization library written with
the rust programming language. It converts a triangle mesh into a discrete
occupancy grid by testing every triangle against the axis-aligned boxes of
the voxels its bounding box can reach.

*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::module_inception)]

#[macro_use]
extern crate approx;
extern crate num_traits as num;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod math;
pub mod query;
pub mod shape;
pub mod voxelization;
