//! Triangle-mesh surface voxelization.

pub use self::voxel_grid::{VoxelGrid, VoxelValue, VoxelizationError};
pub use self::voxelizer::{voxelize_mesh, voxelize_surface};

mod voxel_grid;
mod voxelizer;
