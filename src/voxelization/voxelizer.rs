use core::sync::atomic::{AtomicU8, Ordering};

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector, DIM};
use crate::query;
use crate::shape::Triangle;
use crate::voxelization::{VoxelGrid, VoxelValue, VoxelizationError};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Voxelizes the surface of a triangle soup.
///
/// Every voxel of the resulting grid whose box intersects at least one
/// triangle (boundary contacts included) is marked
/// [`VoxelValue::OnSurface`]; every other voxel stays
/// [`VoxelValue::Empty`]. `origin` is the world-space corner of voxel
/// `(0, 0, 0)` and `unit` the voxel edge length.
///
/// Each triangle is an independent unit of work: with the `parallel` feature
/// enabled the triangles are dispatched across rayon's thread pool, and the
/// grid is handed back only once every unit completed. The result does not
/// depend on the triangle order.
///
/// An empty `triangles` slice is not an error and yields an all-empty grid.
/// A triangle lying entirely outside the grid contributes nothing. Non-finite
/// triangle coordinates and a non-positive `unit` are rejected before any
/// work starts, so no partial output is ever produced.
pub fn voxelize_surface(
    triangles: &[Triangle],
    origin: Point<Real>,
    unit: Real,
    width: u32,
    height: u32,
    depth: u32,
) -> Result<VoxelGrid, VoxelizationError> {
    let mut grid = VoxelGrid::new(origin, unit, width, height, depth)?;

    for (index, triangle) in triangles.iter().enumerate() {
        if !triangle.is_finite() {
            return Err(VoxelizationError::NonFiniteTriangle { index });
        }
    }

    if triangles.is_empty() || grid.data.is_empty() {
        return Ok(grid);
    }

    let cells: Vec<AtomicU8> = (0..grid.data.len())
        .map(|_| AtomicU8::new(VoxelValue::Empty as u8))
        .collect();

    #[cfg(not(feature = "parallel"))]
    triangles
        .iter()
        .for_each(|triangle| voxelize_triangle(&grid, triangle, &cells));

    // The rayon join acts as the barrier: the buffer is frozen only after
    // every per-triangle unit completed.
    #[cfg(feature = "parallel")]
    triangles
        .par_iter()
        .for_each(|triangle| voxelize_triangle(&grid, triangle, &cells));

    grid.data = cells
        .into_iter()
        .map(|cell| {
            if cell.into_inner() == VoxelValue::Empty as u8 {
                VoxelValue::Empty
            } else {
                VoxelValue::OnSurface
            }
        })
        .collect();

    log::debug!(
        "voxelized {} triangles into a {}x{}x{} grid ({} voxels on surface)",
        triangles.len(),
        width,
        height,
        depth,
        grid.num_voxels_on_surface()
    );

    Ok(grid)
}

// The per-triangle unit of work: compute the candidate voxel range from the
// triangle's bounding box, then run the exact intersection test against each
// candidate voxel's box. Writes are value-identical `Relaxed` stores, so
// concurrent units targeting the same voxel commute.
fn voxelize_triangle(grid: &VoxelGrid, triangle: &Triangle, cells: &[AtomicU8]) {
    let bounds = triangle.local_aabb();

    let Some((first, last)) = grid.candidate_range(&bounds) else {
        return;
    };

    for i in first.x..=last.x {
        for j in first.y..=last.y {
            for k in first.z..=last.z {
                let voxel = grid.voxel_aabb(i, j, k);

                if query::intersection_test_aabb_triangle(&voxel, triangle) {
                    cells[grid.linear_index(i, j, k)]
                        .store(VoxelValue::OnSurface as u8, Ordering::Relaxed);
                }
            }
        }
    }
}

/// Voxelizes the surface of an indexed triangle mesh with an auto-fitted grid.
///
/// The voxel edge length is the largest extent of the mesh's bounding box
/// divided by `resolution`, the grid origin is the bounding box minimum
/// shifted down by half a voxel, and the grid dimensions are sized so the
/// whole mesh fits. A mesh with zero extent (a single point) falls back to a
/// unit-length voxel.
pub fn voxelize_mesh(
    vertices: &[Point<Real>],
    indices: &[[u32; 3]],
    resolution: u32,
) -> Result<VoxelGrid, VoxelizationError> {
    if resolution == 0 {
        return Err(VoxelizationError::InvalidResolution(resolution));
    }

    if vertices.is_empty() || indices.is_empty() {
        return VoxelGrid::new(Point::origin(), 1.0, 0, 0, 0);
    }

    let mut triangles = Vec::with_capacity(indices.len());

    for (triangle, idx) in indices.iter().enumerate() {
        for vertex in idx {
            if *vertex as usize >= vertices.len() {
                return Err(VoxelizationError::IndexOutOfBounds {
                    triangle,
                    vertex: *vertex,
                    num_vertices: vertices.len(),
                });
            }
        }

        triangles.push(Triangle::new(
            vertices[idx[0] as usize],
            vertices[idx[1] as usize],
            vertices[idx[2] as usize],
        ));
    }

    let aabb = Aabb::from_points(vertices.iter().copied());
    let extents = aabb.extents();
    let max_extent = extents.max();

    let unit = if max_extent > 0.0 {
        max_extent / resolution as Real
    } else {
        1.0
    };
    let half_unit = Vector::repeat(unit * 0.5);

    let origin = aabb.mins - half_unit;
    let span = (aabb.maxs + half_unit) - origin;

    let mut dims = [0u32; DIM];
    for d in 0..DIM {
        dims[d] = (span[d] / unit).ceil() as u32 + 1;
    }

    voxelize_surface(&triangles, origin, unit, dims[0], dims[1], dims[2])
}
