use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector, DIM};
use na::Point3;

/// The occupancy state of a single voxel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum VoxelValue {
    /// The voxel does not intersect the mesh surface.
    Empty = 0,
    /// The voxel intersects at least one triangle of the mesh surface.
    OnSurface = 1,
}

/// Error raised when grid parameters or input geometry are rejected before a
/// voxelization run starts.
///
/// All validation happens up-front: if an error is returned, no partial
/// output was produced.
#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq)]
pub enum VoxelizationError {
    /// The voxel edge length must be strictly positive and finite.
    #[error("invalid voxel edge length: {0}")]
    InvalidUnit(Real),
    /// The target resolution must be strictly positive.
    #[error("invalid grid resolution: {0}")]
    InvalidResolution(u32),
    /// A triangle contains a NaN or infinite vertex coordinate.
    #[error("the triangle {index} has a non-finite vertex coordinate")]
    NonFiniteTriangle {
        /// The index of the offending triangle in the input sequence.
        index: usize,
    },
    /// A mesh index refers past the end of the vertex buffer.
    #[error("the triangle {triangle} refers to the vertex {vertex} but the mesh only has {num_vertices} vertices")]
    IndexOutOfBounds {
        /// The index of the offending triangle in the index buffer.
        triangle: usize,
        /// The out-of-bounds vertex index.
        vertex: u32,
        /// The number of vertices in the vertex buffer.
        num_vertices: usize,
    },
}

/// A uniform grid of voxel occupancy markers produced by surface voxelization.
///
/// The grid origin is the world-space position of the *corner* of voxel
/// `(0, 0, 0)`: voxel `(i, j, k)` covers the world-space box
/// `origin + [i, i + 1] x [j, j + 1] x [k, k + 1] * unit`.
pub struct VoxelGrid {
    pub(crate) origin: Point<Real>,
    pub(crate) unit: Real,
    pub(crate) resolution: Point3<u32>,
    pub(crate) data: Vec<VoxelValue>,
}

impl VoxelGrid {
    /// Allocates a grid with every voxel set to [`VoxelValue::Empty`].
    ///
    /// Fails with [`VoxelizationError::InvalidUnit`] if `unit` is not
    /// strictly positive and finite. Zero-sized dimensions are legal and
    /// yield an empty buffer.
    pub fn new(
        origin: Point<Real>,
        unit: Real,
        width: u32,
        height: u32,
        depth: u32,
    ) -> Result<Self, VoxelizationError> {
        if !(unit > 0.0) || !unit.is_finite() {
            return Err(VoxelizationError::InvalidUnit(unit));
        }

        let len = width as usize * height as usize * depth as usize;

        Ok(VoxelGrid {
            origin,
            unit,
            resolution: Point3::new(width, height, depth),
            data: vec![VoxelValue::Empty; len],
        })
    }

    /// The world-space position of the corner of voxel `(0, 0, 0)`.
    pub fn origin(&self) -> Point<Real> {
        self.origin
    }

    /// The edge length of every voxel.
    pub fn unit(&self) -> Real {
        self.unit
    }

    /// The number of voxels along each axis.
    pub fn resolution(&self) -> Point3<u32> {
        self.resolution
    }

    /// The flat offset of voxel `(i, j, k)`.
    ///
    /// This is the single linearization formula
    /// `i + width * (j + height * k)` shared by every reader and writer of
    /// the occupancy buffer.
    #[inline]
    pub(crate) fn linear_index(&self, i: u32, j: u32, k: u32) -> usize {
        i as usize
            + self.resolution.x as usize * (j as usize + self.resolution.y as usize * k as usize)
    }

    /// The occupancy marker of voxel `(i, j, k)`.
    pub fn voxel(&self, i: u32, j: u32, k: u32) -> VoxelValue {
        self.data[self.linear_index(i, j, k)]
    }

    /// Does voxel `(i, j, k)` intersect the mesh surface?
    pub fn is_occupied(&self, i: u32, j: u32, k: u32) -> bool {
        self.voxel(i, j, k) == VoxelValue::OnSurface
    }

    /// The flat occupancy buffer, linearized by the
    /// `i + width * (j + height * k)` formula.
    pub fn voxels(&self) -> &[VoxelValue] {
        &self.data
    }

    /// Consumes the grid and hands the flat occupancy buffer to the caller.
    pub fn into_voxels(self) -> Vec<VoxelValue> {
        self.data
    }

    /// The number of voxels marked as intersecting the surface.
    pub fn num_voxels_on_surface(&self) -> usize {
        self.data
            .iter()
            .filter(|v| **v == VoxelValue::OnSurface)
            .count()
    }

    /// The world-space center of voxel `(i, j, k)`.
    pub fn voxel_center(&self, i: u32, j: u32, k: u32) -> Point<Real> {
        let ijk = Vector::new(i as Real, j as Real, k as Real);
        self.origin + (ijk + Vector::repeat(0.5)) * self.unit
    }

    /// The world-space box covered by voxel `(i, j, k)`.
    pub fn voxel_aabb(&self, i: u32, j: u32, k: u32) -> Aabb {
        Aabb::from_half_extents(
            self.voxel_center(i, j, k),
            Vector::repeat(self.unit * 0.5),
        )
    }

    /// The inclusive range of voxel indices whose boxes can possibly
    /// intersect `aabb`.
    ///
    /// Per axis, the bounds are `floor((mins - origin) / unit)` and
    /// `ceil((maxs - origin) / unit)`, clamped into `[0, resolution - 1]`.
    /// Returns `None` when `aabb` lies strictly outside the grid on some
    /// axis (the emptiness check happens in world space, before any
    /// float-to-index cast). Boxes touching the grid boundary still produce
    /// a candidate range; the exact intersection test decides those voxels.
    pub fn candidate_range(&self, aabb: &Aabb) -> Option<(Point3<u32>, Point3<u32>)> {
        let mut first = Point3::new(0u32, 0, 0);
        let mut last = Point3::new(0u32, 0, 0);

        for d in 0..DIM {
            let dim = self.resolution[d];

            if dim == 0
                || aabb.maxs[d] < self.origin[d]
                || aabb.mins[d] > self.origin[d] + dim as Real * self.unit
            {
                return None;
            }

            let lo = ((aabb.mins[d] - self.origin[d]) / self.unit).floor();
            let hi = ((aabb.maxs[d] - self.origin[d]) / self.unit).ceil();

            // Float-to-int casts saturate, so a huge `hi` clamps to `dim - 1`.
            first[d] = (lo.max(0.0) as u32).min(dim - 1);
            last[d] = (hi.max(0.0) as u32).min(dim - 1);
        }

        Some((first, last))
    }
}

#[cfg(test)]
mod test {
    use super::{VoxelGrid, VoxelValue, VoxelizationError};
    use crate::bounding_volume::Aabb;
    use crate::math::Point;
    use na::Point3;

    fn grid() -> VoxelGrid {
        VoxelGrid::new(Point::origin(), 1.0, 4, 3, 2).unwrap()
    }

    #[test]
    fn non_positive_unit_is_rejected() {
        for unit in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let result = VoxelGrid::new(Point::origin(), unit, 1, 1, 1);
            assert!(matches!(result, Err(VoxelizationError::InvalidUnit(_))));
        }
    }

    #[test]
    fn new_grid_is_all_empty() {
        let grid = grid();
        assert_eq!(grid.voxels().len(), 4 * 3 * 2);
        assert!(grid.voxels().iter().all(|v| *v == VoxelValue::Empty));
        assert_eq!(grid.num_voxels_on_surface(), 0);
    }

    #[test]
    fn linearization_is_row_major() {
        let grid = grid();
        assert_eq!(grid.linear_index(0, 0, 0), 0);
        assert_eq!(grid.linear_index(1, 0, 0), 1);
        assert_eq!(grid.linear_index(0, 1, 0), 4);
        assert_eq!(grid.linear_index(0, 0, 1), 4 * 3);
        assert_eq!(grid.linear_index(3, 2, 1), 4 * 3 * 2 - 1);
    }

    #[test]
    fn voxel_box_matches_corner_convention() {
        let grid = grid();
        let aabb = grid.voxel_aabb(1, 2, 0);

        assert!(relative_eq!(grid.voxel_center(1, 2, 0), Point::new(1.5, 2.5, 0.5)));
        assert!(relative_eq!(aabb.mins, Point::new(1.0, 2.0, 0.0)));
        assert!(relative_eq!(aabb.maxs, Point::new(2.0, 3.0, 1.0)));
    }

    #[test]
    fn candidate_range_is_clamped_and_inclusive() {
        let grid = grid();

        // A box straddling several voxels, partially hanging out of the grid.
        let aabb = Aabb::new(Point::new(-1.0, 0.2, 0.3), Point::new(1.3, 0.8, 5.0));
        let (first, last) = grid.candidate_range(&aabb).unwrap();

        assert_eq!(first, Point3::new(0, 0, 0));
        assert_eq!(last, Point3::new(2, 1, 1));
    }

    #[test]
    fn candidate_range_of_point_on_voxel_corner() {
        let grid = grid();

        // A degenerate box on an interior corner of the voxel lattice: the
        // floor/ceil bounds cover exactly one voxel on each side.
        let aabb = Aabb::new(Point::new(2.0, 1.0, 1.0), Point::new(2.0, 1.0, 1.0));
        let (first, last) = grid.candidate_range(&aabb).unwrap();

        assert_eq!(first, Point3::new(2, 1, 1));
        assert_eq!(last, Point3::new(2, 1, 1));
    }

    #[test]
    fn candidate_range_outside_the_grid_is_empty() {
        let grid = grid();

        let beyond_x = Aabb::new(Point::new(4.5, 0.0, 0.0), Point::new(5.0, 1.0, 1.0));
        let below_y = Aabb::new(Point::new(0.0, -3.0, 0.0), Point::new(1.0, -0.1, 1.0));

        assert_eq!(grid.candidate_range(&beyond_x), None);
        assert_eq!(grid.candidate_range(&below_y), None);
    }

    #[test]
    fn candidate_range_touching_the_boundary_is_kept() {
        let grid = grid();

        // Touching the x = 0 grid face from the outside.
        let touching = Aabb::new(Point::new(-1.0, 0.0, 0.0), Point::new(0.0, 1.0, 1.0));
        let (first, last) = grid.candidate_range(&touching).unwrap();

        assert_eq!(first.x, 0);
        assert_eq!(last.x, 0);
    }
}
