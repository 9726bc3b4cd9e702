use crate::{bounding_volume::Aabb, math::DIM, shape::Triangle};

impl Triangle {
    /// Computes the local-space [`Aabb`] of this triangle.
    ///
    /// The result tightly contains the three vertices. It is derived from the
    /// vertices on demand, so it can never be out of sync with them.
    #[inline]
    pub fn local_aabb(&self) -> Aabb {
        let mut mins = self.a;
        let mut maxs = self.a;

        for d in 0..DIM {
            mins[d] = mins[d].min(self.b[d]).min(self.c[d]);
            maxs[d] = maxs[d].max(self.b[d]).max(self.c[d]);
        }

        Aabb::new(mins, maxs)
    }
}
