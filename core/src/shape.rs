//! Shape

use crate::geometry::*;
use crate::interaction::*;
use crate::pbrt::*;
use std::sync::Arc;

/// Result of a successful ray-shape intersection.
pub struct Intersection<'scene> {
    /// Ray parameter of the hit.
    pub t: Float,

    /// Geometry at the hit point.
    pub isect: SurfaceInteraction<'scene>,
}

impl<'scene> Intersection<'scene> {
    /// Create a new intersection.
    ///
    /// * `t`     - Ray parameter of the hit.
    /// * `isect` - Geometry at the hit point.
    pub fn new(t: Float, isect: SurfaceInteraction<'scene>) -> Self {
        Self { t, isect }
    }
}

/// Vertex data of a triangle, exposed for scene analysis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TriangleVertices {
    /// Vertex positions in world space.
    pub p: [Point3f; 3],

    /// Per-vertex normals, if the mesh has them.
    pub n: Option<[Normal3f; 3]>,
}

impl TriangleVertices {
    /// Returns the unnormalized geometric normal from the winding order.
    pub fn winding_normal(&self) -> Vector3f {
        (self.p[1] - self.p[0]).cross(&(self.p[2] - self.p[0]))
    }

    /// Returns the surface area.
    pub fn area(&self) -> Float {
        0.5 * self.winding_normal().length()
    }
}

/// Shape interface.
pub trait Shape {
    /// Returns a bounding box in world space.
    fn world_bound(&self) -> Bounds3f;

    /// Returns the closest intersection with the ray within `(0, r.t_max)`.
    ///
    /// * `r` - The ray.
    fn intersect<'scene>(&self, r: &Ray) -> Option<Intersection<'scene>>;

    /// Returns `true` if the ray intersects the shape within `(0, r.t_max)`.
    ///
    /// * `r` - The ray.
    fn intersect_p(&self, r: &Ray) -> bool {
        self.intersect(r).is_some()
    }

    /// Returns the surface area of the shape.
    fn area(&self) -> Float;

    /// Sample a point on the surface uniformly by area. Returns the point and
    /// the PDF with respect to area.
    ///
    /// * `u` - Sample value to use.
    fn sample_area(&self, u: &Point2f) -> (Hit, Float);

    /// Sample a point on the shape visible from a reference point. Returns the
    /// point and the PDF with respect to solid angle from the reference point.
    ///
    /// * `hit` - Reference point.
    /// * `u`   - Sample value to use.
    fn sample_solid_angle(&self, hit: &Hit, u: &Point2f) -> (Hit, Float) {
        let (intr, pdf_area) = self.sample_area(u);
        let wi = intr.p - hit.p;
        let dist_sq = wi.length_squared();
        if pdf_area == 0.0 || dist_sq == 0.0 {
            return (intr, 0.0);
        }

        // Convert from area measure to solid angle measure.
        let wi = wi.normalize();
        let cos = intr.n.abs_dot(&(-wi));
        let pdf = if cos == 0.0 {
            0.0
        } else {
            pdf_area * dist_sq / cos
        };
        (intr, if pdf.is_finite() { pdf } else { 0.0 })
    }

    /// Returns the PDF with respect to solid angle of sampling direction `wi`
    /// from a reference point.
    ///
    /// * `hit` - Reference point.
    /// * `wi`  - Incident direction.
    fn pdf_solid_angle(&self, hit: &Hit, wi: &Vector3f) -> Float {
        let ray = hit.spawn_ray(wi);
        match self.intersect(&ray) {
            Some(Intersection { isect, .. }) => {
                let cos = isect.hit.n.abs_dot(&(-*wi));
                if cos == 0.0 {
                    return 0.0;
                }
                let pdf = hit.p.distance_squared(isect.hit.p) / (cos * self.area());
                if pdf.is_finite() {
                    pdf
                } else {
                    0.0
                }
            }
            None => 0.0,
        }
    }

    /// Returns the vertex data if the shape is a single triangle.
    fn triangle_vertices(&self) -> Option<TriangleVertices> {
        None
    }
}

/// Atomic reference counted `Shape`.
pub type ArcShape = Arc<dyn Shape + Send + Sync>;
