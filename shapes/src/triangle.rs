//! Triangles and triangle meshes

use nlos_core::geometry::*;
use nlos_core::interaction::*;
use nlos_core::paramset::*;
use nlos_core::pbrt::*;
use nlos_core::sampling::*;
use nlos_core::shape::*;
use std::sync::Arc;

/// Triangle mesh with world space vertex data.
pub struct TriangleMesh {
    /// The number of triangles.
    pub num_triangles: usize,

    /// Vertex indices. For the ith triangle, its three vertex positions are
    /// p[vertex_indices[3 * i]], p[vertex_indices[3 * i + 1]], and
    /// p[vertex_indices[3 * i + 2]]
    pub vertex_indices: Vec<usize>,

    /// Vertex positions.
    pub p: Vec<Point3f>,

    /// Vertex normals. This will be empty if there are none.
    pub n: Vec<Normal3f>,

    /// Paramteric uv-coordinates per vertex. This will be empty if there are none.
    pub uv: Vec<Point2f>,

    /// Indicates whether the geometric normals should be flipped.
    pub reverse_orientation: bool,
}

impl TriangleMesh {
    /// Create a new triangle mesh.
    ///
    /// * `reverse_orientation` - Indicates whether their surface normal directions
    ///                           should be reversed from the default
    /// * `vertex_indices`      - Vertex indices for triangles.
    /// * `p`                   - Vertex positions.
    /// * `n`                   - Vertex normals.
    /// * `uv`                  - Paramteric uv-coordinates.
    pub fn new(
        reverse_orientation: bool,
        vertex_indices: Vec<usize>,
        p: Vec<Point3f>,
        n: Vec<Normal3f>,
        uv: Vec<Point2f>,
    ) -> Self {
        Self {
            num_triangles: vertex_indices.len() / 3,
            vertex_indices,
            p,
            n,
            uv,
            reverse_orientation,
        }
    }

    /// Create a triangle mesh and return one shape per triangle.
    ///
    /// * `reverse_orientation` - Indicates whether their surface normal directions
    ///                           should be reversed from the default
    /// * `vertex_indices`      - Vertex indices for triangles.
    /// * `p`                   - Vertex positions.
    /// * `n`                   - Vertex normals.
    /// * `uv`                  - Paramteric uv-coordinates.
    pub fn create(
        reverse_orientation: bool,
        vertex_indices: Vec<usize>,
        p: Vec<Point3f>,
        n: Vec<Normal3f>,
        uv: Vec<Point2f>,
    ) -> Vec<ArcShape> {
        let mesh = Arc::new(Self::new(reverse_orientation, vertex_indices, p, n, uv));
        (0..mesh.num_triangles)
            .map(|i| Arc::new(Triangle::new(Arc::clone(&mesh), i)) as ArcShape)
            .collect()
    }

    /// Create triangles from a parameter set. Invalid meshes are reported and
    /// produce no shapes.
    ///
    /// * `params` - Parameter set with `P`, `indices` and optionally `N` and
    ///              `uv`.
    pub fn from_props(params: &ParamSet) -> Vec<ArcShape> {
        let vi: Vec<usize> = params
            .find_int("indices")
            .iter()
            .map(|i| max(*i, 0) as usize)
            .collect();
        let nvi = vi.len();

        let p = params.find_point3f("P");
        let npi = p.len();

        if nvi == 0 {
            error!("Vertex indices 'indices' not provided with triangle mesh shape");
            return vec![];
        }
        if npi == 0 {
            error!("Vertex positions 'P' not provided with triangle mesh shape");
            return vec![];
        }
        if nvi % 3 != 0 {
            error!("Number of vertex indices {nvi} not a multiple of 3. Discarding mesh.");
            return vec![];
        }
        if let Some(bad) = vi.iter().find(|&&i| i >= npi) {
            error!(
                "trianglemesh has out-of-bounds vertex index {bad} ({npi} 'P' values were given)"
            );
            return vec![];
        }

        let mut n: Vec<Normal3f> = params
            .find_point3f("N")
            .iter()
            .map(|v| Normal3f::new(v.x, v.y, v.z))
            .collect();
        if !n.is_empty() && n.len() != npi {
            error!("Number of 'N' for triangle mesh must match 'P'.");
            n = vec![];
        }

        let fuv = params.find_float("uv");
        let mut uv: Vec<Point2f> = fuv
            .chunks_exact(2)
            .map(|c| Point2f::new(c[0], c[1]))
            .collect();
        if !uv.is_empty() && uv.len() < npi {
            error!(
                "Not enough of 'uv' for triangle mesh. Expected {npi}, found {}. Discarding.",
                uv.len()
            );
            uv = vec![];
        }

        let reverse_orientation = params.find_one_bool("reverseorientation", false);

        Self::create(reverse_orientation, vi, p, n, uv)
    }
}

/// Triangle.
#[derive(Clone)]
pub struct Triangle {
    /// The mesh.
    pub mesh: Arc<TriangleMesh>,

    /// The index of the first vertex index of the triangle in the mesh.
    pub v: usize,
}

impl Triangle {
    /// Create a new triangle.
    ///
    /// * `mesh`           - The triangle mesh.
    /// * `triangle_index` - The index of the triangle.
    pub fn new(mesh: Arc<TriangleMesh>, triangle_index: usize) -> Self {
        Self {
            mesh,
            v: 3 * triangle_index,
        }
    }

    /// Returns the mesh vertex index of corner `i`.
    fn index(&self, i: usize) -> usize {
        self.mesh.vertex_indices[self.v + i]
    }

    /// Returns the three vertex positions.
    fn positions(&self) -> [Point3f; 3] {
        [
            self.mesh.p[self.index(0)],
            self.mesh.p[self.index(1)],
            self.mesh.p[self.index(2)],
        ]
    }

    /// Returns the three vertex normals if the mesh has them.
    fn normals(&self) -> Option<[Normal3f; 3]> {
        if self.mesh.n.is_empty() {
            None
        } else {
            Some([
                self.mesh.n[self.index(0)],
                self.mesh.n[self.index(1)],
                self.mesh.n[self.index(2)],
            ])
        }
    }

    /// Returns the uv-coordinates for the triangle. If there are no uv
    /// coordinates, then default ones [(0,0), (1,0), (1,1)] are returned.
    fn get_uvs(&self) -> [Point2f; 3] {
        if self.mesh.uv.is_empty() {
            [
                Point2f::new(0.0, 0.0),
                Point2f::new(1.0, 0.0),
                Point2f::new(1.0, 1.0),
            ]
        } else {
            [
                self.mesh.uv[self.index(0)],
                self.mesh.uv[self.index(1)],
                self.mesh.uv[self.index(2)],
            ]
        }
    }

    /// Returns the geometric normal at barycentric coordinates `b`, oriented
    /// by the vertex normals if present and otherwise by the winding order.
    ///
    /// * `p` - Vertex positions.
    /// * `b` - Barycentric coordinates.
    fn oriented_normal(&self, p: &[Point3f; 3], b: &[Float; 3]) -> (Normal3f, Option<Normal3f>) {
        let mut n = Normal3f::from((p[0] - p[2]).cross(&(p[1] - p[2]))).normalize();
        match self.normals() {
            Some(vn) => {
                let ns = vn[0] * b[0] + vn[1] * b[1] + vn[2] * b[2];
                if ns.length_squared() > 0.0 {
                    let ns = ns.normalize();
                    n = n.face_forward(&Vector3f::from(ns));
                    (n, Some(ns))
                } else {
                    (n, None)
                }
            }
            None => {
                if self.mesh.reverse_orientation {
                    n = -n;
                }
                (n, None)
            }
        }
    }

    /// Möller-Trumbore ray/triangle test. Returns the ray parameter and the
    /// barycentric coordinates of the hit.
    ///
    /// * `r` - The ray.
    fn hit_barycentrics(&self, r: &Ray) -> Option<(Float, [Float; 3])> {
        let [p0, p1, p2] = self.positions();
        let e1 = p1 - p0;
        let e2 = p2 - p0;
        let pvec = r.d.cross(&e2);
        let det = e1.dot(&pvec);
        if det.abs() < 1e-12 {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = r.o - p0;
        let b1 = tvec.dot(&pvec) * inv_det;
        if !(0.0..=1.0).contains(&b1) {
            return None;
        }

        let qvec = tvec.cross(&e1);
        let b2 = r.d.dot(&qvec) * inv_det;
        if b2 < 0.0 || b1 + b2 > 1.0 {
            return None;
        }

        let t = e2.dot(&qvec) * inv_det;
        if t <= 0.0 || t >= r.t_max {
            return None;
        }
        Some((t, [1.0 - b1 - b2, b1, b2]))
    }
}

impl Shape for Triangle {
    /// Returns a bounding box in the world space.
    fn world_bound(&self) -> Bounds3f {
        self.positions()
            .iter()
            .fold(Bounds3f::empty(), |b, p| b.union_p(p))
    }

    /// Returns geometric details if a ray intersects the shape intersection.
    /// If there is no intersection, `None` is returned.
    ///
    /// * `r` - The ray.
    fn intersect<'scene>(&self, r: &Ray) -> Option<Intersection<'scene>> {
        let (t, b) = self.hit_barycentrics(r)?;
        let p = self.positions();
        let uv = self.get_uvs();

        let p_hit = p[0] * b[0] + p[1] * b[1] + p[2] * b[2];
        let uv_hit = Point2f::new(
            b[0] * uv[0].x + b[1] * uv[1].x + b[2] * uv[2].x,
            b[0] * uv[0].y + b[1] * uv[1].y + b[2] * uv[2].y,
        );

        // Compute triangle partial derivatives.
        let (du02, dv02) = (uv[0].x - uv[2].x, uv[0].y - uv[2].y);
        let (du12, dv12) = (uv[1].x - uv[2].x, uv[1].y - uv[2].y);
        let dp02 = p[0] - p[2];
        let dp12 = p[1] - p[2];
        let determinant = du02 * dv12 - dv02 * du12;

        let (n, ns) = self.oriented_normal(&p, &b);
        let dpdu = if determinant.abs() < 1e-8 {
            coordinate_system(&Vector3f::from(n)).0
        } else {
            let dpdu = (dp02 * dv12 - dp12 * dv02) * (1.0 / determinant);
            if dpdu.cross(&Vector3f::from(n)).length_squared() == 0.0 {
                coordinate_system(&Vector3f::from(n)).0
            } else {
                dpdu
            }
        };

        let mut isect = SurfaceInteraction::new(p_hit, uv_hit, -r.d, n, dpdu, r.time);
        if let Some(ns) = ns {
            // Gram-Schmidt the tangent against the shading normal.
            let ss = dpdu - Vector3f::from(ns) * dpdu.dot_n(&ns);
            let ss = if ss.length_squared() > 0.0 {
                ss.normalize()
            } else {
                coordinate_system(&Vector3f::from(ns)).0
            };
            isect.set_shading_geometry(ns, ss);
        }

        Some(Intersection::new(t, isect))
    }

    /// Returns `true` if a ray-shape intersection succeeds.
    ///
    /// * `r` - The ray.
    fn intersect_p(&self, r: &Ray) -> bool {
        self.hit_barycentrics(r).is_some()
    }

    /// Returns the surface area of the shape.
    fn area(&self) -> Float {
        let [p0, p1, p2] = self.positions();
        0.5 * (p1 - p0).cross(&(p2 - p0)).length()
    }

    /// Sample a point on the surface and return the PDF with respect to area on
    /// the surface.
    ///
    /// NOTE: The returned `Hit` value will have `wo` = Vector3f::ZERO.
    ///
    /// * `u` - Sample value to use.
    fn sample_area(&self, u: &Point2f) -> (Hit, Float) {
        let bc = uniform_sample_triangle(u);
        let b = [bc.x, bc.y, 1.0 - bc.x - bc.y];
        let p = self.positions();
        let p_hit = p[0] * b[0] + p[1] * b[1] + p[2] * b[2];
        let (n, _) = self.oriented_normal(&p, &b);
        let area = self.area();
        let pdf = if area > 0.0 { 1.0 / area } else { 0.0 };
        (Hit::new(p_hit, 0.0, Vector3f::ZERO, n), pdf)
    }

    /// Returns the vertex positions and normals.
    fn triangle_vertices(&self) -> Option<TriangleVertices> {
        Some(TriangleVertices {
            p: self.positions(),
            n: self.normals(),
        })
    }
}
