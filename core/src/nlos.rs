//! NLOS Object Catalog
//!
//! Selects the object-tagged triangles that can receive light from the
//! reflector-tagged triangles, and builds an area-weighted distribution over
//! them.

use crate::geometry::*;
use crate::interaction::Hit;
use crate::pbrt::*;
use crate::primitive::*;
use crate::sampling::*;
use crate::shape::TriangleVertices;
use std::sync::Arc;
use thiserror::Error;

/// Authoring and configuration problems found while building the catalog.
#[derive(Debug, Error, PartialEq)]
pub enum NlosCatalogError {
    /// The per-vertex normals of an object triangle point to different sides
    /// of its plane.
    #[error(
        "NlosObject triangle ({}), ({}), ({}) has vertex normals disagreeing on its outward side",
        .vertices[0], .vertices[1], .vertices[2]
    )]
    InconsistentNormals { vertices: [Point3f; 3] },

    /// Reflector geometry exists but every object triangle faces away from it.
    #[error(
        "all {culled} NlosObject triangles were culled against {reflector_vertices} reflector vertices"
    )]
    AllObjectsCulled {
        reflector_vertices: usize,
        culled: usize,
    },
}

/// An object triangle that survived culling.
#[derive(Clone)]
pub struct NlosObject {
    /// The primitive holding the triangle.
    pub primitive: ArcPrimitive,

    /// Surface area of the triangle.
    pub area: Float,
}

/// Object-tagged triangles visible to the reflector, with an area-weighted
/// sampling distribution. Built once at scene construction.
pub struct NlosObjectCatalog {
    objects: Vec<NlosObject>,
    distribution: Distribution1D,
    total_area: Float,
    culled: usize,
}

impl NlosObjectCatalog {
    /// Scan the primitives and build the catalog. Returns `Ok(None)` when the
    /// scene has no object-tagged triangles. Without reflector geometry every
    /// object triangle is kept.
    ///
    /// * `primitives` - All scene primitives.
    pub fn new(primitives: &[ArcPrimitive]) -> Result<Option<Self>, NlosCatalogError> {
        let reflector_vertices: Vec<Point3f> = primitives
            .iter()
            .filter(|p| p.semantic == ObjectSemantic::NlosReflector)
            .filter_map(|p| p.shape.triangle_vertices())
            .flat_map(|tv| tv.p)
            .collect();

        let candidates: Vec<(&ArcPrimitive, TriangleVertices)> = primitives
            .iter()
            .filter(|p| p.semantic == ObjectSemantic::NlosObject)
            .filter_map(|p| p.shape.triangle_vertices().map(|tv| (p, tv)))
            .collect();
        if candidates.is_empty() {
            return Ok(None);
        }

        let mut objects = Vec::with_capacity(candidates.len());
        let mut culled = 0;
        let mut warned_straddle = false;
        for (primitive, tv) in candidates {
            let outward = outward_normal(&tv)?;
            let visible = if reflector_vertices.is_empty() {
                true
            } else {
                let (front, back) = reflector_vertices.iter().fold((0, 0), |(f, b), r| {
                    let d = outward.dot(&(*r - tv.p[0]));
                    if d > 0.0 {
                        (f + 1, b)
                    } else if d < 0.0 {
                        (f, b + 1)
                    } else {
                        (f, b)
                    }
                });
                if front > 0 && back > 0 && !warned_straddle {
                    warn!(
                        "Reflector vertices lie on both sides of NlosObject triangle ({}), ({}), ({}); \
                         the reflector may be concave or made of several parts",
                        tv.p[0], tv.p[1], tv.p[2]
                    );
                    warned_straddle = true;
                }
                front > 0
            };

            if visible {
                objects.push(NlosObject {
                    primitive: Arc::clone(primitive),
                    area: tv.area(),
                });
            } else {
                culled += 1;
            }
        }

        if objects.is_empty() {
            return Err(NlosCatalogError::AllObjectsCulled {
                reflector_vertices: reflector_vertices.len(),
                culled,
            });
        }

        let areas: Vec<Float> = objects.iter().map(|o| o.area).collect();
        let total_area = areas.iter().sum();
        info!(
            "NLOS catalog: {} objects, {} culled, total area {}",
            objects.len(),
            culled,
            total_area
        );

        Ok(Some(Self {
            objects,
            distribution: Distribution1D::new(areas),
            total_area,
            culled,
        }))
    }

    /// Returns the object triangles in scene order.
    pub fn objects(&self) -> &[NlosObject] {
        &self.objects
    }

    /// Returns number of object triangles kept.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the catalog has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Returns number of object triangles dropped by culling.
    pub fn culled_count(&self) -> usize {
        self.culled
    }

    /// Returns the summed area of the kept objects.
    pub fn total_area(&self) -> Float {
        self.total_area
    }

    /// Choose an object in proportion to its area. Returns the object index
    /// and the discrete probability.
    ///
    /// * `u` - Uniform sample in [0, 1).
    pub fn sample(&self, u: Float) -> (usize, Float) {
        self.distribution.sample(u)
    }

    /// Choose a point uniformly by area over all objects. Returns the object
    /// index, the point and the PDF with respect to area.
    ///
    /// * `u_object` - Sample used to choose the object.
    /// * `u`        - Sample used to choose the point on the object.
    pub fn sample_point(&self, u_object: Float, u: &Point2f) -> (usize, Hit, Float) {
        let (index, pdf_object) = self.sample(u_object);
        let (hit, pdf_area) = self.objects[index].primitive.shape.sample_area(u);
        (index, hit, pdf_object * pdf_area)
    }
}

/// Returns the unnormalized outward normal of the triangle. Vertex normals,
/// when present, pick the side; otherwise the winding order does.
///
/// * `tv` - The triangle.
fn outward_normal(tv: &TriangleVertices) -> Result<Vector3f, NlosCatalogError> {
    let ng = tv.winding_normal();
    match tv.n {
        None => Ok(ng),
        Some(ns) => {
            let sides: Vec<Float> = ns.iter().map(|n| n.dot(&ng)).collect();
            if sides.iter().all(|&s| s > 0.0) {
                Ok(ng)
            } else if sides.iter().all(|&s| s < 0.0) {
                Ok(-ng)
            } else {
                Err(NlosCatalogError::InconsistentNormals { vertices: tv.p })
            }
        }
    }
}
