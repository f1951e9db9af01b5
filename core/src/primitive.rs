//! Primitives

use crate::geometry::*;
use crate::light::*;
use crate::material::*;
use crate::paramset::*;
use crate::shape::*;
use std::fmt;
use std::sync::Arc;

/// Semantic tag attached to scene geometry by the exporter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ObjectSemantic {
    /// Ordinary geometry.
    #[default]
    Default = 0,

    /// Relay surface that light bounces off towards hidden geometry.
    NlosReflector = 10,

    /// Hidden geometry of interest.
    NlosObject = 11,
}

impl From<i32> for ObjectSemantic {
    /// Returns the semantic for the exporter's integer value. Unknown values
    /// map to `Default`.
    ///
    /// * `v` - The integer value.
    fn from(v: i32) -> Self {
        match v {
            0 => Self::Default,
            10 => Self::NlosReflector,
            11 => Self::NlosObject,
            _ => {
                warn!("Unknown ObjectSemantic {v}. Using Default.");
                Self::Default
            }
        }
    }
}

impl From<&ParamSet> for ObjectSemantic {
    /// Reads the `ObjectSemantic` integer parameter.
    ///
    /// * `params` - Shape parameters.
    fn from(params: &ParamSet) -> Self {
        Self::from(params.find_one_int("ObjectSemantic", 0))
    }
}

impl fmt::Display for ObjectSemantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "Default"),
            Self::NlosReflector => write!(f, "NlosReflector"),
            Self::NlosObject => write!(f, "NlosObject"),
        }
    }
}

/// GeometricPrimitive represents a single shape in a scene.
#[derive(Clone)]
pub struct GeometricPrimitive {
    /// The shape.
    pub shape: ArcShape,

    /// The material. A primitive without one only marks a boundary and does
    /// not scatter light.
    pub material: Option<ArcMaterial>,

    /// Area light describing the emission if the primitive emits light.
    pub area_light: Option<ArcAreaLight>,

    /// Semantic tag used by NLOS scene analysis.
    pub semantic: ObjectSemantic,
}

impl GeometricPrimitive {
    /// Create a new geometric primitive.
    ///
    /// * `shape`      - The shape.
    /// * `material`   - The material.
    /// * `area_light` - Area light if the primitive emits light.
    /// * `semantic`   - Semantic tag.
    pub fn new(
        shape: ArcShape,
        material: Option<ArcMaterial>,
        area_light: Option<ArcAreaLight>,
        semantic: ObjectSemantic,
    ) -> Self {
        Self {
            shape,
            material,
            area_light,
            semantic,
        }
    }

    /// Returns a bounding box in world space.
    pub fn world_bound(&self) -> Bounds3f {
        self.shape.world_bound()
    }

    /// Returns the closest intersection with the ray, tagged with this
    /// primitive.
    ///
    /// * `r` - The ray.
    pub fn intersect(&self, r: &Ray) -> Option<Intersection<'_>> {
        let mut it = self.shape.intersect(r)?;
        it.isect.primitive = Some(self);
        Some(it)
    }

    /// Returns `true` if the ray intersects the primitive.
    ///
    /// * `r` - The ray.
    pub fn intersect_p(&self, r: &Ray) -> bool {
        self.shape.intersect_p(r)
    }
}

/// Atomic reference counted `GeometricPrimitive`.
pub type ArcPrimitive = Arc<GeometricPrimitive>;
