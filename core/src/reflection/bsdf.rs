//! BSDF

use super::*;
use crate::interaction::SurfaceInteraction;
use crate::rng::ONE_MINUS_EPSILON;

/// Maximum number of BxDFs that can be stored in `BSDF`.
pub const MAX_BXDFS: usize = 8;

/// BSDF represents a collection of BRDFs and BTDFs at a surface point. It is
/// allocated per sample in the memory arena.
pub struct BSDF<'arena> {
    /// The shading normal. First axis of the shading coordinate system and
    /// defines the hemispheres for reflection.
    pub ns: Normal3f,

    /// The geometric normal defined by surface geometry.
    pub ng: Normal3f,

    /// Second axis for the shading coordinate system.
    pub ss: Vector3f,

    /// Third axis for the shading coordinate system.
    pub ts: Vector3f,

    /// Relative index of refraction over the surface boundary.
    pub eta: Float,

    /// The BxDFs.
    bxdfs: [Option<BxDF<'arena>>; MAX_BXDFS],

    /// Number of BxDFs stored.
    n_bxdfs: usize,
}

impl<'arena> BSDF<'arena> {
    /// Allocate a new `BSDF` in the arena.
    ///
    /// * `arena` - The arena for memory allocations.
    /// * `si`    - The geometry at the point on a surface.
    /// * `eta`   - Relative index of refraction over the surface boundary;
    ///             1.0 for opaque surfaces.
    pub fn alloc(arena: &'arena Bump, si: &SurfaceInteraction, eta: Float) -> &'arena mut Self {
        let ns = si.shading.n;
        let nv = Vector3f::from(ns);

        // Orthogonalize the shading tangent; fall back to an arbitrary frame.
        let t = si.shading.dpdu - nv * nv.dot(&si.shading.dpdu);
        let ss = if t.length_squared() > 0.0 {
            t.normalize()
        } else {
            coordinate_system(&nv).0
        };

        arena.alloc(Self {
            ns,
            ng: si.hit.n,
            ss,
            ts: nv.cross(&ss),
            eta,
            bxdfs: [None; MAX_BXDFS],
            n_bxdfs: 0,
        })
    }

    /// Add a BxDF. Additional BxDFs beyond `MAX_BXDFS` are ignored.
    ///
    /// * `bxdf` - The BxDF.
    pub fn add(&mut self, bxdf: BxDF<'arena>) {
        if self.n_bxdfs < MAX_BXDFS {
            self.bxdfs[self.n_bxdfs] = Some(bxdf);
            self.n_bxdfs += 1;
        } else {
            warn!("BSDF can hold at most {} BxDFs", MAX_BXDFS);
        }
    }

    /// Returns the stored BxDFs.
    fn components(&self) -> impl Iterator<Item = &BxDF<'arena>> + '_ {
        self.bxdfs[..self.n_bxdfs].iter().flatten()
    }

    /// Returns the number of BxDFs matching the given flags.
    ///
    /// * `bxdf_type` - Flags to match.
    pub fn num_components(&self, bxdf_type: BxDFType) -> usize {
        self.components()
            .filter(|b| b.matches_flags(bxdf_type))
            .count()
    }

    /// Returns true if every BxDF is a delta distribution.
    pub fn is_purely_specular(&self) -> bool {
        self.num_components(BxDFType::ALL & !BxDFType::SPECULAR) == 0
    }

    /// Transform a world space direction to the shading coordinate system.
    ///
    /// * `v` - The direction.
    pub fn world_to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.ss), v.dot(&self.ts), v.dot_n(&self.ns))
    }

    /// Transform a direction in the shading coordinate system to world space.
    ///
    /// * `v` - The direction.
    pub fn local_to_world(&self, v: &Vector3f) -> Vector3f {
        self.ss * v.x + self.ts * v.y + Vector3f::from(self.ns) * v.z
    }

    /// Evaluates the BSDF for a pair of world space directions. Reflection
    /// versus transmission is decided by the geometric normal.
    ///
    /// * `wo_w`      - Outgoing direction.
    /// * `wi_w`      - Incident direction.
    /// * `bxdf_type` - Flags restricting the BxDFs evaluated.
    pub fn f(&self, wo_w: &Vector3f, wi_w: &Vector3f, bxdf_type: BxDFType) -> Spectrum {
        let wi = self.world_to_local(wi_w);
        let wo = self.world_to_local(wo_w);
        if wo.z == 0.0 {
            return Spectrum::ZERO;
        }

        let reflect = wi_w.dot_n(&self.ng) * wo_w.dot_n(&self.ng) > 0.0;
        self.components()
            .filter(|b| {
                b.matches_flags(bxdf_type)
                    && ((reflect && b.get_type().contains(BxDFType::REFLECTION))
                        || (!reflect && b.get_type().contains(BxDFType::TRANSMISSION)))
            })
            .fold(Spectrum::ZERO, |acc, b| acc + b.f(&wo, &wi))
    }

    /// Samples one matching BxDF and returns the BSDF value and PDF for the
    /// sampled direction in world space.
    ///
    /// * `wo_w`      - Outgoing direction.
    /// * `u`         - The 2D uniform random values.
    /// * `bxdf_type` - Flags restricting the BxDFs sampled.
    pub fn sample_f(&self, wo_w: &Vector3f, u: &Point2f, bxdf_type: BxDFType) -> BxDFSample {
        // Choose which BxDF to sample.
        let matching = self.num_components(bxdf_type);
        if matching == 0 {
            return BxDFSample::default();
        }
        let comp = min((u[0] * matching as Float).floor() as usize, matching - 1);

        let bxdf = match self
            .components()
            .filter(|b| b.matches_flags(bxdf_type))
            .nth(comp)
        {
            Some(b) => *b,
            None => return BxDFSample::default(),
        };

        // Remap the first sample dimension to [0, 1).
        let u_remapped = Point2f::new(
            min(u[0] * matching as Float - comp as Float, ONE_MINUS_EPSILON),
            u[1],
        );

        let wo = self.world_to_local(wo_w);
        if wo.z == 0.0 {
            return BxDFSample::from(bxdf.get_type());
        }

        let sample = bxdf.sample_f(&wo, &u_remapped);
        if sample.pdf == 0.0 {
            return BxDFSample::from(bxdf.get_type());
        }
        let wi_w = self.local_to_world(&sample.wi);
        let sampled_type = bxdf.get_type();

        // Delta distributions keep their own value and PDF.
        if sampled_type.contains(BxDFType::SPECULAR) {
            return BxDFSample::new(sample.f, sample.pdf / matching as Float, wi_w, sampled_type);
        }

        let mut pdf = sample.pdf;
        let mut f = sample.f;
        if matching > 1 {
            for b in self
                .components()
                .filter(|b| b.matches_flags(bxdf_type) && !b.is_same(&bxdf))
            {
                pdf += b.pdf(&wo, &sample.wi);
            }

            let reflect = wi_w.dot_n(&self.ng) * wo_w.dot_n(&self.ng) > 0.0;
            f = self
                .components()
                .filter(|b| {
                    b.matches_flags(bxdf_type)
                        && ((reflect && b.get_type().contains(BxDFType::REFLECTION))
                            || (!reflect && b.get_type().contains(BxDFType::TRANSMISSION)))
                })
                .fold(Spectrum::ZERO, |acc, b| acc + b.f(&wo, &sample.wi));
        }

        BxDFSample::new(f, pdf / matching as Float, wi_w, sampled_type)
    }

    /// Evaluates the PDF of `sample_f` for a pair of world space directions.
    ///
    /// * `wo_w`      - Outgoing direction.
    /// * `wi_w`      - Incident direction.
    /// * `bxdf_type` - Flags restricting the BxDFs.
    pub fn pdf(&self, wo_w: &Vector3f, wi_w: &Vector3f, bxdf_type: BxDFType) -> Float {
        if self.n_bxdfs == 0 {
            return 0.0;
        }

        let wo = self.world_to_local(wo_w);
        let wi = self.world_to_local(wi_w);
        if wo.z == 0.0 {
            return 0.0;
        }

        let (pdf, matching) = self
            .components()
            .filter(|b| b.matches_flags(bxdf_type))
            .fold((0.0, 0), |(pdf, n), b| (pdf + b.pdf(&wo, &wi), n + 1));

        if matching > 0 {
            pdf / matching as Float
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn flat_interaction() -> SurfaceInteraction<'static> {
        SurfaceInteraction::new(
            Point3f::new(0.0, 0.0, 0.0),
            Point2f::new(0.0, 0.0),
            Vector3f::new(0.0, 0.0, 1.0),
            Normal3f::new(0.0, 0.0, 1.0),
            Vector3f::new(1.0, 0.0, 0.0),
            0.0,
        )
    }

    #[test]
    fn shading_frame_is_orthonormal() {
        let arena = Bump::new();
        let mut si = flat_interaction();
        si.shading.dpdu = Vector3f::new(1.0, 0.0, 0.5);
        let bsdf = BSDF::alloc(&arena, &si, 1.0);

        assert!(approx_eq!(f32, bsdf.ss.dot(&bsdf.ts), 0.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, bsdf.ss.dot_n(&bsdf.ns), 0.0, epsilon = 1e-6));
        let v = Vector3f::new(0.2, -0.4, 0.8);
        let back = bsdf.local_to_world(&bsdf.world_to_local(&v));
        assert!(approx_eq!(f32, back.x, v.x, epsilon = 1e-6));
        assert!(approx_eq!(f32, back.z, v.z, epsilon = 1e-6));
    }

    #[test]
    fn mirror_sample_reflects_about_normal() {
        let arena = Bump::new();
        let si = flat_interaction();
        let bsdf = BSDF::alloc(&arena, &si, 1.0);
        bsdf.add(SpecularReflection::alloc(&arena, Spectrum::ONE, Fresnel::NoOp));

        let wo = Vector3f::new(0.6, 0.0, 0.8);
        let s = bsdf.sample_f(&wo, &Point2f::new(0.3, 0.7), BxDFType::ALL);
        assert!(s.bxdf_type.contains(BxDFType::SPECULAR));
        assert!(approx_eq!(f32, s.wi.x, -0.6, epsilon = 1e-6));
        assert!(approx_eq!(f32, s.wi.z, 0.8, epsilon = 1e-6));
        // f * |cos| / pdf is the reflectance.
        assert!(approx_eq!(f32, s.f.y() * s.wi.z / s.pdf, 1.0, epsilon = 1e-5));
        assert!(bsdf.is_purely_specular());
    }

    #[test]
    fn diffuse_bsdf_rejects_transmission_flags() {
        let arena = Bump::new();
        let si = flat_interaction();
        let bsdf = BSDF::alloc(&arena, &si, 1.0);
        bsdf.add(LambertianReflection::alloc(&arena, Spectrum::new(0.5)));

        assert_eq!(bsdf.num_components(BxDFType::TRANSMISSION), 0);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.0, 0.6, 0.8);
        assert!(approx_eq!(
            f32,
            bsdf.f(&wo, &wi, BxDFType::ALL).y(),
            0.5 * INV_PI,
            epsilon = 1e-6
        ));
        assert!(approx_eq!(f32, bsdf.pdf(&wo, &wi, BxDFType::ALL), 0.8 * INV_PI, epsilon = 1e-6));
        assert!(!bsdf.is_purely_specular());
    }
}
