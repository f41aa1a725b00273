//! Pass types - the named output channels a film can accumulate.

use bitflags::bitflags;
use std::fmt;

/// Render pass written alongside (or as) the main image.
///
/// Each pass occupies a fixed number of consecutive floats inside a pixel's
/// region of the render buffer. How a pass is turned back into a displayable
/// value on read-back is also a property of the type (see [`PassType::filter`],
/// [`PassType::exposure`], [`PassType::divide_by`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PassType {
    /// Main RGBA image (rgb radiance, alpha = 1 - transparency)
    Combined = 0,
    /// Camera distance of the first opaque hit
    Depth = 1,
    /// Shading normal
    Normal = 2,
    /// Surface UV (third component unused by most shaders)
    Uv = 3,
    /// Object pass index
    ObjectId = 4,
    /// Material pass index
    MaterialId = 5,
    /// Screen space motion (previous xy, next xy)
    Motion = 6,
    /// Number of motion samples accumulated
    MotionWeight = 7,
    DiffuseDirect = 8,
    DiffuseIndirect = 9,
    DiffuseColor = 10,
    GlossyDirect = 11,
    GlossyIndirect = 12,
    GlossyColor = 13,
    TransmissionDirect = 14,
    TransmissionIndirect = 15,
    TransmissionColor = 16,
    Emission = 17,
    Background = 18,
    /// Ambient occlusion
    Ao = 19,
    /// Shadow catcher color (rgb) and scale (w)
    Shadow = 20,
    /// Mist / atmospheric depth factor
    Mist = 21,
}

impl PassType {
    /// Number of pass types.
    pub const COUNT: usize = 22;

    /// Every pass type, in declaration order.
    pub const ALL: [PassType; Self::COUNT] = [
        Self::Combined,
        Self::Depth,
        Self::Normal,
        Self::Uv,
        Self::ObjectId,
        Self::MaterialId,
        Self::Motion,
        Self::MotionWeight,
        Self::DiffuseDirect,
        Self::DiffuseIndirect,
        Self::DiffuseColor,
        Self::GlossyDirect,
        Self::GlossyIndirect,
        Self::GlossyColor,
        Self::TransmissionDirect,
        Self::TransmissionIndirect,
        Self::TransmissionColor,
        Self::Emission,
        Self::Background,
        Self::Ao,
        Self::Shadow,
        Self::Mist,
    ];

    /// Passes that make the shading collaborator accumulate diffuse color.
    pub const DIFFUSE: [PassType; 3] =
        [Self::DiffuseDirect, Self::DiffuseIndirect, Self::DiffuseColor];
    /// Passes that make the shading collaborator accumulate glossy color.
    pub const GLOSSY: [PassType; 3] = [Self::GlossyDirect, Self::GlossyIndirect, Self::GlossyColor];
    /// Passes that make the shading collaborator accumulate transmission color.
    pub const TRANSMISSION: [PassType; 3] = [
        Self::TransmissionDirect,
        Self::TransmissionIndirect,
        Self::TransmissionColor,
    ];

    /// Number of floats this pass occupies per pixel.
    #[inline]
    pub const fn components(self) -> usize {
        match self {
            Self::Depth | Self::ObjectId | Self::MaterialId | Self::MotionWeight | Self::Mist => 1,
            Self::Combined | Self::Motion | Self::Shadow => 4,
            _ => 3,
        }
    }

    /// True if resolve divides this pass by the sample count.
    ///
    /// Depth and the id passes are written once on sample 0; motion is
    /// normalized by its own weight pass instead.
    #[inline]
    pub const fn filter(self) -> bool {
        !matches!(
            self,
            Self::Depth | Self::ObjectId | Self::MaterialId | Self::Motion | Self::MotionWeight
        )
    }

    /// True if resolve scales this pass by the film exposure.
    #[inline]
    pub const fn exposure(self) -> bool {
        matches!(
            self,
            Self::Combined
                | Self::DiffuseDirect
                | Self::DiffuseIndirect
                | Self::GlossyDirect
                | Self::GlossyIndirect
                | Self::TransmissionDirect
                | Self::TransmissionIndirect
                | Self::Emission
                | Self::Background
                | Self::Ao
        )
    }

    /// Color pass this lighting pass is divided by on resolve, if any.
    #[inline]
    pub const fn divide_by(self) -> Option<PassType> {
        match self {
            Self::DiffuseDirect | Self::DiffuseIndirect => Some(Self::DiffuseColor),
            Self::GlossyDirect | Self::GlossyIndirect => Some(Self::GlossyColor),
            Self::TransmissionDirect | Self::TransmissionIndirect => Some(Self::TransmissionColor),
            _ => None,
        }
    }

    /// True if this pass is written by the light-pass writer, which turns on
    /// the film's light-pass switch.
    #[inline]
    pub const fn is_light_pass(self) -> bool {
        !matches!(
            self,
            Self::Combined
                | Self::Depth
                | Self::Normal
                | Self::Uv
                | Self::ObjectId
                | Self::MaterialId
                | Self::Motion
                | Self::MotionWeight
        )
    }

    /// Stable snake_case name, as used in film configs.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Combined => "combined",
            Self::Depth => "depth",
            Self::Normal => "normal",
            Self::Uv => "uv",
            Self::ObjectId => "object_id",
            Self::MaterialId => "material_id",
            Self::Motion => "motion",
            Self::MotionWeight => "motion_weight",
            Self::DiffuseDirect => "diffuse_direct",
            Self::DiffuseIndirect => "diffuse_indirect",
            Self::DiffuseColor => "diffuse_color",
            Self::GlossyDirect => "glossy_direct",
            Self::GlossyIndirect => "glossy_indirect",
            Self::GlossyColor => "glossy_color",
            Self::TransmissionDirect => "transmission_direct",
            Self::TransmissionIndirect => "transmission_indirect",
            Self::TransmissionColor => "transmission_color",
            Self::Emission => "emission",
            Self::Background => "background",
            Self::Ao => "ao",
            Self::Shadow => "shadow",
            Self::Mist => "mist",
        }
    }

    /// Parse a pass type from its name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    #[inline]
    const fn bit(self) -> u32 {
        1 << (self as u8)
    }
}

impl fmt::Display for PassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of enabled passes.
///
/// Membership is queried per [`PassType`]; the packed representation is an
/// implementation detail.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PassSet(u32);

impl PassSet {
    /// Set with no passes.
    pub const EMPTY: Self = Self(0);

    /// Create an empty set.
    #[inline]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    #[inline]
    pub const fn contains(&self, pass: PassType) -> bool {
        self.0 & pass.bit() != 0
    }

    /// True if any of `passes` is in the set.
    #[inline]
    pub fn any_of(&self, passes: &[PassType]) -> bool {
        passes.iter().any(|&p| self.contains(p))
    }

    /// Add a pass. Returns false if it was already present.
    #[inline]
    pub fn insert(&mut self, pass: PassType) -> bool {
        let had = self.contains(pass);
        self.0 |= pass.bit();
        !had
    }

    /// Remove a pass. Returns false if it was absent.
    #[inline]
    pub fn remove(&mut self, pass: PassType) -> bool {
        let had = self.contains(pass);
        self.0 &= !pass.bit();
        had
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate members in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = PassType> + '_ {
        PassType::ALL.iter().copied().filter(move |&p| self.contains(p))
    }
}

impl FromIterator<PassType> for PassSet {
    fn from_iter<I: IntoIterator<Item = PassType>>(iter: I) -> Self {
        let mut set = Self::new();
        for p in iter {
            set.insert(p);
        }
        set
    }
}

impl fmt::Debug for PassSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

bitflags! {
    /// Properties of the path that reached the current shading point.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct PathFlags: u32 {
        const CAMERA             = 1 << 0;
        const REFLECT            = 1 << 1;
        const TRANSMIT           = 1 << 2;
        const DIFFUSE            = 1 << 3;
        const GLOSSY             = 1 << 4;
        const SINGULAR           = 1 << 5;
        /// Passed through at least one transparent / cutout surface
        const TRANSPARENT        = 1 << 6;
        const SHADOW_OPAQUE      = 1 << 7;
        const SHADOW_TRANSPARENT = 1 << 8;

        const SHADOW = Self::SHADOW_OPAQUE.bits() | Self::SHADOW_TRANSPARENT.bits();
    }
}

impl PathFlags {
    /// Camera path that is not a shadow ray.
    #[inline]
    pub fn is_camera_path(self) -> bool {
        self.contains(Self::CAMERA) && !self.intersects(Self::SHADOW)
    }
}
