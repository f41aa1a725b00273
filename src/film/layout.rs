//! Channel offset table: where each enabled pass lives inside a pixel region.
//!
//! A layout is built once at render setup and is read-only while sampling.
//! All overlap and bounds validation happens here, so the writers can index
//! the buffer without checks.

use smallvec::SmallVec;

use super::pass::{PassSet, PassType};
use crate::util::{Error, Result};

/// One enabled pass and its float offset within a pixel region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassEntry {
    pub pass: PassType,
    pub offset: usize,
}

impl PassEntry {
    /// Float range this pass covers within a pixel region.
    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.pass.components()
    }
}

/// Offsets of every enabled pass plus the per-pixel stride.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassLayout {
    entries: SmallVec<[PassEntry; 16]>,
    offsets: [Option<usize>; PassType::COUNT],
    enabled: PassSet,
    stride: usize,
}

impl PassLayout {
    /// Start a packed layout. The combined pass is always at offset 0.
    pub fn builder() -> PassLayoutBuilder {
        PassLayoutBuilder::new()
    }

    /// Packed layout for the given passes, in order.
    pub fn with_passes(passes: impl IntoIterator<Item = PassType>) -> Self {
        let mut builder = Self::builder();
        for pass in passes {
            builder = builder.add(pass);
        }
        builder.build()
    }

    /// Layout from explicit offsets.
    ///
    /// Fails if a pass appears twice, if two regions overlap, or if a region
    /// ends past `stride`.
    #[tracing::instrument(skip_all, fields(stride = stride))]
    pub fn from_offsets(
        entries: impl IntoIterator<Item = (PassType, usize)>,
        stride: usize,
    ) -> Result<Self> {
        let mut enabled = PassSet::new();
        let mut list: SmallVec<[PassEntry; 16]> = SmallVec::new();

        for (pass, offset) in entries {
            if !enabled.insert(pass) {
                return Err(Error::DuplicatePass(pass));
            }
            match offset.checked_add(pass.components()) {
                Some(end) if end <= stride => {}
                end => {
                    let end = end.unwrap_or(usize::MAX);
                    return Err(Error::PassOutOfStride { pass, end, stride });
                }
            }
            list.push(PassEntry { pass, offset });
        }

        // Adjacent check on offset order is enough to catch any overlap
        let mut sorted = list.clone();
        sorted.sort_by_key(|e| e.offset);
        for pair in sorted.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if b.offset < a.range().end {
                return Err(Error::PassOverlap {
                    first: a.pass,
                    first_range: a.range(),
                    second: b.pass,
                    second_range: b.range(),
                });
            }
        }

        Ok(Self::from_entries(list, enabled, stride))
    }

    fn from_entries(entries: SmallVec<[PassEntry; 16]>, enabled: PassSet, stride: usize) -> Self {
        let mut offsets = [None; PassType::COUNT];
        for e in &entries {
            offsets[e.pass as usize] = Some(e.offset);
        }
        tracing::debug!(passes = entries.len(), stride, "pass layout");
        Self { entries, offsets, enabled, stride }
    }

    /// Offset of `pass`, or `None` if the pass is disabled.
    #[inline]
    pub fn offset(&self, pass: PassType) -> Option<usize> {
        self.offsets[pass as usize]
    }

    pub fn entry(&self, pass: PassType) -> Option<PassEntry> {
        self.offset(pass).map(|offset| PassEntry { pass, offset })
    }

    /// Enabled passes, in layout order.
    pub fn passes(&self) -> &[PassEntry] {
        &self.entries
    }

    #[inline]
    pub fn enabled(&self) -> PassSet {
        self.enabled
    }

    #[inline]
    pub fn is_enabled(&self, pass: PassType) -> bool {
        self.enabled.contains(pass)
    }

    /// Floats per pixel.
    #[inline]
    pub fn pass_stride(&self) -> usize {
        self.stride
    }

    /// True if any enabled pass is written by the light-pass writer.
    pub fn has_light_passes(&self) -> bool {
        self.enabled.iter().any(PassType::is_light_pass)
    }
}

impl Default for PassLayout {
    /// Combined pass only.
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Packs passes one after another in insertion order.
#[derive(Clone, Debug)]
pub struct PassLayoutBuilder {
    entries: SmallVec<[PassEntry; 16]>,
    enabled: PassSet,
    stride: usize,
}

impl PassLayoutBuilder {
    fn new() -> Self {
        let mut builder = Self { entries: SmallVec::new(), enabled: PassSet::new(), stride: 0 };
        builder.push(PassType::Combined);
        builder
    }

    fn push(&mut self, pass: PassType) {
        if self.enabled.insert(pass) {
            self.entries.push(PassEntry { pass, offset: self.stride });
            self.stride += pass.components();
        }
    }

    /// Append a pass. Already present passes are ignored; motion brings its
    /// weight pass along.
    pub fn add(mut self, pass: PassType) -> Self {
        self.push(pass);
        if pass == PassType::Motion {
            self.push(PassType::MotionWeight);
        }
        self
    }

    #[tracing::instrument(skip_all, fields(passes = self.entries.len()))]
    pub fn build(self) -> PassLayout {
        PassLayout::from_entries(self.entries, self.enabled, self.stride)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_offsets() {
        let layout = PassLayout::with_passes([PassType::Depth, PassType::Normal, PassType::Mist]);
        assert_eq!(layout.offset(PassType::Combined), Some(0));
        assert_eq!(layout.offset(PassType::Depth), Some(4));
        assert_eq!(layout.offset(PassType::Normal), Some(5));
        assert_eq!(layout.offset(PassType::Mist), Some(8));
        assert_eq!(layout.offset(PassType::Uv), None);
        assert_eq!(layout.pass_stride(), 9);
    }

    #[test]
    fn test_motion_brings_weight() {
        let layout = PassLayout::with_passes([PassType::Motion]);
        assert_eq!(layout.offset(PassType::Motion), Some(4));
        assert_eq!(layout.offset(PassType::MotionWeight), Some(8));
        assert_eq!(layout.pass_stride(), 9);
    }

    #[test]
    fn test_duplicate_add_ignored() {
        let layout = PassLayout::builder()
            .add(PassType::Normal)
            .add(PassType::Normal)
            .add(PassType::Combined)
            .build();
        assert_eq!(layout.passes().len(), 2);
        assert_eq!(layout.pass_stride(), 7);
    }

    #[test]
    fn test_default_is_combined_only() {
        let layout = PassLayout::default();
        assert_eq!(layout.pass_stride(), 4);
        assert!(layout.is_enabled(PassType::Combined));
        assert!(!layout.has_light_passes());
    }

    #[test]
    fn test_explicit_offsets_ok() {
        let layout =
            PassLayout::from_offsets([(PassType::Depth, 0), (PassType::Normal, 4)], 8).unwrap();
        assert_eq!(layout.offset(PassType::Normal), Some(4));
        assert!(!layout.is_enabled(PassType::Combined));
    }

    #[test]
    fn test_explicit_overlap_rejected() {
        let err = PassLayout::from_offsets([(PassType::Normal, 0), (PassType::Depth, 2)], 8)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::PassOverlap { first: PassType::Normal, second: PassType::Depth, .. }
        ));
    }

    #[test]
    fn test_explicit_out_of_stride_rejected() {
        let err = PassLayout::from_offsets([(PassType::Shadow, 2)], 5).unwrap_err();
        assert!(matches!(err, Error::PassOutOfStride { end: 6, stride: 5, .. }));
    }

    #[test]
    fn test_explicit_offset_overflow_rejected() {
        let err = PassLayout::from_offsets([(PassType::Normal, usize::MAX - 1)], 8).unwrap_err();
        assert!(matches!(
            err,
            Error::PassOutOfStride { pass: PassType::Normal, end: usize::MAX, stride: 8 }
        ));

        // Wrapped end must not slip under a huge stride either
        let err = PassLayout::from_offsets([(PassType::Shadow, usize::MAX - 2)], usize::MAX)
            .unwrap_err();
        assert!(matches!(err, Error::PassOutOfStride { pass: PassType::Shadow, .. }));
    }

    #[test]
    fn test_explicit_duplicate_rejected() {
        let err = PassLayout::from_offsets([(PassType::Mist, 0), (PassType::Mist, 1)], 4)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicatePass(PassType::Mist)));
    }
}
