//! Render-wide film configuration.
//!
//! [`FilmConfig`] is built once at render setup and handed by reference to
//! every pass writer; nothing in the write path reads ambient state.
//! [`FilmSettings`] is its serialized form (JSON).

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::layout::PassLayout;
use super::pass::PassType;
use crate::util::{Error, Result};

/// Mist pass parameters in the form the writer consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MistSettings {
    /// Camera distance where mist starts.
    pub start: f32,
    /// `1 / depth`, or 0 for a non-positive depth.
    pub inv_depth: f32,
    /// Falloff exponent applied to the normalized distance.
    pub falloff: f32,
}

impl MistSettings {
    pub fn new(start: f32, depth: f32, falloff: f32) -> Self {
        let inv_depth = if depth > 0.0 { 1.0 / depth } else { 0.0 };
        Self { start, inv_depth, falloff }
    }
}

impl Default for MistSettings {
    fn default() -> Self {
        Self::new(5.0, 25.0, 2.0)
    }
}

/// Immutable film configuration for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct FilmConfig {
    pub layout: PassLayout,
    /// Gate for [`write_light_passes`](super::write_light_passes).
    pub use_light_pass: bool,
    pub mist: MistSettings,
    /// Stored in the shadow pass `w` on every write.
    pub shadow_scale: f32,
    pub exposure: f32,
}

impl FilmConfig {
    /// Config with default mist/shadow/exposure; the light-pass switch follows
    /// the layout.
    pub fn new(layout: PassLayout) -> Self {
        let use_light_pass = layout.has_light_passes();
        Self {
            layout,
            use_light_pass,
            mist: MistSettings::default(),
            shadow_scale: 1.0,
            exposure: 1.0,
        }
    }

    pub fn with_mist(mut self, mist: MistSettings) -> Self {
        self.mist = mist;
        self
    }

    pub fn with_shadow_scale(mut self, scale: f32) -> Self {
        self.shadow_scale = scale;
        self
    }

    pub fn with_exposure(mut self, exposure: f32) -> Self {
        self.exposure = exposure;
        self
    }

    /// Parse a JSON [`FilmSettings`] document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: FilmSettings = serde_json::from_str(json)?;
        settings.into_config()
    }

    /// Load a JSON [`FilmSettings`] file.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }
}

impl Default for FilmConfig {
    fn default() -> Self {
        Self::new(PassLayout::default())
    }
}

/// Mist parameters as written in a settings file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MistParams {
    pub start: f32,
    pub depth: f32,
    pub falloff: f32,
}

impl Default for MistParams {
    fn default() -> Self {
        Self { start: 5.0, depth: 25.0, falloff: 2.0 }
    }
}

/// Serialized film configuration.
///
/// ```json
/// { "passes": ["depth", "normal", "mist"], "mist": { "start": 1.0, "depth": 10.0 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilmSettings {
    /// Pass names; the combined pass is always present.
    pub passes: Vec<String>,
    pub mist: MistParams,
    pub shadow_scale: f32,
    pub exposure: f32,
}

impl Default for FilmSettings {
    fn default() -> Self {
        Self {
            passes: Vec::new(),
            mist: MistParams::default(),
            shadow_scale: 1.0,
            exposure: 1.0,
        }
    }
}

impl FilmSettings {
    /// Resolve pass names and build the runtime config.
    #[tracing::instrument(skip_all, fields(passes = self.passes.len()))]
    pub fn into_config(self) -> Result<FilmConfig> {
        let mut builder = PassLayout::builder();
        for name in &self.passes {
            let pass = PassType::from_name(name).ok_or_else(|| Error::UnknownPass(name.clone()))?;
            builder = builder.add(pass);
        }

        for (what, v) in [
            ("mist.start", self.mist.start),
            ("mist.depth", self.mist.depth),
            ("mist.falloff", self.mist.falloff),
            ("shadow_scale", self.shadow_scale),
            ("exposure", self.exposure),
        ] {
            if !v.is_finite() {
                return Err(Error::config(format!("{what} must be finite, got {v}")));
            }
        }
        if self.mist.depth <= 0.0 {
            tracing::warn!(
                depth = self.mist.depth,
                "mist depth <= 0, mist pass will stay constant"
            );
        }

        let mist = MistSettings::new(self.mist.start, self.mist.depth, self.mist.falloff);
        Ok(FilmConfig::new(builder.build())
            .with_mist(mist)
            .with_shadow_scale(self.shadow_scale)
            .with_exposure(self.exposure))
    }

    /// Settings describing an existing config's pass list and scalars.
    pub fn from_config(config: &FilmConfig) -> Self {
        let depth = if config.mist.inv_depth > 0.0 { 1.0 / config.mist.inv_depth } else { 0.0 };
        Self {
            passes: config
                .layout
                .passes()
                .iter()
                .filter(|e| e.pass != PassType::Combined)
                .map(|e| e.pass.name().to_string())
                .collect(),
            mist: MistParams { start: config.mist.start, depth, falloff: config.mist.falloff },
            shadow_scale: config.shadow_scale,
            exposure: config.exposure,
        }
    }

    /// Write as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mist_inv_depth() {
        assert_eq!(MistSettings::new(0.0, 4.0, 1.0).inv_depth, 0.25);
        assert_eq!(MistSettings::new(0.0, 0.0, 1.0).inv_depth, 0.0);
        assert_eq!(MistSettings::new(0.0, -3.0, 1.0).inv_depth, 0.0);
    }

    #[test]
    fn test_light_pass_switch_follows_layout() {
        let cfg = FilmConfig::new(PassLayout::with_passes([PassType::Depth, PassType::Normal]));
        assert!(!cfg.use_light_pass);
        let cfg = FilmConfig::new(PassLayout::with_passes([PassType::Depth, PassType::Mist]));
        assert!(cfg.use_light_pass);
    }

    #[test]
    fn test_from_json_defaults() {
        let cfg = FilmConfig::from_json_str(r#"{ "passes": ["normal"] }"#).unwrap();
        assert!(cfg.layout.is_enabled(PassType::Normal));
        assert_eq!(cfg.mist, MistSettings::default());
        assert_eq!(cfg.shadow_scale, 1.0);
        assert_eq!(cfg.exposure, 1.0);
    }

    #[test]
    fn test_from_json_full() {
        let cfg = FilmConfig::from_json_str(
            r#"{
                "passes": ["motion", "shadow", "diffuse_direct"],
                "mist": { "start": 1.0, "depth": 2.0, "falloff": 0.5 },
                "shadow_scale": 0.5,
                "exposure": 2.0
            }"#,
        )
        .unwrap();
        assert!(cfg.layout.is_enabled(PassType::MotionWeight));
        assert!(cfg.use_light_pass);
        assert_eq!(cfg.mist, MistSettings { start: 1.0, inv_depth: 0.5, falloff: 0.5 });
        assert_eq!(cfg.shadow_scale, 0.5);
        assert_eq!(cfg.exposure, 2.0);
    }

    #[test]
    fn test_unknown_pass() {
        let err = FilmConfig::from_json_str(r#"{ "passes": ["sparkle"] }"#).unwrap_err();
        assert!(matches!(err, Error::UnknownPass(ref n) if n == "sparkle"));
    }

    #[test]
    fn test_malformed_json() {
        let err = FilmConfig::from_json_str("{ passes: ").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_settings_from_config() {
        let json = r#"{ "passes": ["ao", "depth"], "mist": { "depth": 8.0 } }"#;
        let cfg = FilmConfig::from_json_str(json).unwrap();
        let settings = FilmSettings::from_config(&cfg);
        assert_eq!(settings.passes, vec!["ao".to_string(), "depth".to_string()]);
        assert_eq!(settings.mist.depth, 8.0);
        assert_eq!(settings.into_config().unwrap(), cfg);
    }
}
