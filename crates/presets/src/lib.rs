//! Effect definitions and named parameter sets.
//!
//! The original family of hand-wired canvases collapses here into plain
//! data: an [`Effect`] picks one embedded fragment source, a [`Preset`]
//! carries the full control-panel state for it, and a [`PresetLibrary`]
//! holds the built-in sets plus any user-supplied TOML document. The
//! runtime consumes a preset as a flat list of uniform writes and never
//! learns where the numbers came from.

mod shaders;

use std::collections::BTreeMap;

use serde::Deserialize;
use renderer::{color_to_vec4, uniforms, ColorError, UniformValue};

/// Colour swatches the original control panel exposes, keyed by tasting
/// note.
pub const PALETTE: &[(&str, &str)] = &[
    ("cereal", "#D9B382"),
    ("floral", "#C8A6C0"),
    ("fruity", "#CA5B4B"),
    ("grassy", "#7A8B5C"),
    ("nutty", "#A8795A"),
    ("spicy", "#9A4343"),
    ("winey", "#722F37"),
    ("woody", "#6B4F3A"),
];

/// Looks up a built-in palette entry by name.
pub fn palette_color(name: &str) -> Option<&'static str> {
    PALETTE
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, hex)| *hex)
}

/// The fragment programs the binary ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Noise,
    Liquid,
    Shadow,
    Cone,
}

impl Effect {
    /// The embedded GLSL for this effect, handed opaquely to
    /// `ShaderRuntime::set_shader`.
    pub fn fragment_source(self) -> &'static str {
        match self {
            Effect::Noise => shaders::NOISE_FIELD,
            Effect::Liquid => shaders::LIQUID,
            Effect::Shadow => shaders::SHADOW,
            Effect::Cone => shaders::CONE,
        }
    }
}

/// One colour slot: a resolved `#RRGGBB` value plus its own opacity.
///
/// Each slot's alpha is independent; the original wired the third swatch to
/// the second swatch's opacity, which is treated here as the copy-paste
/// slip it was.
#[derive(Debug, Clone, PartialEq)]
pub struct Swatch {
    pub color: String,
    pub alpha: f32,
}

impl Swatch {
    fn new(color: &str, alpha: f32) -> Self {
        Self {
            color: color.to_string(),
            alpha,
        }
    }
}

/// A complete, named control-panel state for one effect.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub name: String,
    pub effect: Effect,
    pub noise_scale: f32,
    pub noise_speed: f32,
    pub noise_intensity: f32,
    pub noise_weights: [f32; 3],
    pub blend_softness: f32,
    pub flow_speed: f32,
    pub shadow_intensity: f32,
    pub shadow_softness: f32,
    pub cone_shape: f32,
    pub color_blend: f32,
    pub swatches: [Swatch; 3],
    /// Radius for the CSS-equivalent blur applied outside the runtime.
    pub blur: f32,
}

impl Preset {
    /// Flattens the preset into uniform writes. Every control is emitted
    /// regardless of effect — the runtime silently drops names the current
    /// shader does not declare.
    pub fn uniform_values(&self) -> Result<Vec<(&'static str, UniformValue)>, PresetError> {
        let mut values: Vec<(&'static str, UniformValue)> = vec![
            (uniforms::NOISE_SCALE, self.noise_scale.into()),
            (uniforms::NOISE_SPEED, self.noise_speed.into()),
            (uniforms::NOISE_INTENSITY, self.noise_intensity.into()),
            (uniforms::NOISE_WEIGHTS, self.noise_weights.into()),
            (uniforms::BLEND_SOFTNESS, self.blend_softness.into()),
            (uniforms::FLOW_SPEED, self.flow_speed.into()),
            (uniforms::SHADOW_INTENSITY, self.shadow_intensity.into()),
            (uniforms::SHADOW_SOFTNESS, self.shadow_softness.into()),
            (uniforms::CONE_SHAPE, self.cone_shape.into()),
            (uniforms::COLOR_BLEND, self.color_blend.into()),
        ];
        for (slot, swatch) in [uniforms::COLOR_0, uniforms::COLOR_1, uniforms::COLOR_2]
            .into_iter()
            .zip(&self.swatches)
        {
            let rgba = color_to_vec4(&swatch.color, swatch.alpha)?;
            values.push((slot, rgba.into()));
        }
        Ok(values)
    }

    /// Checks every control against its documented range.
    pub fn validate(&self) -> Result<(), PresetError> {
        self.check("noise_scale", self.noise_scale, 0.0, 2.0)?;
        self.check("noise_speed", self.noise_speed, 0.0, 1.0)?;
        self.check("noise_intensity", self.noise_intensity, 0.0, 1.0)?;
        self.check("noise_weights[0]", self.noise_weights[0], 0.0, 1.0)?;
        self.check("noise_weights[1]", self.noise_weights[1], 0.0, 1.0)?;
        self.check("noise_weights[2]", self.noise_weights[2], 0.0, 1.0)?;
        self.check("blend_softness", self.blend_softness, 0.0, 1.0)?;
        self.check("flow_speed", self.flow_speed, 0.0, 1.0)?;
        self.check("shadow_intensity", self.shadow_intensity, 0.0, 1.0)?;
        self.check("shadow_softness", self.shadow_softness, 0.0, 2.0)?;
        self.check("cone_shape", self.cone_shape, 0.0, 2.0)?;
        self.check("color_blend", self.color_blend, 0.0, 1.0)?;
        self.check("blur", self.blur, 0.0, 50.0)?;
        for swatch in &self.swatches {
            self.check("alpha", swatch.alpha, 0.0, 1.0)?;
            color_to_vec4(&swatch.color, swatch.alpha)?;
        }
        Ok(())
    }

    fn check(
        &self,
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    ) -> Result<(), PresetError> {
        if !(min..=max).contains(&value) {
            return Err(PresetError::OutOfRange {
                preset: self.name.clone(),
                field,
                value,
                min,
                max,
            });
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    #[error("failed to parse preset file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unsupported preset file version {0}")]
    UnsupportedVersion(u32),
    #[error("preset '{preset}' references unknown palette colour '{color}'")]
    UnknownColor { preset: String, color: String },
    #[error("preset '{preset}' needs exactly three colour slots, got {count}")]
    WrongSwatchCount { preset: String, count: usize },
    #[error("preset '{preset}': {field} = {value} outside [{min}, {max}]")]
    OutOfRange {
        preset: String,
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error(transparent)]
    Color(#[from] ColorError),
}

/// Built-in presets plus whatever the user's preset file adds.
#[derive(Debug, Clone)]
pub struct PresetLibrary {
    presets: Vec<Preset>,
}

impl PresetLibrary {
    /// The bundled presets, mirroring the original canvas family.
    pub fn builtin() -> Self {
        Self {
            presets: builtin_presets(),
        }
    }

    /// Parses a preset TOML document and merges it in. A user preset with
    /// the same name as an existing one replaces it; new names append in
    /// document order.
    pub fn merge_toml_str(&mut self, doc: &str) -> Result<(), PresetError> {
        let doc: PresetsDoc = toml::from_str(doc)?;
        if doc.version != 1 {
            return Err(PresetError::UnsupportedVersion(doc.version));
        }
        for (name, spec) in doc.presets {
            let preset = spec.resolve(&name, &doc.palette)?;
            preset.validate()?;
            match self.presets.iter_mut().find(|p| p.name == name) {
                Some(existing) => *existing = preset,
                None => self.presets.push(preset),
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// The preset following `name`, wrapping around — the Tab-cycling
    /// order.
    pub fn next_after(&self, name: &str) -> &Preset {
        let index = self
            .presets
            .iter()
            .position(|p| p.name == name)
            .map(|i| (i + 1) % self.presets.len())
            .unwrap_or(0);
        &self.presets[index]
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|p| p.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

fn builtin_presets() -> Vec<Preset> {
    let base = Preset {
        name: String::new(),
        effect: Effect::Noise,
        noise_scale: 1.0,
        noise_speed: 0.2,
        noise_intensity: 0.7,
        noise_weights: [0.5, 0.3, 0.2],
        blend_softness: 0.4,
        flow_speed: 0.2,
        shadow_intensity: 0.5,
        shadow_softness: 1.0,
        cone_shape: 1.0,
        color_blend: 0.5,
        swatches: [
            Swatch::new("#CA5B4B", 1.0),
            Swatch::new("#7A8B5C", 1.0),
            Swatch::new("#A8795A", 1.0),
        ],
        blur: 0.0,
    };

    vec![
        Preset {
            name: "ambient".into(),
            blur: 4.0,
            ..base.clone()
        },
        Preset {
            name: "liquid".into(),
            effect: Effect::Liquid,
            noise_scale: 1.2,
            noise_speed: 0.15,
            swatches: [
                Swatch::new("#C8A6C0", 1.0),
                Swatch::new("#722F37", 1.0),
                Swatch::new("#9A4343", 1.0),
            ],
            ..base.clone()
        },
        Preset {
            name: "sphere".into(),
            effect: Effect::Liquid,
            noise_scale: 1.2,
            flow_speed: 0.5,
            swatches: [
                Swatch::new("#C8A6C0", 1.0),
                Swatch::new("#722F37", 1.0),
                Swatch::new("#9A4343", 1.0),
            ],
            ..base.clone()
        },
        Preset {
            name: "backdrop".into(),
            effect: Effect::Shadow,
            noise_scale: 0.5,
            noise_speed: 0.5,
            noise_intensity: 0.9,
            swatches: [
                Swatch::new("#C8A6C0", 1.0),
                Swatch::new("#9A4343", 1.0),
                Swatch::new("#9A4343", 1.0),
            ],
            ..base.clone()
        },
        Preset {
            name: "cone".into(),
            effect: Effect::Cone,
            swatches: [
                Swatch::new("#000000", 0.8),
                Swatch::new("#1A1A1A", 0.4),
                Swatch::new("#000000", 0.0),
            ],
            ..base
        },
    ]
}

#[derive(Debug, Deserialize)]
struct PresetsDoc {
    version: u32,
    #[serde(default)]
    palette: BTreeMap<String, String>,
    #[serde(default)]
    presets: BTreeMap<String, PresetSpec>,
}

#[derive(Debug, Deserialize)]
struct PresetSpec {
    effect: Effect,
    #[serde(default = "default_noise_scale")]
    noise_scale: f32,
    #[serde(default = "default_noise_speed")]
    noise_speed: f32,
    #[serde(default = "default_noise_intensity")]
    noise_intensity: f32,
    #[serde(default = "default_noise_weights")]
    noise_weights: [f32; 3],
    #[serde(default = "default_blend_softness")]
    blend_softness: f32,
    #[serde(default = "default_flow_speed")]
    flow_speed: f32,
    #[serde(default = "default_shadow_intensity")]
    shadow_intensity: f32,
    #[serde(default = "default_shadow_softness")]
    shadow_softness: f32,
    #[serde(default = "default_cone_shape")]
    cone_shape: f32,
    #[serde(default = "default_color_blend")]
    color_blend: f32,
    #[serde(default = "default_swatch_specs")]
    colors: Vec<SwatchSpec>,
    #[serde(default)]
    blur: f32,
}

#[derive(Debug, Deserialize)]
struct SwatchSpec {
    color: String,
    #[serde(default = "default_alpha")]
    alpha: f32,
}

impl PresetSpec {
    fn resolve(
        self,
        name: &str,
        palette: &BTreeMap<String, String>,
    ) -> Result<Preset, PresetError> {
        if self.colors.len() != 3 {
            return Err(PresetError::WrongSwatchCount {
                preset: name.to_string(),
                count: self.colors.len(),
            });
        }
        let mut swatches = Vec::with_capacity(3);
        for spec in &self.colors {
            let color = if spec.color.starts_with('#') {
                spec.color.clone()
            } else if let Some(hex) = palette.get(&spec.color) {
                hex.clone()
            } else if let Some(hex) = palette_color(&spec.color) {
                hex.to_string()
            } else {
                return Err(PresetError::UnknownColor {
                    preset: name.to_string(),
                    color: spec.color.clone(),
                });
            };
            swatches.push(Swatch {
                color,
                alpha: spec.alpha,
            });
        }
        let swatches: [Swatch; 3] = swatches.try_into().expect("length checked above");

        Ok(Preset {
            name: name.to_string(),
            effect: self.effect,
            noise_scale: self.noise_scale,
            noise_speed: self.noise_speed,
            noise_intensity: self.noise_intensity,
            noise_weights: self.noise_weights,
            blend_softness: self.blend_softness,
            flow_speed: self.flow_speed,
            shadow_intensity: self.shadow_intensity,
            shadow_softness: self.shadow_softness,
            cone_shape: self.cone_shape,
            color_blend: self.color_blend,
            swatches,
            blur: self.blur,
        })
    }
}

fn default_noise_scale() -> f32 {
    1.0
}

fn default_noise_speed() -> f32 {
    0.2
}

fn default_noise_intensity() -> f32 {
    0.7
}

fn default_noise_weights() -> [f32; 3] {
    [0.5, 0.3, 0.2]
}

fn default_blend_softness() -> f32 {
    0.4
}

fn default_flow_speed() -> f32 {
    0.2
}

fn default_shadow_intensity() -> f32 {
    0.5
}

fn default_shadow_softness() -> f32 {
    1.0
}

fn default_cone_shape() -> f32 {
    1.0
}

fn default_color_blend() -> f32 {
    0.5
}

fn default_alpha() -> f32 {
    1.0
}

fn default_swatch_specs() -> Vec<SwatchSpec> {
    vec![
        SwatchSpec {
            color: "fruity".into(),
            alpha: 1.0,
        },
        SwatchSpec {
            color: "grassy".into(),
            alpha: 1.0,
        },
        SwatchSpec {
            color: "nutty".into(),
            alpha: 1.0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
version = 1

[palette]
moss = "#4A5D43"

[presets.dusk]
effect = "liquid"
noise_scale = 1.4
flow_speed = 0.35
colors = [
    { color = "moss", alpha = 1.0 },
    { color = "floral", alpha = 0.8 },
    { color = "#101018", alpha = 0.6 },
]
blur = 12.0

[presets.plain]
effect = "noise"
"##;

    #[test]
    fn parses_sample_document() {
        let mut library = PresetLibrary::builtin();
        library.merge_toml_str(SAMPLE).expect("merge presets");

        let dusk = library.get("dusk").expect("dusk present");
        assert_eq!(dusk.effect, Effect::Liquid);
        assert_eq!(dusk.noise_scale, 1.4);
        assert_eq!(dusk.swatches[0].color, "#4A5D43");
        assert_eq!(dusk.swatches[1].color, "#C8A6C0");
        assert_eq!(dusk.swatches[1].alpha, 0.8);
        assert_eq!(dusk.blur, 12.0);
    }

    #[test]
    fn fills_defaults_for_omitted_controls() {
        let mut library = PresetLibrary::builtin();
        library.merge_toml_str(SAMPLE).unwrap();

        let plain = library.get("plain").unwrap();
        assert_eq!(plain.noise_speed, 0.2);
        assert_eq!(plain.noise_weights, [0.5, 0.3, 0.2]);
        assert_eq!(plain.swatches[0].color, "#CA5B4B");
    }

    #[test]
    fn user_presets_override_builtins_by_name() {
        let mut library = PresetLibrary::builtin();
        let doc = r#"
version = 1

[presets.ambient]
effect = "shadow"
colors = [
    { color = "woody" },
    { color = "cereal" },
    { color = "woody" },
]
"#;
        library.merge_toml_str(doc).unwrap();
        assert_eq!(library.get("ambient").unwrap().effect, Effect::Shadow);
    }

    #[test]
    fn rejects_unknown_palette_names() {
        let mut library = PresetLibrary::builtin();
        let doc = r#"
version = 1

[presets.broken]
effect = "noise"
colors = [
    { color = "neon" },
    { color = "grassy" },
    { color = "nutty" },
]
"#;
        let err = library.merge_toml_str(doc).unwrap_err();
        assert!(matches!(err, PresetError::UnknownColor { ref color, .. } if color == "neon"));
    }

    #[test]
    fn rejects_out_of_range_controls() {
        let mut library = PresetLibrary::builtin();
        let doc = r#"
version = 1

[presets.wild]
effect = "noise"
noise_scale = 3.5
"#;
        let err = library.merge_toml_str(doc).unwrap_err();
        assert!(matches!(
            err,
            PresetError::OutOfRange {
                field: "noise_scale",
                ..
            }
        ));
    }

    #[test]
    fn rejects_future_versions() {
        let mut library = PresetLibrary::builtin();
        let err = library.merge_toml_str("version = 2").unwrap_err();
        assert!(matches!(err, PresetError::UnsupportedVersion(2)));
    }

    #[test]
    fn builtins_all_validate() {
        for preset in builtin_presets() {
            preset.validate().expect(&preset.name);
        }
    }

    #[test]
    fn swatch_opacities_are_wired_independently() {
        let mut preset = builtin_presets().remove(0);
        preset.swatches[1].alpha = 0.5;
        preset.swatches[2].alpha = 0.25;

        let values = preset.uniform_values().unwrap();
        let color = |name: &str| {
            values
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| *v)
                .unwrap()
        };
        let UniformValue::Vec4(c1) = color(uniforms::COLOR_1) else {
            panic!("colour slots are vec4")
        };
        let UniformValue::Vec4(c2) = color(uniforms::COLOR_2) else {
            panic!("colour slots are vec4")
        };
        assert_eq!(c1[3], 0.5);
        // The third slot follows its own opacity, not the second slot's.
        assert_eq!(c2[3], 0.25);
    }

    #[test]
    fn every_effect_has_a_fragment_source() {
        for effect in [Effect::Noise, Effect::Liquid, Effect::Shadow, Effect::Cone] {
            let source = effect.fragment_source();
            assert!(source.contains("void main()"));
            assert!(source.contains("u_resolution"));
        }
    }

    #[test]
    fn cycling_wraps_around() {
        let library = PresetLibrary::builtin();
        let names: Vec<_> = library.names().collect();
        let last = names.last().unwrap();
        assert_eq!(library.next_after(last).name, names[0]);
        assert_eq!(library.next_after("ambient").name, "liquid");
    }
}
