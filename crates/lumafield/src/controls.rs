use presets::Preset;
use renderer::{uniforms, ColorError, UniformValue};
use springs::{SmoothedColor, SmoothedValue, SpringConfig};

/// Spring-smoothed control-panel state.
///
/// Every control rides its own spring; a preset switch retargets them all
/// and the transition plays out over the following frames. [`Controls::step`]
/// advances the springs and returns the uniform writes for this frame — the
/// event loop forwards them verbatim to the runtime, which drops whatever
/// the active shader does not declare.
pub struct Controls {
    noise_scale: SmoothedValue,
    noise_speed: SmoothedValue,
    noise_intensity: SmoothedValue,
    weights: [SmoothedValue; 3],
    blend_softness: SmoothedValue,
    flow_speed: SmoothedValue,
    shadow_intensity: SmoothedValue,
    shadow_softness: SmoothedValue,
    cone_shape: SmoothedValue,
    color_blend: SmoothedValue,
    blur: SmoothedValue,
    swatches: [SmoothedColor; 3],
    /// Pointer-lit light position; looser tuning so it trails the cursor.
    light: [SmoothedValue; 2],
}

impl Controls {
    /// Starts with every spring resting exactly on the preset's values.
    pub fn from_preset(preset: &Preset) -> Result<Self, ColorError> {
        let panel = SpringConfig::PANEL;
        let value = |initial: f32| SmoothedValue::new(initial, panel);

        Ok(Self {
            noise_scale: value(preset.noise_scale),
            noise_speed: value(preset.noise_speed),
            noise_intensity: value(preset.noise_intensity),
            weights: preset.noise_weights.map(value),
            blend_softness: value(preset.blend_softness),
            flow_speed: value(preset.flow_speed),
            shadow_intensity: value(preset.shadow_intensity),
            shadow_softness: value(preset.shadow_softness),
            cone_shape: value(preset.cone_shape),
            color_blend: value(preset.color_blend),
            blur: value(preset.blur),
            swatches: [
                SmoothedColor::new(&preset.swatches[0].color, preset.swatches[0].alpha, panel)?,
                SmoothedColor::new(&preset.swatches[1].color, preset.swatches[1].alpha, panel)?,
                SmoothedColor::new(&preset.swatches[2].color, preset.swatches[2].alpha, panel)?,
            ],
            light: [
                SmoothedValue::new(0.0, SpringConfig::AMBIENT),
                SmoothedValue::new(0.0, SpringConfig::AMBIENT),
            ],
        })
    }

    /// Aims every spring at the new preset; motion continues from the
    /// current values, so switching mid-transition blends.
    pub fn retarget(&mut self, preset: &Preset) -> Result<(), ColorError> {
        self.noise_scale.set_target(preset.noise_scale);
        self.noise_speed.set_target(preset.noise_speed);
        self.noise_intensity.set_target(preset.noise_intensity);
        for (spring, weight) in self.weights.iter_mut().zip(preset.noise_weights) {
            spring.set_target(weight);
        }
        self.blend_softness.set_target(preset.blend_softness);
        self.flow_speed.set_target(preset.flow_speed);
        self.shadow_intensity.set_target(preset.shadow_intensity);
        self.shadow_softness.set_target(preset.shadow_softness);
        self.cone_shape.set_target(preset.cone_shape);
        self.color_blend.set_target(preset.color_blend);
        self.blur.set_target(preset.blur);
        for (spring, swatch) in self.swatches.iter_mut().zip(&preset.swatches) {
            spring.set_target_hex(&swatch.color)?;
            spring.set_alpha_target(swatch.alpha);
        }
        Ok(())
    }

    /// Retargets the light springs from a pointer position normalised to
    /// `[-1, 1]`.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.light[0].set_target(x);
        self.light[1].set_target(y);
    }

    pub fn light_position(&self) -> (f32, f32) {
        (self.light[0].value(), self.light[1].value())
    }

    /// The blur radius consumed by the compositing layer, not the shader.
    pub fn blur(&self) -> f32 {
        self.blur.value()
    }

    /// Advances all springs by `dt` seconds and emits this frame's uniform
    /// writes.
    pub fn step(&mut self, dt: f32) -> Vec<(&'static str, UniformValue)> {
        self.blur.step(dt);
        vec![
            (uniforms::NOISE_SCALE, self.noise_scale.step(dt).into()),
            (uniforms::NOISE_SPEED, self.noise_speed.step(dt).into()),
            (
                uniforms::NOISE_INTENSITY,
                self.noise_intensity.step(dt).into(),
            ),
            (
                uniforms::NOISE_WEIGHTS,
                [
                    self.weights[0].step(dt),
                    self.weights[1].step(dt),
                    self.weights[2].step(dt),
                ]
                .into(),
            ),
            (uniforms::BLEND_SOFTNESS, self.blend_softness.step(dt).into()),
            (uniforms::FLOW_SPEED, self.flow_speed.step(dt).into()),
            (
                uniforms::SHADOW_INTENSITY,
                self.shadow_intensity.step(dt).into(),
            ),
            (
                uniforms::SHADOW_SOFTNESS,
                self.shadow_softness.step(dt).into(),
            ),
            (uniforms::CONE_SHAPE, self.cone_shape.step(dt).into()),
            (uniforms::COLOR_BLEND, self.color_blend.step(dt).into()),
            (uniforms::COLOR_0, self.swatches[0].step(dt).into()),
            (uniforms::COLOR_1, self.swatches[1].step(dt).into()),
            (uniforms::COLOR_2, self.swatches[2].step(dt).into()),
            (
                uniforms::LIGHT_POSITION,
                [self.light[0].step(dt), self.light[1].step(dt)].into(),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use presets::PresetLibrary;

    fn scale_of(writes: &[(&'static str, UniformValue)]) -> f32 {
        writes
            .iter()
            .find_map(|(name, value)| match (name, value) {
                (&name, UniformValue::Float(v)) if name == uniforms::NOISE_SCALE => Some(*v),
                _ => None,
            })
            .expect("noise scale write present")
    }

    #[test]
    fn starts_resting_on_the_preset() {
        let library = PresetLibrary::builtin();
        let preset = library.get("ambient").unwrap();
        let mut controls = Controls::from_preset(preset).unwrap();
        let writes = controls.step(1.0 / 60.0);
        assert_eq!(scale_of(&writes), preset.noise_scale);
    }

    #[test]
    fn retarget_glides_instead_of_jumping() {
        let library = PresetLibrary::builtin();
        let ambient = library.get("ambient").unwrap();
        let liquid = library.get("liquid").unwrap();
        assert_ne!(ambient.noise_scale, liquid.noise_scale);

        let mut controls = Controls::from_preset(ambient).unwrap();
        controls.retarget(liquid).unwrap();
        let first = scale_of(&controls.step(1.0 / 60.0));
        assert!(first > ambient.noise_scale && first < liquid.noise_scale);

        for _ in 0..600 {
            controls.step(1.0 / 60.0);
        }
        let settled = scale_of(&controls.step(1.0 / 60.0));
        assert_eq!(settled, liquid.noise_scale);
    }

    #[test]
    fn light_trails_the_pointer() {
        let library = PresetLibrary::builtin();
        let mut controls = Controls::from_preset(library.get("cone").unwrap()).unwrap();
        controls.pointer_moved(1.0, -1.0);
        controls.step(1.0 / 60.0);
        let (x, y) = controls.light_position();
        assert!(x > 0.0 && x < 1.0);
        assert!(y < 0.0 && y > -1.0);
    }

    #[test]
    fn emits_the_full_contract_every_frame() {
        let library = PresetLibrary::builtin();
        let mut controls = Controls::from_preset(library.get("backdrop").unwrap()).unwrap();
        let writes = controls.step(1.0 / 60.0);
        let names: Vec<_> = writes.iter().map(|(name, _)| *name).collect();
        for expected in [
            uniforms::NOISE_SCALE,
            uniforms::NOISE_WEIGHTS,
            uniforms::COLOR_2,
            uniforms::LIGHT_POSITION,
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }
}
