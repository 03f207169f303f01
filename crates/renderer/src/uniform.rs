/// Value written to a named shader uniform.
///
/// The runtime dispatches the matching scalar or vector GPU write based on
/// the variant; arities outside 1-4 are unrepresentable by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<[f32; 2]> for UniformValue {
    fn from(value: [f32; 2]) -> Self {
        Self::Vec2(value)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(value: [f32; 3]) -> Self {
        Self::Vec3(value)
    }
}

impl From<[f32; 4]> for UniformValue {
    fn from(value: [f32; 4]) -> Self {
        Self::Vec4(value)
    }
}

/// Names shared between fragment sources and the code that feeds them.
///
/// A given effect may declare any subset of these; writes to names a shader
/// does not declare are dropped by the runtime, so producers can push the
/// whole control-panel state without caring which variant is current.
pub mod uniforms {
    /// Elapsed seconds since the render loop started.
    pub const TIME: &str = "u_time";
    /// Surface size in pixels, as a vec2.
    pub const RESOLUTION: &str = "u_resolution";

    pub const COLOR_0: &str = "u_color_0";
    pub const COLOR_1: &str = "u_color_1";
    pub const COLOR_2: &str = "u_color_2";

    pub const NOISE_SCALE: &str = "u_noiseScale";
    pub const NOISE_SPEED: &str = "u_noiseSpeed";
    pub const NOISE_INTENSITY: &str = "u_noiseIntensity";
    /// Per-layer blend weights of the three noise octaves, as a vec3.
    pub const NOISE_WEIGHTS: &str = "u_noiseWeights";

    pub const BLEND_SOFTNESS: &str = "u_blendSoftness";
    pub const FLOW_SPEED: &str = "u_flowSpeed";

    pub const SHADOW_INTENSITY: &str = "u_shadowIntensity";
    pub const SHADOW_SOFTNESS: &str = "u_shadowSoftness";
    pub const CONE_SHAPE: &str = "u_coneShape";
    pub const COLOR_BLEND: &str = "u_colorBlend";
    /// Pointer-driven light position in normalised device space, as a vec2.
    pub const LIGHT_POSITION: &str = "u_lightPosition";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_pick_the_matching_variant() {
        assert_eq!(UniformValue::from(0.5), UniformValue::Float(0.5));
        assert_eq!(
            UniformValue::from([1.0, 2.0, 3.0]),
            UniformValue::Vec3([1.0, 2.0, 3.0])
        );
    }
}
