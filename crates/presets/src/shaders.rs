//! Embedded fragment sources, one per [`crate::Effect`].
//!
//! Each source is a complete GLSL 3.30 program rendering the full-screen
//! quad. They declare overlapping subsets of the shared uniform contract;
//! the runtime drops writes to names a given variant leaves out, so the
//! same control panel can feed any of them.

/// Three octaves of gradient noise blended into a drifting colour field.
pub(crate) const NOISE_FIELD: &str = r"#version 330 core

out vec4 fragColor;

uniform vec2 u_resolution;
uniform float u_time;
uniform vec4 u_color_0;
uniform vec4 u_color_1;
uniform vec4 u_color_2;

uniform float u_noiseScale;
uniform float u_noiseSpeed;
uniform float u_noiseIntensity;
uniform vec3 u_noiseWeights;

vec2 random2(vec2 st) {
    st = vec2(dot(st, vec2(127.1, 311.7)),
              dot(st, vec2(269.5, 183.3)));
    return -1.0 + 2.0 * fract(sin(st) * 43758.5453123);
}

// Gradient noise over the unit grid.
float noise(vec2 st) {
    vec2 i = floor(st);
    vec2 f = fract(st);
    vec2 u = f * f * (3.0 - 2.0 * f);
    return mix(mix(dot(random2(i + vec2(0.0, 0.0)), f - vec2(0.0, 0.0)),
                   dot(random2(i + vec2(1.0, 0.0)), f - vec2(1.0, 0.0)), u.x),
               mix(dot(random2(i + vec2(0.0, 1.0)), f - vec2(0.0, 1.0)),
                   dot(random2(i + vec2(1.0, 1.0)), f - vec2(1.0, 1.0)), u.x), u.y);
}

void main() {
    vec2 uv = gl_FragCoord.xy / u_resolution;
    float t = u_time * u_noiseSpeed;

    float n1 = noise(uv * (3.0 * u_noiseScale) + t);
    float n2 = noise(uv * (2.0 * u_noiseScale) - t * 0.5);
    float n3 = noise(uv * (4.0 * u_noiseScale) + t * 0.3);

    float combined = n1 * u_noiseWeights.x
                   + n2 * u_noiseWeights.y
                   + n3 * u_noiseWeights.z;
    combined = combined * u_noiseIntensity + (1.0 - u_noiseIntensity * 0.5);

    float blend = smoothstep(0.3, 0.7, combined);

    vec4 color;
    if (blend < 0.33) {
        color = mix(u_color_0, u_color_1, smoothstep(0.0, 0.33, blend) * 3.0);
    } else if (blend < 0.66) {
        color = mix(u_color_1, u_color_2, smoothstep(0.33, 0.66, blend) * 3.0 - 1.0);
    } else {
        color = mix(u_color_2, u_color_0, smoothstep(0.66, 1.0, blend) * 3.0 - 2.0);
    }

    fragColor = color;
}
";

/// Domain-warped noise with softness-controlled colour edges; reads the
/// flow-speed control instead of the plain noise speed.
pub(crate) const LIQUID: &str = r"#version 330 core

out vec4 fragColor;

uniform vec2 u_resolution;
uniform float u_time;
uniform vec4 u_color_0;
uniform vec4 u_color_1;
uniform vec4 u_color_2;

uniform float u_noiseScale;
uniform float u_noiseIntensity;
uniform vec3 u_noiseWeights;
uniform float u_blendSoftness;
uniform float u_flowSpeed;

vec2 random2(vec2 st) {
    st = vec2(dot(st, vec2(127.1, 311.7)),
              dot(st, vec2(269.5, 183.3)));
    return -1.0 + 2.0 * fract(sin(st) * 43758.5453123);
}

float noise(vec2 st) {
    vec2 i = floor(st);
    vec2 f = fract(st);
    vec2 u = f * f * (3.0 - 2.0 * f);
    return mix(mix(dot(random2(i + vec2(0.0, 0.0)), f - vec2(0.0, 0.0)),
                   dot(random2(i + vec2(1.0, 0.0)), f - vec2(1.0, 0.0)), u.x),
               mix(dot(random2(i + vec2(0.0, 1.0)), f - vec2(0.0, 1.0)),
                   dot(random2(i + vec2(1.0, 1.0)), f - vec2(1.0, 1.0)), u.x), u.y);
}

void main() {
    vec2 uv = gl_FragCoord.xy / u_resolution;
    float t = u_time * u_flowSpeed;

    // Warping the sample domain is what makes the layers pour instead of
    // scroll.
    vec2 warp = vec2(noise(uv * 2.0 * u_noiseScale + t),
                     noise(uv * 2.0 * u_noiseScale - t));

    float n1 = noise(uv * (3.0 * u_noiseScale) + warp + t);
    float n2 = noise(uv * (2.0 * u_noiseScale) - warp * 0.5 - t * 0.5);
    float n3 = noise(uv * (4.0 * u_noiseScale) + warp * 0.25 + t * 0.3);

    float combined = n1 * u_noiseWeights.x
                   + n2 * u_noiseWeights.y
                   + n3 * u_noiseWeights.z;
    combined = combined * u_noiseIntensity + (1.0 - u_noiseIntensity * 0.5);

    float soft = clamp(u_blendSoftness, 0.0, 1.0) * 0.5;
    float b0 = smoothstep(0.33 - soft, 0.33 + soft, combined);
    float b1 = smoothstep(0.66 - soft, 0.66 + soft, combined);

    fragColor = mix(mix(u_color_0, u_color_1, b0), u_color_2, b1);
}
";

/// Flat two-colour gradient used as the backdrop behind composed layers.
/// Declares the noise controls so the shared panel stays wired, but only
/// the swatches influence the output.
pub(crate) const SHADOW: &str = r"#version 330 core

out vec4 fragColor;

uniform vec2 u_resolution;
uniform float u_time;
uniform vec4 u_color_0;
uniform vec4 u_color_1;
uniform vec4 u_color_2;
uniform float u_noiseScale;
uniform float u_noiseSpeed;
uniform float u_noiseIntensity;
uniform vec3 u_noiseWeights;

void main() {
    vec2 uv = gl_FragCoord.xy / u_resolution;
    fragColor = mix(u_color_0, u_color_1, uv.x);
}
";

/// Pointer-lit shadow cone: clear around the light, darkening with
/// distance, with softness controlling the penumbra width.
pub(crate) const CONE: &str = r"#version 330 core

out vec4 fragColor;

uniform vec2 u_resolution;
uniform vec4 u_color_0;
uniform vec4 u_color_1;
uniform float u_shadowIntensity;
uniform float u_shadowSoftness;
uniform float u_coneShape;
uniform float u_colorBlend;
uniform vec2 u_lightPosition;

void main() {
    vec2 ndc = (gl_FragCoord.xy / u_resolution) * 2.0 - 1.0;
    ndc.x *= u_resolution.x / u_resolution.y;

    vec2 light = u_lightPosition;
    light.x *= u_resolution.x / u_resolution.y;

    float dist = length(ndc - light);

    float radius = 0.35 + 0.4 * clamp(u_coneShape, 0.0, 2.0);
    float penumbra = 0.1 + 0.5 * clamp(u_shadowSoftness, 0.0, 2.0);
    float lit = 1.0 - smoothstep(radius, radius + penumbra, dist);

    vec4 shade = mix(u_color_0, u_color_1, clamp(u_colorBlend, 0.0, 1.0));
    fragColor = vec4(shade.rgb, shade.a * u_shadowIntensity * (1.0 - lit));
}
";
