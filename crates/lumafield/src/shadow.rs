use std::fmt;

// Light-source model: the shadow falls opposite the pointer, and both its
// spread and weight grow with the pointer's distance from centre.
const OFFSET_MULTIPLIER: f32 = 30.0;
const BLUR_MULTIPLIER: f32 = 30.0;
const BLUR_BASE: f32 = 2.0;
const OPACITY_MULTIPLIER: f32 = 0.5;
const OPACITY_BASE: f32 = 0.5;
const OPACITY_MAX: f32 = 0.8;

/// Numeric drop-shadow parameters for the compositing layer that sits
/// outside the shader runtime. `Display` renders the equivalent CSS filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropShadow {
    pub offset_x: f32,
    pub offset_y: f32,
    pub blur: f32,
    pub opacity: f32,
}

/// Derives shadow parameters from a pointer position normalised to
/// `[-1, 1]` on both axes (0 at the window centre).
pub fn from_pointer(x: f32, y: f32) -> DropShadow {
    let distance = (x * x + y * y).sqrt();
    DropShadow {
        offset_x: -x * OFFSET_MULTIPLIER,
        offset_y: -y * OFFSET_MULTIPLIER,
        blur: distance * BLUR_MULTIPLIER + BLUR_BASE,
        opacity: (distance * OPACITY_MULTIPLIER + OPACITY_BASE).min(OPACITY_MAX),
    }
}

impl fmt::Display for DropShadow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "drop-shadow({:.1}px {:.1}px {:.1}px rgba(0, 0, 0, {:.2}))",
            self.offset_x, self.offset_y, self.blur, self.opacity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centred_pointer_casts_the_resting_shadow() {
        let shadow = from_pointer(0.0, 0.0);
        assert_eq!(shadow.offset_x, 0.0);
        assert_eq!(shadow.offset_y, 0.0);
        assert_eq!(shadow.blur, BLUR_BASE);
        assert_eq!(shadow.opacity, OPACITY_BASE);
    }

    #[test]
    fn shadow_falls_opposite_the_pointer() {
        let shadow = from_pointer(0.5, -0.5);
        assert_eq!(shadow.offset_x, -15.0);
        assert_eq!(shadow.offset_y, 15.0);
    }

    #[test]
    fn opacity_saturates_in_the_corners() {
        let shadow = from_pointer(1.0, 1.0);
        assert_eq!(shadow.opacity, OPACITY_MAX);
        assert!((shadow.blur - (BLUR_BASE + BLUR_MULTIPLIER * 2.0_f32.sqrt())).abs() < 1e-4);
    }

    #[test]
    fn renders_as_a_css_filter() {
        let shadow = from_pointer(0.0, 0.0);
        assert_eq!(
            shadow.to_string(),
            "drop-shadow(0.0px 0.0px 2.0px rgba(0, 0, 0, 0.50))"
        );
    }
}
