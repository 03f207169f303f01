/// Errors produced when decoding a hex colour string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("colour '{0}' must start with '#'")]
    MissingHash(String),
    #[error("colour '{0}' must have exactly six hex digits")]
    WrongLength(String),
    #[error("colour '{0}' contains non-hexadecimal digits")]
    InvalidDigit(String),
}

/// Decodes a `#RRGGBB` colour (case-insensitive) into a normalised RGBA
/// vector, appending `alpha` unchanged.
///
/// Malformed input fails fast with a [`ColorError`] rather than producing a
/// best-effort colour; callers that load user palettes surface the message
/// as-is.
pub fn color_to_vec4(color: &str, alpha: f32) -> Result<[f32; 4], ColorError> {
    let hex = color
        .strip_prefix('#')
        .ok_or_else(|| ColorError::MissingHash(color.to_string()))?;
    if hex.len() != 6 {
        return Err(ColorError::WrongLength(color.to_string()));
    }
    let packed = u32::from_str_radix(hex, 16)
        .map_err(|_| ColorError::InvalidDigit(color.to_string()))?;

    let r = (packed >> 16) as f32 / 255.0;
    let g = ((packed >> 8) & 0xff) as f32 / 255.0;
    let b = (packed & 0xff) as f32 / 255.0;
    Ok([r, g, b, alpha])
}
