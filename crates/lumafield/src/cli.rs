use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "lumafield",
    author,
    version,
    about = "Animated shader colour fields with live, spring-smoothed controls"
)]
pub struct Cli {
    /// Preset to start with (Tab cycles, digits jump).
    #[arg(value_name = "PRESET", default_value = "ambient")]
    pub preset: String,

    /// Extra preset definitions (TOML) merged over the built-ins.
    #[arg(long, value_name = "FILE", env = "LUMAFIELD_PRESETS")]
    pub presets: Option<PathBuf>,

    /// List available preset names and exit.
    #[arg(long)]
    pub list_presets: bool,

    /// Initial window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", default_value = "1280x720", value_parser = parse_size)]
    pub size: (u32, u32),
}

pub fn parse() -> Cli {
    Cli::parse()
}

fn parse_size(raw: &str) -> Result<(u32, u32), String> {
    let (width, height) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{raw}'"))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{width}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height '{height}'"))?;
    if width == 0 || height == 0 {
        return Err("window size must be non-zero".to_string());
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_size_pairs() {
        assert_eq!(parse_size("1280x720"), Ok((1280, 720)));
        assert_eq!(parse_size("640X480"), Ok((640, 480)));
    }

    #[test]
    fn rejects_malformed_sizes() {
        assert!(parse_size("1280").is_err());
        assert!(parse_size("0x720").is_err());
        assert!(parse_size("widexhigh").is_err());
    }

    #[test]
    fn defaults_are_coherent() {
        let cli = Cli::parse_from(["lumafield"]);
        assert_eq!(cli.preset, "ambient");
        assert_eq!(cli.size, (1280, 720));
        assert!(!cli.list_presets);
    }
}
