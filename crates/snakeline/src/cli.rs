use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use renderer::Antialiasing;

#[derive(Parser, Debug)]
#[command(
    name = "snakeline",
    author,
    version,
    about = "Interactive cursor-trail animation rendered with wgpu"
)]
pub struct Cli {
    /// Window size (e.g. `800x600`).
    #[arg(long, value_name = "WIDTHxHEIGHT", default_value = "800x600")]
    pub size: String,

    /// Directory containing the snake/circle shader sources.
    #[arg(long, value_name = "DIR", default_value = "shaders")]
    pub shader_dir: PathBuf,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count (e.g. `4`).
    #[arg(
        long,
        value_name = "MODE",
        value_parser = parse_antialias,
        default_value = "auto"
    )]
    pub antialias: Antialiasing,

    /// Number of chain points seeded at the window center.
    #[arg(long, value_name = "COUNT", default_value_t = 20)]
    pub chain_len: usize,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_antialias(value: &str) -> Result<Antialiasing, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("anti-alias mode must not be empty".to_string());
    }

    let normalized = trimmed.to_ascii_lowercase();
    match normalized.as_str() {
        "auto" | "max" | "default" => Ok(Antialiasing::Auto),
        "off" | "none" | "disable" | "disabled" => Ok(Antialiasing::Off),
        _ => {
            let samples: u32 = normalized.parse().map_err(|_| {
                format!("invalid anti-alias sample count '{trimmed}'; use auto/off or 2/4/8/16")
            })?;

            if samples == 0 || samples == 1 {
                return Ok(Antialiasing::Off);
            }

            if !matches!(samples, 2 | 4 | 8 | 16) {
                return Err(format!(
                    "unsupported sample count {samples}; supported values are 2, 4, 8, or 16"
                ));
            }

            Ok(Antialiasing::Samples(samples))
        }
    }
}

pub fn parse_surface_size(spec: &str) -> Result<(u32, u32)> {
    let trimmed = spec.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow::anyhow!("expected WxH format, e.g. 800x600"))?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid width in size specification"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid height in size specification"))?;

    if width == 0 || height == 0 {
        anyhow::bail!("surface dimensions must be greater than zero");
    }

    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_fixed_configuration() {
        let cli = Cli::try_parse_from(["snakeline"]).unwrap();
        assert_eq!(cli.size, "800x600");
        assert_eq!(cli.shader_dir, PathBuf::from("shaders"));
        assert_eq!(cli.antialias, Antialiasing::Auto);
        assert_eq!(cli.chain_len, 20);
    }

    #[test]
    fn surface_size_parses_wxh() {
        assert_eq!(parse_surface_size("800x600").unwrap(), (800, 600));
        assert_eq!(parse_surface_size("1280X720").unwrap(), (1280, 720));
        assert_eq!(parse_surface_size(" 640 x 480 ").unwrap(), (640, 480));
        assert!(parse_surface_size("0x600").is_err());
        assert!(parse_surface_size("banana").is_err());
    }

    #[test]
    fn antialias_modes_parse() {
        assert_eq!(parse_antialias("auto").unwrap(), Antialiasing::Auto);
        assert_eq!(parse_antialias("off").unwrap(), Antialiasing::Off);
        assert_eq!(parse_antialias("0").unwrap(), Antialiasing::Off);
        assert_eq!(parse_antialias("4").unwrap(), Antialiasing::Samples(4));
        assert!(parse_antialias("3").is_err());
        assert!(parse_antialias("").is_err());
    }
}
