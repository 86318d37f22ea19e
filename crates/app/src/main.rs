//! Entry point for Showcase3D: logging, CLI, run.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use platform::ShadowMode;

#[derive(Parser, Debug)]
#[command(name = "showcase3d", version, about = "Decorative 3D model viewer")]
struct Cli {
    /// GPU backend: auto, vulkan, dx12, metal or gl.
    #[arg(long, default_value = "auto")]
    gpu_backend: String,

    /// Window size as WxH, e.g. 1280x720.
    #[arg(long, value_parser = parse_size)]
    size: Option<(u32, u32)>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Show frames per second in the window title.
    #[arg(long)]
    show_fps: bool,

    /// Shadow filtering for the directional light.
    #[arg(long, value_enum, default_value_t = ShadowArg::Soft)]
    shadows: ShadowArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ShadowArg {
    Off,
    Hard,
    Soft,
}

impl From<ShadowArg> for ShadowMode {
    fn from(arg: ShadowArg) -> Self {
        match arg {
            ShadowArg::Off => ShadowMode::Disabled,
            ShadowArg::Hard => ShadowMode::Hard,
            ShadowArg::Soft => ShadowMode::PcfSoft,
        }
    }
}

impl Cli {
    /// `--width`/`--height` override the matching half of `--size`.
    fn window_size(&self) -> (u32, u32) {
        let (w, h) = self.size.unwrap_or((1280, 720));
        (self.width.unwrap_or(w).max(1), self.height.unwrap_or(h).max(1))
    }
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let parse = |v: &str| v.trim().parse::<u32>().map_err(|e| format!("bad dimension '{v}': {e}"));
    Ok((parse(w)?, parse(h)?))
}

fn parse_backend(name: &str) -> wgpu::Backends {
    match name.to_ascii_lowercase().as_str() {
        "auto" => wgpu::Backends::all(),
        "vulkan" | "vk" => wgpu::Backends::VULKAN,
        "dx12" | "d3d12" => wgpu::Backends::DX12,
        "metal" | "mtl" => wgpu::Backends::METAL,
        "gl" | "opengl" | "gles" => wgpu::Backends::GL,
        other => {
            log::warn!("Unknown backend '{}', falling back to auto.", other);
            wgpu::Backends::all()
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let backends = parse_backend(&cli.gpu_backend);
    let (width, height) = cli.window_size();
    let shadow_mode = ShadowMode::from(cli.shadows);
    log::info!(
        "Starting Showcase3D. Backend: {:?}, show_fps={}, window_size={}x{}, shadows={:?}",
        backends,
        cli.show_fps,
        width,
        height,
        shadow_mode
    );

    platform::run(platform::RunSettings {
        backends,
        show_fps: cli.show_fps,
        width,
        height,
        shadow_mode,
    })?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_flag_accepts_either_separator() {
        assert_eq!(parse_size("800x600"), Ok((800, 600)));
        assert_eq!(parse_size("1024X768"), Ok((1024, 768)));
        assert!(parse_size("800").is_err());
        assert!(parse_size("axb").is_err());
    }

    #[test]
    fn width_and_height_override_size() {
        let cli = Cli::parse_from(["showcase3d", "--size", "800x600", "--height", "500"]);
        assert_eq!(cli.window_size(), (800, 500));
        let cli = Cli::parse_from(["showcase3d"]);
        assert_eq!(cli.window_size(), (1280, 720));
    }

    #[test]
    fn unknown_backend_falls_back_to_all() {
        assert_eq!(parse_backend("VULKAN"), wgpu::Backends::VULKAN);
        assert_eq!(parse_backend("software"), wgpu::Backends::all());
    }

    #[test]
    fn shadows_flag_selects_filtering() {
        let cli = Cli::parse_from(["showcase3d"]);
        assert_eq!(ShadowMode::from(cli.shadows), ShadowMode::PcfSoft);
        let cli = Cli::parse_from(["showcase3d", "--shadows", "hard"]);
        assert_eq!(ShadowMode::from(cli.shadows), ShadowMode::Hard);
        let cli = Cli::parse_from(["showcase3d", "--shadows", "off"]);
        assert_eq!(ShadowMode::from(cli.shadows), ShadowMode::Disabled);
        assert!(Cli::try_parse_from(["showcase3d", "--shadows", "blurry"]).is_err());
    }
}
