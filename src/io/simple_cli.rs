use crate::io::config_loader::TomlConfigLoader;
use crate::io::render_settings::RenderSettings;
use clap::Parser;
use log::info;

/// Command line: a TOML config plus a few overrides.
#[derive(Parser, Debug)]
#[command(name = "softraster")]
#[command(about = "CPU triangle rasterizer driven by TOML scenes")]
pub struct SimpleCli {
    /// Config file path (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Write an example config next to the binary and render it
    #[arg(long)]
    pub use_example_config: bool,

    /// Base name of the output images
    #[arg(short, long, value_name = "NAME")]
    pub output: Option<String>,

    /// Directory the images are written to
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Texture image, overrides the config
    #[arg(short, long, value_name = "FILE")]
    pub texture: Option<String>,
}

impl SimpleCli {
    /// Parses the process arguments into render settings.
    pub fn process() -> Result<RenderSettings, String> {
        Self::parse().into_settings()
    }

    pub fn into_settings(self) -> Result<RenderSettings, String> {
        let mut settings = if self.use_example_config {
            let example_path = "example_config.toml";
            TomlConfigLoader::create_example_config(example_path)
                .map_err(|e| format!("Failed to create example config: {}", e))?;
            info!("Wrote example config to {}", example_path);

            TomlConfigLoader::load_from_file(example_path)
                .map_err(|e| format!("Failed to load example config: {}", e))?
        } else if let Some(config_path) = &self.config {
            info!("Loading config {}", config_path);
            TomlConfigLoader::load_from_file(config_path)
                .map_err(|e| format!("Failed to load config '{}': {}", config_path, e))?
        } else {
            info!("No config given, using defaults");
            RenderSettings::default()
        };

        if let Some(output) = self.output {
            settings.output = output;
        }
        if let Some(output_dir) = self.output_dir {
            settings.output_dir = output_dir;
        }
        if let Some(texture) = self.texture {
            settings.texture = Some(texture);
        }
        settings.validate()?;
        Ok(settings)
    }
}
