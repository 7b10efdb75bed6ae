use clap::Parser;
use mockwarp::raster::io::{decode_raster, OutputFormat};
use mockwarp::{
    generate_batch, ApplyOptions, BatchConfig, ColorKeyConfig, Engine, FitMode,
    TemplateRegistry, TemplateSelector,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Mockwarp CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// List rooms and templates under the configured root and exit.
    #[arg(long)]
    list_templates: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum FitModeConfig {
    Contain,
    Cover,
}

impl From<FitModeConfig> for FitMode {
    fn from(value: FitModeConfig) -> Self {
        match value {
            FitModeConfig::Contain => FitMode::Contain,
            FitModeConfig::Cover => FitMode::Cover,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum FormatConfig {
    Png,
    Jpeg,
}

impl From<FormatConfig> for OutputFormat {
    fn from(value: FormatConfig) -> Self {
        match value {
            FormatConfig::Png => OutputFormat::Png,
            FormatConfig::Jpeg => OutputFormat::Jpeg,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ReturnFormatConfig {
    /// Raw encoded image bytes written to `output_path`.
    Png,
    /// JSON envelope `{ image_b64, w, h }`.
    Json,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct OptionsJson {
    fit: FitModeConfig,
    padding: f32,
    margin_px: usize,
    feather_px: Option<f32>,
    opacity: Option<f32>,
    format: FormatConfig,
}

impl Default for OptionsJson {
    fn default() -> Self {
        let opts = ApplyOptions::default();
        Self {
            fit: FitModeConfig::Contain,
            padding: opts.padding,
            margin_px: opts.margin_px,
            feather_px: opts.feather_px,
            opacity: opts.opacity,
            format: FormatConfig::Png,
        }
    }
}

impl From<&OptionsJson> for ApplyOptions {
    fn from(value: &OptionsJson) -> Self {
        ApplyOptions {
            fit: value.fit.into(),
            padding: value.padding,
            margin_px: value.margin_px,
            feather_px: value.feather_px,
            opacity: value.opacity,
            format: value.format.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ColorKeyJson {
    min_red: u8,
    max_green: u8,
    min_blue: u8,
    red_over_green: u8,
    red_under_blue: u8,
    min_area_px: usize,
    sample_step: usize,
    max_samples: usize,
}

impl Default for ColorKeyJson {
    fn default() -> Self {
        let cfg = ColorKeyConfig::default();
        Self {
            min_red: cfg.min_red,
            max_green: cfg.max_green,
            min_blue: cfg.min_blue,
            red_over_green: cfg.red_over_green,
            red_under_blue: cfg.red_under_blue,
            min_area_px: cfg.min_area_px,
            sample_step: cfg.sample_step,
            max_samples: cfg.max_samples,
        }
    }
}

impl From<&ColorKeyJson> for ColorKeyConfig {
    fn from(value: &ColorKeyJson) -> Self {
        ColorKeyConfig {
            min_red: value.min_red,
            max_green: value.max_green,
            min_blue: value.min_blue,
            red_over_green: value.red_over_green,
            red_under_blue: value.red_under_blue,
            min_area_px: value.min_area_px,
            sample_step: value.sample_step,
            max_samples: value.max_samples,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SelectorJson {
    room: String,
    template_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    artwork_path: String,
    template_root: String,
    room: String,
    template_id: String,
    batch: Vec<SelectorJson>,
    output_path: Option<String>,
    output_dir: Option<String>,
    return_format: ReturnFormatConfig,
    options: OptionsJson,
    colorkey: ColorKeyJson,
    parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            artwork_path: String::new(),
            template_root: "templates".to_string(),
            room: String::new(),
            template_id: String::new(),
            batch: Vec::new(),
            output_path: None,
            output_dir: None,
            return_format: ReturnFormatConfig::Png,
            options: OptionsJson::default(),
            colorkey: ColorKeyJson::default(),
            parallel: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct BatchRecord {
    room: String,
    template_id: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("mockwarp=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;

    let registry = TemplateRegistry::new(&config.template_root);

    if cli.list_templates {
        let listing = registry.list()?;
        for room in listing {
            println!("[room] {}/", room.room);
            for template in room.templates {
                let marker = if template.manifest_present { "" } else { " (no manifest)" };
                println!("  - {}{}", template.id, marker);
            }
        }
        return Ok(());
    }

    if config.artwork_path.is_empty() {
        return Err("artwork_path must be set in the config".into());
    }

    let engine = Engine::new(registry).with_colorkey((&config.colorkey).into());
    let artwork_bytes = fs::read(&config.artwork_path)?;
    let artwork = decode_raster(&artwork_bytes)?;
    let opts: ApplyOptions = (&config.options).into();

    if !config.batch.is_empty() {
        let selectors: Vec<TemplateSelector> = config
            .batch
            .iter()
            .map(|s| TemplateSelector::new(s.room.clone(), s.template_id.clone()))
            .collect();
        let entries = generate_batch(
            &engine,
            &artwork,
            &selectors,
            &opts,
            &BatchConfig {
                parallel: config.parallel,
            },
        );

        let out_dir = PathBuf::from(config.output_dir.as_deref().unwrap_or("."));
        fs::create_dir_all(&out_dir)?;

        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            let record = match entry.outcome {
                mockwarp::BatchOutcome::Completed(output) => {
                    let ext = match output.format {
                        OutputFormat::Png => "png",
                        OutputFormat::Jpeg => "jpg",
                    };
                    let path = out_dir.join(format!("{}_{}.{ext}", entry.room, entry.template_id));
                    fs::write(&path, &output.bytes)?;
                    BatchRecord {
                        room: entry.room,
                        template_id: entry.template_id,
                        status: "completed",
                        output: Some(path.display().to_string()),
                        error: None,
                    }
                }
                mockwarp::BatchOutcome::Failed { reason } => BatchRecord {
                    room: entry.room,
                    template_id: entry.template_id,
                    status: "failed",
                    output: None,
                    error: Some(reason),
                },
            };
            records.push(record);
        }
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if config.room.is_empty() || config.template_id.is_empty() {
        return Err("room and template_id must be set in the config (or use batch)".into());
    }

    let output = engine.apply(&artwork, &config.room, &config.template_id, &opts)?;
    match config.return_format {
        ReturnFormatConfig::Json => {
            let json = serde_json::to_string_pretty(&output.envelope())?;
            match config.output_path {
                Some(path) => fs::write(path, json)?,
                None => println!("{json}"),
            }
        }
        ReturnFormatConfig::Png => {
            let path = config
                .output_path
                .ok_or("output_path must be set for raw image output")?;
            fs::write(path, &output.bytes)?;
        }
    }

    Ok(())
}
