use boxmatch::io::load_gray_image;
use boxmatch::{
    DetectConfig, DetectionReport, Detector, FsAssets, LabelPalette, NmsPolicy, Rgb8,
    TemplateDescriptor, ZnccScorer,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod render;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Labeled multi-template detection (JSON config driven)")]
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
    /// Also log per-candidate diagnostics.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum NmsPolicyConfig {
    ScoreDescending,
    FirstInOrder,
}

impl From<NmsPolicyConfig> for NmsPolicy {
    fn from(value: NmsPolicyConfig) -> Self {
        match value {
            NmsPolicyConfig::ScoreDescending => NmsPolicy::ScoreDescending,
            NmsPolicyConfig::FirstInOrder => NmsPolicy::FirstInOrder,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateConfig {
    path: String,
    label: String,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DetectConfigJson {
    score_threshold: f32,
    iou_threshold: f64,
    nms_policy: NmsPolicyConfig,
    oversize_scale: f32,
    parallel: bool,
}

impl Default for DetectConfigJson {
    fn default() -> Self {
        let cfg = DetectConfig::default();
        Self {
            score_threshold: cfg.score_threshold,
            iou_threshold: cfg.iou_threshold,
            nms_policy: NmsPolicyConfig::ScoreDescending,
            oversize_scale: cfg.oversize_scale,
            parallel: cfg.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PaletteConfig {
    colors: BTreeMap<String, [u8; 3]>,
    fallback: [u8; 3],
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            colors: BTreeMap::new(),
            fallback: Rgb8::BLUE.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RenderConfig {
    output_path: Option<String>,
    font_path: Option<String>,
    thickness: u32,
    scale: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_path: None,
            font_path: None,
            thickness: 2,
            scale: 2,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Config {
    source_path: String,
    templates: Vec<TemplateConfig>,
    detect: DetectConfigJson,
    palette: PaletteConfig,
    render: RenderConfig,
    output_path: Option<String>,
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    label: String,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    score: f32,
}

#[derive(Debug, Serialize)]
struct SkippedRecord {
    path: String,
    label: String,
    reason: String,
}

#[derive(Debug, Serialize)]
struct Output {
    count: usize,
    counts: BTreeMap<String, usize>,
    detections: Vec<DetectionRecord>,
    skipped: Vec<SkippedRecord>,
}

impl From<&DetectionReport> for Output {
    fn from(report: &DetectionReport) -> Self {
        Self {
            count: report.len(),
            counts: report
                .count_by_label()
                .into_iter()
                .map(|(label, count)| (label.to_owned(), count))
                .collect(),
            detections: report
                .iter()
                .map(|d| DetectionRecord {
                    label: d.label.to_string(),
                    x: d.bbox.x(),
                    y: d.bbox.y(),
                    width: d.bbox.width(),
                    height: d.bbox.height(),
                    score: d.score,
                })
                .collect(),
            skipped: report
                .skipped
                .iter()
                .map(|s| SkippedRecord {
                    path: s.asset.clone(),
                    label: s.label.to_string(),
                    reason: s.reason.to_string(),
                })
                .collect(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let directive = if cli.trace {
        "boxmatch=debug"
    } else {
        "boxmatch=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

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
    if config.source_path.is_empty() {
        return Err("source_path must be set in the config".into());
    }
    if config.templates.is_empty() {
        return Err("templates must list at least one template".into());
    }
    if config.render.thickness == 0 || config.render.scale == 0 {
        return Err("render.thickness and render.scale must be at least 1".into());
    }

    let palette = LabelPalette::new(
        config
            .palette
            .colors
            .iter()
            .map(|(label, rgb)| (label.as_str(), Rgb8(*rgb))),
        Rgb8(config.palette.fallback),
    )?;

    // The source is a hard precondition: nothing runs without it.
    let source = load_gray_image(&config.source_path)?;
    let descriptors: Vec<TemplateDescriptor> = config
        .templates
        .iter()
        .map(|t| TemplateDescriptor::new(t.path.as_str(), t.label.as_str()))
        .collect();

    let detector = Detector::with_scorer(ZnccScorer::new().with_parallel(config.detect.parallel))
        .with_config(DetectConfig {
            score_threshold: config.detect.score_threshold,
            iou_threshold: config.detect.iou_threshold,
            nms_policy: config.detect.nms_policy.into(),
            oversize_scale: config.detect.oversize_scale,
            parallel: config.detect.parallel,
        });
    let report = detector.detect(source.view(), &descriptors, &FsAssets::new())?;

    if let Some(path) = &config.render.output_path {
        let font = match &config.render.font_path {
            Some(font_path) => Some(render::load_font(font_path)?),
            None => None,
        };
        let style = render::RenderStyle {
            thickness: config.render.thickness,
            scale: config.render.scale,
            font,
        };
        let annotated = render::annotate(&source, &report.detections, &palette, &style)?;
        annotated.save(path)?;
    }

    let output = Output::from(&report);
    let json = serde_json::to_string_pretty(&output)?;
    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
