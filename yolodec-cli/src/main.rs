use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use yolodec::{
    AnchorPrior, CandidateBox, DetectConfig, Detector, GridLayout, LabelTable, ModelLayout,
    OwnedTensor,
};

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Decode a YOLO grid tensor into boxes (JSON config driven)")]
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
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct GridConfigJson {
    rows: usize,
    cols: usize,
    boxes_per_cell: usize,
    class_count: usize,
    cell_width: f32,
    cell_height: f32,
}

impl Default for GridConfigJson {
    fn default() -> Self {
        let grid = GridLayout::tiny_yolo_v2_voc();
        Self {
            rows: grid.rows,
            cols: grid.cols,
            boxes_per_cell: grid.boxes_per_cell,
            class_count: grid.class_count,
            cell_width: grid.cell_width,
            cell_height: grid.cell_height,
        }
    }
}

impl From<GridConfigJson> for GridLayout {
    fn from(value: GridConfigJson) -> Self {
        Self {
            rows: value.rows,
            cols: value.cols,
            boxes_per_cell: value.boxes_per_cell,
            class_count: value.class_count,
            cell_width: value.cell_width,
            cell_height: value.cell_height,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DetectConfigJson {
    confidence_threshold: f32,
    class_score_threshold: f32,
    nms_threshold: f32,
    max_results: usize,
    parallel: bool,
}

impl Default for DetectConfigJson {
    fn default() -> Self {
        let cfg = DetectConfig::default();
        Self {
            confidence_threshold: cfg.confidence_threshold,
            class_score_threshold: cfg.class_score_threshold,
            nms_threshold: cfg.nms_threshold,
            max_results: cfg.max_results,
            parallel: cfg.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    tensor_path: String,
    labels_path: Option<String>,
    output_path: Option<String>,
    grid: GridConfigJson,
    anchors: Vec<f32>,
    detect: DetectConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tensor_path: String::new(),
            labels_path: None,
            output_path: None,
            grid: GridConfigJson::default(),
            anchors: AnchorPrior::TINY_YOLO_V2_VOC.to_vec(),
            detect: DetectConfigJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct BoxRecord {
    label: String,
    class_id: usize,
    confidence: f32,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl From<CandidateBox> for BoxRecord {
    fn from(value: CandidateBox) -> Self {
        Self {
            label: value.label,
            class_id: value.class_id,
            confidence: value.confidence,
            x: value.dimensions.x,
            y: value.dimensions.y,
            width: value.dimensions.width,
            height: value.dimensions.height,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    count: usize,
    boxes: Vec<BoxRecord>,
}

/// Reads a packed little-endian `f32` tensor.
fn read_tensor(path: &str, shape: [usize; 4]) -> Result<OwnedTensor, Box<dyn std::error::Error>> {
    let bytes = fs::read(path)?;
    if bytes.len() % 4 != 0 {
        return Err(format!("{path}: length {} is not a multiple of 4", bytes.len()).into());
    }
    let data = bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    Ok(OwnedTensor::new(data, shape)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("yolodec=debug".parse()?))
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
    if config.tensor_path.is_empty() {
        return Err("tensor_path must be set in the config".into());
    }

    let labels = match &config.labels_path {
        Some(path) => LabelTable::load(path)?,
        None => LabelTable::pascal_voc(),
    };
    let anchors = AnchorPrior::from_flat(&config.anchors)?;
    let layout = ModelLayout::new(config.grid.into(), anchors, labels)?;
    let tensor = read_tensor(&config.tensor_path, layout.grid().tensor_shape())?;

    let detector = Detector::new(layout).with_config(DetectConfig {
        confidence_threshold: config.detect.confidence_threshold,
        class_score_threshold: config.detect.class_score_threshold,
        nms_threshold: config.detect.nms_threshold,
        max_results: config.detect.max_results,
        parallel: config.detect.parallel,
    });
    let boxes = detector.detect(tensor.view())?;
    tracing::info!(count = boxes.len(), "decoded tensor");

    let output = Output {
        count: boxes.len(),
        boxes: boxes.into_iter().map(BoxRecord::from).collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
