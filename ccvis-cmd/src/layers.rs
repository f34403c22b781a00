//! Loading a dataset and building its layers outside the browser.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context};
use ccvis_data::loader::ReqwestFetcher;
use ccvis_data::{parse_points, Fetch, PointSet};
use ccvis_utils::dates::parse_date;
use ccvis_viz::brush::DateInterval;
use ccvis_viz::config::{DatasetConfig, MapConfig};
use ccvis_viz::host::{CameraState, MapHost, Renderer, TooltipFormatter};
use ccvis_viz::layer::{BuildReport, ScatterLayer};
use clap::{Args, ValueEnum};
use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    Concessions,
    Demographics,
}

impl Preset {
    pub fn config(self) -> MapConfig {
        match self {
            Preset::Concessions => MapConfig::concessions(),
            Preset::Demographics => MapConfig::demographics(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct LayerArgs {
    /// CSV file or http(s) URL (defaults to the dataset's configured url)
    pub source: Option<String>,

    /// Built-in map configuration
    #[arg(short, long, value_enum, default_value = "concessions")]
    pub preset: Preset,

    /// JSON map configuration, used instead of --preset
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Dataset id within the configuration (defaults to the first one)
    #[arg(short, long)]
    pub dataset: Option<String>,

    /// Keep only rows dated on or after this day (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Keep only rows dated on or before this day (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

impl LayerArgs {
    pub fn load_config(&self) -> anyhow::Result<MapConfig> {
        match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                MapConfig::from_json(&json)
            }
            None => Ok(self.preset.config()),
        }
    }

    pub fn dataset<'a>(&self, config: &'a MapConfig) -> anyhow::Result<&'a DatasetConfig> {
        match &self.dataset {
            Some(id) => config
                .dataset(id)
                .ok_or_else(|| anyhow!("no dataset {} in configuration", id)),
            None => config
                .datasets
                .first()
                .ok_or_else(|| anyhow!("configuration has no datasets")),
        }
    }

    /// Date filter from --from/--to. A missing bound falls back to the edge
    /// of the brush domain.
    pub fn selection(&self, config: &MapConfig) -> anyhow::Result<Option<DateInterval>> {
        if self.from.is_none() && self.to.is_none() {
            return Ok(None);
        }
        let brush = config.brush.clone().unwrap_or_default();
        let start = match &self.from {
            Some(s) => parse_date(s)?,
            None => brush.domain_start,
        };
        let end = match &self.to {
            Some(s) => parse_date(s)?,
            None => brush.domain_end,
        };
        Ok(Some(DateInterval::from_dates(start, end)))
    }
}

/// Renderer for headless builds; layers are read back from the host.
struct Headless;

impl Renderer for Headless {
    fn set_layers(&mut self, layers: &[&ScatterLayer]) {
        log::debug!("{} layers ready", layers.len());
    }

    fn set_camera(&mut self, _camera: &CameraState) {}

    fn set_tooltip_formatter(&mut self, _formatter: &TooltipFormatter) {}
}

/// Longitude/latitude box around every built point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

/// Layers of one dataset plus what the build had to skip.
#[derive(Debug, Clone)]
pub struct Built {
    pub dataset: DatasetConfig,
    pub rows: usize,
    pub layers: Vec<ScatterLayer>,
    pub report: BuildReport,
    pub selection: Option<DateInterval>,
}

impl Built {
    pub fn point_count(&self) -> usize {
        self.layers.iter().map(|l| l.data.len()).sum()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self.layers.iter().flat_map(|l| l.data.iter());
        let first = points.next()?.position;
        let init = Bounds {
            min_lon: first[0],
            min_lat: first[1],
            max_lon: first[0],
            max_lat: first[1],
        };
        Some(points.fold(init, |b, p| Bounds {
            min_lon: b.min_lon.min(p.position[0]),
            min_lat: b.min_lat.min(p.position[1]),
            max_lon: b.max_lon.max(p.position[0]),
            max_lat: b.max_lat.max(p.position[1]),
        }))
    }
}

/// Build `dataset_id`'s layers through the same host the map apps use.
pub fn build(
    config: &MapConfig,
    dataset_id: &str,
    points: PointSet,
    selection: Option<DateInterval>,
) -> anyhow::Result<Built> {
    let dataset = config
        .dataset(dataset_id)
        .cloned()
        .ok_or_else(|| anyhow!("no dataset {} in configuration", dataset_id))?;
    let single = MapConfig {
        datasets: vec![dataset.clone()],
        ..config.clone()
    };
    let rows = points.len();
    let mut host = MapHost::new(Headless, &single);
    host.set_points(&dataset.id, points);
    if let Some(selection) = selection {
        host.set_selection(selection);
    }
    Ok(Built {
        rows,
        layers: host.layers().cloned().collect(),
        report: host.report(&dataset.id).cloned().unwrap_or_default(),
        selection,
        dataset,
    })
}

/// Read a CSV from disk, or fetch it when `source` is an http(s) URL.
/// Unlike the browser loader, failures are reported instead of yielding
/// an empty set.
pub async fn read_source(source: &str) -> anyhow::Result<PointSet> {
    let text = if source.starts_with("http://") || source.starts_with("https://") {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        ReqwestFetcher::new(client)
            .fetch_text(source)
            .await
            .with_context(|| format!("fetching {}", source))?
    } else {
        tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("reading {}", source))?
    };
    parse_points(&text).with_context(|| format!("parsing {}", source))
}

/// Resolve the arguments, load the CSV and build its layers.
pub async fn load_and_build(args: &LayerArgs) -> anyhow::Result<Built> {
    let config = args.load_config()?;
    let dataset = args.dataset(&config)?;
    let source = args.source.clone().unwrap_or_else(|| dataset.url.clone());
    let selection = args.selection(&config)?;

    info!("Loading dataset {} from {}", dataset.id, source);
    let points = read_source(&source).await?;
    info!("Read {} rows", points.len());
    build(&config, &dataset.id, points, selection)
}
