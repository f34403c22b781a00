//! `inspect`: print what a dataset's layers were built from.

use std::fmt::Write;

use ccvis_utils::dates::format_display;
use log::info;

use crate::layers::{load_and_build, Built, LayerArgs};

pub async fn run_inspect(args: &LayerArgs) -> anyhow::Result<()> {
    let built = load_and_build(args).await?;
    print!("{}", summary(&built));
    info!("Inspect complete");
    Ok(())
}

/// Human-readable report of a build.
pub fn summary(built: &Built) -> String {
    let mut out = String::new();
    let report = &built.report;
    let _ = writeln!(out, "Dataset: {} ({})", built.dataset.id, built.dataset.label);
    let _ = writeln!(out, "Rows: {}", built.rows);
    let _ = writeln!(out, "Points: {}", built.point_count());
    let _ = writeln!(out, "Skipped (no coordinates): {}", report.skipped);
    if let Some(selection) = &built.selection {
        let _ = writeln!(
            out,
            "Date filter: {} to {} ({} rows outside)",
            format_display(&selection.start.date()),
            format_display(&selection.end.date()),
            report.filtered_out
        );
    }
    match built.bounds() {
        Some(b) => {
            let _ = writeln!(
                out,
                "Bounds: lon {:.4}..{:.4}, lat {:.4}..{:.4}",
                b.min_lon, b.max_lon, b.min_lat, b.max_lat
            );
        }
        None => {
            let _ = writeln!(out, "Bounds: none");
        }
    }
    let _ = writeln!(out, "Layers:");
    for layer in &built.layers {
        let _ = writeln!(out, "  {}: {}", layer.id, layer.data.len());
    }
    if !report.unmapped.is_empty() {
        let unmapped: Vec<&str> = report.unmapped.iter().map(String::as_str).collect();
        let _ = writeln!(out, "Unmapped categories: {}", unmapped.join(", "));
    }
    out
}
