//! `export`: write a dataset's layers in the shape the map bridge sends to
//! deck.gl.

use std::path::Path;

use log::info;

use crate::layers::{load_and_build, Built, LayerArgs};

pub async fn run_export(args: &LayerArgs, out: &Path, pretty: bool) -> anyhow::Result<()> {
    let built = load_and_build(args).await?;
    let json = to_json(&built, pretty)?;
    tokio::fs::write(out, json).await?;
    info!(
        "Wrote {} layers ({} points) to {}",
        built.layers.len(),
        built.point_count(),
        out.display()
    );
    Ok(())
}

pub fn to_json(built: &Built, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(&built.layers)?
    } else {
        serde_json::to_string(&built.layers)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{build, Preset};
    use ccvis_data::parse_points;
    use ccvis_viz::config::MapConfig;

    #[test]
    fn layers_serialize_as_bridge_payload() {
        let csv = "LON,LAT,VOLUMEN_ANUAL\n-100,20,1000000\n";
        let config = MapConfig::concessions();
        let built = build(&config, "anexos", parse_points(csv).unwrap(), None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&to_json(&built, false).unwrap()).unwrap();

        let layer = &value[0];
        assert_eq!(layer["id"], "anexos");
        assert_eq!(layer["radiusMaxPixels"], 30.0);
        assert_eq!(layer["data"][0]["position"], serde_json::json!([-100.0, 20.0]));
        assert_eq!(layer["data"][0]["fillColor"], serde_json::json!([255, 171, 100, 130]));
        assert_eq!(layer["data"][0]["radius"], 1.0);
    }

    #[tokio::test]
    async fn export_writes_file() {
        let dir = std::env::temp_dir();
        let source = dir.join("ccvis_export_source.csv");
        let out = dir.join("ccvis_export_out.json");
        tokio::fs::write(&source, "LON,LAT,SEXO\n-99,19,2\n").await.unwrap();

        let args = LayerArgs {
            source: Some(source.to_str().unwrap().to_string()),
            preset: Preset::Demographics,
            config: None,
            dataset: None,
            from: None,
            to: None,
        };
        run_export(&args, &out, true).await.unwrap();

        let written = tokio::fs::read_to_string(&out).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value[1]["id"], "poblacion:2");
        assert_eq!(value[1]["data"][0]["fillColor"], serde_json::json!([255, 0, 128, 255]));
        let _ = tokio::fs::remove_file(&source).await;
        let _ = tokio::fs::remove_file(&out).await;
    }
}
