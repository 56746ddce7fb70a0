use std::path::Path;

use comfy_table::{Table, presets::UTF8_FULL};
use convoy_routing::RouteResult;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry};

pub fn candidates_table(result: &RouteResult, active: usize) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "#",
        "Active",
        "Distance (km)",
        "Duration (min)",
        "Points",
    ]);

    for (index, candidate) in result.candidates().iter().enumerate() {
        table.add_row(vec![
            index.to_string(),
            if index == active { "*" } else { "" }.to_string(),
            candidate
                .distance_meters()
                .map(|meters| format!("{:.2}", meters / 1000.0))
                .unwrap_or_else(|| String::from("-")),
            candidate
                .duration_seconds()
                .map(|seconds| format!("{:.0}", seconds / 60.0))
                .unwrap_or_else(|| String::from("-")),
            candidate.geometry().len().to_string(),
        ]);
    }

    table
}

pub fn to_feature_collection(result: &RouteResult, active: usize) -> FeatureCollection {
    let features = result
        .candidates()
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            let mut feature = Feature {
                bbox: None,
                geometry: Some(Geometry::new(geojson::Value::from(&candidate.line_string()))),
                id: None,
                properties: None,
                foreign_members: None,
            };

            feature.set_property("index", index);
            feature.set_property("active", index == active);
            feature.set_property("strategy", result.strategy().to_string());
            feature.set_property("profile", result.profile().to_string());
            feature.set_property("distance_meters", candidate.distance_meters());
            feature.set_property("duration_seconds", candidate.duration_seconds());

            feature
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

pub fn write_geojson(result: &RouteResult, active: usize, path: &Path) -> Result<(), anyhow::Error> {
    let geojson = GeoJson::FeatureCollection(to_feature_collection(result, active));
    std::fs::write(path, geojson.to_string())?;

    Ok(())
}
