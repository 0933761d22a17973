//! Static costmap snapshots from map-server style `map.yaml` + image pairs.
//!
//! Dark pixels are occupied. Occupancy is `1 - lightness` (or `lightness` when
//! `negate` is set) and is mapped to costs:
//!
//! - trinary: occupied → `COST_LETHAL`, free → `COST_FREE`, else `COST_UNKNOWN`
//! - scale: like trinary, but in-between values become graded costs below
//!   `COST_INSCRIBED` and transparent pixels are unknown
//! - raw: the pixel value is the cost

use std::path::{Path, PathBuf};

use glam::Vec2;
use image::GenericImageView;
use serde::Deserialize;

use crate::grid::Costmap;
use crate::types::{
    COST_FREE, COST_INSCRIBED, COST_LETHAL, COST_UNKNOWN, DEFAULT_FREE_THRESH,
    DEFAULT_OCCUPIED_THRESH, MapError, MapInfo,
};

#[derive(Debug, Deserialize)]
struct RosMapMetadata {
    image: String,
    resolution: f32,
    origin: [f32; 3],
    #[serde(
        default = "default_occupied_thresh",
        deserialize_with = "deserialize_threshold"
    )]
    occupied_thresh: f32,
    #[serde(
        default = "default_free_thresh",
        deserialize_with = "deserialize_threshold"
    )]
    free_thresh: f32,
    #[serde(default = "default_negate")]
    negate: Negate,
    #[serde(default = "default_map_mode")]
    mode: MapMode,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Negate {
    Bool(bool),
    Int(i32),
}

impl Negate {
    fn is_negated(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Int(value) => *value != 0,
        }
    }
}

fn default_negate() -> Negate {
    Negate::Bool(false)
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
enum MapMode {
    Trinary,
    Scale,
    Raw,
}

fn default_map_mode() -> MapMode {
    MapMode::Trinary
}

fn default_occupied_thresh() -> f32 {
    DEFAULT_OCCUPIED_THRESH
}

fn default_free_thresh() -> f32 {
    DEFAULT_FREE_THRESH
}

fn deserialize_threshold<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f32::deserialize(deserializer)?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(
            "thresholds must be in the range [0.0, 1.0]",
        ))
    }
}

pub fn load_costmap(yaml_path: impl AsRef<Path>) -> Result<Costmap, MapError> {
    let yaml_path = yaml_path.as_ref();
    let yaml_str = std::fs::read_to_string(yaml_path)?;
    let metadata: RosMapMetadata = serde_yaml::from_str(&yaml_str)?;

    if matches!(metadata.mode, MapMode::Trinary | MapMode::Scale)
        && metadata.occupied_thresh <= metadata.free_thresh
    {
        return Err(MapError::InvalidMetadata(
            "occupied_thresh must be greater than free_thresh".to_string(),
        ));
    }

    let negate = metadata.negate.is_negated();
    let image_path = resolve_image_path(yaml_path, &metadata.image);
    let image = image::open(&image_path)?;
    let (width, height) = image.dimensions();
    let rgba = image.to_rgba8();

    let mut data = vec![COST_UNKNOWN; (width as usize) * (height as usize)];

    for y in 0..height {
        for x in 0..width {
            let [r, g, b, a] = rgba.get_pixel(x, y).0;
            let lightness = (r as f32 + g as f32 + b as f32) / (3.0 * 255.0);
            let occupancy = if negate { lightness } else { 1.0 - lightness };

            let cost = match metadata.mode {
                MapMode::Trinary => {
                    trinary_cost(occupancy, metadata.occupied_thresh, metadata.free_thresh)
                }
                MapMode::Scale => {
                    if a < u8::MAX {
                        COST_UNKNOWN
                    } else if occupancy > metadata.occupied_thresh
                        || occupancy < metadata.free_thresh
                    {
                        trinary_cost(occupancy, metadata.occupied_thresh, metadata.free_thresh)
                    } else {
                        let ratio = (occupancy - metadata.free_thresh)
                            / (metadata.occupied_thresh - metadata.free_thresh);
                        (ratio * (COST_INSCRIBED - 1) as f32)
                            .round()
                            .clamp(COST_FREE as f32, (COST_INSCRIBED - 1) as f32)
                            as u8
                    }
                }
                MapMode::Raw => r,
            };

            // Image rows run top to bottom, grid rows bottom to top.
            let grid_y = height - y - 1;
            let idx = (grid_y as usize) * (width as usize) + (x as usize);
            data[idx] = cost;
        }
    }

    let info = MapInfo {
        width,
        height,
        resolution: metadata.resolution,
        origin: Vec2::new(metadata.origin[0], metadata.origin[1]),
    };

    Costmap::new(info, data)
}

fn trinary_cost(occupancy: f32, occupied_thresh: f32, free_thresh: f32) -> u8 {
    if occupancy > occupied_thresh {
        COST_LETHAL
    } else if occupancy < free_thresh {
        COST_FREE
    } else {
        COST_UNKNOWN
    }
}

fn resolve_image_path(yaml_path: &Path, image_ref: &str) -> PathBuf {
    let image_path = PathBuf::from(image_ref);
    if image_path.is_absolute() {
        return image_path;
    }

    match yaml_path.parent() {
        Some(parent) => parent.join(image_path),
        None => image_path,
    }
}
