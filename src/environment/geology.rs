//! Rock strata below ground.

use serde::{Deserialize, Serialize};

/// Stratum surrounding the shaft at a given depth (in floors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeologicalLayer {
    /// Depth 1-3
    Topsoil,
    /// Depth 4-8
    Clay,
    /// Depth 9-15
    Sandstone,
    /// Depth 16-25
    Limestone,
    /// Depth 26-40
    Granite,
    /// Deeper than 40
    Bedrock,
}

impl GeologicalLayer {
    /// All layers, shallowest first.
    pub const ALL: [GeologicalLayer; 6] = [
        Self::Topsoil,
        Self::Clay,
        Self::Sandstone,
        Self::Limestone,
        Self::Granite,
        Self::Bedrock,
    ];

    /// Layer at `depth` floors below ground.
    pub fn at_depth(depth: u64) -> Self {
        match depth {
            0..=3 => Self::Topsoil,
            4..=8 => Self::Clay,
            9..=15 => Self::Sandstone,
            16..=25 => Self::Limestone,
            26..=40 => Self::Granite,
            _ => Self::Bedrock,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Topsoil => "Topsoil",
            Self::Clay => "Clay",
            Self::Sandstone => "Sandstone",
            Self::Limestone => "Limestone",
            Self::Granite => "Granite",
            Self::Bedrock => "Bedrock",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Topsoil => "Loose soil and organic matter",
            Self::Clay => "Dense clay and gravel",
            Self::Sandstone => "Sedimentary sandstone and pebbles",
            Self::Limestone => "Hard carbonate rock",
            Self::Granite => "Hard igneous rock",
            Self::Bedrock => "Deep geological bedrock",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Topsoil => "🌱",
            Self::Clay => "🪨",
            Self::Sandstone => "🏔️",
            Self::Limestone => "⛰️",
            Self::Granite => "🗻",
            Self::Bedrock => "💎",
        }
    }
}

/// Stratum around a basement floor; `None` at or above ground.
pub fn geological_layer(floor: i64) -> Option<GeologicalLayer> {
    (floor < 0).then(|| GeologicalLayer::at_depth(floor.unsigned_abs()))
}
