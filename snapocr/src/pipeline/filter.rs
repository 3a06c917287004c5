use serde::{Deserialize, Serialize};

use crate::imaging::PixelGrid;

/// Whether a capture is color-inverted before recognition.
///
/// Passed explicitly into every pipeline run; the selection lives in the
/// page, not in the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Invert every channel (`Con Filtro`).
    Filtered,
    /// Leave the capture untouched (`Sin Filtro`).
    Unfiltered,
}

impl FilterMode {
    pub const ALL: [FilterMode; 2] = [FilterMode::Filtered, FilterMode::Unfiltered];

    /// Radio-button label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Filtered => "Con Filtro",
            Self::Unfiltered => "Sin Filtro",
        }
    }

    /// Caption shown under the processed image.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Filtered => "✅ Filtro aplicado",
            Self::Unfiltered => "⏹️ Sin filtro",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Filtered => "filtered",
            Self::Unfiltered => "unfiltered",
        }
    }

    /// Invert when filtered, otherwise hand the grid back unchanged.
    pub fn apply(&self, grid: PixelGrid) -> PixelGrid {
        match self {
            Self::Filtered => grid.inverted(),
            Self::Unfiltered => grid,
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "filtered" | "con filtro" | "true" | "1" | "yes" | "on" => Ok(Self::Filtered),
            "unfiltered" | "sin filtro" | "false" | "0" | "no" | "off" => Ok(Self::Unfiltered),
            _ => Err(format!(
                "unknown filter mode '{}' (expected filtered or unfiltered)",
                s.trim()
            )),
        }
    }
}

/// `grid` inverted when `mode` is filtered, otherwise `grid` itself.
pub fn apply_filter(grid: PixelGrid, mode: FilterMode) -> PixelGrid {
    mode.apply(grid)
}
