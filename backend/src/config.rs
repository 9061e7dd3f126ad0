//! # Configuration
//!
//! Dashboard settings loaded from a YAML file. Every field has a default, so
//! a partial file (or no file at all) is valid.
//!
//! ```yaml
//! account_name: test
//! log_filter: info
//! viewport:
//!   width: 640
//!   height: 320
//! grid:
//!   grid_line_count: 4
//!   currency_symbol: "₽"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::chart_geometry::{ChartGeometryService, ChartViewport, GridConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Account charted when none is given on the command line
    pub account_name: String,
    /// `tracing` filter directive, overridden by `RUST_LOG`
    pub log_filter: String,
    pub viewport: ChartViewport,
    pub grid: GridConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            account_name: "test".to_string(),
            log_filter: "info".to_string(),
            viewport: ChartViewport::default(),
            grid: GridConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("⚙️ CONFIG: {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn geometry_service(&self) -> ChartGeometryService {
        ChartGeometryService::new(self.viewport, self.grid.clone())
    }
}
