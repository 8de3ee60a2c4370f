use crate::diagnostics::RefineMethod;
use crate::refine::{IcpOptions, ZoomOutOptions};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct RefineDemoConfig {
    pub method: RefineMethod,
    pub inputs: InputConfig,
    #[serde(default)]
    pub icp: IcpConfig,
    #[serde(default)]
    pub zoomout: ZoomOutConfig,
    pub output: DemoOutputConfig,
}

/// Paths of the JSON matrix files consumed by the demo.
#[derive(Debug, Deserialize)]
pub struct InputConfig {
    pub source_basis: PathBuf,
    pub target_basis: PathBuf,
    pub initial_map: PathBuf,
    /// Target area matrix; required for ZoomOut only.
    #[serde(default)]
    pub target_area: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct IcpConfig {
    pub iterations: Option<usize>,
    pub leaf_size: Option<usize>,
    pub parallel: Option<bool>,
}

impl IcpConfig {
    pub fn resolve(&self) -> IcpOptions {
        let mut options = IcpOptions::default();
        if let Some(v) = self.iterations {
            options.iterations = v;
        }
        if let Some(v) = self.leaf_size {
            options.leaf_size = v;
        }
        if let Some(v) = self.parallel {
            options.parallel = v;
        }
        options
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ZoomOutConfig {
    pub iterations: Option<usize>,
    pub leaf_size: Option<usize>,
    pub parallel: Option<bool>,
}

impl ZoomOutConfig {
    pub fn resolve(&self) -> ZoomOutOptions {
        let mut options = ZoomOutOptions::default();
        if let Some(v) = self.iterations {
            options.iterations = v;
        }
        if let Some(v) = self.leaf_size {
            options.leaf_size = v;
        }
        if let Some(v) = self.parallel {
            options.parallel = v;
        }
        options
    }
}

#[derive(Debug, Deserialize)]
pub struct DemoOutputConfig {
    #[serde(rename = "dir")]
    pub dir: PathBuf,
    #[serde(rename = "map_json")]
    pub map_json: PathBuf,
    #[serde(rename = "report_json")]
    pub report_json: PathBuf,
}

impl DemoOutputConfig {
    pub fn map_path(&self) -> PathBuf {
        resolve_path(&self.dir, &self.map_json)
    }

    pub fn report_path(&self) -> PathBuf {
        resolve_path(&self.dir, &self.report_json)
    }
}

pub fn load_config(path: &Path) -> Result<RefineDemoConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
