use fmap_refine::config::refine_demo as cfg;
use fmap_refine::config::refine_demo::RefineDemoConfig;
use fmap_refine::diagnostics::{RefineMethod, RefinementReport, TimingBreakdown};
use fmap_refine::io::{load_dense_matrix, load_sparse_matrix, write_json_file, DenseMatrixFile};
use fmap_refine::{IcpRefiner, ZoomOutRefiner};
use nalgebra::DMatrix;
use nalgebra_sparse::CsrMatrix;
use serde::Serialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DemoReport {
    refinement: RefinementReport,
    timing: TimingBreakdown,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = cfg::load_config(Path::new(&config_path))?;

    fs::create_dir_all(&config.output.dir)
        .map_err(|e| format!("Failed to create {}: {e}", config.output.dir.display()))?;

    let mut timing = TimingBreakdown::default();
    let inputs = timing.measure("load_inputs", || load_inputs(&config))?;
    let (map, report) = timing.measure("refine", || refine(&config, &inputs))?;

    report.print_text_summary();

    let map_path = config.output.map_path();
    write_json_file(&map_path, &DenseMatrixFile::from_matrix(&map))?;
    let report_path = config.output.report_path();
    write_json_file(
        &report_path,
        &DemoReport {
            refinement: report,
            timing,
        },
    )?;

    println!("Wrote refined map to {}", map_path.display());
    println!("Wrote diagnostics JSON to {}", report_path.display());
    Ok(())
}

struct Inputs {
    l1: DMatrix<f64>,
    l2: DMatrix<f64>,
    c0: DMatrix<f64>,
    /// Only loaded for ZoomOut.
    a2: Option<CsrMatrix<f64>>,
}

fn load_inputs(config: &RefineDemoConfig) -> Result<Inputs, String> {
    let paths = &config.inputs;
    let a2 = match config.method {
        RefineMethod::Icp => None,
        RefineMethod::ZoomOut => {
            let area_path = paths
                .target_area
                .as_ref()
                .ok_or_else(|| "ZoomOut requires inputs.target_area".to_string())?;
            Some(load_sparse_matrix(area_path)?)
        }
    };
    Ok(Inputs {
        l1: load_dense_matrix(&paths.source_basis)?,
        l2: load_dense_matrix(&paths.target_basis)?,
        c0: load_dense_matrix(&paths.initial_map)?,
        a2,
    })
}

fn refine(
    config: &RefineDemoConfig,
    inputs: &Inputs,
) -> Result<(DMatrix<f64>, RefinementReport), String> {
    let Inputs { l1, l2, c0, a2 } = inputs;
    match (config.method, a2) {
        (RefineMethod::Icp, _) => IcpRefiner::new(config.icp.resolve())
            .refine_with_diagnostics(l1, l2, c0)
            .map_err(|e| format!("ICP refinement failed: {e}")),
        (RefineMethod::ZoomOut, Some(a2)) => ZoomOutRefiner::new(config.zoomout.resolve())
            .refine_with_diagnostics(l1, l2, a2, c0)
            .map_err(|e| format!("ZoomOut refinement failed: {e}")),
        (RefineMethod::ZoomOut, None) => Err("ZoomOut requires inputs.target_area".to_string()),
    }
}

fn usage() -> String {
    "Usage: refine_demo <config.json>".to_string()
}
