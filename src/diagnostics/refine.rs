use serde::{Deserialize, Serialize};

/// Which refinement loop produced a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefineMethod {
    Icp,
    ZoomOut,
}

/// Trace of a complete refinement call.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinementReport {
    pub method: RefineMethod,
    pub initial_shape: (usize, usize),
    pub final_shape: (usize, usize),
    pub iterations: Vec<IterationTrace>,
    pub elapsed_ms: f64,
}

impl RefinementReport {
    pub(crate) fn new(method: RefineMethod, initial_shape: (usize, usize)) -> Self {
        Self {
            method,
            initial_shape,
            final_shape: initial_shape,
            iterations: Vec::new(),
            elapsed_ms: 0.0,
        }
    }

    /// Map sizes after every iteration, in order.
    pub fn map_sizes(&self) -> Vec<(usize, usize)> {
        self.iterations
            .iter()
            .map(|it| (it.map_rows, it.map_cols))
            .collect()
    }

    pub fn print_text_summary(&self) {
        println!(
            "{:?}: {:?} -> {:?} in {} iterations ({:.3} ms)",
            self.method,
            self.initial_shape,
            self.final_shape,
            self.iterations.len(),
            self.elapsed_ms
        );
        for it in &self.iterations {
            println!(
                "  iter {:>3}: map {}x{}, {} distinct matches, {:.3} ms",
                it.iteration, it.map_rows, it.map_cols, it.distinct_matches, it.elapsed_ms
            );
        }
    }
}

/// Diagnostics collected for one refinement iteration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationTrace {
    pub iteration: usize,
    /// Shape of the map produced by this iteration.
    pub map_rows: usize,
    pub map_cols: usize,
    /// Number of source vertices matched by at least one target vertex.
    pub distinct_matches: usize,
    pub elapsed_ms: f64,
}
