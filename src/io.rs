//! JSON I/O for dense and sparse matrices.
//!
//! - Dense files: `{"rows": r, "cols": c, "data": [...]}` in row-major order.
//! - Sparse files: `{"rows": r, "cols": c, "entries": [[i, j, v], ...]}`;
//!   duplicate entries are summed.
//! - `write_json_file`: pretty-print a serializable value to disk.

use nalgebra::DMatrix;
use nalgebra_sparse::{CooMatrix, CsrMatrix};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Row-major dense matrix as stored on disk.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DenseMatrixFile {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f64>,
}

impl DenseMatrixFile {
    pub fn from_matrix(m: &DMatrix<f64>) -> Self {
        let (rows, cols) = m.shape();
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            data.extend(m.row(r).iter().copied());
        }
        Self { rows, cols, data }
    }

    pub fn to_matrix(&self) -> Result<DMatrix<f64>, String> {
        if self.data.len() != self.rows * self.cols {
            return Err(format!(
                "dense matrix declares {}x{} but holds {} values",
                self.rows,
                self.cols,
                self.data.len()
            ));
        }
        Ok(DMatrix::from_row_slice(self.rows, self.cols, &self.data))
    }
}

/// Triplet-encoded sparse matrix as stored on disk.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SparseMatrixFile {
    pub rows: usize,
    pub cols: usize,
    pub entries: Vec<(usize, usize, f64)>,
}

impl SparseMatrixFile {
    pub fn to_csr(&self) -> Result<CsrMatrix<f64>, String> {
        let (mut ri, mut ci, mut vals) = (
            Vec::with_capacity(self.entries.len()),
            Vec::with_capacity(self.entries.len()),
            Vec::with_capacity(self.entries.len()),
        );
        for &(i, j, v) in &self.entries {
            ri.push(i);
            ci.push(j);
            vals.push(v);
        }
        let coo = CooMatrix::try_from_triplets(self.rows, self.cols, ri, ci, vals)
            .map_err(|e| format!("invalid sparse matrix: {e}"))?;
        Ok(CsrMatrix::from(&coo))
    }

    pub fn from_csr(m: &CsrMatrix<f64>) -> Self {
        Self {
            rows: m.nrows(),
            cols: m.ncols(),
            entries: m.triplet_iter().map(|(i, j, &v)| (i, j, v)).collect(),
        }
    }
}

/// Load a dense matrix stored as JSON.
pub fn load_dense_matrix(path: &Path) -> Result<DMatrix<f64>, String> {
    let file: DenseMatrixFile = read_json_file(path)?;
    file.to_matrix()
        .map_err(|e| format!("Failed to load {}: {e}", path.display()))
}

/// Load a sparse matrix stored as JSON triplets.
pub fn load_sparse_matrix(path: &Path) -> Result<CsrMatrix<f64>, String> {
    let file: SparseMatrixFile = read_json_file(path)?;
    file.to_csr()
        .map_err(|e| format!("Failed to load {}: {e}", path.display()))
}

fn read_json_file<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&data).map_err(|e| format!("Failed to parse {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
