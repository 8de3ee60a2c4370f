use fmap_refine::linalg::diagonal_area;
use fmap_refine::{ZoomOutOptions, ZoomOutRefiner};
use nalgebra::DMatrix;

fn main() {
    // Demo stub: identical trivial bases, so the refined map stays the identity
    let n = 64usize;
    let basis = DMatrix::<f64>::identity(n, 16);
    let area = diagonal_area(&vec![1.0; n]);
    let c0 = DMatrix::<f64>::identity(4, 4);

    let refiner = ZoomOutRefiner::new(ZoomOutOptions::with_iterations(12));
    match refiner.refine_with_diagnostics(&basis, &basis, &area, &c0) {
        Ok((map, report)) => println!(
            "shape={:?} trace={:.6} latency_ms={:.3}",
            map.shape(),
            map.trace(),
            report.elapsed_ms
        ),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
