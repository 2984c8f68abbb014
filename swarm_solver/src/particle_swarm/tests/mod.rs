use nalgebra::DVector;

mod engine;

fn sphere(x: &DVector<f64>) -> f64 {
    x.norm_squared()
}

fn rastrigin(x: &DVector<f64>) -> f64 {
    10.0 * x.len() as f64
        + x.iter()
            .map(|xi| xi * xi - 10.0 * (2.0 * std::f64::consts::PI * xi).cos())
            .sum::<f64>()
}

fn symmetric_box(dim: usize, half_width: f64) -> (DVector<f64>, DVector<f64>) {
    (
        DVector::from_element(dim, -half_width),
        DVector::from_element(dim, half_width),
    )
}
