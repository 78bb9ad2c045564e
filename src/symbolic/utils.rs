/// `num_values` evenly spaced points from `start` to `end`, both endpoints included exactly.
pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    match num_values {
        0 => return Vec::new(),
        1 => return vec![start],
        _ => {}
    }
    let mut values = Vec::with_capacity(num_values);
    let step = (end - start) / (num_values as f64 - 1.0);

    for i in 0..num_values - 1 {
        let value = start + (i as f64 * step);
        values.push(value);
    }
    values.push(end);

    values
}

/// Centered difference (f(x + h) - f(x - h)) / 2h at every point; the first failing
/// evaluation, or a quotient that overflows, aborts the whole computation.
pub fn numerical_derivative<F>(f: F, x_values: &[f64], h: f64) -> Result<Vec<f64>, String>
where
    F: Fn(f64) -> Result<f64, String>,
{
    let mut derivatives = Vec::with_capacity(x_values.len());

    for &x in x_values {
        let f_x_plus_h = f(x + h)?;
        let f_x_minus_h = f(x - h)?;
        let derivative = (f_x_plus_h - f_x_minus_h) / (2.0 * h);
        if !derivative.is_finite() {
            return Err(format!("derivative is not finite at x = {}", x));
        }
        derivatives.push(derivative);
    }

    Ok(derivatives)
}

// compute norm of two vectors
pub fn norm(x: &[f64], y: &[f64]) -> Result<f64, String> {
    if x.len() != y.len() {
        return Err(format!("vectors of different lengths: {} and {}", x.len(), y.len()));
    }
    if x.is_empty() {
        return Ok(0.0);
    }
    Ok((1.0 / x.len() as f64) * x.iter().zip(y.iter()).map(|(a, b)| (a - b).powi(2)).sum::<f64>().sqrt())
}
