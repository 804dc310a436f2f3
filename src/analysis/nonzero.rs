use anyhow::{Result, bail};

/// Ascending positions of the baseline vector whose value is nonzero.
pub fn nonzero_indices(initial_values: &[f64]) -> Result<Vec<usize>> {
    let idx: Vec<usize> = initial_values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v != 0.0)
        .map(|(i, _)| i)
        .collect();
    if idx.is_empty() {
        bail!("no nonzero initial conditions");
    }
    Ok(idx)
}
