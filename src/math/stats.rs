//! Summary statistics that skip cells marked as not computed.

pub fn defined(values: &[Option<f64>]) -> impl Iterator<Item = f64> + '_ {
    values.iter().filter_map(|v| *v)
}

pub fn count_defined(values: &[Option<f64>]) -> usize {
    defined(values).count()
}

/// Mean of the defined values; `None` if there are none.
pub fn nan_mean(values: &[Option<f64>]) -> Option<f64> {
    let n = count_defined(values);
    if n == 0 {
        return None;
    }
    Some(defined(values).sum::<f64>() / n as f64)
}

/// Sample standard deviation (ddof = 1) of the defined values; `None` with
/// fewer than two.
pub fn nan_std(values: &[Option<f64>]) -> Option<f64> {
    let n = count_defined(values);
    if n < 2 {
        return None;
    }
    let mean = nan_mean(values)?;
    let ss: f64 = defined(values).map(|v| (v - mean) * (v - mean)).sum();
    Some((ss / (n - 1) as f64).sqrt())
}
