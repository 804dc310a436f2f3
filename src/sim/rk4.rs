//! Fixed-step classical Runge-Kutta integration.

use anyhow::{Result, bail};

/// Right-hand side of `dy/dt = f(t, y)`.
pub trait OdeSystem {
    fn ndim(&self) -> usize;
    fn rhs(&self, t: f64, y: &[f64], dydt: &mut [f64]);
}

/// Integrates from `times[0]` and returns the state at every entry of
/// `times`, taking `substeps` equal RK4 steps between consecutive samples.
/// Fails as soon as the state becomes non-finite.
pub fn integrate<S: OdeSystem + ?Sized>(
    system: &S,
    y0: &[f64],
    times: &[f64],
    substeps: usize,
) -> Result<Vec<Vec<f64>>> {
    let n = system.ndim();
    if y0.len() != n {
        bail!("initial state has {} values, system has {}", y0.len(), n);
    }
    if y0.iter().any(|v| !v.is_finite()) {
        bail!("initial state is not finite");
    }
    if times.is_empty() {
        return Ok(Vec::new());
    }
    let substeps = substeps.max(1);

    let mut y = y0.to_vec();
    let mut k1 = vec![0.0; n];
    let mut k2 = vec![0.0; n];
    let mut k3 = vec![0.0; n];
    let mut k4 = vec![0.0; n];
    let mut tmp = vec![0.0; n];

    let mut out = Vec::with_capacity(times.len());
    out.push(y.clone());

    for win in times.windows(2) {
        let (t0, t1) = (win[0], win[1]);
        let h = (t1 - t0) / substeps as f64;
        for s in 0..substeps {
            let t = t0 + s as f64 * h;
            system.rhs(t, &y, &mut k1);
            axpy(&y, &k1, 0.5 * h, &mut tmp);
            system.rhs(t + 0.5 * h, &tmp, &mut k2);
            axpy(&y, &k2, 0.5 * h, &mut tmp);
            system.rhs(t + 0.5 * h, &tmp, &mut k3);
            axpy(&y, &k3, h, &mut tmp);
            system.rhs(t + h, &tmp, &mut k4);
            for i in 0..n {
                y[i] += h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
            }
        }
        if let Some(i) = y.iter().position(|v| !v.is_finite()) {
            bail!("integration diverged at t={} (state {})", t1, i);
        }
        out.push(y.clone());
    }
    Ok(out)
}

fn axpy(y: &[f64], k: &[f64], a: f64, out: &mut [f64]) {
    for ((o, yi), ki) in out.iter_mut().zip(y).zip(k) {
        *o = yi + a * ki;
    }
}
