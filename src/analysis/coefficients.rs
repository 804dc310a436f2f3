//! Log-log sensitivity of a signaling metric to a relative perturbation.

use anyhow::{Result, bail};

use crate::analysis::Array4;

/// `ln(pert / base) / ln(rate)`, or `None` when either operand is missing,
/// the baseline is zero, or the logarithm is not finite (a perturbed metric
/// of exactly zero, or a sign change between baseline and perturbed).
pub fn sensitivity(base: Option<f64>, pert: Option<f64>, rate: f64) -> Option<f64> {
    let (base, pert) = (base?, pert?);
    if base == 0.0 {
        return None;
    }
    let coeff = (pert / base).ln() / rate.ln();
    coeff.is_finite().then_some(coeff)
}

/// Reduces the perturbation axis of `metrics` to the perturbed slots only,
/// in slot order with `baseline_slot` removed.
pub fn compute_coefficients(
    metrics: &Array4,
    nonzero_idx: &[usize],
    rate: f64,
    baseline_slot: usize,
) -> Result<Array4> {
    if !rate.is_finite() || rate <= 0.0 || rate == 1.0 {
        bail!("perturbation rate must be positive, finite and != 1 (got {})", rate);
    }
    let [n_sets, n_slots, n_obs, n_cond] = metrics.shape();
    if n_slots != nonzero_idx.len() + 1 {
        bail!(
            "metric array has {} perturbation slots, expected {} nonzero indices + baseline",
            n_slots,
            nonzero_idx.len()
        );
    }
    if baseline_slot >= n_slots {
        bail!("baseline slot {} out of range ({} slots)", baseline_slot, n_slots);
    }

    let mut out = Array4::new([n_sets, nonzero_idx.len(), n_obs, n_cond]);
    for i in 0..n_sets {
        let perturbed = (0..n_slots).filter(|&j| j != baseline_slot);
        for (jo, j) in perturbed.enumerate() {
            for k in 0..n_obs {
                for l in 0..n_cond {
                    let base = metrics.get(i, baseline_slot, k, l);
                    let pert = metrics.get(i, j, k, l);
                    out.set(i, jo, k, l, sensitivity(base, pert, rate));
                }
            }
        }
    }
    Ok(out)
}
