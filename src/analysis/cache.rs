//! Write-through cache of sensitivity coefficients keyed by metric.
//!
//! The artifact lives under the model directory; it never expires and is
//! only recomputed when deleted or when it was written with a different
//! perturbation rate. Concurrent misses on the same key may both compute
//! and the last writer wins.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::analysis::{Array4, MetricKind};
use crate::artifact::{reader, writer};

pub const CACHE_FILE: &str = "sc.bin";

#[derive(Debug, Clone)]
pub struct CoefficientCache {
    root: PathBuf,
}

#[derive(Debug, Clone)]
pub struct CacheOutcome {
    pub coefficients: Array4,
    pub hit: bool,
}

impl CoefficientCache {
    pub fn new(model_dir: &Path) -> Self {
        Self {
            root: model_dir
                .join("sensitivity_coefficients")
                .join("nonzero_init"),
        }
    }

    pub fn dir(&self, metric: MetricKind) -> PathBuf {
        self.root.join(metric.as_str())
    }

    pub fn path(&self, metric: MetricKind) -> PathBuf {
        self.dir(metric).join(CACHE_FILE)
    }

    pub fn load_or_compute<F>(
        &self,
        metric: MetricKind,
        rate: f64,
        compute: F,
    ) -> Result<CacheOutcome>
    where
        F: FnOnce() -> Result<Array4>,
    {
        let path = self.path(metric);
        if path.is_file() {
            let (coefficients, stored_rate) = reader::read_artifact(&path).with_context(|| {
                format!(
                    "failed to read sensitivity cache {} (delete it to recompute)",
                    path.display()
                )
            })?;
            if stored_rate.to_bits() == rate.to_bits() {
                info!(cache = %path.display(), "sc_cache_reuse");
                return Ok(CacheOutcome {
                    coefficients,
                    hit: true,
                });
            }
            info!(
                cache = %path.display(),
                stored_rate,
                rate,
                "sc_cache_rebuild"
            );
        }

        fs::create_dir_all(self.dir(metric))
            .with_context(|| format!("failed to create {}", self.dir(metric).display()))?;
        let coefficients = compute()?;
        writer::write_artifact(&path, &coefficients, rate)?;
        info!(cache = %path.display(), "sc_cache_written");
        Ok(CacheOutcome {
            coefficients,
            hit: false,
        })
    }
}
