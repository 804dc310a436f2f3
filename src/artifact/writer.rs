use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::Array4;
use crate::artifact::layout::{CRC64, RECORD_SIZE, ScHeaderV1, VERSION, write_header};

pub fn encode_cells(cells: &[Option<f64>]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(cells.len() * RECORD_SIZE);
    for cell in cells {
        match cell {
            Some(v) => {
                payload.push(1u8);
                payload.extend_from_slice(&v.to_le_bytes());
            }
            None => {
                payload.push(0u8);
                payload.extend_from_slice(&0f64.to_le_bytes());
            }
        }
    }
    payload
}

pub fn write_artifact(path: &Path, coefficients: &Array4, rate: f64) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let payload = encode_cells(coefficients.cells());
    let header = ScHeaderV1 {
        version: VERSION,
        shape: coefficients.shape().map(|d| d as u64),
        rate,
        data_crc64: CRC64.checksum(&payload),
    };

    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    write_header(&mut w, &header)?;
    w.write_all(&payload)?;
    w.flush()?;
    Ok(())
}
