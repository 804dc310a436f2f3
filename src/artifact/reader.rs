use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, bail};
use memmap2::Mmap;

use crate::analysis::Array4;
use crate::artifact::layout::{CRC64, HEADER_SIZE, RECORD_SIZE, ScHeaderV1, read_header};

pub fn open_mmap(path: &Path) -> Result<(ScHeaderV1, Mmap)> {
    let file = File::open(path).context("failed to open sc.bin")?;
    let len = file.metadata().context("failed to stat sc.bin")?.len() as usize;
    if len < HEADER_SIZE {
        bail!("sc.bin too small");
    }
    let mmap = unsafe { Mmap::map(&file).context("failed to mmap sc.bin")? };
    let header = read_header(&mmap[..HEADER_SIZE])?;
    let expected = header.expected_len()?;
    if mmap.len() != expected {
        bail!(
            "sc.bin size mismatch: expected {}, got {}",
            expected,
            mmap.len()
        );
    }
    Ok((header, mmap))
}

pub fn decode_cells(payload: &[u8]) -> Result<Vec<Option<f64>>> {
    if payload.len() % RECORD_SIZE != 0 {
        bail!("sc.bin payload is not a whole number of records");
    }
    let mut cells = Vec::with_capacity(payload.len() / RECORD_SIZE);
    for record in payload.chunks_exact(RECORD_SIZE) {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&record[1..]);
        match record[0] {
            0 => cells.push(None),
            1 => cells.push(Some(f64::from_le_bytes(buf))),
            tag => bail!("sc.bin record has invalid tag {}", tag),
        }
    }
    Ok(cells)
}

/// Reads an artifact, returning the stored coefficients and the
/// perturbation rate they were computed with.
pub fn read_artifact(path: &Path) -> Result<(Array4, f64)> {
    let (header, mmap) = open_mmap(path)?;
    let payload = &mmap[HEADER_SIZE..];
    if CRC64.checksum(payload) != header.data_crc64 {
        bail!("sc.bin checksum mismatch");
    }
    let cells = decode_cells(payload)?;
    let shape = header.dims()?;
    let coefficients = Array4::from_cells(shape, cells)?;
    Ok((coefficients, header.rate))
}
