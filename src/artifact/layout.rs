use std::io::{Read, Write};

use anyhow::{Context, Result, bail};
use crc::{CRC_64_ECMA_182, Crc};

pub const MAGIC: [u8; 8] = *b"KIRASENS";
pub const VERSION: u32 = 1;
pub const HEADER_SIZE: usize = 64;
/// One tag byte (0 = not computed, 1 = value) followed by an f64.
pub const RECORD_SIZE: usize = 9;

pub const CRC64: Crc<u64> = Crc::<u64>::new(&CRC_64_ECMA_182);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScHeaderV1 {
    pub version: u32,
    pub shape: [u64; 4],
    pub rate: f64,
    pub data_crc64: u64,
}

impl ScHeaderV1 {
    /// Dimensions as `usize`; fails when any dimension or their product
    /// does not fit.
    pub fn dims(&self) -> Result<[usize; 4]> {
        let mut dims = [0usize; 4];
        let mut cells = 1usize;
        for (out, &d) in dims.iter_mut().zip(&self.shape) {
            let Ok(d) = usize::try_from(d) else {
                bail!("sc.bin shape overflows");
            };
            let Some(n) = cells.checked_mul(d) else {
                bail!("sc.bin shape overflows");
            };
            cells = n;
            *out = d;
        }
        Ok(dims)
    }

    pub fn n_cells(&self) -> Result<usize> {
        Ok(self.dims()?.iter().product())
    }

    pub fn expected_len(&self) -> Result<usize> {
        self.n_cells()?
            .checked_mul(RECORD_SIZE)
            .and_then(|n| n.checked_add(HEADER_SIZE))
            .context("sc.bin shape overflows")
    }
}

pub fn write_header<W: Write>(mut w: W, header: &ScHeaderV1) -> Result<()> {
    w.write_all(&MAGIC)?;
    w.write_all(&header.version.to_le_bytes())?;
    w.write_all(&0u32.to_le_bytes())?;
    for dim in header.shape {
        w.write_all(&dim.to_le_bytes())?;
    }
    w.write_all(&header.rate.to_le_bytes())?;
    w.write_all(&header.data_crc64.to_le_bytes())?;
    Ok(())
}

pub fn read_header<R: Read>(mut r: R) -> Result<ScHeaderV1> {
    let mut magic = [0u8; 8];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        bail!("sc.bin magic mismatch");
    }
    let version = read_u32(&mut r)?;
    if version != VERSION {
        bail!("unsupported sc.bin version {}", version);
    }
    let _reserved = read_u32(&mut r)?;
    let mut shape = [0u64; 4];
    for dim in shape.iter_mut() {
        *dim = read_u64(&mut r)?;
    }
    let rate = f64::from_bits(read_u64(&mut r)?);
    let data_crc64 = read_u64(&mut r)?;
    Ok(ScHeaderV1 {
        version,
        shape,
        rate,
        data_crc64,
    })
}

fn read_u32<R: Read>(mut r: R) -> Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf).context("failed to read u32")?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u64<R: Read>(mut r: R) -> Result<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf).context("failed to read u64")?;
    Ok(u64::from_le_bytes(buf))
}
