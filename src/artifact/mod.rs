//! On-disk format for sensitivity coefficient arrays (`sc.bin`).

pub mod layout;
pub mod reader;
pub mod writer;
