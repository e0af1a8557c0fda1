//! Structural probe for tar containers.
//!
//! This is not a full parse: only the first header block is inspected. A
//! file qualifies when that block is complete, not all zero, and carries a
//! header checksum matching its contents.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Size of a tar header block.
pub const BLOCK_SIZE: usize = 512;

/// Byte range of the checksum field inside a header block.
const CHECKSUM_FIELD: std::ops::Range<usize> = 148..156;

/// Does the file look like a tar container? Never fails: an unreadable or
/// short file is simply not a container.
pub fn is_archive_container(path: &Path) -> bool {
    let is_container = match read_first_block(path) {
        Ok(Some(block)) => header_checksum_matches(&block),
        Ok(None) => false,
        Err(e) => {
            log::debug!("Container probe could not read {}: {}", path.display(), e);
            false
        }
    };

    if is_container {
        log::info!("{} is a valid TAR file.", path.display());
    } else {
        log::info!("{} is not a valid TAR file.", path.display());
    }
    is_container
}

fn read_first_block(path: &Path) -> io::Result<Option<[u8; BLOCK_SIZE]>> {
    let mut file = File::open(path)?;
    let mut block = [0u8; BLOCK_SIZE];
    let mut filled = 0;

    while filled < BLOCK_SIZE {
        match file.read(&mut block[filled..])? {
            0 => return Ok(None),
            n => filled += n,
        }
    }

    Ok(Some(block))
}

/// Validate a header block against its recorded checksum.
///
/// Both the POSIX unsigned sum and the historical signed sum are accepted.
pub fn header_checksum_matches(block: &[u8; BLOCK_SIZE]) -> bool {
    if block.iter().all(|b| *b == 0) {
        return false;
    }

    let header = tar::Header::from_byte_slice(block);
    let recorded = match header.cksum() {
        Ok(recorded) => recorded,
        Err(_) => return false,
    };

    let (unsigned, signed) = checksum_sums(block);
    recorded == unsigned || i64::from(recorded) == signed
}

fn checksum_sums(block: &[u8; BLOCK_SIZE]) -> (u32, i64) {
    block
        .iter()
        .enumerate()
        .map(|(i, b)| if CHECKSUM_FIELD.contains(&i) { b' ' } else { *b })
        .fold((0u32, 0i64), |(unsigned, signed), b| {
            (unsigned + u32::from(b), signed + i64::from(b as i8))
        })
}
