//! Layout metrics recovered from dvipng output.
//!
//! Only the PNG header is read; the pixels themselves are never decoded.

use crate::error::ToolchainError;
use nom::{
    bytes::complete::tag,
    character::complete::digit1,
    combinator::map_res,
    number::complete::be_u32,
    sequence::{pair, preceded},
    IResult,
};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Width and height from the IHDR chunk, which always follows the signature.
fn ihdr(input: &[u8]) -> IResult<&[u8], (u32, u32)> {
    let (input, _) = tag(&PNG_SIGNATURE[..])(input)?;
    let (input, _length) = be_u32(input)?;
    let (input, _) = tag(&b"IHDR"[..])(input)?;
    pair(be_u32, be_u32)(input)
}

/// Read `(width, height)` from a PNG file's header.
pub fn png_dimensions(data: &[u8]) -> Result<(u32, u32), ToolchainError> {
    match ihdr(data) {
        Ok((_, dims)) => Ok(dims),
        Err(_) if data.len() < 24 => Err(ToolchainError::MalformedRaster(format!(
            "expected at least 24 bytes, got {}",
            data.len()
        ))),
        Err(_) => Err(ToolchainError::MalformedRaster(
            "missing PNG signature or IHDR chunk".to_string(),
        )),
    }
}

fn depth_field(input: &str) -> IResult<&str, u32> {
    map_res(preceded(tag("depth="), digit1), |d: &str| d.parse::<u32>())(input)
}

/// Find the first `depth=<int>` field in dvipng's report.
pub fn parse_depth(report: &str) -> Result<u32, ToolchainError> {
    report
        .match_indices("depth=")
        .find_map(|(pos, _)| depth_field(&report[pos..]).ok().map(|(_, depth)| depth))
        .ok_or_else(|| ToolchainError::MissingDepth(report.trim().to_string()))
}

#[cfg(test)]
pub(crate) fn png_header(width: u32, height: u32) -> Vec<u8> {
    let mut data = PNG_SIGNATURE.to_vec();
    data.extend_from_slice(&13u32.to_be_bytes());
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    // bit depth, color type, compression, filter, interlace
    data.extend_from_slice(&[8, 6, 0, 0, 0]);
    data
}
