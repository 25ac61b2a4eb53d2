//! Writes a finished grid as an uncompressed 24-bit bitmap.
//!
//! The file is a 14-byte file header, a 40-byte info header, and then
//! three bytes per sample.  The escape byte of each sample goes into
//! one channel of its triplet; the other two are zero.  Rows are not
//! padded, so the pixel data is exactly `rows * columns * 3` bytes
//! and the header always agrees with the stream that follows it.

use crate::errors::{Error, Result};
use crate::escape::EscapeResult;
use crate::grid::SampleGrid;
use std::io::{Read, Write};
use std::str::FromStr;

/// File header plus info header.
pub const HEADER_SIZE: u32 = 54;
const INFO_HEADER_SIZE: u32 = 40;
const BITS_PER_PIXEL: u16 = 24;
/// 72 dpi.
const PIXELS_PER_METER: u32 = 2835;

/// The order in which grid rows are written.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScanOrder {
    /// Last grid row first.  With a positive height this is how
    /// viewers expect the rows, so the image appears upright.
    BottomUp,
    /// Grid row 0 first, i.e. the image appears upside down.
    TopDown,
}

impl Default for ScanOrder {
    fn default() -> Self {
        ScanOrder::BottomUp
    }
}

impl FromStr for ScanOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "bottom-up" => Ok(ScanOrder::BottomUp),
            "top-down" => Ok(ScanOrder::TopDown),
            other => Err(format!("Unknown scan order '{}'", other)),
        }
    }
}

/// Which slot of each blue-green-red triplet carries the escape byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Channel {
    /// First byte of the triplet.
    Blue,
    /// Second byte.
    Green,
    /// Third byte.
    Red,
}

impl Default for Channel {
    fn default() -> Self {
        Channel::Blue
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "blue" => Ok(Channel::Blue),
            "green" => Ok(Channel::Green),
            "red" => Ok(Channel::Red),
            other => Err(format!("Unknown channel '{}'", other)),
        }
    }
}

impl Channel {
    fn offset(self) -> usize {
        match self {
            Channel::Blue => 0,
            Channel::Green => 1,
            Channel::Red => 2,
        }
    }
}

/// How a grid is laid out in the file.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BitmapOptions {
    /// Row order.
    pub scan_order: ScanOrder,
    /// Carrier channel.
    pub channel: Channel,
}

/// Every field of the two headers that this encoder sets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BitmapHeader {
    /// Total file length in bytes.
    pub file_size: u32,
    /// Where the pixel data starts.
    pub pixel_offset: u32,
    /// Columns.
    pub width: u32,
    /// Rows.
    pub height: u32,
    /// Always 1.
    pub planes: u16,
    /// Always 24.
    pub bits_per_pixel: u16,
    /// Always 0, uncompressed.
    pub compression: u32,
    /// Length of the pixel data.
    pub image_size: u32,
    /// Horizontal resolution.
    pub x_pixels_per_meter: u32,
    /// Vertical resolution.
    pub y_pixels_per_meter: u32,
    /// No palette.
    pub palette_colors: u32,
    /// Zero means all of them.
    pub important_colors: u32,
}

impl BitmapHeader {
    /// The header describing a `rows` by `columns` image.  Fails if
    /// the image is too large for the 32-bit size fields.
    pub fn for_dimensions(rows: usize, columns: usize) -> Result<BitmapHeader> {
        let too_big = || {
            Error::ContainerWriteFailure(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("a {}x{} image does not fit in a bitmap", columns, rows),
            ))
        };
        let limit = i32::max_value() as usize;
        if rows > limit || columns > limit {
            return Err(too_big());
        }
        let image_size = rows
            .checked_mul(columns)
            .and_then(|n| n.checked_mul(3))
            .filter(|n| *n <= (u32::max_value() - HEADER_SIZE) as usize)
            .ok_or_else(too_big)? as u32;
        Ok(BitmapHeader {
            file_size: HEADER_SIZE + image_size,
            pixel_offset: HEADER_SIZE,
            width: columns as u32,
            height: rows as u32,
            planes: 1,
            bits_per_pixel: BITS_PER_PIXEL,
            compression: 0,
            image_size,
            x_pixels_per_meter: PIXELS_PER_METER,
            y_pixels_per_meter: PIXELS_PER_METER,
            palette_colors: 0,
            important_colors: 0,
        })
    }

    /// Serialize both headers, little-endian.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE as usize);
        bytes.extend_from_slice(b"BM");
        bytes.extend_from_slice(&self.file_size.to_le_bytes());
        bytes.extend_from_slice(&[0; 4]);
        bytes.extend_from_slice(&self.pixel_offset.to_le_bytes());
        bytes.extend_from_slice(&INFO_HEADER_SIZE.to_le_bytes());
        bytes.extend_from_slice(&self.width.to_le_bytes());
        bytes.extend_from_slice(&self.height.to_le_bytes());
        bytes.extend_from_slice(&self.planes.to_le_bytes());
        bytes.extend_from_slice(&self.bits_per_pixel.to_le_bytes());
        bytes.extend_from_slice(&self.compression.to_le_bytes());
        bytes.extend_from_slice(&self.image_size.to_le_bytes());
        bytes.extend_from_slice(&self.x_pixels_per_meter.to_le_bytes());
        bytes.extend_from_slice(&self.y_pixels_per_meter.to_le_bytes());
        bytes.extend_from_slice(&self.palette_colors.to_le_bytes());
        bytes.extend_from_slice(&self.important_colors.to_le_bytes());
        out.write_all(&bytes)?;
        Ok(())
    }

    /// Parse the headers back out of a stream.
    pub fn read_from<R: Read>(input: &mut R) -> Result<BitmapHeader> {
        let mut bytes = [0u8; HEADER_SIZE as usize];
        input
            .read_exact(&mut bytes)
            .map_err(|e| Error::InvalidHeader(format!("short header: {}", e)))?;
        if &bytes[0..2] != b"BM" {
            return Err(Error::InvalidHeader("missing BM signature".to_string()));
        }
        let u32_at = |at: usize| {
            u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };
        let u16_at = |at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]);
        if u32_at(14) != INFO_HEADER_SIZE {
            return Err(Error::InvalidHeader(format!(
                "info header is {} bytes, expected {}",
                u32_at(14),
                INFO_HEADER_SIZE
            )));
        }
        Ok(BitmapHeader {
            file_size: u32_at(2),
            pixel_offset: u32_at(10),
            width: u32_at(18),
            height: u32_at(22),
            planes: u16_at(26),
            bits_per_pixel: u16_at(28),
            compression: u32_at(30),
            image_size: u32_at(34),
            x_pixels_per_meter: u32_at(38),
            y_pixels_per_meter: u32_at(42),
            palette_colors: u32_at(46),
            important_colors: u32_at(50),
        })
    }
}

/// Parse the headers of a bitmap.
pub fn read_header<R: Read>(input: &mut R) -> Result<BitmapHeader> {
    BitmapHeader::read_from(input)
}

/// Write `grid` as a complete bitmap: headers, then one triplet per
/// sample in the configured row order.
pub fn encode<W: Write>(grid: &SampleGrid, options: BitmapOptions, out: &mut W) -> Result<()> {
    let header = BitmapHeader::for_dimensions(grid.rows(), grid.columns())?;
    header.write_to(out)?;

    let slot = options.channel.offset();
    let mut line = vec![0u8; grid.columns() * 3];
    let mut write_row = |row: &[EscapeResult]| -> Result<()> {
        for (triplet, sample) in line.chunks_mut(3).zip(row) {
            triplet[slot] = sample.as_byte();
        }
        out.write_all(&line)?;
        Ok(())
    };
    match options.scan_order {
        ScanOrder::BottomUp => grid.iter_rows().rev().try_for_each(&mut write_row)?,
        ScanOrder::TopDown => grid.iter_rows().try_for_each(&mut write_row)?,
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::EscapeResult::{Bounded, Diverged};
    use std::io::Cursor;

    fn grid(rows: usize, columns: usize) -> SampleGrid {
        let samples = (0..rows * columns)
            .map(|i| if i % 5 == 0 { Bounded } else { Diverged(i) })
            .collect();
        SampleGrid::from_samples(rows, columns, samples)
    }

    #[test]
    fn header_round_trips_the_dimensions() {
        for &(rows, columns) in &[(1, 1), (3, 5), (7, 2), (40, 33)] {
            let mut out = vec![];
            encode(&grid(rows, columns), BitmapOptions::default(), &mut out).unwrap();
            let header = read_header(&mut Cursor::new(&out)).unwrap();
            assert_eq!(header.width as usize, columns);
            assert_eq!(header.height as usize, rows);
            assert_eq!(header.image_size as usize, rows * columns * 3);
            assert_eq!(out.len() - header.pixel_offset as usize, rows * columns * 3);
            assert_eq!(header.file_size as usize, out.len());
            assert_eq!(header.planes, 1);
            assert_eq!(header.bits_per_pixel, 24);
            assert_eq!(header.compression, 0);
        }
    }

    #[test]
    fn top_down_writes_row_zero_first() {
        let samples = vec![Diverged(1), Diverged(2), Diverged(3), Bounded];
        let g = SampleGrid::from_samples(2, 2, samples);
        let options = BitmapOptions {
            scan_order: ScanOrder::TopDown,
            channel: Channel::Blue,
        };
        let mut out = vec![];
        encode(&g, options, &mut out).unwrap();
        assert_eq!(&out[54..], &[1, 0, 0, 2, 0, 0, 3, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn bottom_up_writes_the_last_row_first() {
        let samples = vec![Diverged(1), Diverged(2), Diverged(3), Bounded];
        let g = SampleGrid::from_samples(2, 2, samples);
        let options = BitmapOptions {
            scan_order: ScanOrder::BottomUp,
            channel: Channel::Red,
        };
        let mut out = vec![];
        encode(&g, options, &mut out).unwrap();
        assert_eq!(&out[54..], &[0, 0, 3, 0, 0, 0, 0, 0, 1, 0, 0, 2]);
    }

    #[test]
    fn header_bytes_are_little_endian() {
        let mut out = vec![];
        BitmapHeader::for_dimensions(2, 0x1388).unwrap().write_to(&mut out).unwrap();
        assert_eq!(out.len(), 54);
        assert_eq!(&out[0..2], b"BM");
        assert_eq!(&out[10..14], &[0x36, 0, 0, 0]);
        assert_eq!(&out[14..18], &[0x28, 0, 0, 0]);
        assert_eq!(&out[18..22], &[0x88, 0x13, 0, 0]);
        assert_eq!(&out[22..26], &[2, 0, 0, 0]);
        assert_eq!(&out[28..30], &[0x18, 0]);
    }

    #[test]
    fn garbage_is_not_a_header() {
        assert!(read_header(&mut Cursor::new(b"PK")).is_err());
        assert!(read_header(&mut Cursor::new(vec![0u8; 60])).is_err());
    }

    #[test]
    fn oversized_images_are_refused() {
        assert!(BitmapHeader::for_dimensions(100_000, 100_000).is_err());
    }
}
