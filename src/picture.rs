use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    binio::{RowReader, RowWriter},
    config::{CodecConfig, RowOrder},
    header::{stride, Compression, FileHeader, InfoHeader, FILE_HEADER_LEN, INFO_HEADER_LEN, RGB_BIT_DEPTH},
};

/// A single 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Value of a single channel.
    pub fn channel(&self, plane: ColorPlane) -> u8 {
        match plane {
            ColorPlane::Red => self.red,
            ColorPlane::Green => self.green,
            ColorPlane::Blue => self.blue,
        }
    }
}

/// One channel of an RGB image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorPlane {
    Red,
    Green,
    Blue,
}

impl ColorPlane {
    /// Byte offset of this channel within an in-memory pixel.
    pub(crate) fn offset(self) -> usize {
        match self {
            ColorPlane::Red => 0,
            ColorPlane::Green => 1,
            ColorPlane::Blue => 2,
        }
    }
}

/// An owned 24-bit RGB raster.
///
/// Pixels are stored row-major, top row first, as consecutive R,G,B bytes.
/// The backing store is always exactly `width * height * 3` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) data: Vec<u8>,
}

impl Bitmap {
    /// Create a black image of the given size.
    pub fn new(width: u32, height: u32) -> Result<Self, Error> {
        let len = buffer_len(width, height)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| Error::InvalidDimensions(width, height))?;
        data.resize(len, 0);

        Ok(Self { width, height, data })
    }

    /// Create an image from packed R,G,B bytes, top row first.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, Error> {
        let len = buffer_len(width, height)?;
        if data.len() != len {
            return Err(Error::BufferLength {
                expected: len,
                got: data.len(),
            });
        }

        Ok(Self { width, height, data })
    }

    /// Width of the image in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the image in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Packed R,G,B bytes, top row first.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the packed bytes. The length cannot change, so the
    /// size invariant holds.
    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub(crate) fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    #[inline]
    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }

    #[inline]
    pub(crate) fn row_len(&self) -> usize {
        self.width as usize * 3
    }

    /// Color at `(x, y)`, or [`None`] outside the image.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let i = self.index(x, y);
        Some(Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// Set the color at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the image.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgb) {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{} image",
            self.width,
            self.height
        );

        let i = self.index(x, y);
        self.data[i] = color.red;
        self.data[i + 1] = color.green;
        self.data[i + 2] = color.blue;
    }

    /// Set the color at signed coordinates, ignoring anything off the image.
    #[inline]
    pub(crate) fn plot(&mut self, x: i64, y: i64, color: Rgb) {
        if self.in_bounds(x, y) {
            let i = self.index(x as u32, y as u32);
            self.data[i] = color.red;
            self.data[i + 1] = color.green;
            self.data[i + 2] = color.blue;
        }
    }

    /// Fill the whole image with one color.
    pub fn clear(&mut self, color: Rgb) {
        for pixel in self.data.chunks_exact_mut(3) {
            pixel[0] = color.red;
            pixel[1] = color.green;
            pixel[2] = color.blue;
        }
    }

    /// Decode a bitmap from anything that implements [Read]
    pub fn decode<I: Read>(input: I) -> Result<Bitmap, Error> {
        Self::decode_with(input, &CodecConfig::default())
    }

    /// Decode a bitmap from anything that implements [Read], using the given
    /// limits.
    pub fn decode_with<I: Read>(mut input: I, config: &CodecConfig) -> Result<Bitmap, Error> {
        let file_header = FileHeader::read_from(&mut input)?;
        let info = InfoHeader::read_from(&mut input)?;

        debug!(
            width = info.width,
            height = info.height,
            bit_depth = info.bit_depth,
            compression = ?info.compression,
            data_offset = file_header.data_offset,
            "read bitmap headers"
        );

        if info.planes != 1 {
            return Err(Error::InvalidHeader(format!(
                "expected 1 color plane, got {}",
                info.planes
            )));
        }
        if info.bit_depth != RGB_BIT_DEPTH {
            return Err(Error::UnsupportedBitDepth(info.bit_depth));
        }
        if info.compression != Compression::Rgb {
            return Err(Error::UnsupportedCompression(info.compression.into()));
        }

        if info.width <= 0 {
            return Err(Error::InvalidHeader(format!("invalid width {}", info.width)));
        }
        let width = info.width as u32;
        let height = info.height.unsigned_abs();
        if height == 0 {
            return Err(Error::InvalidHeader("image height is zero".to_string()));
        }

        if let Some(max) = config.max_dimension {
            if width > max || height > max {
                return Err(Error::ImageTooLarge { width, height, max });
            }
        }

        // Skip header extensions, any palette, and gaps before the pixel data
        let headers_len = FILE_HEADER_LEN as u64 + info.header_size as u64;
        if (file_header.data_offset as u64) < headers_len {
            return Err(Error::InvalidHeader(format!(
                "pixel data offset {} points inside the headers",
                file_header.data_offset
            )));
        }
        let gap = file_header.data_offset as u64 - headers_len;
        if gap > 0 {
            trace!(gap, "skipping bytes before pixel data");
            let skipped = io::copy(&mut input.by_ref().take(gap), &mut io::sink())?;
            if skipped != gap {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "stream ended before the pixel data",
                )));
            }
        }

        // Validate the size without allocating it; the pixel buffer only grows
        // as rows are read, so a lying header fails on the short stream
        buffer_len(width, height)?;
        let mut data = Vec::new();
        let mut reader = RowReader::new(&mut input, width);
        for _ in 0..height {
            reader.read_row(&mut data)?;
        }

        let mut bitmap = Bitmap { width, height, data };
        // Rows on disk are bottom-up unless the height was negative
        if !info.is_top_down() {
            bitmap.vertical_flip();
        }

        trace!(bytes = reader.byte_offset(), "read pixel rows");

        Ok(bitmap)
    }

    /// Encode the image into anything that implements [Write]
    pub fn encode<O: Write>(&self, output: O) -> Result<(), Error> {
        self.encode_with(output, &CodecConfig::default())
    }

    /// Encode the image into anything that implements [Write], using the
    /// given options.
    pub fn encode_with<O: Write>(&self, mut output: O, config: &CodecConfig) -> Result<(), Error> {
        let headers_len = FILE_HEADER_LEN + INFO_HEADER_LEN;
        let image_size = u32::try_from(stride(self.width) as u64 * self.height as u64)
            .ok()
            .filter(|size| size.checked_add(headers_len).is_some());
        let (Some(image_size), Ok(width), Ok(height)) = (
            image_size,
            i32::try_from(self.width),
            i32::try_from(self.height),
        ) else {
            return Err(Error::ImageTooLarge {
                width: self.width,
                height: self.height,
                max: i32::MAX as u32,
            });
        };

        let file_header = FileHeader {
            file_size: headers_len + image_size,
            data_offset: headers_len,
            ..Default::default()
        };

        let info = InfoHeader {
            width,
            height: match config.row_order {
                RowOrder::BottomUp => height,
                RowOrder::TopDown => -height,
            },
            image_size,
            x_pixels_per_meter: config.pixels_per_meter,
            y_pixels_per_meter: config.pixels_per_meter,
            ..Default::default()
        };

        debug!(
            width = self.width,
            height = self.height,
            file_size = file_header.file_size,
            row_order = ?config.row_order,
            "writing bitmap"
        );

        // Write out the headers
        output.write_all(&file_header.to_bytes())?;
        output.write_all(&info.to_bytes())?;

        let mut writer = RowWriter::new(&mut output, self.width);
        let rows = self.data.chunks_exact(self.row_len());
        match config.row_order {
            RowOrder::BottomUp => {
                for row in rows.rev() {
                    writer.write_row(row)?;
                }
            }
            RowOrder::TopDown => {
                for row in rows {
                    writer.write_row(row)?;
                }
            }
        }
        debug_assert_eq!(writer.byte_size(), image_size as usize);

        output.flush()?;

        Ok(())
    }

    /// Save the image to a file as a bitmap.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut out_file = BufWriter::new(File::create(path.as_ref())?);

        self.encode(&mut out_file)?;

        Ok(())
    }
}

/// Open a bitmap file from disk.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Bitmap, Error> {
    let input = BufReader::new(File::open(path)?);

    Bitmap::decode(input)
}

fn buffer_len(width: u32, height: u32) -> Result<usize, Error> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions(width, height));
    }

    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or(Error::InvalidDimensions(width, height))
}

/// Broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The byte stream is not a supported bitmap.
    Format,

    /// Reading or writing the underlying stream failed.
    Io,

    /// Operand sizes do not fit together.
    Dimension,

    /// A parameter is outside its valid domain.
    Range,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("incorrect identifier, got {0:?}")]
    InvalidIdentifier([u8; 2]),

    #[error("bitmap header is truncated")]
    TruncatedHeader,

    #[error("invalid bitmap header: {0}")]
    InvalidHeader(String),

    #[error("unsupported bit depth {0}, only 24 bit images are supported")]
    UnsupportedBitDepth(u16),

    #[error("unsupported compression type {0}")]
    UnsupportedCompression(u32),

    #[error("image of {width}x{height} exceeds the maximum dimension {max}")]
    ImageTooLarge { width: u32, height: u32, max: u32 },

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(u32, u32),

    #[error("image dimensions differ: expected {expected:?}, got {got:?}")]
    DimensionMismatch { expected: (u32, u32), got: (u32, u32) },

    #[error("buffer length {got} does not match the expected {expected}")]
    BufferLength { expected: usize, got: usize },

    #[error("requested region lies outside the image")]
    EmptyRegion,

    #[error("{0}")]
    OutOfRange(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidIdentifier(_)
            | Error::TruncatedHeader
            | Error::InvalidHeader(_)
            | Error::UnsupportedBitDepth(_)
            | Error::UnsupportedCompression(_)
            | Error::ImageTooLarge { .. } => ErrorKind::Format,
            Error::Io(_) => ErrorKind::Io,
            Error::InvalidDimensions(..)
            | Error::DimensionMismatch { .. }
            | Error::BufferLength { .. }
            | Error::EmptyRegion => ErrorKind::Dimension,
            Error::OutOfRange(_) => ErrorKind::Range,
        }
    }
}
