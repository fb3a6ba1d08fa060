use byteorder::{ByteOrder, ReadBytesExt, LE};
use std::io::{self, Read};

use crate::picture::Error;

/// Identifier at the start of every bitmap file.
pub const MAGIC: [u8; 2] = *b"BM";

/// Size of the [`FileHeader`] on disk.
pub const FILE_HEADER_LEN: u32 = 14;

/// Size of a BITMAPINFOHEADER, the smallest DIB header accepted.
pub const INFO_HEADER_LEN: u32 = 40;

/// Bit depth of direct RGB pixel data.
pub const RGB_BIT_DEPTH: u16 = 24;

/// Number of bytes in one on-disk row of `width` 24-bit pixels, including
/// padding up to a 4-byte boundary.
pub fn stride(width: u32) -> usize {
    (width as usize * 3).div_ceil(4) * 4
}

/// Map a failed header read onto the error surfaced to the caller. Running
/// out of bytes inside a header means the file is malformed rather than the
/// stream being broken.
fn header_read_error(err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        Error::TruncatedHeader
    } else {
        Error::Io(err)
    }
}

/// The bitmap file header. This must be included at the beginning
/// of a valid bitmap file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Identifier. Must be set to "BM".
    pub magic: [u8; 2],

    /// Total size of the file in bytes.
    pub file_size: u32,

    /// Application specific, written as zero.
    pub reserved: u32,

    /// Offset from the start of the file to the first pixel row.
    pub data_offset: u32,
}

impl Default for FileHeader {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            file_size: 0,
            reserved: 0,
            data_offset: FILE_HEADER_LEN + INFO_HEADER_LEN,
        }
    }
}

impl FileHeader {
    pub fn to_bytes(&self) -> [u8; FILE_HEADER_LEN as usize] {
        let mut buf = [0u8; FILE_HEADER_LEN as usize];

        buf[0..2].copy_from_slice(&self.magic);
        LE::write_u32(&mut buf[2..6], self.file_size);
        LE::write_u32(&mut buf[6..10], self.reserved);
        LE::write_u32(&mut buf[10..14], self.data_offset);

        buf
    }

    pub fn read_from<T: Read>(input: &mut T) -> Result<Self, Error> {
        let mut magic = [0u8; 2];
        input.read_exact(&mut magic).map_err(header_read_error)?;

        if magic != MAGIC {
            return Err(Error::InvalidIdentifier(magic));
        }

        Ok(FileHeader {
            magic,
            file_size: input.read_u32::<LE>().map_err(header_read_error)?,
            reserved: input.read_u32::<LE>().map_err(header_read_error)?,
            data_offset: input.read_u32::<LE>().map_err(header_read_error)?,
        })
    }
}

/// The device independent bitmap header, describing the image geometry and
/// pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoHeader {
    /// Size of this header on disk. 40 for a BITMAPINFOHEADER, larger for the
    /// V4 and V5 variants.
    pub header_size: u32,

    /// Width of the image in pixels.
    pub width: i32,

    /// Height of the image in pixels. Negative heights mean rows are stored
    /// top-down.
    pub height: i32,

    /// Number of color planes, always 1.
    pub planes: u16,

    /// Bits per pixel.
    pub bit_depth: u16,

    /// Type of compression used on the pixel data.
    pub compression: Compression,

    /// Size of the pixel data, may be zero for uncompressed images.
    pub image_size: u32,

    /// Horizontal resolution in pixels per meter.
    pub x_pixels_per_meter: i32,

    /// Vertical resolution in pixels per meter.
    pub y_pixels_per_meter: i32,

    /// Number of palette entries.
    pub colors_used: u32,

    /// Number of palette entries needed to display the image.
    pub colors_important: u32,
}

impl Default for InfoHeader {
    fn default() -> Self {
        Self {
            header_size: INFO_HEADER_LEN,
            width: 0,
            height: 0,
            planes: 1,
            bit_depth: RGB_BIT_DEPTH,
            compression: Compression::Rgb,
            image_size: 0,
            x_pixels_per_meter: 0,
            y_pixels_per_meter: 0,
            colors_used: 0,
            colors_important: 0,
        }
    }
}

impl InfoHeader {
    /// Serialize as a 40 byte BITMAPINFOHEADER.
    pub fn to_bytes(&self) -> [u8; INFO_HEADER_LEN as usize] {
        let mut buf = [0u8; INFO_HEADER_LEN as usize];

        LE::write_u32(&mut buf[0..4], INFO_HEADER_LEN);
        LE::write_i32(&mut buf[4..8], self.width);
        LE::write_i32(&mut buf[8..12], self.height);
        LE::write_u16(&mut buf[12..14], self.planes);
        LE::write_u16(&mut buf[14..16], self.bit_depth);
        LE::write_u32(&mut buf[16..20], self.compression.into());
        LE::write_u32(&mut buf[20..24], self.image_size);
        LE::write_i32(&mut buf[24..28], self.x_pixels_per_meter);
        LE::write_i32(&mut buf[28..32], self.y_pixels_per_meter);
        LE::write_u32(&mut buf[32..36], self.colors_used);
        LE::write_u32(&mut buf[36..40], self.colors_important);

        buf
    }

    /// Read the fields shared by every supported DIB header version. Any bytes
    /// past the first 40 belong to the V4/V5 extensions and are left in the
    /// stream for the caller to skip.
    pub fn read_from<T: Read>(input: &mut T) -> Result<Self, Error> {
        let header_size = input.read_u32::<LE>().map_err(header_read_error)?;
        if header_size < INFO_HEADER_LEN {
            return Err(Error::InvalidHeader(format!(
                "DIB header size {header_size} is smaller than {INFO_HEADER_LEN}"
            )));
        }

        let width = input.read_i32::<LE>().map_err(header_read_error)?;
        let height = input.read_i32::<LE>().map_err(header_read_error)?;
        let planes = input.read_u16::<LE>().map_err(header_read_error)?;
        let bit_depth = input.read_u16::<LE>().map_err(header_read_error)?;
        let compression = input.read_u32::<LE>().map_err(header_read_error)?;

        Ok(InfoHeader {
            header_size,
            width,
            height,
            planes,
            bit_depth,
            compression: compression.try_into()?,
            image_size: input.read_u32::<LE>().map_err(header_read_error)?,
            x_pixels_per_meter: input.read_i32::<LE>().map_err(header_read_error)?,
            y_pixels_per_meter: input.read_i32::<LE>().map_err(header_read_error)?,
            colors_used: input.read_u32::<LE>().map_err(header_read_error)?,
            colors_important: input.read_u32::<LE>().map_err(header_read_error)?,
        })
    }

    /// Whether rows are stored top row first.
    pub fn is_top_down(&self) -> bool {
        self.height < 0
    }
}

/// The type of compression used on the pixel data.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// No compression at all, raw rows
    Rgb = 0,

    /// Run length encoding of 8 bit palette indices
    Rle8 = 1,

    /// Run length encoding of 4 bit palette indices
    Rle4 = 2,

    /// Uncompressed with explicit channel masks
    Bitfields = 3,

    /// Embedded JPEG stream
    Jpeg = 4,

    /// Embedded PNG stream
    Png = 5,
}

impl TryFrom<u32> for Compression {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Rgb,
            1 => Self::Rle8,
            2 => Self::Rle4,
            3 => Self::Bitfields,
            4 => Self::Jpeg,
            5 => Self::Png,
            v => return Err(Error::UnsupportedCompression(v)),
        })
    }
}

impl From<Compression> for u32 {
    fn from(value: Compression) -> Self {
        value as u32
    }
}
