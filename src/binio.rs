use std::io::{self, Read, Write};

use crate::header::stride;

/// Reads 24-bit pixel rows that are padded to a 4-byte boundary, swapping the
/// on-disk B,G,R order into R,G,B.
///
/// Rows are appended to the caller's buffer, which only grows as bytes
/// actually arrive, so a header promising a huge image cannot force a huge
/// allocation up front.
pub struct RowReader<'a, I: Read> {
    input: &'a mut I,

    padding: [u8; 3],
    padding_len: usize,
    row_len: usize,

    byte_offset: usize,
}

impl<'a, I: Read> RowReader<'a, I> {
    pub fn new(input: &'a mut I, width: u32) -> Self {
        let row_len = width as usize * 3;

        Self {
            input,

            padding: [0u8; 3],
            padding_len: stride(width) - row_len,
            row_len,

            byte_offset: 0,
        }
    }

    /// Number of bytes consumed from the input so far
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Read one row and append its `width * 3` R,G,B bytes to `output`.
    pub fn read_row(&mut self, output: &mut Vec<u8>) -> io::Result<()> {
        let start = output.len();
        let read = Read::take(&mut *self.input, self.row_len as u64).read_to_end(output)?;
        if read != self.row_len {
            output.truncate(start);
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stream ended inside a pixel row",
            ));
        }
        self.input.read_exact(&mut self.padding[..self.padding_len])?;
        self.byte_offset += self.row_len + self.padding_len;

        for pixel in output[start..].chunks_exact_mut(3) {
            pixel.swap(0, 2);
        }

        Ok(())
    }
}

/// Writes 24-bit pixel rows in B,G,R order, zero-padding each one to a
/// 4-byte boundary.
pub struct RowWriter<'a, O: Write> {
    output: &'a mut O,

    row: Vec<u8>,
    row_len: usize,

    byte_size: usize,
}

impl<'a, O: Write> RowWriter<'a, O> {
    pub fn new(output: &'a mut O, width: u32) -> Self {
        Self {
            output,

            row: vec![0u8; stride(width)],
            row_len: width as usize * 3,

            byte_size: 0,
        }
    }

    /// Number of bytes written so far
    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    /// Write one row of `width * 3` R,G,B bytes.
    pub fn write_row(&mut self, input: &[u8]) -> io::Result<()> {
        debug_assert_eq!(input.len(), self.row_len);

        // Padding bytes past `row_len` stay zero from construction
        for (dst, src) in self.row[..self.row_len]
            .chunks_exact_mut(3)
            .zip(input.chunks_exact(3))
        {
            dst[0] = src[2];
            dst[1] = src[1];
            dst[2] = src[0];
        }

        self.output.write_all(&self.row)?;
        self.byte_size += self.row.len();

        Ok(())
    }
}
