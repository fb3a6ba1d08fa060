//! Reading, writing and editing of uncompressed 24-bit bitmap (BMP) images.
//!
//! A [`Bitmap`] is an owned RGB raster. It can be decoded from and encoded to
//! the Windows bitmap format, transformed geometrically (flips, crops,
//! resampling), edited channel by channel, drawn on with a [`Drawer`], and
//! filled with a plasma fractal.
//!
//! # Example
//! ## Drawing on an image and saving it
//! ```no_run
//! use bmpkit::{Bitmap, Drawer, Rgb};
//!
//! let mut image = Bitmap::new(64, 64).expect("Could not create the image");
//! image.clear(Rgb::WHITE);
//!
//! let mut draw = Drawer::new(&mut image);
//! draw.pen_color(Rgb::new(255, 0, 0));
//! draw.pen_width(2);
//! draw.circle(32, 32, 20);
//!
//! image.save("circle.bmp").expect("Could not save the image");
//! ```
//!
//! ## Reading a bitmap from a file
//! ```no_run
//! use std::fs::File;
//! use bmpkit::Bitmap;
//!
//! // Load it directly with the `open` function...
//! let image = bmpkit::open("circle.bmp").expect("Could not open file");
//!
//! // ...or from something implementing Read.
//! let input_file = File::open("circle.bmp").expect("Could not open image file");
//! let image2 = Bitmap::decode(&input_file);
//! ```

mod operations {
    pub mod color;
    pub mod geometry;
}
mod binio;
mod util;

pub mod colormap;
pub mod config;
pub mod draw;
pub mod header;
pub mod picture;
pub mod plasma;

// ----------------------- //
// INLINED USEFUL FEATURES //
// ----------------------- //
#[doc(inline)]
pub use picture::{open, Bitmap, ColorPlane, Error, ErrorKind, Rgb};

#[doc(inline)]
pub use config::{CodecConfig, RowOrder};

#[doc(inline)]
pub use colormap::Colormap;

#[doc(inline)]
pub use draw::{Drawer, PenState};

#[doc(inline)]
pub use plasma::{plasma, PlasmaParameters};

#[doc(inline)]
pub use util::Rng;
