use std::io::Cursor;

use bmpkit::{plasma, Bitmap, CodecConfig, Colormap, Drawer, ErrorKind, PlasmaParameters, Rgb, RowOrder, Rng};

fn noise(width: u32, height: u32, seed: u64) -> Bitmap {
    let mut rng = Rng::new(seed);
    let data = (0..width * height * 3).map(|_| rng.next_u64() as u8).collect();
    Bitmap::from_raw(width, height, data).unwrap()
}

#[test]
fn save_and_open_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noise.bmp");

    let image = noise(13, 7, 11);
    image.save(&path).unwrap();

    let metadata = std::fs::metadata(&path).unwrap();
    // 13 pixels * 3 bytes padded to 40 per row
    assert_eq!(metadata.len(), 54 + 40 * 7);

    assert_eq!(bmpkit::open(&path).unwrap(), image);
}

#[test]
fn open_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = bmpkit::open(dir.path().join("missing.bmp")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn codec_round_trip_many_sizes() {
    for (width, height) in [(1, 1), (2, 3), (3, 2), (4, 4), (5, 1), (17, 9)] {
        let image = noise(width, height, (width * 31 + height) as u64);

        for row_order in [RowOrder::BottomUp, RowOrder::TopDown] {
            let config = CodecConfig::builder().row_order(row_order).build();
            let mut bytes = Vec::new();
            image.encode_with(&mut bytes, &config).unwrap();

            let decoded = Bitmap::decode(Cursor::new(bytes)).unwrap();
            assert_eq!(decoded, image, "{width}x{height} {row_order:?}");
        }
    }
}

#[test]
fn garbage_is_format_error() {
    let err = Bitmap::decode(Cursor::new(b"GIF89a not a bitmap".to_vec())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);

    let err = Bitmap::decode(Cursor::new(b"BM".to_vec())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn involutions() {
    let original = noise(9, 6, 5);
    let mut image = original.clone();

    image.vertical_flip();
    image.vertical_flip();
    assert_eq!(image, original);

    image.horizontal_flip();
    image.horizontal_flip();
    assert_eq!(image, original);

    image.invert_color_planes();
    image.invert_color_planes();
    assert_eq!(image, original);
}

#[test]
fn flips_survive_encoding() {
    let original = noise(6, 5, 8);
    let mut flipped = original.clone();
    flipped.vertical_flip();

    let mut bytes = Vec::new();
    flipped.encode(&mut bytes).unwrap();
    let mut decoded = Bitmap::decode(Cursor::new(bytes)).unwrap();
    decoded.vertical_flip();

    assert_eq!(decoded, original);
}

#[test]
fn resample_pipeline() {
    let image = noise(16, 12, 21);

    let small = image.subsample().unwrap();
    assert_eq!((small.width(), small.height()), (8, 6));

    let smaller = small.subsample().unwrap().subsample().unwrap();
    assert_eq!((smaller.width(), smaller.height()), (2, 1));
    assert!(smaller.subsample().is_err());

    let big = small.upsample().unwrap();
    assert_eq!((big.width(), big.height()), (15, 11));
    for y in 0..small.height() {
        for x in 0..small.width() {
            assert_eq!(big.get_pixel(2 * x, 2 * y), small.get_pixel(x, y));
        }
    }
}

#[test]
fn plasma_blend_and_draw() {
    let base = noise(64, 48, 1);
    let parameters = PlasmaParameters::default();
    let colormap = Colormap::grayscale();

    let mut first = Bitmap::new(64, 48).unwrap();
    plasma(&mut first, 0, 0, 64, 48, &parameters, &colormap, &mut Rng::new(0xA5AA5AA5)).unwrap();
    let mut second = Bitmap::new(64, 48).unwrap();
    plasma(&mut second, 0, 0, 64, 48, &parameters, &colormap, &mut Rng::new(0xA5AA5AA5)).unwrap();
    assert_eq!(first, second);

    let mut blended = base.clone();
    blended.alpha_blend(0.0, &first).unwrap();
    assert_eq!(blended, base);
    blended.alpha_blend(1.0, &first).unwrap();
    assert_eq!(blended, first);

    let mut draw = Drawer::new(&mut blended);
    draw.pen_width(3);
    draw.pen_color(Rgb::new(255, 0, 0));
    draw.circle(40, 24, 100);
    draw.pen_width(1);
    draw.pen_color(Rgb::new(255, 255, 0));
    draw.rectangle(5, 5, 20, 40);
    draw.ellipse(32, 24, 20, 35);

    assert_eq!(blended.get_pixel(5, 5), Some(Rgb::new(255, 255, 0)));
    assert_eq!(blended.get_pixel(20, 40), Some(Rgb::new(255, 255, 0)));
}

#[test]
fn lsb_sequence_to_black() {
    let mut image = noise(8, 8, 99);
    for bit in 0..=7 {
        image.set_all_ith_bits_low(bit).unwrap();
    }

    assert!(image.as_raw().iter().all(|&b| b == 0));
    assert_eq!((image.width(), image.height()), (8, 8));
}
