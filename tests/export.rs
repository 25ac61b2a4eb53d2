use image::GenericImageView;
use mandelterm::bitmap::{self, BitmapOptions, ScanOrder};
use mandelterm::export::{self, ExportJob, Format};
use mandelterm::{EscapeParams, EscapeResult, EscapeTime, Scheduler, Viewport};
use std::fs::{self, File};
use tempfile::tempdir;

fn classic() -> Viewport {
    Viewport::new(-2.0, 1.0, -1.5, 1.5, 0.75).unwrap()
}

#[test]
fn bitmap_header_matches_the_grid() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("grid.bmp");
    let grid = Scheduler::new(2)
        .render(&classic(), 4, 4, EscapeParams::new(50, 2.0), &EscapeTime)
        .unwrap();
    export::write_image(&path, &grid, Format::Bitmap, BitmapOptions::default()).unwrap();

    let header = bitmap::read_header(&mut File::open(&path).unwrap()).unwrap();
    assert_eq!(header.width, 4);
    assert_eq!(header.height, 4);
    let length = fs::metadata(&path).unwrap().len();
    assert_eq!(length - u64::from(header.pixel_offset), 4 * 4 * 3);
}

#[test]
fn exported_frames_are_square_and_complete() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("export.bmp");
    let job = ExportJob {
        path: &path,
        format: Format::Bitmap,
        options: BitmapOptions {
            scan_order: ScanOrder::TopDown,
            ..BitmapOptions::default()
        },
        resolution: 64,
        params: EscapeParams::EXPORT,
    };
    let viewport = Viewport::fit(82, 24).unwrap();
    let frame = export::export(&viewport, &job, &Scheduler::new(3), &EscapeTime).unwrap();
    assert_eq!((frame.rows, frame.columns), (64, 64));

    let bytes = fs::read(&path).unwrap();
    let header = bitmap::read_header(&mut &bytes[..]).unwrap();
    assert_eq!((header.width, header.height), (64, 64));
    assert_eq!(bytes.len(), 54 + 64 * 64 * 3);

    // Row 0 is written first and is the top of the frame; compare a
    // sample against a direct evaluation.
    let grid = frame.render(&Scheduler::new(1), EscapeParams::EXPORT, &EscapeTime).unwrap();
    let expected = grid.get(0, 10).map(EscapeResult::as_byte).unwrap();
    assert_eq!(bytes[54 + 10 * 3], expected);
}

#[test]
fn graymaps_are_written_through_the_image_crate() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("export.pgm");
    let grid = Scheduler::new(2)
        .render(&classic(), 4, 4, EscapeParams::new(50, 2.0), &EscapeTime)
        .unwrap();
    export::write_image(&path, &grid, Format::Pnm, BitmapOptions::default()).unwrap();

    let img = image::open(&path).unwrap();
    assert_eq!(img.dimensions(), (4, 4));
    let gray = img.to_luma();
    assert_eq!(gray.get_pixel(0, 0)[0], grid.get(0, 0).unwrap().as_byte());
    assert_eq!(gray.get_pixel(2, 2)[0], 0);
}

#[test]
fn unwritable_destinations_fail_cleanly() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("export.bmp");
    let grid = Scheduler::new(1)
        .render(&classic(), 4, 4, EscapeParams::new(50, 2.0), &EscapeTime)
        .unwrap();
    match export::write_image(&path, &grid, Format::Bitmap, BitmapOptions::default()) {
        Err(mandelterm::Error::ContainerWriteFailure(_)) => {}
        other => panic!("expected a write failure, got {:?}", other),
    }
}
