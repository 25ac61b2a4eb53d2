//! Turning the current view into an image file.
//!
//! An export is always square: the real extent of the view is kept,
//! and the imaginary extent is widened or narrowed about its middle to
//! match it.  The requested resolution is the number of columns.

use crate::bitmap::{self, BitmapOptions};
use crate::errors::{Error, Result};
use crate::escape::{EscapeParams, Evaluator};
use crate::grid::SampleGrid;
use crate::planes::Viewport;
use crate::scheduler::Scheduler;
use image::pnm::{PNMEncoder, PNMSubtype, SampleEncoding};
use image::ColorType;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::str::FromStr;

/// The container written to disk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Format {
    /// 24-bit bitmap, see `bitmap`.
    Bitmap,
    /// Binary portable graymap, one byte per sample.
    Pnm,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bmp" | "bitmap" => Ok(Format::Bitmap),
            "pnm" | "pgm" => Ok(Format::Pnm),
            other => Err(format!("Unknown image format '{}'", other)),
        }
    }
}

/// The viewport and grid dimensions of a square export.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ExportFrame {
    /// The widened (or narrowed) view.
    pub viewport: Viewport,
    /// Grid rows.
    pub rows: usize,
    /// Grid columns, the requested resolution.
    pub columns: usize,
}

impl Viewport {
    /// The square frame exported from this view at `resolution`
    /// columns.
    pub fn export_frame(&self, resolution: usize) -> Result<ExportFrame> {
        self.validate()?;
        if resolution == 0 {
            return Err(Error::InvalidViewport(
                "Export resolution must be at least one column".to_string(),
            ));
        }
        let extent = self.max_re - self.min_re;
        let scale = extent / (resolution as f64);
        let half_difference = (extent - (self.max_im - self.min_im)) / 2.0;
        let viewport = Viewport::new(
            self.min_re,
            self.max_re,
            self.min_im - half_difference,
            self.max_im + half_difference,
            scale,
        )?;
        let rows = ((viewport.max_im - viewport.min_im) / scale).round() as usize;
        Ok(ExportFrame {
            viewport,
            rows: rows.max(1),
            columns: resolution,
        })
    }
}

impl ExportFrame {
    /// Render the frame.
    pub fn render<E: Evaluator + ?Sized>(
        &self,
        scheduler: &Scheduler,
        params: EscapeParams,
        evaluator: &E,
    ) -> Result<SampleGrid> {
        scheduler.render(&self.viewport, self.rows, self.columns, params, evaluator)
    }
}

/// Write a finished grid to `path`.
pub fn write_image(
    path: &Path,
    grid: &SampleGrid,
    format: Format,
    options: BitmapOptions,
) -> Result<()> {
    let output = File::create(path)?;
    match format {
        Format::Bitmap => {
            let mut output = BufWriter::new(output);
            bitmap::encode(grid, options, &mut output)?;
        }
        Format::Pnm => {
            let mut encoder =
                PNMEncoder::new(output).with_subtype(PNMSubtype::Graymap(SampleEncoding::Binary));
            encoder.encode(
                &grid.to_bytes()[..],
                grid.columns() as u32,
                grid.rows() as u32,
                ColorType::Gray(8),
            )?;
        }
    }
    Ok(())
}

/// Everything an export needs besides the view.
#[derive(Clone, Debug)]
pub struct ExportJob<'a> {
    /// Where to write.
    pub path: &'a Path,
    /// Container.
    pub format: Format,
    /// Bitmap layout; ignored for PNM.
    pub options: BitmapOptions,
    /// Columns of the square frame.
    pub resolution: usize,
    /// Cap and threshold.
    pub params: EscapeParams,
}

/// Render `viewport` as a square frame and write it out.  Returns the
/// frame that was rendered.
pub fn export<E: Evaluator + ?Sized>(
    viewport: &Viewport,
    job: &ExportJob,
    scheduler: &Scheduler,
    evaluator: &E,
) -> Result<ExportFrame> {
    let frame = viewport.export_frame(job.resolution)?;
    let grid = frame.render(scheduler, job.params, evaluator)?;
    write_image(job.path, &grid, job.format, job.options)?;
    info!(
        "wrote {}x{} {:?} image to {}",
        frame.columns,
        frame.rows,
        job.format,
        job.path.display()
    );
    Ok(frame)
}
