//! Command-line configuration shared by the interactive explorer and
//! the headless exporter.

use crate::bitmap::{BitmapOptions, Channel, ScanOrder};
use crate::escape::EscapeParams;
use crate::export::{ExportJob, Format};
use clap::{Arg, ArgMatches};
use num::Complex;
use std::path::PathBuf;
use std::str::FromStr;

/// Given a string and a separator, returns the two values
/// separated by the separator.
pub fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// A specific implementation of parse_pair using a comma and expecting
/// floating point numbers.
pub fn parse_complex(s: &str) -> Option<Complex<f64>> {
    parse_pair(s, ',').map(|(re, im)| Complex { re, im })
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_threshold(s: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(t) if t.is_finite() && t > 0.0 => Ok(()),
        Ok(_) => Err("Divergence threshold must be a positive number".to_string()),
        Err(_) => Err("Could not parse divergence threshold".to_string()),
    }
}

fn validate_parse<T: FromStr<Err = String>>(s: &str) -> Result<(), String> {
    T::from_str(s).map(|_| ())
}

/// Argument names.
pub const OUTPUT: &str = "output";
/// Image container.
pub const FORMAT: &str = "format";
/// Export columns.
pub const RESOLUTION: &str = "resolution";
/// Export iteration cap.
pub const ITERATIONS: &str = "iterations";
/// Preview iteration cap.
pub const PREVIEW_ITERATIONS: &str = "preview-iterations";
/// Divergence threshold.
pub const THRESHOLD: &str = "threshold";
/// Worker count.
pub const THREADS: &str = "threads";
/// Bitmap row order.
pub const SCAN_ORDER: &str = "scan-order";
/// Bitmap carrier channel.
pub const CHANNEL: &str = "channel";
/// Left-lower corner of a headless export.
pub const LEFTLOWER: &str = "leftlower";
/// Right-upper corner of a headless export.
pub const RIGHTUPPER: &str = "rightupper";

/// Everything the front ends can be told on the command line.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Export destination.
    pub output: PathBuf,
    /// Export container.
    pub format: Format,
    /// Export columns.
    pub resolution: usize,
    /// Cap and threshold for exports.
    pub export: EscapeParams,
    /// Cap and threshold for the terminal preview.
    pub preview: EscapeParams,
    /// Maximum concurrent workers.
    pub threads: usize,
    /// Bitmap layout.
    pub bitmap: BitmapOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            output: PathBuf::from("b.bmp"),
            format: Format::Bitmap,
            resolution: 5000,
            export: EscapeParams::EXPORT,
            preview: EscapeParams::PREVIEW,
            threads: num_cpus::get(),
            bitmap: BitmapOptions::default(),
        }
    }
}

impl Settings {
    /// The arguments both binaries accept.
    pub fn args<'a, 'b>() -> Vec<Arg<'a, 'b>> {
        let max_threads = num_cpus::get() * 4;
        vec![
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("b.bmp")
                .help("Output file"),
            Arg::with_name(FORMAT)
                .long(FORMAT)
                .short("f")
                .takes_value(true)
                .default_value("bmp")
                .validator(|s| validate_parse::<Format>(&s))
                .help("Image format: bmp or pnm"),
            Arg::with_name(RESOLUTION)
                .long(RESOLUTION)
                .short("r")
                .takes_value(true)
                .default_value("5000")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        20_000,
                        "Could not parse resolution",
                        "Resolution must be between 1 and 20000",
                    )
                })
                .help("Width and height of exported images, in pixels"),
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("500")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        200_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 200000",
                    )
                })
                .help("Iteration cap for exported images"),
            Arg::with_name(PREVIEW_ITERATIONS)
                .long(PREVIEW_ITERATIONS)
                .short("p")
                .takes_value(true)
                .default_value("250")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        200_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 200000",
                    )
                })
                .help("Iteration cap for the terminal preview"),
            Arg::with_name(THRESHOLD)
                .long(THRESHOLD)
                .short("d")
                .takes_value(true)
                .default_value("3")
                .validator(|s| validate_threshold(&s))
                .help("Magnitude past which a point has escaped"),
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver (default: one per core)"),
            Arg::with_name(SCAN_ORDER)
                .long(SCAN_ORDER)
                .takes_value(true)
                .default_value("bottom-up")
                .validator(|s| validate_parse::<ScanOrder>(&s))
                .help("Bitmap row order: bottom-up or top-down"),
            Arg::with_name(CHANNEL)
                .long(CHANNEL)
                .takes_value(true)
                .default_value("blue")
                .validator(|s| validate_parse::<Channel>(&s))
                .help("Bitmap channel carrying the iteration count: blue, green or red"),
        ]
    }

    /// The corner arguments of the headless exporter.
    pub fn corner_args<'a, 'b>() -> Vec<Arg<'a, 'b>> {
        vec![
            Arg::with_name(LEFTLOWER)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2,-1.5")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the view"),
            Arg::with_name(RIGHTUPPER)
                .long(RIGHTUPPER)
                .short("u")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("1,1.5")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the view"),
        ]
    }

    /// Build settings from parsed arguments.  The validators have
    /// already run, so failures here only come from arguments that
    /// were never registered.
    pub fn from_matches(matches: &ArgMatches) -> Result<Settings, String> {
        let defaults = Settings::default();
        let threshold = value(matches, THRESHOLD, defaults.export.divergence_threshold)?;
        Ok(Settings {
            output: matches
                .value_of(OUTPUT)
                .map(PathBuf::from)
                .unwrap_or(defaults.output),
            format: value(matches, FORMAT, defaults.format)?,
            resolution: value(matches, RESOLUTION, defaults.resolution)?,
            export: EscapeParams::new(
                value(matches, ITERATIONS, defaults.export.iteration_cap)?,
                threshold,
            ),
            preview: EscapeParams::new(
                value(matches, PREVIEW_ITERATIONS, defaults.preview.iteration_cap)?,
                threshold,
            ),
            threads: value(matches, THREADS, defaults.threads)?,
            bitmap: BitmapOptions {
                scan_order: value(matches, SCAN_ORDER, defaults.bitmap.scan_order)?,
                channel: value(matches, CHANNEL, defaults.bitmap.channel)?,
            },
        })
    }

    /// The left-lower and right-upper corners of a headless export.
    pub fn corners(matches: &ArgMatches) -> Result<(Complex<f64>, Complex<f64>), String> {
        let corner = |name: &str| {
            matches
                .value_of(name)
                .and_then(parse_complex)
                .ok_or_else(|| format!("Error parsing {} point", name))
        };
        Ok((corner(LEFTLOWER)?, corner(RIGHTUPPER)?))
    }

    /// The export described by these settings.
    pub fn job(&self) -> ExportJob {
        ExportJob {
            path: &self.output,
            format: self.format,
            options: self.bitmap,
            resolution: self.resolution,
            params: self.export,
        }
    }
}

fn value<T: FromStr>(matches: &ArgMatches, name: &str, default: T) -> Result<T, String> {
    match matches.value_of(name) {
        None => Ok(default),
        Some(s) => T::from_str(s).map_err(|_| format!("Could not parse {} '{}'", name, s)),
    }
}
