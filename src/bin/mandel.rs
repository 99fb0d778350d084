// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate failure;
extern crate image;
#[macro_use]
extern crate log;
extern crate mandelbrot;

use clap::{App, Arg, ArgMatches};
use failure::Error;
use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use mandelbrot::{PixelField, RenderConfig, Renderer};
use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

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

fn validate_escape(s: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(()),
        Ok(_) => Err("Escape radius squared must be a positive number".to_string()),
        Err(_) => Err("Could not parse escape radius squared".to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const DEPTH: &str = "depth";
const ESCAPE: &str = "escape";
const THREADS: &str = "threads";

const MAX_THREADS: usize = 1024;

fn args<'a>() -> ArgMatches<'a> {
    App::new("mandel")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Smoothed Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(false)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("out.ppm")
                .help("Output file; .png writes a PNG, anything else a binary PPM"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        16384,
                        "Could not parse image size",
                        "Image size must be between 1 and 16384",
                    )
                })
                .help("Pixels along each side of the square image"),
        )
        .arg(
            Arg::with_name(DEPTH)
                .required(false)
                .long(DEPTH)
                .short("d")
                .takes_value(true)
                .default_value("200")
                .validator(|s| {
                    validate_range(
                        &s,
                        0,
                        1_000_000,
                        "Could not parse iteration depth",
                        "Iteration depth must be between 0 and 1000000",
                    )
                })
                .help("Maximum number of iterations per point"),
        )
        .arg(
            Arg::with_name(ESCAPE)
                .required(false)
                .long(ESCAPE)
                .short("e")
                .takes_value(true)
                .default_value("400.0")
                .validator(|s| validate_escape(&s))
                .help("Square of the escape radius"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        MAX_THREADS,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", MAX_THREADS),
                    )
                })
                .help("Number of threads to use in solver (default: one per CPU)"),
        )
        .get_matches()
}

fn config(matches: &ArgMatches) -> Result<RenderConfig, Error> {
    let mut config = RenderConfig::default();
    if let Some(size) = matches.value_of(SIZE) {
        config.size = usize::from_str(size)?;
    }
    if let Some(depth) = matches.value_of(DEPTH) {
        config.depth = usize::from_str(depth)?;
    }
    if let Some(escape) = matches.value_of(ESCAPE) {
        config.escape2 = f64::from_str(escape)?;
    }
    if let Some(threads) = matches.value_of(THREADS) {
        config.workers = usize::from_str(threads)?;
    }
    Ok(config)
}

fn write_image(outfile: &str, pixels: &PixelField) -> Result<(), Error> {
    let path = Path::new(outfile);
    let rgb = pixels.to_rgb();
    let side = pixels.size() as u32;
    let is_png = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false);

    if is_png {
        image::save_buffer(path, &rgb, side, side, ColorType::RGB(8))?;
    } else {
        let output = File::create(&path)?;
        let mut encoder =
            PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
        encoder.encode(&rgb[..], side, side, ColorType::RGB(8))?;
    }
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let config = config(matches)?;
    info!(
        "{0}x{0}, depth {1}, escape2 {2}, {3} threads",
        config.size, config.depth, config.escape2, config.workers
    );
    let renderer = Renderer::new(config)?;

    let start = Instant::now();
    let pixels = renderer.render()?;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    info!("render finished in {:.3} ms", elapsed_ms);
    println!("Elapsed: {:.3} ms", elapsed_ms);

    let outfile = matches.value_of(OUTPUT).unwrap_or("out.ppm");
    write_image(outfile, &pixels)?;
    info!("wrote {}", outfile);
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
