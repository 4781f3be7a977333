// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::{App, AppSettings, Arg};
use log::info;
use seamcarve::{
    interop, energy, verify, ComputeContext, Config, CostEngine, DeviceEngine, EnergyKernel,
    HostEngine, PixelFormat, SeamCarver,
};
use std::process::exit;

fn main() {
    let matches = App::new("seamcarve")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Content-aware image narrowing by seam carving")
        .setting(AppSettings::AllowNegativeNumbers)
        .arg(
            Arg::with_name("INPUT")
                .help("The image to carve")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .help("Where to write the result")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("COLS_TO_REMOVE")
                .help("How many columns to remove")
                .required(true)
                .allow_hyphen_values(true)
                .index(3),
        )
        .arg(
            Arg::with_name("host")
                .long("host")
                .help("Run the sequential host engine instead of the worker pool"),
        )
        .arg(
            Arg::with_name("mark")
                .long("mark")
                .help("Highlight the next seam instead of removing any columns"),
        )
        .arg(
            Arg::with_name("gray")
                .long("gray")
                .help("Carve a single-channel intensity image rather than RGBA"),
        )
        .arg(
            Arg::with_name("verify")
                .long("verify")
                .help("Cross-check every cost matrix against the host oracle"),
        )
        .arg(
            Arg::with_name("dump-energy")
                .long("dump-energy")
                .value_name("PATH")
                .takes_value(true)
                .help("Also write the first energy map as a gray image"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Multiple levels of verbosity (up to -vvvv)"),
        )
        .get_matches();

    stderrlog::new()
        .verbosity(matches.occurrences_of("verbose") as usize)
        .show_level(false)
        .color(stderrlog::ColorChoice::Never)
        .init()
        .unwrap();

    let cols: i64 = match matches.value_of("COLS_TO_REMOVE").unwrap().parse() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("COLS_TO_REMOVE must be an integer.");
            exit(1);
        }
    };

    if let Err(err) = run(&matches, cols.max(0) as usize) {
        eprintln!("seamcarve: {}", err);
        exit(1);
    }
}

fn run(matches: &clap::ArgMatches, cols: usize) -> Result<(), failure::Error> {
    let format = if matches.is_present("gray") {
        PixelFormat::I
    } else {
        PixelFormat::Rgba
    };
    let mut config = Config::new(format);
    if matches.is_present("verify") {
        config.verify_tolerance = Some(verify::DEFAULT_TOLERANCE);
    }

    let input = matches.value_of("INPUT").unwrap();
    let output = matches.value_of("OUTPUT").unwrap();
    let image = interop::decode(input, format)?;
    info!(
        "loaded {}: {} rows, {} pixel columns",
        input,
        image.height(),
        image.width() / format.depth()
    );

    if let Some(path) = matches.value_of("dump-energy") {
        let plane = energy::luma_plane(&image, format);
        let energy = EnergyKernel::default().convolve(&plane)?;
        interop::dump_energy(&energy, path)?;
        info!("energy map written to {}", path);
    }

    let engine: Box<dyn CostEngine> = if matches.is_present("host") {
        Box::new(HostEngine)
    } else {
        Box::new(DeviceEngine::new(ComputeContext::new()?))
    };
    let carver = SeamCarver::new(engine, config);

    let result = if matches.is_present("mark") {
        carver.mark(image)?
    } else {
        carver.carve(image, cols)?
    };
    interop::encode(&result, format, output)?;
    info!("wrote {}", output);
    Ok(())
}
