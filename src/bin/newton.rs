// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate fracray;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use fracray::cli::{self, bounded_validator, pair_validator, parse_pair, STRATEGIES};
use fracray::output::{fractal_to_rgb, write_image};
use fracray::{Complex, NewtonConfig, NewtonRenderer, RenderRequest, RootedPolynomial, Viewport};
use std::str::FromStr;
use std::sync::atomic::AtomicBool;

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const STRATEGY: &str = "strategy";
const ROOT: &str = "root";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("newton")
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("Newton-Raphson fractal renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file (binary PPM)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(pair_validator::<u16>('x', "output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .required(false)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.0,-1.5")
                .validator(pair_validator::<f64>(',', "left lower corner"))
                .help("Left lower corner of the complex window, as re,im"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .required(false)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("2.0,1.5")
                .validator(pair_validator::<f64>(',', "right upper corner"))
                .help("Right upper corner of the complex window, as re,im"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(bounded_validator(1, max_threads, "Thread count"))
                .help("Number of threads to use in solver"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("256")
                .validator(bounded_validator(1, 100_000, "Iteration count"))
                .help("Maximum number of Newton steps per pixel"),
        )
        .arg(
            Arg::with_name(STRATEGY)
                .required(false)
                .long(STRATEGY)
                .takes_value(true)
                .possible_values(&STRATEGIES)
                .default_value("bands")
                .help("Fixed row bands on a thread pool, or recursive splitting"),
        )
        .arg(
            Arg::with_name(ROOT)
                .required(false)
                .long(ROOT)
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .allow_hyphen_values(true)
                .validator(|s| {
                    Complex::from_str(&s)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .help("A root of the polynomial, e.g. 1, -i or 0.5-2i; give at least two (default 1, -1, i, -i)"),
        )
        .get_matches()
}

fn main() {
    cli::init_logging();

    let matches = args();
    let image_size: (usize, usize) =
        parse_pair(matches.value_of(SIZE).unwrap(), 'x').expect("Error parsing image dimensions");
    let leftlower: (f64, f64) = parse_pair(matches.value_of(LEFTLOWER).unwrap(), ',')
        .expect("Error parsing left lower point");
    let rightupper: (f64, f64) = parse_pair(matches.value_of(RIGHTUPPER).unwrap(), ',')
        .expect("Error parsing right upper point");
    let threads =
        usize::from_str(matches.value_of(THREADS).unwrap()).expect("Could not parse thread count.");
    let iterations = usize::from_str(matches.value_of(ITERATIONS).unwrap())
        .expect("Could not parse iteration count.");
    let strategy = cli::strategy(matches.value_of(STRATEGY).unwrap(), threads).expect("Unknown strategy");

    let roots: Vec<Complex> = match matches.values_of(ROOT) {
        Some(values) => values
            .map(|s| Complex::from_str(s).expect("Could not parse root"))
            .collect(),
        None => vec![Complex::ONE, Complex::ONE_NEG, Complex::IM, Complex::IM_NEG],
    };
    if roots.len() < 2 {
        eprintln!("At least two roots are needed");
        std::process::exit(1);
    }

    let viewport = match Viewport::new(
        leftlower.0,
        rightupper.0,
        leftlower.1,
        rightupper.1,
        image_size.0,
        image_size.1,
    ) {
        Ok(viewport) => viewport,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let config = NewtonConfig {
        max_iterations: iterations,
        ..NewtonConfig::default()
    };
    let renderer = NewtonRenderer::new(RootedPolynomial::new(Complex::ONE, roots), config, strategy)
        .unwrap_or_else(|e| {
            eprintln!("{}", e);
            std::process::exit(1);
        });
    println!("Rendering {}", renderer.rooted());

    let cancel = AtomicBool::new(false);
    let outfile = matches.value_of(OUTPUT).unwrap();
    let rendered = renderer.produce(&RenderRequest::new(viewport, 0, &cancel), |result| {
        if let Err(e) = write_image(outfile, &fractal_to_rgb(&result), image_size) {
            eprintln!("Write failure: {}", e);
            std::process::exit(1);
        }
    });
    if let Err(e) = rendered {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
