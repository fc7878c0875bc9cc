// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate fracray;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use fracray::cli::{self, bounded_validator, pair_validator, parse_pair, STRATEGIES};
use fracray::output::{channels_to_rgb, write_image};
use fracray::raytracer::{Camera, LightSource, Material, Rgb, Scene, Sphere};
use fracray::{Point3, RayCaster, RenderRequest};
use std::str::FromStr;
use std::sync::atomic::AtomicBool;

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const THREADS: &str = "threads";
const STRATEGY: &str = "strategy";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("raycaster")
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("Sphere ray caster")
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
                .default_value("500x500")
                .validator(pair_validator::<u16>('x', "output image size"))
                .help("Size of output image"),
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
            Arg::with_name(STRATEGY)
                .required(false)
                .long(STRATEGY)
                .takes_value(true)
                .possible_values(&STRATEGIES)
                .default_value("split")
                .help("Fixed row bands on a thread pool, or recursive splitting"),
        )
        .get_matches()
}

/// Three spheres in a row along the line of sight, lit from two sides.
fn scene() -> Scene {
    let red = Material {
        diffuse: Rgb::new(1.0, 0.1, 0.1),
        reflective: Rgb::new(0.5, 0.5, 0.5),
        shininess: 10.0,
    };
    let green = Material {
        diffuse: Rgb::new(0.1, 1.0, 0.1),
        reflective: Rgb::new(0.4, 0.4, 0.4),
        shininess: 20.0,
    };
    let blue = Material {
        diffuse: Rgb::new(0.1, 0.1, 1.0),
        reflective: Rgb::new(0.8, 0.8, 0.8),
        shininess: 50.0,
    };
    Scene::new()
        .with_object(Sphere::new(Point3::new(0.0, 0.0, 0.0), 3.0, red))
        .with_object(Sphere::new(Point3::new(-4.0, 5.0, 2.0), 2.0, green))
        .with_object(Sphere::new(Point3::new(-6.0, -5.0, -3.0), 2.5, blue))
        .with_light(LightSource {
            position: Point3::new(10.0, 5.0, 5.0),
            color: Rgb::new(100.0, 100.0, 100.0),
        })
        .with_light(LightSource {
            position: Point3::new(8.0, -10.0, 8.0),
            color: Rgb::new(60.0, 60.0, 120.0),
        })
}

fn main() {
    cli::init_logging();

    let matches = args();
    let image_size: (usize, usize) =
        parse_pair(matches.value_of(SIZE).unwrap(), 'x').expect("Error parsing image dimensions");
    let threads =
        usize::from_str(matches.value_of(THREADS).unwrap()).expect("Could not parse thread count.");
    let strategy = cli::strategy(matches.value_of(STRATEGY).unwrap(), threads).expect("Unknown strategy");

    let camera = match Camera::new(
        Point3::new(10.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, 10.0),
        20.0,
        20.0,
        image_size.0,
        image_size.1,
    ) {
        Ok(camera) => camera,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let caster = RayCaster::new(scene(), strategy);
    let cancel = AtomicBool::new(false);
    let outfile = matches.value_of(OUTPUT).unwrap();
    let rendered = caster.produce(&RenderRequest::new(camera, 0, &cancel), |result| {
        if let Err(e) = write_image(outfile, &channels_to_rgb(&result), image_size) {
            eprintln!("Write failure: {}", e);
            std::process::exit(1);
        }
    });
    if let Err(e) = rendered {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
