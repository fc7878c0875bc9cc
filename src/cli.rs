// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Plumbing shared by the `newton` and `raycaster` front ends:
//! argument parsing in the shape `clap` validators want, strategy
//! selection, and log setup.

use std::str::FromStr;
use tracing_subscriber::EnvFilter;

use crate::parallel::Strategy;

/// Names accepted by [`strategy`].
pub const STRATEGIES: [&str; 2] = ["bands", "split"];

/// Splits `"800x600"` or `"-2.0,1.5"` at the first `separator` and
/// parses both halves.
pub fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    let mut halves = s.splitn(2, separator);
    let left = T::from_str(halves.next()?).ok()?;
    let right = T::from_str(halves.next()?).ok()?;
    Some((left, right))
}

/// A `clap` validator accepting whatever [`parse_pair`] accepts.
/// `what` names the argument in the error message.
pub fn pair_validator<T>(separator: char, what: &'static str) -> impl Fn(String) -> Result<(), String>
where
    T: FromStr + 'static,
{
    move |s| {
        parse_pair::<T>(&s, separator)
            .map(|_| ())
            .ok_or_else(|| format!("Could not parse {}", what))
    }
}

/// A `clap` validator accepting integers in `low..=high`.
pub fn bounded_validator(low: usize, high: usize, what: &'static str) -> impl Fn(String) -> Result<(), String> {
    move |s| match usize::from_str(&s) {
        Ok(n) if n >= low && n <= high => Ok(()),
        Ok(_) => Err(format!("{} must be between {} and {}", what, low, high)),
        Err(_) => Err(format!("Could not parse {}", what.to_lowercase())),
    }
}

/// The default strategy of the given name, `"bands"` or `"split"`,
/// running on `workers` threads.
pub fn strategy(name: &str, workers: usize) -> Option<Strategy> {
    let strategy = match name {
        "bands" => Strategy::fixed_bands(),
        "split" => Strategy::recursive_split(),
        _ => return None,
    };
    Some(strategy.with_workers(workers))
}

/// Logs to stderr, filtered by `RUST_LOG` and defaulting to `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
