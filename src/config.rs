use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;

use crate::color::Rgb;
use crate::error::ConfigError;

pub const USAGE: &str = "\
fireworks - Fireworks display for the terminal

Usage: fireworks [OPTIONS]

Options:
  --bg-color RRGGBB  Set background color as hex (e.g., --bg-color 1a1b26)
  --seed N           Seed the random generator for a reproducible show
  --scale F          World units per pixel (default 4)
  --tick-rate N      Simulation ticks per second (default 120)
  --gravity F        Downward pull per tick (default 0.1)
  --log-file PATH    Write logs to PATH (filter with RUST_LOG)

Press 'q', ESC, or Ctrl+C to exit";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bg_color: Rgb,
    pub tick_rate: u32,
    pub scale: f32,
    pub gravity: f32,
    /// Share of the previous frame erased before each tick is drawn.
    pub trail_fade: f32,
    pub spawn_interval_ms: RangeInclusive<u32>,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bg_color: Rgb::BLACK,
            tick_rate: 120,
            scale: 4.0,
            gravity: 0.1,
            trail_fade: 0.575,
            spawn_interval_ms: 300..=600,
            seed: None,
            log_file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Config),
    Help,
}

impl Config {
    /// Parses command-line arguments, program name excluded.
    pub fn parse<I>(args: I) -> Result<Command, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut config = Config::default();
        let mut args = args.into_iter().map(Into::<String>::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bg-color" => config.bg_color = Rgb::from_hex(&value(&mut args, "--bg-color")?)?,
                "--seed" => config.seed = Some(parse_value(&mut args, "--seed")?),
                "--scale" => {
                    config.scale = parse_value(&mut args, "--scale")?;
                    if !(config.scale.is_finite() && config.scale > 0.0) {
                        return Err(out_of_range("--scale", "a positive number", config.scale));
                    }
                }
                "--tick-rate" => {
                    config.tick_rate = parse_value(&mut args, "--tick-rate")?;
                    if config.tick_rate == 0 {
                        return Err(out_of_range("--tick-rate", "at least 1", config.tick_rate));
                    }
                }
                "--gravity" => {
                    config.gravity = parse_value(&mut args, "--gravity")?;
                    // Rockets only burst at their apex, so gravity has to pull down.
                    if !(config.gravity.is_finite() && config.gravity > 0.0) {
                        return Err(out_of_range("--gravity", "a positive number", config.gravity));
                    }
                }
                "--log-file" => config.log_file = Some(PathBuf::from(value(&mut args, "--log-file")?)),
                "help" | "--help" | "-h" => return Ok(Command::Help),
                _ => return Err(ConfigError::UnknownOption(arg)),
            }
        }

        Ok(Command::Run(config))
    }
}

fn value(args: &mut impl Iterator<Item = String>, option: &'static str) -> Result<String, ConfigError> {
    args.next().ok_or(ConfigError::MissingValue(option))
}

fn parse_value<T: FromStr>(
    args: &mut impl Iterator<Item = String>,
    option: &'static str,
) -> Result<T, ConfigError> {
    let raw = value(args, option)?;
    raw.parse()
        .map_err(|_| ConfigError::InvalidValue { option, value: raw })
}

fn out_of_range(option: &'static str, expected: &'static str, value: impl ToString) -> ConfigError {
    ConfigError::OutOfRange {
        option,
        expected,
        value: value.to_string(),
    }
}
