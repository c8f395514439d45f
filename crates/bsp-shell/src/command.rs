//! Parsing of shell command lines.

use solid_bsp::{point, BspError, Point, Rational};
use thiserror::Error;

/// Errors reported back to the shell user.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`; use `h` for help")]
    Unknown(String),

    #[error("invalid input!\nusage: {0}")]
    Usage(&'static str),

    #[error("`{0}` is not a number")]
    InvalidNumber(String),

    #[error("cannot find id={0}")]
    UnknownId(u64),

    #[error(transparent)]
    Bsp(#[from] BspError),
}

pub const NEW_USAGE: &str = "new h w d  (h, w, d - number of unit cubes along x, y, z)";
pub const CUBE_USAGE: &str = "cube x y z [dx dy dz]  (minimum corner and size, default 1 1 1)";
pub const LOCATE_USAGE: &str = "loc x y z";
pub const REMOVE_USAGE: &str = "rm id";

/// One parsed shell command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Quit,
    /// Build a fresh tree from an `h × w × d` lattice of unit cubes.
    New { h: u32, w: u32, d: u32 },
    /// Insert an axis-aligned box.
    Cube { min: Point, size: [Rational; 3] },
    Locate(Point),
    Remove(u64),
    Print,
    Clear,
    List,
}

impl Command {
    /// Parses a non-empty command line.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Unknown`] for an unrecognised command word and
    /// [`CommandError::Usage`] when the arguments do not fit the command.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandError::Unknown(String::new()));
        };
        let args: Vec<&str> = words.collect();

        match name {
            "h" => Ok(Self::Help),
            "q" => Ok(Self::Quit),
            "out" => Ok(Self::Print),
            "cl" => Ok(Self::Clear),
            "ls" => Ok(Self::List),
            "new" => {
                let [h, w, d] = args[..] else {
                    return Err(CommandError::Usage(NEW_USAGE));
                };
                let count = |s: &str| s.parse::<u32>().map_err(|_| CommandError::Usage(NEW_USAGE));
                Ok(Self::New {
                    h: count(h)?,
                    w: count(w)?,
                    d: count(d)?,
                })
            }
            "cube" => match args[..] {
                [x, y, z] => Ok(Self::Cube {
                    min: parse_point(x, y, z)?,
                    size: [Rational::from(1), Rational::from(1), Rational::from(1)],
                }),
                [x, y, z, dx, dy, dz] => Ok(Self::Cube {
                    min: parse_point(x, y, z)?,
                    size: [parse_rational(dx)?, parse_rational(dy)?, parse_rational(dz)?],
                }),
                _ => Err(CommandError::Usage(CUBE_USAGE)),
            },
            "loc" => {
                let [x, y, z] = args[..] else {
                    return Err(CommandError::Usage(LOCATE_USAGE));
                };
                Ok(Self::Locate(parse_point(x, y, z)?))
            }
            "rm" => {
                let [id] = args[..] else {
                    return Err(CommandError::Usage(REMOVE_USAGE));
                };
                let id = id.parse().map_err(|_| CommandError::Usage(REMOVE_USAGE))?;
                Ok(Self::Remove(id))
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_point(x: &str, y: &str, z: &str) -> Result<Point, CommandError> {
    Ok(point(parse_rational(x)?, parse_rational(y)?, parse_rational(z)?))
}

/// Parses an integer, a fraction (`3/4`) or a decimal (`0.75`) exactly.
pub fn parse_rational(token: &str) -> Result<Rational, CommandError> {
    let invalid = || CommandError::InvalidNumber(token.to_string());

    let exact = match token.split_once('.') {
        Some((whole, fraction)) => {
            if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            let denominator = format!("1{}", "0".repeat(fraction.len()));
            format!("{whole}{fraction}/{denominator}")
        }
        None => token.to_string(),
    };

    exact.parse::<Rational>().map_err(|_| invalid())
}
