//! Startup configuration.

use std::fmt;
use std::path::PathBuf;

/// Default window size in pixels.
pub const WINDOW_WIDTH: i32 = 500;
pub const WINDOW_HEIGHT: i32 = 500;
/// Default grid dimensions.
pub const COLUMNS: i32 = 25;
pub const ROWS: i32 = 25;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Fatal startup configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Malformed or non-positive grid dimensions.
    BadDimensions(String),
    /// An argument this program does not understand.
    UnknownArgument(String),
    /// A flag was given without its value.
    MissingValue(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadDimensions(s) => write!(f, "invalid grid dimensions: {s}"),
            Self::UnknownArgument(s) => write!(f, "unknown argument: {s}"),
            Self::MissingValue(flag) => write!(f, "missing value for {flag}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Runtime configuration, parsed from the command line.
///
/// Usage: `pathviz [COLUMNSxROWS] [--record FILE]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub columns: i32,
    pub rows: i32,
    pub window_width: i32,
    pub window_height: i32,
    /// When set, every frame is appended to this file for later replay.
    pub record_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: COLUMNS,
            rows: ROWS,
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            record_path: None,
        }
    }
}

impl Config {
    /// Parse configuration from process arguments (without the program
    /// name).
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--record" => {
                    let Some(path) = args.next() else {
                        return Err(ConfigError::MissingValue("--record"));
                    };
                    config.record_path = Some(PathBuf::from(path));
                }
                s if !s.starts_with('-') => {
                    let (columns, rows) = parse_dimensions(s)?;
                    config.columns = columns;
                    config.rows = rows;
                }
                other => return Err(ConfigError::UnknownArgument(other.to_string())),
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.columns <= 0 || self.rows <= 0 {
            return Err(ConfigError::BadDimensions(format!(
                "{}x{}",
                self.columns, self.rows
            )));
        }
        // Each cell must cover at least one pixel.
        if self.window_width / self.columns <= 0 || self.window_height / self.rows <= 0 {
            return Err(ConfigError::BadDimensions(format!(
                "{}x{} does not fit a {}x{} window",
                self.columns, self.rows, self.window_width, self.window_height
            )));
        }
        Ok(())
    }

    /// Pixel width of one cell.
    #[inline]
    pub fn cell_width(&self) -> i32 {
        self.window_width / self.columns
    }

    /// Pixel height of one cell.
    #[inline]
    pub fn cell_height(&self) -> i32 {
        self.window_height / self.rows
    }
}

fn parse_dimensions(s: &str) -> Result<(i32, i32), ConfigError> {
    let bad = || ConfigError::BadDimensions(s.to_string());
    let (c, r) = s.split_once('x').ok_or_else(bad)?;
    let columns: i32 = c.parse().map_err(|_| bad())?;
    let rows: i32 = r.parse().map_err(|_| bad())?;
    if columns <= 0 || rows <= 0 {
        return Err(bad());
    }
    Ok((columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn defaults() {
        let c = Config::from_args(args(&[])).unwrap();
        assert_eq!(c, Config::default());
        assert_eq!(c.cell_width(), 20);
        assert_eq!(c.cell_height(), 20);
    }

    #[test]
    fn explicit_dimensions() {
        let c = Config::from_args(args(&["10x20"])).unwrap();
        assert_eq!((c.columns, c.rows), (10, 20));
    }

    #[test]
    fn record_flag() {
        let c = Config::from_args(args(&["--record", "run.bin"])).unwrap();
        assert_eq!(c.record_path, Some(PathBuf::from("run.bin")));
        assert!(matches!(
            Config::from_args(args(&["--record"])),
            Err(ConfigError::MissingValue("--record"))
        ));
    }

    #[test]
    fn rejects_bad_dimensions() {
        for bad in ["0x5", "5x0", "-1x5", "5", "ax5", "5x"] {
            assert!(
                matches!(
                    Config::from_args(args(&[bad])),
                    Err(ConfigError::BadDimensions(_))
                ),
                "{bad} should be rejected"
            );
        }
        // More cells than pixels cannot be drawn.
        assert!(Config::from_args(args(&["1000x1000"])).is_err());
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(matches!(
            Config::from_args(args(&["--frobnicate"])),
            Err(ConfigError::UnknownArgument(_))
        ));
    }
}
