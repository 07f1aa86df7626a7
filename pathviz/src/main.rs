//! Pathviz terminal entry point.

use std::fs::File;
use std::io::{BufWriter, Write};

use tilegrid_core::app::{App, AppConfig};
use tilegrid_crossterm::CrosstermDriver;

use pathviz_lib::{Config, VizModel};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_args(std::env::args().skip(1))?;
    let model = VizModel::new(&config)?;
    let driver = CrosstermDriver::new();

    let frame_writer: Option<Box<dyn Write>> = match &config.record_path {
        Some(path) => Some(Box::new(BufWriter::new(File::create(path)?))),
        None => None,
    };

    let mut app = App::new(AppConfig {
        model,
        driver,
        width: config.columns,
        height: config.rows,
        frame_writer,
    });
    app.run()?;
    Ok(())
}
