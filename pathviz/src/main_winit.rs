//! Pathviz graphical (winit + softbuffer) entry point.

use std::fs::File;
use std::io::BufWriter;

use tilegrid_core::app::{AppRunner, EventLoopDriver};
use tilegrid_winit::{WinitConfig, WinitDriver};

use pathviz_lib::{Config, TITLE, VizModel, colors};

fn main() {
    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    let model = match VizModel::new(&config) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    let driver = WinitDriver::new(WinitConfig {
        title: TITLE.into(),
        cell_width: config.cell_width() as u32,
        cell_height: config.cell_height() as u32,
        grid_width: config.columns,
        grid_height: config.rows,
        gap_color: colors::GRID,
    });

    let mut runner = AppRunner::new(Box::new(model), config.columns, config.rows);
    if let Some(path) = &config.record_path {
        match File::create(path) {
            Ok(file) => {
                runner = runner.with_frame_writer(Box::new(BufWriter::new(file)));
            }
            Err(e) => {
                eprintln!("Error: cannot record to {}: {e}", path.display());
                std::process::exit(2);
            }
        }
    }

    if let Err(e) = driver.run(runner) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
