//! adsr_cv - terminal scope for the envelope generator
//!
//! Run with: cargo run
//!
//! Logs go to stderr; redirect them (`2> adsr_cv.log`) to keep the scope clean.

mod app;
mod ui;

use adsr_cv::{engine::EngineConfig, io::PitchCv};
use app::CvScope;
use tracing::Level;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    CvScope::new(EngineConfig::default())
        .pitch(PitchCv::default())
        .note(60)
        .run()
}
