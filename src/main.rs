//! # gallery-builder CLI
//!
//! Command-line interface for the gallery build engine.
//!
//! ## Usage
//! ```bash
//! gallery-builder extract albums/2024-trip/photo.jpg
//! gallery-builder build ~/Photos --config config.json
//! ```

mod cli;

use gallery_builder::Result;

fn main() -> Result<()> {
    cli::run()
}
