//! scholar
//!
//! Query a scientist roster XML document with interchangeable strategies.
//!
//! # Usage
//!
//! ```bash
//! scholar attributes roster.xml
//! scholar search roster.xml -c Faculty=Physics -c Rank=Professor [--html] [--export-dir DIR]
//! scholar compare roster.xml -c DegreeType=PhD --format json
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (`--config`)
//! 3. Environment variables (SCHOLAR_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use scholar_cli::{run, Cli};

fn main() -> Result<()> {
    run(Cli::parse())
}
