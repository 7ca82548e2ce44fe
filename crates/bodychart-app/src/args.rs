//! Command-line arguments.

use crate::error::{AppError, AppResult};
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: bodychart --out <PNG> [OPTIONS]

Options:
  --background <FILE>    Reference body chart image (PNG or JPEG)
  --saved <FILE>         Previously-saved drawing (PNG bytes or data URL)
  --script <FILE>        JSON session script to replay
  --config <FILE>        Surface configuration (JSON)
  --store-dir <DIR>      Drawing store directory
  --chart-entry <ID>     Chart entry the drawing belongs to
  --out <PNG>            Where to write the flattened drawing
  -h, --help             Print this help

Set RUST_LOG to change the log level (default: info).";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    pub background: Option<PathBuf>,
    pub saved: Option<PathBuf>,
    pub script: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub store_dir: Option<PathBuf>,
    pub chart_entry: Option<String>,
    pub out: PathBuf,
}

impl Args {
    /// Parse arguments (without the program name).
    pub fn parse<I>(args: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Args::default();
        let mut out = None;
        let mut args = args.into_iter();

        while let Some(flag) = args.next() {
            if flag == "-h" || flag == "--help" {
                return Err(AppError::Help);
            }
            let mut value = || {
                args.next()
                    .ok_or_else(|| AppError::Usage(format!("{} needs a value", flag)))
            };
            match flag.as_str() {
                "--background" => parsed.background = Some(value()?.into()),
                "--saved" => parsed.saved = Some(value()?.into()),
                "--script" => parsed.script = Some(value()?.into()),
                "--config" => parsed.config = Some(value()?.into()),
                "--store-dir" => parsed.store_dir = Some(value()?.into()),
                "--chart-entry" => parsed.chart_entry = Some(value()?),
                "--out" => out = Some(PathBuf::from(value()?)),
                other => return Err(AppError::Usage(format!("Unknown argument '{}'", other))),
            }
        }

        parsed.out = out.ok_or_else(|| AppError::Usage("--out is required".to_string()))?;
        if parsed.store_dir.is_some() && parsed.chart_entry.is_none() {
            return Err(AppError::Usage("--store-dir needs --chart-entry".to_string()));
        }
        Ok(parsed)
    }
}
