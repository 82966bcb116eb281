use std::{
  fs::File,
  io::{self, BufReader, BufWriter, Write},
  path::Path,
};

use libslutpris::prelude::*;
use serde::Serialize;

use crate::errors::AppError;

/// Document written at the end of a run.
#[derive(Serialize)]
pub(crate) struct Report<'r> {
  pub combined: &'r [CombinedRecord],
  pub groups: &'r [MatchGroup],
  pub summary: &'r Summary,
}

pub(crate) fn read_collection(path: &Path) -> Result<Vec<RawRecord>, AppError> {
  let file = File::open(path).map_err(AppError::io(path))?;
  let document: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;

  Ok(RawRecord::collection(document)?)
}

/// Write the report as pretty JSON to `path`, or to stdout.
pub(crate) fn write_report(path: Option<&Path>, report: &Report) -> Result<(), AppError> {
  match path {
    Some(path) => {
      let file = File::create(path).map_err(AppError::io(path))?;
      let mut writer = BufWriter::new(file);

      serde_json::to_writer_pretty(&mut writer, report)?;
      writer.flush().map_err(AppError::io(path))?;
    }

    None => {
      let mut stdout = io::stdout().lock();

      serde_json::to_writer_pretty(&mut stdout, report)?;
      writeln!(stdout).map_err(AppError::io("<stdout>"))?;
    }
  }

  Ok(())
}
