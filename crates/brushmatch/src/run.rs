use std::io::{BufRead, Write};

use libbrushmatch::prelude::*;
use serde::Serialize;

use crate::errors::AppError;

#[derive(Debug, Default, PartialEq)]
pub struct RunStats {
  pub inputs: usize,
  pub matched: usize,
  pub failed: usize,
}

#[derive(Serialize)]
struct Output<'i> {
  input: &'i str,
  #[serde(flatten)]
  resolution: Option<Resolution>,
  #[serde(skip_serializing_if = "Option::is_none")]
  error: Option<String>,
}

/// Resolve every non-blank input line, writing one JSON document per input.
///
/// An input that fails to resolve is reported in its own document and does
/// not stop the run. Only I/O errors do.
pub fn run(matcher: &BrushMatcher, input: impl BufRead, mut output: impl Write, pretty: bool) -> Result<RunStats, AppError> {
  let mut stats = RunStats::default();

  for line in input.lines() {
    let line = line.map_err(anyhow::Error::from)?;
    let text = line.trim();

    if text.is_empty() {
      continue;
    }

    stats.inputs += 1;

    let document = match matcher.resolve(text) {
      Ok(resolution) => {
        if resolution.best.is_some() {
          stats.matched += 1;
        }

        Output {
          input: text,
          resolution: Some(resolution),
          error: None,
        }
      }

      Err(err) => {
        let err = AppError::from(err);

        tracing::error!(input = text, error = %err, "could not resolve input");

        stats.failed += 1;

        Output {
          input: text,
          resolution: None,
          error: Some(err.to_string()),
        }
      }
    };

    let written = match pretty {
      true => serde_json::to_writer_pretty(&mut output, &document),
      false => serde_json::to_writer(&mut output, &document),
    };

    written.map_err(anyhow::Error::from)?;

    writeln!(output).map_err(anyhow::Error::from)?;
  }

  output.flush().map_err(anyhow::Error::from)?;

  Ok(stats)
}
