use std::{
  io,
  sync::{Arc, Mutex, MutexGuard},
};

/// Shared view over the lines written to a [`CapturedLogs`].
#[derive(Clone, Debug, Default)]
pub(super) struct LogLines(Arc<Mutex<Vec<String>>>);

impl LogLines {
  pub(super) fn lines(&self) -> MutexGuard<'_, Vec<String>> {
    self.0.lock().unwrap()
  }

  /// Whether a single line contains every one of `needles`.
  pub(super) fn any_with(&self, needles: &[&str]) -> bool {
    self.lines().iter().any(|line| needles.iter().all(|needle| line.contains(needle)))
  }
}

/// Log sink splitting its input into lines, handed to the non-blocking
/// appender which then owns it.
#[derive(Debug)]
pub(super) struct CapturedLogs {
  partial: Vec<u8>,
  lines: LogLines,
}

impl CapturedLogs {
  pub(super) fn new() -> (CapturedLogs, LogLines) {
    let lines = LogLines::default();

    (
      CapturedLogs {
        partial: Vec::new(),
        lines: lines.clone(),
      },
      lines,
    )
  }

  fn push(&self, bytes: &[u8]) {
    let line = String::from_utf8_lossy(bytes);

    self.lines.lines().push(line.trim_end().to_string());
  }
}

impl io::Write for CapturedLogs {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.partial.extend_from_slice(buf);

    if let Some(last) = self.partial.iter().rposition(|&b| b == b'\n') {
      let complete = self.partial.drain(..=last).collect::<Vec<u8>>();

      for line in complete.split(|&b| b == b'\n').filter(|line| !line.is_empty()) {
        self.push(line);
      }
    }

    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

// The appender drops its writer once its guard is gone, keep whatever was
// left without a trailing newline.
impl Drop for CapturedLogs {
  fn drop(&mut self) {
    if !self.partial.is_empty() {
      let partial = std::mem::take(&mut self.partial);

      self.push(&partial);
    }
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::CapturedLogs;

  #[test]
  fn split_lines() {
    let (mut sink, lines) = CapturedLogs::new();

    sink.write_all(b"first line\nsecond ").unwrap();
    sink.write_all(b"line\n\nthird").unwrap();

    assert_eq!(*lines.lines(), ["first line", "second line"]);

    drop(sink);

    assert_eq!(*lines.lines(), ["first line", "second line", "third"]);
    assert!(lines.any_with(&["second", "line"]));
    assert!(!lines.any_with(&["first", "third"]));
  }
}
