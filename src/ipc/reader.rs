//! [`PayloadSource`] over any buffered reader, typically stdin.

use super::{forward_lines, SourceError};
use crate::traits::PayloadSource;
use log::info;
use std::io::{self, BufRead, BufReader};
use std::sync::mpsc;

/// Reads newline-delimited payloads until end of input.
pub struct ReaderSource<R> {
    reader: R,
}

impl ReaderSource<BufReader<io::Stdin>> {
    /// A source reading from the process's standard input.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }
}

impl<R: BufRead + Send> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead + Send> PayloadSource for ReaderSource<R> {
    type Error = SourceError;

    fn run(&mut self, sink: mpsc::Sender<String>) -> Result<(), SourceError> {
        forward_lines(&mut self.reader, &sink)?;
        info!("input exhausted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn forwards_non_blank_lines() {
        let input = "[]\n\n   \n[{\"name\":\"1\",\"output\":\"A\"}]\n";
        let mut src = ReaderSource::new(Cursor::new(input));
        let (tx, rx) = mpsc::channel();
        src.run(tx).unwrap();
        let got: Vec<String> = rx.try_iter().collect();
        assert_eq!(got, ["[]", r#"[{"name":"1","output":"A"}]"#]);
    }

    #[test]
    fn last_line_without_newline() {
        let mut src = ReaderSource::new(Cursor::new("[]"));
        let (tx, rx) = mpsc::channel();
        src.run(tx).unwrap();
        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn stops_when_sink_is_dropped() {
        let mut src = ReaderSource::new(Cursor::new("[]\n[]\n"));
        let (tx, rx) = mpsc::channel();
        drop(rx);
        assert!(src.run(tx).is_ok());
    }
}
