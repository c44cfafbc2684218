// SPDX-License-Identifier: MIT OR Apache-2.0
use std::io::Write;
use std::time::Duration;
use termcolor::{Buffer, ColorSpec, WriteColor};

/// An entry to log.
///
/// Each entry is written to both a colored buffer for the terminal and a plain buffer for the log
/// file.
pub struct LogEntry {
    colored: Buffer,
    plain: Vec<u8>,
}

impl LogEntry {
    pub(super) fn new(colored: Buffer, meta: LogMeta, time: Duration) -> Self {
        let mut e = Self {
            colored,
            plain: Vec::new(),
        };

        // Write meta line.
        e.colored.set_color(&meta.color).unwrap();
        e.write_meta(format_args!("++++++++++++++++++ {}", meta.category));
        e.write_meta(format_args!(" [{}]", format_time(time)));

        if let Some(file) = meta.file {
            e.write_meta(format_args!(": {file}"));

            if let Some(line) = meta.line {
                e.write_meta(format_args!(":{line}"));
            }
        }

        // The colored buffer always use \n so the message written by writeln! is consistent.
        e.colored.write_all(b"\n").unwrap();
        e.colored.reset().unwrap();
        e.plain.push(b'\n');

        e
    }

    pub fn into_raw(self) -> (Buffer, Vec<u8>) {
        (self.colored, self.plain)
    }

    fn write_meta(&mut self, args: std::fmt::Arguments) {
        self.colored.write_fmt(args).unwrap();
        self.plain.write_fmt(args).unwrap();
    }
}

impl Write for LogEntry {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.colored.write_all(buf)?;
        self.plain.write_all(buf)?;

        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Metadata of [`LogEntry`].
pub struct LogMeta<'a> {
    pub category: char,
    pub color: ColorSpec,
    pub file: Option<&'a str>,
    pub line: Option<u32>,
}

/// Formats `time` as `DD:HH:MM:SS:MMM`.
fn format_time(time: Duration) -> String {
    let mut ms = time.as_millis();
    let days = ms / 86400000;
    ms %= 86400000;

    let hr = ms / 3600000;
    ms %= 3600000;

    let min = ms / 60000;
    ms %= 60000;

    let sec = ms / 1000;
    ms %= 1000;

    format!("{days:02}:{hr:02}:{min:02}:{sec:02}:{ms:03}")
}
