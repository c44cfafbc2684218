// SPDX-License-Identifier: MIT OR Apache-2.0
pub use self::entry::{LogEntry, LogMeta};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec};
use thiserror::Error;

mod entry;

/// Installs [`Logger`] as the global logger.
///
/// This can be called only once per process.
pub fn init(level: LevelFilter, file: Option<&Path>) -> Result<(), LogError> {
    let file = match file {
        Some(path) => Some(File::create(path).map_err(LogError::CreateFile)?),
        None => None,
    };

    log::set_boxed_logger(Box::new(Logger::new(level, file))).map_err(LogError::SetLogger)?;
    log::set_max_level(level);

    Ok(())
}

/// Implementation of [`Log`] to write stderr and an optional file.
///
/// We use stderr here since stdout is reserved for the output of the program.
pub struct Logger {
    stderr: BufferWriter,
    file: Mutex<Option<BufWriter<File>>>,
    start_time: Instant,
    level: LevelFilter,
}

impl Logger {
    fn new(level: LevelFilter, file: Option<File>) -> Self {
        Self {
            stderr: BufferWriter::stderr(ColorChoice::Auto),
            file: Mutex::new(file.map(BufWriter::new)),
            start_time: Instant::now(),
            level,
        }
    }

    fn entry(&self, meta: LogMeta) -> LogEntry {
        LogEntry::new(self.stderr.buffer(), meta, self.start_time.elapsed())
    }

    fn write(&self, e: LogEntry) {
        let (colored, plain) = e.into_raw();

        // There is nowhere to report a failure of the logger itself.
        let _ = self.stderr.print(&colored);

        let mut f = self.file.lock().unwrap();

        if let Some(f) = f.as_mut() {
            let _ = f.write_all(&plain).and_then(|_| f.flush());
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // Setup meta.
        let mut color = ColorSpec::new();
        let category = match record.level() {
            Level::Error => {
                color.set_fg(Some(Color::Red)).set_bold(true);
                'E'
            }
            Level::Warn => {
                color.set_fg(Some(Color::Yellow)).set_bold(true);
                'W'
            }
            Level::Info => {
                color.set_fg(Some(Color::Cyan)).set_bold(true);
                'I'
            }
            Level::Debug => 'D',
            Level::Trace => 'T',
        };

        let meta = LogMeta {
            category,
            color,
            file: record.file(),
            line: record.line(),
        };

        // Write.
        let mut e = self.entry(meta);

        writeln!(e, "{}", record.args()).unwrap();

        self.write(e);
    }

    fn flush(&self) {
        if let Some(f) = self.file.lock().unwrap().as_mut() {
            let _ = f.flush();
        }
    }
}

/// Represents an error when [`init()`] fails.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("couldn't create log file")]
    CreateFile(#[source] std::io::Error),

    #[error("couldn't install logger")]
    SetLogger(#[source] SetLoggerError),
}
