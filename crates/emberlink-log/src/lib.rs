//! A background-thread, channel-backed `log::Log` implementation for the
//! `emberlink-demo` binary. Library crates in this workspace depend only on
//! the `log` facade; this concrete logger is wired up at the top of `main`.

use chrono::Local;
use log::{Level, Log, SetLoggerError, set_boxed_logger, set_max_level};
use std::io::{BufWriter, Stdout, Write, stdout};
use std::sync::mpsc;
use std::thread;

enum LogCommand {
    Record(String),
    Flush,
    Terminate,
}

pub struct EmberlinkLogger {
    max_level: Level,
    sender: mpsc::SyncSender<LogCommand>,
}

impl EmberlinkLogger {
    fn new(max_level: Level, buffer_size: usize) -> (Self, mpsc::Receiver<LogCommand>) {
        let (sender, receiver) = mpsc::sync_channel(buffer_size);
        (EmberlinkLogger { max_level, sender }, receiver)
    }

    /// Spawns the writer thread and installs `self` as the global logger.
    pub fn init(max_level: Level, buffer_size: usize) -> Result<(), SetLoggerError> {
        let (logger, receiver) = EmberlinkLogger::new(max_level, buffer_size);

        thread::Builder::new()
            .name("emberlink-log-writer".into())
            .spawn(move || writer_loop(receiver, BufWriter::new(stdout())))
            .expect("failed to spawn logger thread");

        set_boxed_logger(Box::new(logger))?;
        set_max_level(max_level.to_level_filter());
        Ok(())
    }
}

fn writer_loop(receiver: mpsc::Receiver<LogCommand>, mut writer: BufWriter<Stdout>) {
    while let Ok(command) = receiver.recv() {
        match command {
            LogCommand::Record(message) => {
                if let Err(e) = writer.write_all(message.as_bytes()) {
                    eprintln!("[EmberlinkLogger] failed to write log record: {e}");
                }
            }
            LogCommand::Flush => {
                if let Err(e) = writer.flush() {
                    eprintln!("[EmberlinkLogger] failed to flush log: {e}");
                }
            }
            LogCommand::Terminate => {
                let _ = writer.flush();
                break;
            }
        }
    }
    let _ = writer.flush();
}

impl Log for EmberlinkLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let now = Local::now();
        let message = format!(
            "{} {} [{}] {}\n",
            now.format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        );
        if let Err(e) = self.sender.try_send(LogCommand::Record(message)) {
            eprintln!("[EmberlinkLogger] failed to send log message: {e}");
        }
    }

    fn flush(&self) {
        let _ = self.sender.send(LogCommand::Flush);
    }
}

impl Drop for EmberlinkLogger {
    fn drop(&mut self) {
        let _ = self.sender.send(LogCommand::Terminate);
    }
}
