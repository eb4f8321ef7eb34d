use log::{Level, Metadata, Record, SetLoggerError};
use std::fs::OpenOptions;
use std::io::Write;

struct FileLogger {
    file_path: String,
    level: Level,
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(mut file) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)
            {
                let _ = writeln!(
                    file,
                    "[{}] {}: {}",
                    record.level(),
                    record.target(),
                    record.args()
                );
            }
        }
    }

    fn flush(&self) {}
}

/// Appends compiler logs up to `level` to the file at `path`.
///
/// Fails if a logger is already installed.
pub fn init_logger(path: &str, level: Level) -> Result<(), SetLoggerError> {
    let logger = FileLogger {
        file_path: path.to_string(),
        level,
    };
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level.to_level_filter());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_compiler_logs_to_the_file() {
        let path = std::env::temp_dir().join(format!("tailor-log-{}.log", std::process::id()));
        let path = path.to_string_lossy().into_owned();
        init_logger(&path, Level::Debug).unwrap();
        assert!(init_logger(&path, Level::Debug).is_err());

        let compiler = tailor::compile("@tailwind utilities;", "", Default::default())
            .await
            .unwrap();
        compiler.build(["flex"]);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[DEBUG] tailor::compile: build: 1 of 1 candidates generated CSS"));
        let _ = std::fs::remove_file(&path);
    }
}
