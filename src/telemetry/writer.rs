//! CSV telemetry recorder.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::TelemetrySample;

/// Column order of the output file. Consumers key on these names, so they
/// are part of the format.
pub const CSV_HEADER: [&str; 11] = [
    "Time",
    "Velocity",
    "Target Velocity",
    "Throttle",
    "Brake",
    "AccX",
    "AccY",
    "AccZ",
    "GyroX",
    "GyroY",
    "GyroZ",
];

/// Summary of a finished recording.
#[derive(Debug, Clone)]
pub struct RecordingInfo {
    pub path: PathBuf,
    pub rows: u64,
}

/// Buffered CSV writer with the fixed telemetry header.
pub struct CsvRecorder {
    writer: BufWriter<File>,
    path: PathBuf,
    rows: u64,
}

impl CsvRecorder {
    /// Create (or truncate) the output file and write the header row.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", CSV_HEADER.join(","))?;
        Ok(Self {
            writer,
            path,
            rows: 0,
        })
    }

    /// Append one sample row.
    pub fn record(&mut self, sample: &TelemetrySample) -> io::Result<()> {
        let a = &sample.imu.accel;
        let g = &sample.imu.gyro;
        writeln!(
            self.writer,
            "{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
            sample.time,
            sample.speed_kmh,
            sample.target_speed_kmh,
            sample.throttle,
            sample.brake,
            a[0],
            a[1],
            a[2],
            g[0],
            g[1],
            g[2],
        )?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flush and close, returning the recording summary.
    pub fn finish(mut self) -> io::Result<RecordingInfo> {
        self.writer.flush()?;
        Ok(RecordingInfo {
            path: self.path,
            rows: self.rows,
        })
    }
}
