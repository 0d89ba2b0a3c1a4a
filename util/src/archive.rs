//! Struct archiving functionality
//!
//! Archives are CSV files inside the session's archive directory, one row per
//! serialised record.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::path::Path;
use std::fs::{File, OpenOptions};
use csv::WriterBuilder;
pub use csv::Writer;
use serde::Serialize;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
///
/// A default constructed archiver has no file and refuses to serialise.
#[derive(Default)]
pub struct Archiver {
    writer: Option<Writer<File>>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session, path: P
    ) -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_file_path(session.arch_root.join(path))
    }

    /// Create a new archiver writing to the given file, which is created (or
    /// truncated) by this call.
    pub fn from_file_path<P: AsRef<Path>>(
        path: P
    ) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Create the file, then open it in append mode
        File::create(path.as_ref())?;
        let file = OpenOptions::new()
            .append(true)
            .open(path.as_ref())?;

        let w = WriterBuilder::new()
            .has_headers(true)
            .from_writer(file);

        Ok(Self {
            writer: Some(w)
        })
    }

    /// Serialise a record into the archive.
    pub fn serialise<T: Serialize>(
        &mut self, record: T
    ) -> Result<(), Box<dyn std::error::Error>> {
        match self.writer {
            Some(ref mut w) => {
                w.serialize(record)?;
                w.flush()?
            },
            None => return Err("Archiver has no open file".into())
        }

        Ok(())
    }

    /// Returns true if this archiver has an open file.
    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        time_s: f64,
        axis: &'static str,
    }

    #[test]
    fn test_archiver() {
        let path = std::env::temp_dir()
            .join(format!("util_archive_{}", std::process::id()))
            .join("rows.csv");

        let mut arch = Archiver::from_file_path(&path).unwrap();
        assert!(arch.is_open());
        arch.serialise(Row { time_s: 0.5, axis: "pan" }).unwrap();
        arch.serialise(Row { time_s: 1.0, axis: "tilt" }).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec!["time_s,axis", "0.5,pan", "1.0,tilt"]);

        let mut closed = Archiver::default();
        assert!(!closed.is_open());
        assert!(closed.serialise(Row { time_s: 0.0, axis: "pan" }).is_err());
    }
}
