//! Shared test utilities for texnorm integration tests.
//!
//! The `TestHarness` struct provides an isolated environment for
//! exercising the normalization pipeline and batch coordinator:
//! temporary scratch/data directories, an in-memory record store, and
//! zip fixture helpers.

#![allow(dead_code)]

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use zip::write::SimpleFileOptions;

use texnorm::pipeline::{NoopProgress, Pipeline, PipelineConfig, PipelineContext};
use texnorm::store::{MemoryStore, RecordId, ZIP_CONTENT_TYPE};
use texnorm::worker::{Job, JobResult};

/// Installs a tracing subscriber for test output, bridging `log`
/// records into it. Safe to call from every test; only the first call
/// wins.
pub fn init_test_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_log::LogTracer::init();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// Isolated execution environment for integration tests.
pub struct TestHarness {
    /// Holds the scratch and data directories alive for the test.
    temp_dir: TempDir,
    /// Scratch directory for working trees and candidate archives.
    pub scratch_dir: PathBuf,
    /// Directory holding the archives under test.
    pub data_dir: PathBuf,
    pub config: Arc<PipelineConfig>,
    pub store: Arc<MemoryStore>,
}

impl TestHarness {
    pub fn new() -> Self {
        init_test_logging();
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let scratch_dir = temp_dir.path().join("scratch");
        let data_dir = temp_dir.path().join("data");
        std::fs::create_dir_all(&scratch_dir).expect("Failed to create scratch dir");
        std::fs::create_dir_all(&data_dir).expect("Failed to create data dir");

        let config = Arc::new(PipelineConfig {
            temp_directory: scratch_dir.clone(),
            tag: "renamed".to_string(),
            archive_marker: "Tex_Source.zip".to_string(),
        });

        Self {
            temp_dir,
            scratch_dir,
            data_dir,
            config,
            store: Arc::new(MemoryStore::new()),
        }
    }

    /// Writes a zip archive under the data directory and registers it
    /// in the store as an archive-bearing attachment record.
    pub fn insert_archive(&self, id: &str, entries: &[(&str, &str)]) -> (RecordId, PathBuf) {
        let path = self.data_dir.join(format!("{}.zip", id));
        write_zip(&path, entries);
        let record_id =
            self.store
                .insert_attachment(id, "Tex_Source.zip", ZIP_CONTENT_TYPE, Some(path.clone()));
        (record_id, path)
    }

    /// Runs the pipeline once for the given record and archive.
    pub fn run_pipeline(&self, record_id: RecordId, archive_path: PathBuf) -> JobResult {
        let pipeline = Pipeline::new(Arc::clone(&self.config), self.store.clone());
        let job = Job::new(record_id, archive_path);
        let (result, _ctx) = pipeline.run(PipelineContext::new(job), &NoopProgress);
        result
    }

    /// True when no working trees or candidate archives are left over.
    pub fn scratch_is_empty(&self) -> bool {
        std::fs::read_dir(&self.scratch_dir)
            .expect("scratch dir readable")
            .next()
            .is_none()
    }
}

pub fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).expect("Failed to create zip file");
    let mut writer = zip::ZipWriter::new(file);
    for (name, content) in entries {
        writer
            .start_file(name.to_string(), SimpleFileOptions::default())
            .expect("Failed to start zip entry");
        writer
            .write_all(content.as_bytes())
            .expect("Failed to write zip entry");
    }
    writer.finish().expect("Failed to finish zip");
}

/// Reads all entries of a zip archive as (name, content), sorted by
/// name.
pub fn read_zip(path: &Path) -> Vec<(String, String)> {
    let file = File::open(path).expect("Failed to open zip file");
    let mut archive = zip::ZipArchive::new(file).expect("Failed to read zip");
    let mut out = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).expect("Failed to read zip entry");
        let mut content = String::new();
        entry
            .read_to_string(&mut content)
            .expect("Failed to read entry content");
        out.push((entry.name().to_string(), content));
    }
    out.sort();
    out
}
