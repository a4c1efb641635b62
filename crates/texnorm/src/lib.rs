pub mod archive;
pub mod batch;
pub mod classify;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod rename;
pub mod scheme;
pub mod store;
pub mod transaction;
pub mod worker;

pub use batch::{BatchCoordinator, BatchReporter, BatchStatus, BatchSummary};
pub use config::{load_config, Config};
pub use error::{
    ConfigError, ExtractError, PackageError, RenameError, Result, StoreError, TexnormError,
    TransactionError, WorkerError,
};
pub use pipeline::{Pipeline, PipelineConfig, PipelineContext};
pub use store::{MemoryStore, Record, RecordId, RecordKind, RecordStore};
pub use worker::{Job, JobResult, WorkerPool};
