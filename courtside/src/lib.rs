//! Basketball season totals pipeline.
//!
//! Ties the collection, feature preparation, model comparison, charting and
//! reporting crates into one run with logging and progress reporting.
//!
//! ```rust,ignore
//! use courtside::{Pipeline, PipelineConfig, PipelineOutcome, init_logging};
//!
//! let config = PipelineConfig::default();
//! let _guard = init_logging("info", config.log_file.as_deref())?;
//! match Pipeline::builder().config(config).build()?.run()? {
//!     PipelineOutcome::Completed(summary) => println!("best: {:?}", summary.best_model),
//!     PipelineOutcome::Aborted { reason } => eprintln!("{reason}"),
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod progress;

pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use error::{PipelineError, Result};
pub use logging::init_logging;
pub use pipeline::{Pipeline, PipelineBuilder, PipelineOutcome, PipelineSummary};
pub use progress::{ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate};
