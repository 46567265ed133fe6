//! Harness around `xml-tree`.
//!
//! - [`trace`] records notifications as readable lines
//! - [`report`] summarizes a recorded trace as text, markdown or JSON
//! - [`scenario`] replays the reference manipulation scenarios
//! - [`loader`], [`validator`] and [`transform`] are small reference
//!   implementations of the collaborator traits

pub mod loader;
pub mod report;
pub mod scenario;
pub mod trace;
pub mod transform;
pub mod validator;

pub use loader::JsonLoader;
pub use report::{TraceReport, TraceSummary};
pub use scenario::{ScenarioName, ScenarioOutcome};
pub use trace::{TraceEntry, TraceRecorder};
pub use transform::{FeedListStylesheet, FeedListTransform};
pub use validator::{ContentModel, ContentModelValidator, ElementRule};
