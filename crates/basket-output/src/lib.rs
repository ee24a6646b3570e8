#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/basket/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod frame;
pub mod schema;
pub mod table;

pub use export::{ExportError, ExportFormat, Exporter, artifact_path};
pub use frame::to_dataframe;
pub use schema::{Column, ColumnKind, Schema};
pub use table::{Cell, Table};
