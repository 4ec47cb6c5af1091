pub mod convert_service;
pub mod ingest_service;
pub mod source_service;

pub use convert_service::{ConversionFailure, ConvertRequest, ConvertService};
pub use ingest_service::{IngestReport, IngestService, SourceFailure};
pub use source_service::SourceService;
