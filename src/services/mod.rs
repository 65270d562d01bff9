pub mod report_exporter;
pub mod selection_store;

pub use report_exporter::{DirectorySink, DownloadSink, ReportExporter};
pub use selection_store::SelectionStore;
