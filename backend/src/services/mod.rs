//! Business logic services for the Soil Health Advisory Platform

pub mod advice_cache;
pub mod advisory;
pub mod pdf;
pub mod report_store;

pub use advice_cache::AdviceCache;
pub use advisory::AdvisoryService;
pub use pdf::PdfRenderer;
pub use report_store::ReportStore;
