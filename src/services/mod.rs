pub mod agreement_service;
pub mod dashboard_service;
pub mod document_service;
pub mod modification_service;
pub mod reference_service;

pub use agreement_service::*;
pub use dashboard_service::*;
pub use document_service::*;
pub use modification_service::*;
pub use reference_service::*;
