//! # Graphene Catalog
//!
//! 患者压力数据文件的目录扫描与汇总，以及人员档案登记。

pub mod catalog;
pub mod registry;

pub use catalog::PatientFileCatalog;
pub use registry::RecordRegistry;
