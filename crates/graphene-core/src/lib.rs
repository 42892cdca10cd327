//! # Graphene Core
//!
//! GrapheneTrace系统的核心模块，提供压力网格解析、指标计算、
//! 配置管理与通用工具。

pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod summary;
pub mod utils;

pub use error::{GrapheneError, Result};
pub use models::*;
