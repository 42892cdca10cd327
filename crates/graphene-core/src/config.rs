//! 配置管理
//!
//! 从配置文件与环境变量加载系统配置，并在加载时完成一次性验证。

use crate::{GrapheneError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

/// GrapheneTrace系统完整配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrapheneConfig {
    /// 压力数据根目录
    pub data_root: String,
    /// 人员档案根目录
    pub registry_root: String,
    /// 档案记录ID长度
    pub id_length: usize,
    /// 网格分析配置
    pub analysis: AnalysisConfig,
}

/// 网格分析配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 网格行数
    pub grid_rows: usize,
    /// 网格列数
    pub grid_cols: usize,
    /// 接触阈值：达到该压力的单元计入接触面积
    pub contact_threshold: u16,
    /// 告警阈值：峰值压力达到该值即触发告警
    pub alert_threshold: u16,
    /// 预览网格边长，必须整除网格行数与列数
    pub preview_size: usize,
}

impl Default for GrapheneConfig {
    fn default() -> Self {
        Self {
            data_root: "./data/gtlb".to_string(),
            registry_root: "./data/registry".to_string(),
            id_length: 8,
            analysis: AnalysisConfig::default(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            grid_rows: 32,
            grid_cols: 32,
            contact_threshold: 10,
            alert_threshold: 200,
            preview_size: 8,
        }
    }
}

impl GrapheneConfig {
    /// 从配置文件与`GRAPHENE_`前缀的环境变量加载配置
    pub fn load(config_path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(config_path))
            .add_source(Environment::with_prefix("GRAPHENE").separator("_"))
            .build()
            .map_err(|e| GrapheneError::Config(format!("无法读取配置: {}", e)))?;

        let config: GrapheneConfig = settings
            .try_deserialize()
            .map_err(|e| GrapheneError::Config(format!("配置反序列化失败: {}", e)))?;

        config.validate()?;
        info!("配置加载成功: {}", config_path);
        Ok(config)
    }

    /// 验证配置
    ///
    /// 配置错误在启动阶段即为致命错误，不进入逐请求处理。
    pub fn validate(&self) -> Result<()> {
        if self.id_length == 0 {
            return Err(GrapheneError::Config("档案记录ID长度不能为0".to_string()));
        }
        self.analysis.validate()
    }
}

impl AnalysisConfig {
    /// 验证分析配置
    pub fn validate(&self) -> Result<()> {
        if self.grid_rows == 0 || self.grid_cols == 0 {
            return Err(GrapheneError::Config("网格尺寸不能为0".to_string()));
        }

        if self.preview_size == 0 {
            return Err(GrapheneError::Config("预览网格边长不能为0".to_string()));
        }

        if self.grid_rows % self.preview_size != 0 || self.grid_cols % self.preview_size != 0 {
            return Err(GrapheneError::Config(format!(
                "预览网格边长{}必须整除网格尺寸{}x{}",
                self.preview_size, self.grid_rows, self.grid_cols
            )));
        }

        Ok(())
    }
}
