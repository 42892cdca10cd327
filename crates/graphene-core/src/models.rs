//! 核心数据模型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 单帧压力网格
///
/// 固定尺寸的矩形矩阵，每个单元为一个非负压力读数。
/// 由解析器产生后不再修改；预览网格复用同一类型，仅尺寸更小。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// 行数
    pub(crate) rows: usize,
    /// 列数
    pub(crate) cols: usize,
    /// 压力单元，按行存储
    pub(crate) cells: Vec<Vec<u16>>,
}

impl Grid {
    /// 创建全零网格
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![vec![0; cols]; rows],
        }
    }

    /// 行数
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// 列数
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// 读取指定单元的压力值
    pub fn get(&self, row: usize, col: usize) -> u16 {
        self.cells[row][col]
    }

    /// 以二维数组形式访问全部单元（供热力图渲染层使用）
    pub fn cells(&self) -> &[Vec<u16>] {
        &self.cells
    }
}

/// 单个数据文件的汇总指标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    /// 峰值压力（网格最大单元值）
    pub peak_pressure: u16,
    /// 接触面积百分比，0-100
    pub contact_area_percent: u8,
    /// 是否触发告警
    pub is_alert: bool,
}

/// 患者数据文件记录
///
/// 文件名、汇总指标与列表视图用的预览网格。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientFileRecord {
    /// 文件名
    pub file_name: String,
    /// 汇总指标
    pub metrics: SummaryMetrics,
    /// 预览网格
    pub preview: Grid,
}

/// 患者分组
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientGroup {
    /// 患者ID
    pub patient_id: String,
    /// 该患者的数据文件记录，按文件名排序
    pub files: Vec<PatientFileRecord>,
}

/// 人员档案记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryRecord {
    /// 记录ID
    pub id: String,
    /// 姓名
    pub name: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 档案文件路径
    pub file_path: String,
}
