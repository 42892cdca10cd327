//! 压力网格解析器
//!
//! 将逗号分隔的传感器文本解析为固定尺寸的压力网格，
//! 对缺失或损坏的单元保持容错。

use crate::models::Grid;
use crate::{GrapheneError, Result};
use std::path::Path;
use tracing::{debug, warn};

/// 压力网格解析器
///
/// 目标尺寸在构造时固定。对任意文本输入都是全函数：
/// 多余的行列被忽略，缺失或无法解析的单元补零。
#[derive(Debug, Clone, Copy)]
pub struct GridParser {
    rows: usize,
    cols: usize,
}

impl GridParser {
    /// 创建指定目标尺寸的解析器
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// 解析原始文本为压力网格
    ///
    /// 最多消费`rows`行（文件中多余的帧被忽略）；每行按逗号切分，
    /// 单元去除空白后按整数解析，失败的单元保持为零。
    pub fn parse_text(&self, text: &str) -> Grid {
        let mut grid = Grid::zeros(self.rows, self.cols);

        for (i, line) in text.lines().take(self.rows).enumerate() {
            for (j, token) in line.split(',').take(self.cols).enumerate() {
                grid.cells[i][j] = token.trim().parse().unwrap_or(0);
            }
        }

        grid
    }

    /// 解析文件为压力网格
    ///
    /// 文件不存在时返回`NotFound`，其余读取失败映射为IO错误。
    pub async fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Grid> {
        let path = path.as_ref();
        debug!("读取压力数据文件: {}", path.display());

        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                warn!("压力数据文件不存在: {}", path.display());
                GrapheneError::NotFound(format!("数据文件不存在: {}", path.display()))
            } else {
                GrapheneError::Io(e)
            }
        })?;

        Ok(self.parse_text(&text))
    }
}
