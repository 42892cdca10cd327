//! 压力网格指标汇总
//!
//! 在同一解析结果上独立计算汇总指标与预览网格，
//! 两者都是无副作用的纯函数。

use crate::config::AnalysisConfig;
use crate::models::{Grid, SummaryMetrics};

/// 压力网格汇总器
///
/// 阈值与预览尺寸在构造时固定，配置合法性由配置加载阶段保证。
#[derive(Debug, Clone, Copy)]
pub struct GridSummarizer {
    contact_threshold: u16,
    alert_threshold: u16,
    preview_size: usize,
}

impl GridSummarizer {
    /// 根据分析配置创建汇总器
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            contact_threshold: config.contact_threshold,
            alert_threshold: config.alert_threshold,
            preview_size: config.preview_size,
        }
    }

    /// 计算汇总指标
    ///
    /// 峰值压力为全网格最大单元值；接触面积为达到接触阈值的单元
    /// 占比（四舍五入到整数，0.5进位）；峰值达到告警阈值即触发告警。
    pub fn summarize(&self, grid: &Grid) -> SummaryMetrics {
        let mut peak_pressure: u16 = 0;
        let mut contact_count: usize = 0;

        for row in grid.cells() {
            for &value in row {
                peak_pressure = peak_pressure.max(value);
                if value >= self.contact_threshold {
                    contact_count += 1;
                }
            }
        }

        SummaryMetrics {
            peak_pressure,
            contact_area_percent: round_half_up_percent(contact_count, grid.rows() * grid.cols()),
            is_alert: peak_pressure >= self.alert_threshold,
        }
    }

    /// 按固定步长点采样生成预览网格
    ///
    /// 预览单元`(pi, pj)`取源单元`(pi * stride, pj * stride)`的值。
    /// 点采样而非平均值：预览中显示的是真实读数。
    pub fn subsample(&self, grid: &Grid) -> Grid {
        let row_stride = grid.rows() / self.preview_size;
        let col_stride = grid.cols() / self.preview_size;

        let mut preview = Grid::zeros(self.preview_size, self.preview_size);
        for pi in 0..self.preview_size {
            for pj in 0..self.preview_size {
                preview.cells[pi][pj] = grid.get(pi * row_stride, pj * col_stride);
            }
        }

        preview
    }
}

/// 百分比取整，0.5向上进位
fn round_half_up_percent(count: usize, total: usize) -> u8 {
    ((200 * count + total) / (2 * total)) as u8
}
