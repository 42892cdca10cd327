//! 患者数据目录扫描
//!
//! 遍历数据根目录，按患者分组汇总压力数据文件。
//! 每次调用按需解析，不在进程内缓存任何矩阵。

use graphene_core::config::AnalysisConfig;
use graphene_core::models::{Grid, PatientFileRecord, PatientGroup};
use graphene_core::parser::GridParser;
use graphene_core::summary::GridSummarizer;
use graphene_core::{GrapheneError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// 患者数据文件目录
///
/// 支持两种布局：`root/{患者ID}/{文件}.csv`（首选），
/// 或根目录下的扁平文件`root/{患者ID}_{后缀}.csv`，按首个下划线
/// 前的前缀分组。单个文件处理失败只记录日志并跳过，
/// 不影响同组或其他分组的处理。
pub struct PatientFileCatalog {
    parser: GridParser,
    summarizer: GridSummarizer,
}

impl PatientFileCatalog {
    /// 根据分析配置创建目录扫描器
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            parser: GridParser::new(config.grid_rows, config.grid_cols),
            summarizer: GridSummarizer::new(config),
        }
    }

    /// 扫描数据根目录，返回按患者ID排序的分组汇总
    ///
    /// 根目录不存在时记录错误并返回空列表；
    /// 没有任何可读文件的分组被省略。
    pub async fn list_patient_summaries<P: AsRef<Path>>(
        &self,
        root: P,
    ) -> Result<Vec<PatientGroup>> {
        let root = root.as_ref();

        let mut entries = match tokio::fs::read_dir(root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                error!("数据根目录不存在: {}", root.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut patient_dirs: Vec<PathBuf> = Vec::new();
        let mut flat_files: Vec<PathBuf> = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            match entry.file_type().await {
                Ok(file_type) if file_type.is_dir() => patient_dirs.push(path),
                Ok(_) if is_csv(&path) => flat_files.push(path),
                Ok(_) => {}
                Err(e) => warn!("跳过无法识别的目录项 {}: {}", path.display(), e),
            }
        }

        let groups = if patient_dirs.is_empty() {
            self.scan_flat_layout(flat_files).await
        } else {
            self.scan_patient_dirs(patient_dirs).await
        };

        info!("患者分组扫描完成: {} 组", groups.len());
        Ok(groups)
    }

    /// 读取单个患者数据文件的完整网格（供热力图详情视图使用）
    ///
    /// 先按`root/{患者ID}/{文件名}`解析；该路径不存在且文件名携带
    /// `{患者ID}_`前缀时回退到扁平布局`root/{文件名}`。
    /// 文件不存在时返回`NotFound`。
    pub async fn get_full_grid<P: AsRef<Path>>(
        &self,
        root: P,
        patient_id: &str,
        file_name: &str,
    ) -> Result<Grid> {
        validate_path_component(patient_id)?;
        validate_path_component(file_name)?;

        let root = root.as_ref();
        let nested = root.join(patient_id).join(file_name);
        if path_exists(&nested).await {
            return self.parser.parse_file(&nested).await;
        }

        if file_name.starts_with(&format!("{}_", patient_id)) {
            let flat = root.join(file_name);
            if path_exists(&flat).await {
                return self.parser.parse_file(&flat).await;
            }
        }

        Err(GrapheneError::NotFound(format!(
            "数据文件不存在: {}",
            nested.display()
        )))
    }

    /// 按患者子目录扫描
    async fn scan_patient_dirs(&self, mut patient_dirs: Vec<PathBuf>) -> Vec<PatientGroup> {
        patient_dirs.sort();

        let mut groups = Vec::new();
        for dir in patient_dirs {
            let patient_id = match dir.file_name() {
                Some(name) => name.to_string_lossy().to_string(),
                None => continue,
            };

            let mut files = match self.collect_csv_files(&dir).await {
                Ok(files) => files,
                Err(e) => {
                    warn!("无法读取患者目录 {}: {}", dir.display(), e);
                    continue;
                }
            };
            files.sort();

            let records = self.summarize_files(&files).await;
            if !records.is_empty() {
                groups.push(PatientGroup {
                    patient_id,
                    files: records,
                });
            }
        }
        groups
    }

    /// 按根目录扁平文件扫描，前缀即患者ID
    async fn scan_flat_layout(&self, flat_files: Vec<PathBuf>) -> Vec<PatientGroup> {
        let mut by_patient: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        for path in flat_files {
            let stem = match path.file_stem() {
                Some(stem) => stem.to_string_lossy().to_string(),
                None => continue,
            };
            let patient_id = stem
                .split_once('_')
                .map(|(prefix, _)| prefix.to_string())
                .unwrap_or(stem);
            by_patient.entry(patient_id).or_default().push(path);
        }

        let mut groups = Vec::new();
        for (patient_id, mut files) in by_patient {
            files.sort();
            let records = self.summarize_files(&files).await;
            if !records.is_empty() {
                groups.push(PatientGroup {
                    patient_id,
                    files: records,
                });
            }
        }
        groups
    }

    /// 汇总一组文件，失败的文件记录日志后跳过
    async fn summarize_files(&self, files: &[PathBuf]) -> Vec<PatientFileRecord> {
        let mut records = Vec::new();
        for path in files {
            match self.summarize_file(path).await {
                Ok(record) => records.push(record),
                Err(e) => warn!("跳过无法处理的文件 {}: {}", path.display(), e),
            }
        }
        records
    }

    /// 解析并汇总单个数据文件
    async fn summarize_file(&self, path: &Path) -> Result<PatientFileRecord> {
        let grid = self.parser.parse_file(path).await?;
        let metrics = self.summarizer.summarize(&grid);
        let preview = self.summarizer.subsample(&grid);

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(PatientFileRecord {
            file_name,
            metrics,
            preview,
        })
    }

    /// 收集目录中的CSV文件
    async fn collect_csv_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if is_csv(&path) {
                files.push(path);
            }
        }
        Ok(files)
    }
}

/// 判断路径是否为CSV文件
fn is_csv(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// 拒绝携带路径分隔符的标识符
fn validate_path_component(component: &str) -> Result<()> {
    if component.is_empty()
        || component.contains('/')
        || component.contains('\\')
        || component == ".."
    {
        return Err(GrapheneError::Validation(format!(
            "非法的路径成分: {:?}",
            component
        )));
    }
    Ok(())
}

async fn path_exists(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphene_core::config::AnalysisConfig;
    use tempfile::TempDir;

    fn test_config() -> AnalysisConfig {
        AnalysisConfig {
            grid_rows: 2,
            grid_cols: 2,
            contact_threshold: 10,
            alert_threshold: 200,
            preview_size: 2,
        }
    }

    fn catalog() -> PatientFileCatalog {
        PatientFileCatalog::new(&test_config())
    }

    async fn write_frame(path: &Path) {
        tokio::fs::write(path, "5,20\n30,250\n").await.unwrap();
    }

    #[tokio::test]
    async fn test_nested_layout_groups_by_directory() {
        let root = TempDir::new().unwrap();
        tokio::fs::create_dir(root.path().join("p2")).await.unwrap();
        tokio::fs::create_dir(root.path().join("p1")).await.unwrap();
        write_frame(&root.path().join("p1").join("b.csv")).await;
        write_frame(&root.path().join("p1").join("a.csv")).await;
        write_frame(&root.path().join("p2").join("x.csv")).await;

        let groups = catalog().list_patient_summaries(root.path()).await.unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].patient_id, "p1");
        assert_eq!(groups[1].patient_id, "p2");
        assert_eq!(groups[0].files.len(), 2);
        assert_eq!(groups[0].files[0].file_name, "a.csv");
        assert_eq!(groups[0].files[1].file_name, "b.csv");

        let metrics = &groups[0].files[0].metrics;
        assert_eq!(metrics.peak_pressure, 250);
        // 4个单元中20、30、250达到接触阈值
        assert_eq!(metrics.contact_area_percent, 75);
        assert!(metrics.is_alert);
        assert_eq!(groups[0].files[0].preview.rows(), 2);
    }

    #[tokio::test]
    async fn test_flat_layout_groups_by_prefix() {
        let root = TempDir::new().unwrap();
        write_frame(&root.path().join("p1_monday.csv")).await;
        write_frame(&root.path().join("p1_tuesday.csv")).await;
        write_frame(&root.path().join("p2_monday.csv")).await;
        tokio::fs::write(root.path().join("notes.txt"), "ignore me")
            .await
            .unwrap();

        let groups = catalog().list_patient_summaries(root.path()).await.unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].patient_id, "p1");
        assert_eq!(groups[0].files.len(), 2);
        assert_eq!(groups[1].patient_id, "p2");
        assert_eq!(groups[1].files.len(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_file_is_skipped_not_fatal() {
        let root = TempDir::new().unwrap();
        let patient = root.path().join("p1");
        tokio::fs::create_dir(&patient).await.unwrap();
        write_frame(&patient.join("good.csv")).await;
        // 以.csv命名的子目录读取必然失败，应当被跳过
        tokio::fs::create_dir(patient.join("bad.csv")).await.unwrap();

        let groups = catalog().list_patient_summaries(root.path()).await.unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].files.len(), 1);
        assert_eq!(groups[0].files[0].file_name, "good.csv");
    }

    #[tokio::test]
    async fn test_missing_root_yields_empty_listing() {
        let root = TempDir::new().unwrap();
        let missing = root.path().join("nowhere");

        let groups = catalog().list_patient_summaries(&missing).await.unwrap();
        assert!(groups.is_empty());
    }

    #[tokio::test]
    async fn test_group_without_readable_files_is_omitted() {
        let root = TempDir::new().unwrap();
        tokio::fs::create_dir(root.path().join("empty"))
            .await
            .unwrap();
        let with_data = root.path().join("p1");
        tokio::fs::create_dir(&with_data).await.unwrap();
        write_frame(&with_data.join("a.csv")).await;

        let groups = catalog().list_patient_summaries(root.path()).await.unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].patient_id, "p1");
    }

    #[tokio::test]
    async fn test_get_full_grid_nested_layout() {
        let root = TempDir::new().unwrap();
        let patient = root.path().join("p1");
        tokio::fs::create_dir(&patient).await.unwrap();
        write_frame(&patient.join("a.csv")).await;

        let grid = catalog()
            .get_full_grid(root.path(), "p1", "a.csv")
            .await
            .unwrap();

        assert_eq!(grid.cells(), &[vec![5, 20], vec![30, 250]]);
    }

    #[tokio::test]
    async fn test_get_full_grid_flat_fallback() {
        let root = TempDir::new().unwrap();
        write_frame(&root.path().join("p1_monday.csv")).await;

        let grid = catalog()
            .get_full_grid(root.path(), "p1", "p1_monday.csv")
            .await
            .unwrap();

        assert_eq!(grid.get(1, 1), 250);
    }

    #[tokio::test]
    async fn test_get_full_grid_missing_file_is_not_found() {
        let root = TempDir::new().unwrap();

        let result = catalog().get_full_grid(root.path(), "p1", "a.csv").await;
        assert!(matches!(result, Err(GrapheneError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_full_grid_rejects_path_separators() {
        let root = TempDir::new().unwrap();

        let result = catalog()
            .get_full_grid(root.path(), "p1", "../escape.csv")
            .await;
        assert!(matches!(result, Err(GrapheneError::Validation(_))));
    }
}
