//! 人员档案登记
//!
//! 管理临床医生与患者的档案记录：目录初始化、随机记录ID分配
//! 与扁平文本档案写入。

use chrono::Utc;
use graphene_core::models::RegistryRecord;
use graphene_core::utils::{generate_record_id, sanitize_file_name};
use graphene_core::{GrapheneError, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// 人员档案登记器
pub struct RecordRegistry {
    clinician_dir: PathBuf,
    patient_dir: PathBuf,
    id_length: usize,
}

impl RecordRegistry {
    /// 在档案根目录下创建登记器，目录不存在时自动创建
    pub async fn new<P: AsRef<Path>>(root: P, id_length: usize) -> Result<Self> {
        let root = root.as_ref();
        let clinician_dir = root.join("clinicians");
        let patient_dir = root.join("patients");

        tokio::fs::create_dir_all(&clinician_dir).await?;
        tokio::fs::create_dir_all(&patient_dir).await?;

        info!("档案目录就绪: {}", root.display());
        Ok(Self {
            clinician_dir,
            patient_dir,
            id_length,
        })
    }

    /// 登记临床医生档案
    pub async fn add_clinician(&self, name: &str) -> Result<RegistryRecord> {
        self.write_record(&self.clinician_dir, name).await
    }

    /// 登记患者档案
    pub async fn add_patient(&self, name: &str) -> Result<RegistryRecord> {
        self.write_record(&self.patient_dir, name).await
    }

    /// 写入单条档案记录
    async fn write_record(&self, dir: &Path, name: &str) -> Result<RegistryRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GrapheneError::Validation("姓名不能为空".to_string()));
        }

        let id = generate_record_id(self.id_length);
        let created_at = Utc::now();
        let path = dir.join(format!("{}_{}.txt", id, sanitize_file_name(name)));

        let contents = format!(
            "ID: {}\nName: {}\nCreated: {}\n",
            id,
            name,
            created_at.to_rfc3339()
        );
        tokio::fs::write(&path, contents).await?;

        info!("已创建档案记录: {}", path.display());
        Ok(RegistryRecord {
            id,
            name: name.to_string(),
            created_at,
            file_path: path.to_string_lossy().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_new_bootstraps_directories() {
        let root = TempDir::new().unwrap();
        RecordRegistry::new(root.path(), 8).await.unwrap();

        assert!(root.path().join("clinicians").is_dir());
        assert!(root.path().join("patients").is_dir());
    }

    #[tokio::test]
    async fn test_add_clinician_writes_record_file() {
        let root = TempDir::new().unwrap();
        let registry = RecordRegistry::new(root.path(), 8).await.unwrap();

        let record = registry.add_clinician("Dr. Lee").await.unwrap();

        assert_eq!(record.id.len(), 8);
        assert_eq!(record.name, "Dr. Lee");
        let contents = tokio::fs::read_to_string(&record.file_path).await.unwrap();
        assert!(contents.contains(&format!("ID: {}", record.id)));
        assert!(contents.contains("Name: Dr. Lee"));
    }

    #[tokio::test]
    async fn test_add_patient_sanitizes_name() {
        let root = TempDir::new().unwrap();
        let registry = RecordRegistry::new(root.path(), 8).await.unwrap();

        let record = registry.add_patient("a/b:c").await.unwrap();

        let file_name = Path::new(&record.file_path)
            .file_name()
            .unwrap()
            .to_string_lossy()
            .to_string();
        assert!(file_name.ends_with("_a_b_c.txt"));
        assert!(Path::new(&record.file_path).is_file());
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let root = TempDir::new().unwrap();
        let registry = RecordRegistry::new(root.path(), 8).await.unwrap();

        let result = registry.add_clinician("   ").await;
        assert!(matches!(result, Err(GrapheneError::Validation(_))));
    }

    #[tokio::test]
    async fn test_id_length_follows_configuration() {
        let root = TempDir::new().unwrap();
        let registry = RecordRegistry::new(root.path(), 12).await.unwrap();

        let record = registry.add_patient("Anna").await.unwrap();
        assert_eq!(record.id.len(), 12);
    }
}
