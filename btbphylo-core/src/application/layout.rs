// btbphylo-core/src/application/layout.rs

use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::metadata::RunMetadata;
use crate::domain::project::PipelineConfig;
use crate::domain::reconcile::MissingSamples;
use crate::domain::table::{Column, SUBMISSION, Table, TableSchema};
use crate::error::PhyloError;
use crate::infrastructure::fs::{read_json_or_default, write_json};
use crate::ports::dataset::DatasetSource;

/// File locations under the results directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsLayout {
    root: PathBuf,
}

impl ResultsLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(project_dir: &Path, config: &PipelineConfig) -> Self {
        Self::new(config.resolve(project_dir, &config.results_path))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn deduped_wgs(&self) -> PathBuf {
        self.root.join("deduped_wgs.csv")
    }

    pub fn passed_samples(&self) -> PathBuf {
        self.root.join("passed_samples.csv")
    }

    pub fn consistified_wgs(&self) -> PathBuf {
        self.root.join("consistified_wgs.csv")
    }

    pub fn consistified_cattle(&self) -> PathBuf {
        self.root.join("consistified_cattle.csv")
    }

    pub fn consistified_movement(&self) -> PathBuf {
        self.root.join("consistified_movement.csv")
    }

    pub fn missing_dir(&self) -> PathBuf {
        self.root.join("missing")
    }

    pub fn missing_wgs(&self) -> PathBuf {
        self.missing_dir().join("missing_wgs.csv")
    }

    pub fn missing_cattle(&self) -> PathBuf {
        self.missing_dir().join("missing_cattle.csv")
    }

    pub fn missing_movement(&self) -> PathBuf {
        self.missing_dir().join("missing_movement.csv")
    }

    pub fn report(&self) -> PathBuf {
        self.root.join("report.csv")
    }

    pub fn clade_info(&self) -> PathBuf {
        self.root.join("CladeInfo.csv")
    }

    pub fn metadata(&self) -> PathBuf {
        self.root.join("metadata").join("metadata.json")
    }

    /// Writes each missing set as a one-column `Submission` table.
    pub fn save_missing(
        &self,
        source: &dyn DatasetSource,
        missing: &MissingSamples,
    ) -> Result<(), PhyloError> {
        for (path, keys) in [
            (self.missing_wgs(), &missing.wgs),
            (self.missing_cattle(), &missing.cattle),
            (self.missing_movement(), &missing.movement),
        ] {
            let table = Table::new(vec![Column::categorical(SUBMISSION, keys.iter().cloned())])?;
            source.save(&path, &table)?;
        }
        Ok(())
    }

    pub fn load_missing(&self, source: &dyn DatasetSource) -> Result<MissingSamples, PhyloError> {
        let schema = TableSchema::new("missing", &[]);
        let read = |path: PathBuf| -> Result<_, PhyloError> {
            Ok(source.load(&path, &schema)?.key_set(SUBMISSION)?)
        };
        Ok(MissingSamples {
            wgs: read(self.missing_wgs())?,
            cattle: read(self.missing_cattle())?,
            movement: read(self.missing_movement())?,
        })
    }

    /// Merges `metadata` into the persisted log and stamps `generated_at`.
    ///
    /// Keys written by earlier stages are kept unless `metadata` overwrites them.
    pub fn record_metadata(&self, metadata: RunMetadata) -> Result<RunMetadata, PhyloError> {
        let path = self.metadata();
        let mut log: RunMetadata = read_json_or_default(&path)?;
        log.merge(metadata);
        log.record("generated_at", Utc::now().to_rfc3339());
        write_json(&path, &log)?;
        debug!(path = ?path, keys = log.len(), "metadata recorded");
        Ok(log)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::testing::MemoryDatasets;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_paths_follow_results_root() {
        let config = PipelineConfig {
            results_path: "out".into(),
            ..Default::default()
        };
        let layout = ResultsLayout::from_config(Path::new("/project"), &config);
        assert_eq!(layout.report(), Path::new("/project/out/report.csv"));
        assert_eq!(
            layout.missing_cattle(),
            Path::new("/project/out/missing/missing_cattle.csv")
        );
        assert_eq!(
            layout.metadata(),
            Path::new("/project/out/metadata/metadata.json")
        );
    }

    #[test]
    fn test_missing_sets_survive_storage() -> Result<()> {
        let source = MemoryDatasets::default();
        let layout = ResultsLayout::new("/results");
        let missing = MissingSamples {
            wgs: ["B".to_string()].into(),
            cattle: ["A".to_string(), "C".to_string()].into(),
            movement: Default::default(),
        };
        layout.save_missing(&source, &missing)?;
        assert_eq!(layout.load_missing(&source)?, missing);
        Ok(())
    }

    #[test]
    fn test_metadata_is_merged_across_stages() -> Result<()> {
        let dir = tempdir()?;
        let layout = ResultsLayout::new(dir.path());

        let mut first = RunMetadata::new();
        first.record("number_of_passed_samples", 4);
        layout.record_metadata(first)?;

        let mut second = RunMetadata::new();
        second.record("number_of_excluded_samples", 2);
        let log = layout.record_metadata(second)?;

        assert_eq!(log.get("number_of_passed_samples"), Some(&4.into()));
        assert_eq!(log.get("number_of_excluded_samples"), Some(&2.into()));
        assert!(log.get("generated_at").is_some());
        Ok(())
    }
}
