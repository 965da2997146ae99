//! On-disk staging of the current job description and candidates between runs

use crate::error::{Result, SkillMatchError};
use crate::processing::analyzer::Candidate;
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const JD_FILE: &str = "current_jd.txt";
const CANDIDATES_FILE: &str = "current_candidates.json";
const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StagingManifest {
    pub jd_staged_at: Option<DateTime<Utc>>,
    pub jd_word_count: usize,
    pub candidates_staged_at: Option<DateTime<Utc>>,
    pub candidates_count: usize,
}

pub struct StagingStore {
    dir: PathBuf,
}

impl StagingStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save_jd(&self, text: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(JD_FILE), text)?;

        let mut manifest = self.manifest()?;
        manifest.jd_staged_at = Some(Utc::now());
        manifest.jd_word_count = text.split_whitespace().count();
        self.write_manifest(&manifest)?;

        info!("Staged job description ({} words)", manifest.jd_word_count);
        Ok(())
    }

    /// The staged job description, or `None` if none was staged.
    pub fn load_jd(&self) -> Result<Option<String>> {
        let path = self.dir.join(JD_FILE);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    pub fn save_candidates(&self, candidates: &[Candidate]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(candidates)?;
        fs::write(self.dir.join(CANDIDATES_FILE), json)?;

        let mut manifest = self.manifest()?;
        manifest.candidates_staged_at = Some(Utc::now());
        manifest.candidates_count = candidates.len();
        self.write_manifest(&manifest)?;

        info!("Staged {} candidates", candidates.len());
        Ok(())
    }

    pub fn load_candidates(&self) -> Result<Vec<Candidate>> {
        let path = self.dir.join(CANDIDATES_FILE);
        if !path.exists() {
            return Err(SkillMatchError::Staging(
                "No candidates staged. Run `stage resumes` first.".to_string(),
            ));
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn manifest(&self) -> Result<StagingManifest> {
        let path = self.dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(StagingManifest::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_manifest(&self, manifest: &StagingManifest) -> Result<()> {
        let json = serde_json::to_string_pretty(manifest)?;
        fs::write(self.dir.join(MANIFEST_FILE), json)?;
        Ok(())
    }

    /// Remove everything staged.
    pub fn clear(&self) -> Result<()> {
        for file in [JD_FILE, CANDIDATES_FILE, MANIFEST_FILE] {
            let path = self.dir.join(file);
            if path.exists() {
                debug!("Removing {}", path.display());
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}
