//! Input manager: routes documents to extractors and builds candidates

use crate::error::{Result, SkillMatchError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    DocxExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use crate::processing::analyzer::Candidate;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

/// Archive entries written by macOS Finder alongside the real files.
const MACOS_METADATA_DIR: &str = "__MACOSX/";

pub struct InputManager {
    cache: HashMap<PathBuf, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(path) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(SkillMatchError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match FileType::from_path(path) {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Docx => {
                info!("Extracting text from DOCX: {}", path.display());
                DocxExtractor.extract(path).await?
            }
            FileType::Zip => {
                return Err(SkillMatchError::UnsupportedFormat(format!(
                    "{} is an archive; pass it as a resume source instead",
                    path.display()
                )));
            }
            FileType::Unknown => {
                return Err(SkillMatchError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), text.clone());
        }

        Ok(text)
    }

    /// Expand directories (one level, sorted) into the files they contain.
    pub async fn expand_paths(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for path in paths {
            if path.is_dir() {
                let mut entries = tokio::fs::read_dir(path).await?;
                let mut dir_files = Vec::new();
                while let Some(entry) = entries.next_entry().await? {
                    let entry_path = entry.path();
                    if entry_path.is_file() {
                        dir_files.push(entry_path);
                    }
                }
                dir_files.sort();
                files.extend(dir_files);
            } else {
                files.push(path.clone());
            }
        }

        Ok(files)
    }

    /// Build one candidate per resume file, and one per document inside each
    /// ZIP archive.
    ///
    /// Files that fail to extract become candidates carrying the error, so
    /// they surface in the batch report. Files that extract to nothing are
    /// skipped.
    pub async fn collect_candidates(&mut self, paths: &[PathBuf]) -> Result<Vec<Candidate>> {
        let files = self.expand_paths(paths).await?;
        let mut candidates = Vec::with_capacity(files.len());

        for file in files {
            let filename = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| file.display().to_string());

            if FileType::from_path(&file) == FileType::Zip {
                match self.collect_from_archive(&file).await {
                    Ok(entries) => candidates.extend(entries),
                    Err(e) => {
                        warn!("Failed to open archive {}: {}", file.display(), e);
                        candidates.push(Candidate::failed(filename, e.to_string()));
                    }
                }
                continue;
            }

            match self.extract_text(&file).await {
                Ok(text) if text.trim().is_empty() => {
                    warn!("No text extracted from {}, skipping", file.display());
                }
                Ok(text) => candidates.push(Candidate {
                    name: Some(filename.clone()),
                    filename: Some(filename),
                    text,
                    ..Candidate::default()
                }),
                Err(e) => {
                    warn!("Failed to read {}: {}", file.display(), e);
                    candidates.push(Candidate::failed(filename, e.to_string()));
                }
            }
        }

        info!("Collected {} candidates", candidates.len());
        Ok(candidates)
    }

    /// Candidates for the documents in a ZIP archive, in archive order, named
    /// by entry file name. Entries of unsupported types are skipped.
    pub async fn collect_from_archive(&self, path: &Path) -> Result<Vec<Candidate>> {
        info!("Expanding resume archive: {}", path.display());
        let bytes = tokio::fs::read(path).await?;
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
            SkillMatchError::Archive(format!("'{}': {}", path.display(), e))
        })?;

        let mut candidates = Vec::new();
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(|e| {
                SkillMatchError::Archive(format!("'{}' entry {}: {}", path.display(), index, e))
            })?;
            if entry.is_dir() || entry.name().starts_with(MACOS_METADATA_DIR) {
                continue;
            }

            let entry_name = entry.name().to_string();
            let filename = Path::new(&entry_name)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| entry_name.clone());
            let source = format!("{}:{}", path.display(), entry_name);

            let file_type = FileType::from_path(Path::new(&entry_name));
            if !file_type.is_document() {
                debug!("Skipping unsupported archive entry {}", source);
                continue;
            }

            let mut bytes = Vec::new();
            let extracted = entry
                .read_to_end(&mut bytes)
                .map_err(SkillMatchError::from)
                .and_then(|_| extract_bytes(&file_type, &bytes, &source));

            match extracted {
                Ok(text) if text.trim().is_empty() => {
                    warn!("No text extracted from {}, skipping", source);
                }
                Ok(text) => candidates.push(Candidate {
                    name: Some(filename.clone()),
                    filename: Some(filename),
                    text,
                    ..Candidate::default()
                }),
                Err(e) => {
                    warn!("Failed to read {}: {}", source, e);
                    candidates.push(Candidate::failed(filename, e.to_string()));
                }
            }
        }

        info!("Found {} resumes in {}", candidates.len(), path.display());
        Ok(candidates)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

/// Route in-memory document bytes to the extractor for their type.
fn extract_bytes(file_type: &FileType, bytes: &[u8], source: &str) -> Result<String> {
    match file_type {
        FileType::Pdf => PdfExtractor.extract_bytes(bytes, source),
        FileType::Text => PlainTextExtractor.extract_bytes(bytes, source),
        FileType::Markdown => MarkdownExtractor.extract_bytes(bytes, source),
        FileType::Docx => DocxExtractor.extract_bytes(bytes, source),
        FileType::Zip | FileType::Unknown => Err(SkillMatchError::UnsupportedFormat(format!(
            "Unsupported document type for: {}",
            source
        ))),
    }
}
