//! Statement documents from a local input directory
//!
//! Layout: one plain-text file per company and statement,
//! `<COMPANY>_<suffix>.txt`, where the suffix is `posisi_keuangan`,
//! `laba_rugi` or `arus_kas`. A company exists when its
//! `<COMPANY>_posisi_keuangan.txt` exists.

use async_trait::async_trait;
use footing_application::{DocumentError, DocumentSource};
use footing_domain::SectionKind;
use glob::glob;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LocalDocumentSource {
    input_dir: PathBuf,
}

impl LocalDocumentSource {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
        }
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Path of one statement document.
    pub fn document_path(&self, company: &str, section: SectionKind) -> PathBuf {
        self.input_dir
            .join(format!("{}_{}.txt", company, section.file_suffix()))
    }

    fn detect_companies(&self) -> Vec<String> {
        let marker = format!("_{}.txt", SectionKind::BalanceSheet.file_suffix());
        let pattern = self.input_dir.join(format!("*{}", marker));

        let Ok(paths) = glob(&pattern.to_string_lossy()) else {
            return Vec::new();
        };

        let mut companies: Vec<String> = paths
            .flatten()
            .filter(|path| path.is_file())
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                let company = name.strip_suffix(&marker)?;
                (!company.is_empty()).then(|| company.to_string())
            })
            .collect();
        companies.sort();
        companies.dedup();
        companies
    }
}

#[async_trait]
impl DocumentSource for LocalDocumentSource {
    async fn load(&self, company: &str, section: SectionKind) -> Result<String, DocumentError> {
        let path = self.document_path(company, section);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                debug!("Loaded {} ({} bytes)", path.display(), text.len());
                Ok(text)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(DocumentError::NotFound {
                company: company.to_string(),
                section,
                location: path.display().to_string(),
            }),
            Err(source) => Err(DocumentError::Io {
                location: path.display().to_string(),
                source,
            }),
        }
    }

    async fn companies(&self) -> Result<Vec<String>, DocumentError> {
        if !self.input_dir.is_dir() {
            return Err(DocumentError::Io {
                location: self.input_dir.display().to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "input directory does not exist",
                ),
            });
        }
        Ok(self.detect_companies())
    }
}
