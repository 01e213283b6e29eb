//! Batch import of parecer files.

use crate::error::{ImportError, ImportResult};
use crate::extractor::{FileTextExtractor, TextExtractor};
use crate::fields::{extract_fields, ExtractedFields};
use crate::filename::FilenameRules;
use crate::reconciler::Reconciler;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use glob::{MatchOptions, Pattern};
use recruta_config::ImportConfig;
use recruta_core::{
    Assessment, AssessmentId, CandidateId, HiringOutcome, JobId, PipelineStage, SourceFormat,
};
use recruta_db::Database;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Import behaviour.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub rules: FilenameRules,
    /// Glob matched against file names during directory scans.
    pub file_pattern: String,
    /// Leave files that already have an assessment untouched.
    pub skip_existing: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self::from(&ImportConfig::default())
    }
}

impl From<&ImportConfig> for ImportOptions {
    fn from(config: &ImportConfig) -> Self {
        Self {
            rules: FilenameRules::from(config),
            file_pattern: config.file_pattern.clone(),
            skip_existing: config.skip_existing,
        }
    }
}

/// A file that produced an assessment.
#[derive(Debug, Clone)]
pub struct ImportedFile {
    pub path: PathBuf,
    pub assessment_id: AssessmentId,
    pub candidate_id: CandidateId,
    pub job_id: Option<JobId>,
    /// Whether an earlier assessment for this path was replaced.
    pub replaced: bool,
}

/// What happened to a single file.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    Imported(ImportedFile),
    Skipped,
    Unresolved,
}

/// Per-file results of a batch.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub imported: Vec<ImportedFile>,
    /// Already imported and left alone.
    pub skipped: Vec<PathBuf>,
    /// No candidate name in the text nor in the filename.
    pub unresolved: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl ImportReport {
    pub fn total(&self) -> usize {
        self.imported.len() + self.skipped.len() + self.unresolved.len() + self.failed.len()
    }

    /// True when every file was either imported or skipped.
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.failed.is_empty()
    }
}

/// Drives extraction, parsing, reconciliation and persistence.
pub struct Importer {
    db: Database,
    extractor: Box<dyn TextExtractor>,
    options: ImportOptions,
}

impl Importer {
    /// Create an importer reading PDF and text files from disk.
    pub fn new(db: Database, options: ImportOptions) -> Self {
        Self::with_extractor(db, options, Box::new(FileTextExtractor::new()))
    }

    /// Create an importer with a custom text source.
    pub fn with_extractor(
        db: Database,
        options: ImportOptions,
        extractor: Box<dyn TextExtractor>,
    ) -> Self {
        Self {
            db,
            extractor,
            options,
        }
    }

    /// Import every file, in order. One file failing never stops the batch.
    pub fn import_batch(&self, files: &[PathBuf]) -> ImportReport {
        self.import_batch_with(files, |_, _| {})
    }

    /// Like [`import_batch`](Self::import_batch), reporting each file as it finishes.
    pub fn import_batch_with<F>(&self, files: &[PathBuf], mut on_file: F) -> ImportReport
    where
        F: FnMut(&Path, Result<&FileOutcome, &ImportError>),
    {
        let mut report = ImportReport::default();

        for path in files {
            match self.import_file(path) {
                Ok(outcome) => {
                    on_file(path.as_path(), Ok(&outcome));
                    match outcome {
                        FileOutcome::Imported(file) => report.imported.push(file),
                        FileOutcome::Skipped => report.skipped.push(path.clone()),
                        FileOutcome::Unresolved => report.unresolved.push(path.clone()),
                    }
                }
                Err(e) => {
                    warn!("Failed to import {}: {}", path.display(), e);
                    on_file(path.as_path(), Err(&e));
                    report.failed.push((path.clone(), e.to_string()));
                }
            }
        }

        info!(
            "Import finished: {} imported, {} skipped, {} unresolved, {} failed",
            report.imported.len(),
            report.skipped.len(),
            report.unresolved.len(),
            report.failed.len()
        );

        report
    }

    /// Import every matching file under `dir`.
    pub fn import_directory(&self, dir: &Path) -> ImportResult<ImportReport> {
        let files = collect_files(dir, &self.options.file_pattern)?;
        info!("Found {} files to import in {}", files.len(), dir.display());
        Ok(self.import_batch(&files))
    }

    /// Extract and parse a file without touching the store.
    pub fn preview(&self, path: &Path) -> ImportResult<ExtractedFields> {
        let text = self.extractor.extract(path)?;
        Ok(extract_fields(&text, &file_name(path), &self.options.rules))
    }

    /// Import a single file.
    pub fn import_file(&self, path: &Path) -> ImportResult<FileOutcome> {
        let path = path.canonicalize()?;
        let source_path = path.to_string_lossy().to_string();

        if self.options.skip_existing
            && self.db.find_assessment_by_source_path(&source_path)?.is_some()
        {
            debug!("Already imported, skipping: {}", source_path);
            return Ok(FileOutcome::Skipped);
        }

        let fields = self.preview(&path)?;

        if !fields.has_candidate() {
            warn!("No candidate name found in {}", source_path);
            return Ok(FileOutcome::Unresolved);
        }

        let reconciler = Reconciler::new(&self.db);
        let candidate_id = reconciler.resolve_candidate(
            &fields.candidate_name,
            Some(fields.location.as_str()),
            Some(fields.age.as_str()),
        )?;
        let client_id = reconciler.resolve_client(&fields.client)?;
        let job_id = reconciler.resolve_job(client_id, &fields.job_title)?;

        if let Some(job_id) = job_id {
            self.db.link(job_id, candidate_id, None)?;
        }

        let replaced = self.db.delete_assessments_by_source_path(&source_path)? > 0;
        if replaced {
            debug!("Replacing earlier assessment for {}", source_path);
        }

        let assessment = build_assessment(&fields, &path, candidate_id, job_id);
        let assessment_id = self.db.create_assessment(&assessment)?;

        info!(
            "Imported {} as assessment {} ({})",
            source_path, assessment_id, fields.candidate_name
        );

        Ok(FileOutcome::Imported(ImportedFile {
            path,
            assessment_id,
            candidate_id,
            job_id,
            replaced,
        }))
    }
}

fn build_assessment(
    fields: &ExtractedFields,
    path: &Path,
    candidate_id: CandidateId,
    job_id: Option<JobId>,
) -> Assessment {
    let mut assessment = Assessment::new(fields.candidate_name.trim(), source_format(path))
        .with_source_path(path.to_string_lossy());

    assessment.candidate_id = Some(candidate_id);
    assessment.job_id = job_id;
    assessment.created_at = fields
        .timestamp
        .map(local_to_utc)
        .unwrap_or_else(Utc::now);
    assessment.client_name = fields.client.clone();
    assessment.job_title = fields.job_title.clone();
    assessment.location = fields.location.clone();
    assessment.age = fields.age.clone();
    assessment.salary_expectation = fields.salary_expectation.clone();
    assessment.linkedin_url = fields.linkedin_url.clone();
    assessment.summary = fields.summary.clone();
    assessment.analysis = fields.analysis.clone();
    assessment.conclusion = fields.conclusion.clone();
    assessment.stage = PipelineStage::InReview;
    assessment.outcome = HiringOutcome::Pending;
    assessment
}

/// Filenames carry local wall-clock time.
fn local_to_utc(timestamp: NaiveDateTime) -> DateTime<Utc> {
    Local
        .from_local_datetime(&timestamp)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| timestamp.and_utc())
}

fn source_format(path: &Path) -> SourceFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("docx") => SourceFormat::Docx,
        Some("pdf") => SourceFormat::Pdf,
        _ => SourceFormat::Manual,
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Files under `dir` whose name matches `pattern` (case-insensitive), sorted by path.
///
/// Hidden files are skipped.
pub fn collect_files(dir: &Path, pattern: &str) -> ImportResult<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(ImportError::FileNotFound(dir.to_path_buf()));
    }

    let matcher = Pattern::new(pattern).map_err(|e| ImportError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    let options = MatchOptions {
        case_sensitive: false,
        ..Default::default()
    };

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && matcher.matches_with(&name, options)
        })
        .map(|e| e.into_path())
        .collect();

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recruta_db::AssessmentFilter;
    use std::collections::HashMap;
    use tempfile::tempdir;

    /// Serves canned text by file name; names without text fail to extract.
    struct ScriptedExtractor {
        texts: HashMap<String, String>,
    }

    impl ScriptedExtractor {
        fn new(texts: &[(&str, &str)]) -> Self {
            Self {
                texts: texts
                    .iter()
                    .map(|(name, text)| (name.to_string(), text.to_string()))
                    .collect(),
            }
        }
    }

    impl TextExtractor for ScriptedExtractor {
        fn extract(&self, path: &Path) -> ImportResult<String> {
            self.texts
                .get(&file_name(path))
                .cloned()
                .ok_or_else(|| ImportError::Parse {
                    path: path.to_path_buf(),
                    message: "corrupt document".to_string(),
                })
        }

        fn extensions(&self) -> &[&str] {
            &["pdf"]
        }
    }

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        path
    }

    fn importer(db: &Database, texts: &[(&str, &str)], skip_existing: bool) -> Importer {
        let options = ImportOptions {
            skip_existing,
            ..Default::default()
        };
        Importer::with_extractor(db.clone(), options, Box::new(ScriptedExtractor::new(texts)))
    }

    const MARIA: &str = "Cliente: Acme Corp\nCargo: Analista\nCandidato: Maria Silva\n\
                         Localização: Curitiba\nIdade: 31 anos\n\
                         Resumo Profissional\nDez anos em dados.\nConclusão: Recomendada.";

    #[test]
    fn test_import_creates_records_and_link() {
        let db = Database::open_in_memory().unwrap();
        let dir = tempdir().unwrap();
        let file = touch(dir.path(), "maria.pdf");

        let report = importer(&db, &[("maria.pdf", MARIA)], true).import_batch(&[file]);
        assert_eq!(report.imported.len(), 1);
        assert!(report.is_clean());

        let imported = &report.imported[0];
        let job_id = imported.job_id.unwrap();
        let candidate = db.get_candidate(imported.candidate_id).unwrap();
        assert_eq!(candidate.city.as_deref(), Some("Curitiba"));
        assert_eq!(candidate.age, Some(31));

        let link = db.get_link(job_id, imported.candidate_id).unwrap();
        assert_eq!(link.stage, PipelineStage::InReview);

        let assessment = db.get_assessment(imported.assessment_id).unwrap();
        assert_eq!(assessment.client_name, "Acme Corp");
        assert_eq!(assessment.job_title, "Analista");
        assert_eq!(assessment.summary, "Dez anos em dados.");
        assert_eq!(assessment.source_format, SourceFormat::Pdf);
        assert_eq!(assessment.stage, PipelineStage::InReview);
        assert_eq!(assessment.outcome, HiringOutcome::Pending);
    }

    #[test]
    fn test_reimport_keeps_one_assessment_per_path() {
        let db = Database::open_in_memory().unwrap();
        let dir = tempdir().unwrap();
        let file = touch(dir.path(), "maria.pdf");
        let importer = importer(&db, &[("maria.pdf", MARIA)], false);

        let first = importer.import_batch(&[file.clone()]);
        let second = importer.import_batch(&[file.clone()]);
        assert!(!first.imported[0].replaced);
        assert!(second.imported[0].replaced);

        let all = db.list_assessments(&AssessmentFilter::default()).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, second.imported[0].assessment_id);

        // Reconciliation reused the same candidate and link
        let stats = db.get_stats().unwrap();
        assert_eq!(stats.candidates, 1);
        assert_eq!(stats.links, 1);
    }

    #[test]
    fn test_skip_existing_leaves_record_alone() {
        let db = Database::open_in_memory().unwrap();
        let dir = tempdir().unwrap();
        let file = touch(dir.path(), "maria.pdf");
        let importer = importer(&db, &[("maria.pdf", MARIA)], true);

        let first = importer.import_batch(&[file.clone()]);
        let second = importer.import_batch(&[file]);

        assert_eq!(second.skipped.len(), 1);
        assert!(second.imported.is_empty());
        let all = db.list_assessments(&AssessmentFilter::default()).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, first.imported[0].assessment_id);
    }

    #[test]
    fn test_unresolved_file_does_not_stop_batch() {
        let db = Database::open_in_memory().unwrap();
        let dir = tempdir().unwrap();
        let scan = touch(dir.path(), "scan001.pdf");
        let maria = touch(dir.path(), "maria.pdf");

        let report = importer(
            &db,
            &[("scan001.pdf", "Documento digitalizado."), ("maria.pdf", MARIA)],
            true,
        )
        .import_batch(&[scan, maria]);

        assert_eq!(report.unresolved.len(), 1);
        assert!(report.unresolved[0].ends_with("scan001.pdf"));
        assert_eq!(report.imported.len(), 1);
        assert!(!report.is_clean());
        assert_eq!(db.get_stats().unwrap().candidates, 1);
    }

    #[test]
    fn test_failed_file_does_not_stop_batch() {
        let db = Database::open_in_memory().unwrap();
        let dir = tempdir().unwrap();
        let broken = touch(dir.path(), "broken.pdf");
        let missing = dir.path().join("missing.pdf");
        let maria = touch(dir.path(), "maria.pdf");

        let mut seen = Vec::new();
        let report = importer(&db, &[("maria.pdf", MARIA)], true).import_batch_with(
            &[broken, missing, maria],
            |path, result| seen.push((file_name(path), result.is_ok())),
        );

        assert_eq!(report.failed.len(), 2);
        assert_eq!(report.imported.len(), 1);
        assert_eq!(report.total(), 3);
        assert_eq!(
            seen,
            vec![
                ("broken.pdf".to_string(), false),
                ("missing.pdf".to_string(), false),
                ("maria.pdf".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_filename_fallback_and_timestamp() {
        let db = Database::open_in_memory().unwrap();
        let dir = tempdir().unwrap();
        let name = "Parecer_Smartcitizen_Hendrik_Szeletzki_20251114_1719.pdf";
        let file = touch(dir.path(), name);

        let report = importer(&db, &[(name, "Resumo Profissional\nEngenheiro.")], true)
            .import_batch(&[file]);
        let imported = &report.imported[0];
        assert!(imported.job_id.is_none());

        let assessment = db.get_assessment(imported.assessment_id).unwrap();
        assert_eq!(assessment.candidate_name, "Hendrik Szeletzki");
        assert_eq!(assessment.client_name, "Smartcitizen");
        let expected = Local
            .with_ymd_and_hms(2025, 11, 14, 17, 19, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(assessment.created_at, expected);

        // Client is registered even without a job; no link without a job
        assert!(db.find_client_by_name("Smartcitizen").unwrap().is_some());
        assert_eq!(db.get_stats().unwrap().links, 0);
    }

    #[test]
    fn test_collect_files() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("2025");
        std::fs::create_dir(&nested).unwrap();

        touch(dir.path(), "b.pdf");
        touch(dir.path(), "A.PDF");
        touch(dir.path(), ".hidden.pdf");
        touch(dir.path(), "notes.txt");
        touch(&nested, "c.pdf");

        let files = collect_files(dir.path(), "*.pdf").unwrap();
        let names: Vec<String> = files.iter().map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["c.pdf", "A.PDF", "b.pdf"]);

        assert!(collect_files(&dir.path().join("nope"), "*.pdf").is_err());
        assert!(matches!(
            collect_files(dir.path(), "[").unwrap_err(),
            ImportError::Pattern { .. }
        ));
    }

    #[test]
    fn test_import_directory() {
        let db = Database::open_in_memory().unwrap();
        let dir = tempdir().unwrap();
        touch(dir.path(), "maria.pdf");
        touch(dir.path(), "ignored.docx");

        let report = importer(&db, &[("maria.pdf", MARIA)], true)
            .import_directory(dir.path())
            .unwrap();
        assert_eq!(report.total(), 1);
        assert_eq!(report.imported.len(), 1);
    }
}
