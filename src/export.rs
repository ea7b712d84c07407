//! Export orchestration: writes the `.REST`, `.BCVAL` and `.BCTYPE` triple.
//!
//! Boundary domains are classified and NDVAR is resolved once, up front. The
//! three files are then written strictly one after another; each file handle
//! lives only for its own phase and is closed before the next file opens.
//!
//! Fatal conditions are returned as [`AdsExportError`] and leave whatever was
//! already written on disk. Soft problems and operator cancellation are
//! reported in the [`ExportReport`].

use crate::catalog::BoundaryTypeCatalog;
use crate::classify::{Classification, classify_model};
use crate::export_error::AdsExportError;
use crate::io::bctype::write_bctype;
use crate::io::bcval::write_bcval;
use crate::io::record::{ByteOrder, Encoding, RecordWriter};
use crate::io::rest::RestWriter;
use crate::model::{GridModel, TITLE_ATTRIBUTE};
use crate::ndvar::{VariableCount, resolve_model_nd_var};
use crate::notify::{ExportWarning, LogNotifier, Notifier, NullProgress, Progress, WarningBatch};
use crate::sequence::StreamOutcome;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const REST_EXTENSION: &str = "REST";
pub const BCVAL_EXTENSION: &str = "BCVAL";
pub const BCTYPE_EXTENSION: &str = "BCTYPE";

/// Number of major progress steps (one per output file).
const MAJOR_STEPS: u32 = 3;

/// Export settings.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExportOptions {
    /// Output path without extension; `.REST` etc. are appended.
    pub base_path: PathBuf,
    /// Encoding of the `.REST` file. Auxiliary files are always ASCII.
    #[serde(default)]
    pub encoding: Encoding,
    #[serde(default)]
    pub byte_order: ByteOrder,
    #[serde(default)]
    pub catalog: BoundaryTypeCatalog,
}

impl ExportOptions {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            encoding: Encoding::default(),
            byte_order: ByteOrder::default(),
            catalog: BoundaryTypeCatalog::default(),
        }
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_catalog(mut self, catalog: BoundaryTypeCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// `<base>.<ext>`, appended rather than replacing any dot in the base.
    pub fn file_path(&self, extension: &str) -> PathBuf {
        let mut name = self.base_path.clone().into_os_string();
        name.push(".");
        name.push(extension);
        PathBuf::from(name)
    }
}

/// Outcome of an export that did not hit a fatal error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Files fully or partially written, in order.
    pub files: Vec<PathBuf>,
    pub variables: VariableCount,
    /// Domains whose condition query failed.
    pub failed_domains: Vec<usize>,
    pub warnings: Vec<ExportWarning>,
    /// The operator cancelled; later files were not written.
    pub cancelled: bool,
}

impl ExportReport {
    /// No failed domain and no cancellation.
    pub fn is_success(&self) -> bool {
        self.failed_domains.is_empty() && !self.cancelled
    }
}

/// State of one export invocation.
pub struct ExportContext<'a, M, N, P>
where
    M: GridModel + ?Sized,
    N: Notifier + ?Sized,
    P: Progress + ?Sized,
{
    model: &'a M,
    options: &'a ExportOptions,
    notifier: &'a mut N,
    progress: &'a mut P,
    classification: Classification,
    variables: VariableCount,
    warnings: WarningBatch,
    aborted: bool,
}

impl<'a, M, N, P> ExportContext<'a, M, N, P>
where
    M: GridModel + ?Sized,
    N: Notifier + ?Sized,
    P: Progress + ?Sized,
{
    /// Check the catalog, then classify domains and resolve NDVAR.
    pub fn prepare(
        model: &'a M,
        options: &'a ExportOptions,
        notifier: &'a mut N,
        progress: &'a mut P,
    ) -> Result<Self, AdsExportError> {
        if let Err(err) = options.catalog.check_host_table() {
            notifier.error(0, &err.to_string());
            return Err(err);
        }
        if options.encoding == Encoding::Binary {
            options.byte_order.check_supported()?;
        }

        let classification = classify_model(&options.catalog, model);
        let variables = resolve_model_nd_var(model);

        let mut warnings = WarningBatch::new();
        warnings.extend(classification.warnings().iter().cloned());
        warnings.extend(variables.warning());
        warnings.flush(&mut *notifier);

        Ok(Self {
            model,
            options,
            notifier,
            progress,
            classification,
            variables,
            warnings,
            aborted: false,
        })
    }

    fn open(&self, extension: &str) -> Result<(PathBuf, BufWriter<File>), AdsExportError> {
        let path = self.options.file_path(extension);
        let file = create_file(&path)?;
        log::debug!("writing {}", path.display());
        Ok((path, BufWriter::new(file)))
    }

    /// Write `<base>.REST` in the configured encoding.
    pub fn write_rest_file(&mut self) -> Result<PathBuf, AdsExportError> {
        let rest = RestWriter::new(self.model, &self.classification, self.variables)?;
        let title = self.model.attribute(TITLE_ATTRIBUTE).unwrap_or_default();
        let (path, file) = self.open(REST_EXTENSION)?;
        let mut out = RecordWriter::new(file, self.options.encoding);
        let outcome = rest.write(&mut out, &title, &mut *self.progress)?;
        out.flush()?;
        if outcome == StreamOutcome::Incomplete {
            log::info!("export cancelled while writing {}", path.display());
            self.aborted = true;
        }
        Ok(path)
    }

    /// Write `<base>.BCVAL`.
    pub fn write_bcval_file(&mut self) -> Result<PathBuf, AdsExportError> {
        let (path, mut file) = self.open(BCVAL_EXTENSION)?;
        write_bcval(&mut file, &self.classification)?;
        file.flush()?;
        Ok(path)
    }

    /// Write `<base>.BCTYPE`.
    pub fn write_bctype_file(&mut self) -> Result<PathBuf, AdsExportError> {
        let (path, mut file) = self.open(BCTYPE_EXTENSION)?;
        write_bctype(&mut file, &self.classification)?;
        file.flush()?;
        Ok(path)
    }

    /// Write the whole triple, stopping early on cancellation.
    pub fn run(mut self) -> Result<ExportReport, AdsExportError> {
        let mut files = Vec::new();
        if self.progress.begin(MAJOR_STEPS) {
            files.push(self.write_rest_file()?);
            if !self.aborted {
                files.push(self.write_bcval_file()?);
                files.push(self.write_bctype_file()?);
            }
        } else {
            self.aborted = true;
        }

        let report = ExportReport {
            files,
            variables: self.variables,
            failed_domains: self.classification.failed_domains().to_vec(),
            warnings: self.warnings.iter().cloned().collect(),
            cancelled: self.aborted,
        };
        if !report.failed_domains.is_empty() {
            self.notifier.error(
                0,
                &format!(
                    "{} boundary condition(s) could not be read",
                    report.failed_domains.len()
                ),
            );
        }
        log::info!(
            "ADS export of {} finished (success: {})",
            self.options.base_path.display(),
            report.is_success()
        );
        Ok(report)
    }
}

fn create_file(path: &Path) -> Result<File, AdsExportError> {
    File::create(path).map_err(|source| AdsExportError::FileOpen {
        path: path.to_path_buf(),
        source,
    })
}

/// Run a complete export.
pub fn export_ads<M, N, P>(
    model: &M,
    options: &ExportOptions,
    notifier: &mut N,
    progress: &mut P,
) -> Result<ExportReport, AdsExportError>
where
    M: GridModel + ?Sized,
    N: Notifier + ?Sized,
    P: Progress + ?Sized,
{
    ExportContext::prepare(model, options, notifier, progress)?.run()
}

/// Export with logging side channels, collapsed to one success flag.
pub fn export_ads_files<M: GridModel + ?Sized>(model: &M, options: &ExportOptions) -> bool {
    match export_ads(model, options, &mut LogNotifier, &mut NullProgress) {
        Ok(report) => report.is_success(),
        Err(err) => {
            log::error!("ADS export failed: {err}");
            false
        }
    }
}
