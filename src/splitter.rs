//! Splitting a worksheet into several smaller workbooks
//!
//! The first sheet of the source workbook is loaded once. Its first row is
//! the header; every following row is a data row. Data rows are cut into
//! consecutive chunks of at most `rows_per_file` rows and each chunk is
//! written, after a copy of the header, to `{base_name}-{index}.xlsx` next
//! to the source file.

use crate::error::{ExcelError, Result};
use crate::reader::ExcelReader;
use crate::writer::ExcelWriter;
use log::{debug, info};
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Data rows per output file when nothing else is configured
pub const DEFAULT_ROWS_PER_FILE: usize = 1000;

/// Extension accepted for source files (compared case-sensitively)
const SOURCE_EXTENSION: &str = "xlsx";

/// Rule deciding when a sheet is small enough to be left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitThreshold {
    /// Skip when the data rows (header excluded) fit in one file
    #[default]
    DataRows,
    /// Skip when all rows, header included, fit in one file
    ///
    /// A sheet holding exactly `rows_per_file` data rows is still rewritten
    /// as a single chunk under this rule.
    TotalRows,
}

/// Options for a split run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitOptions {
    rows_per_file: usize,
    threshold: SplitThreshold,
}

impl SplitOptions {
    /// Options with a custom chunk size; zero is rejected
    pub fn new(rows_per_file: usize) -> Result<Self> {
        if rows_per_file == 0 {
            return Err(ExcelError::InvalidRowsPerFile(rows_per_file));
        }

        Ok(SplitOptions {
            rows_per_file,
            threshold: SplitThreshold::default(),
        })
    }

    /// Replace the no-split rule
    pub fn with_threshold(mut self, threshold: SplitThreshold) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn rows_per_file(&self) -> usize {
        self.rows_per_file
    }

    pub fn threshold(&self) -> SplitThreshold {
        self.threshold
    }
}

impl Default for SplitOptions {
    fn default() -> Self {
        SplitOptions {
            rows_per_file: DEFAULT_ROWS_PER_FILE,
            threshold: SplitThreshold::default(),
        }
    }
}

/// Sheet rows assigned to one output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    /// 1-based chunk number, used in the output file name
    pub index: usize,
    /// First sheet row of the chunk (0-based, header is row 0)
    pub start: usize,
    /// One past the last sheet row of the chunk
    pub end: usize,
}

impl ChunkRange {
    /// Number of data rows in the chunk
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Sheet rows covered by the chunk
    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Result of chunk planning
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitPlan {
    /// The sheet fits in one file
    NotNeeded,
    /// Chunks in output order, covering every data row exactly once
    Chunks(Vec<ChunkRange>),
}

/// Cut `total_rows` sheet rows (header included) into chunks
///
/// # Examples
///
/// ```
/// use excelsplit::splitter::{plan_chunks, SplitOptions, SplitPlan};
///
/// let options = SplitOptions::new(1000).unwrap();
/// match plan_chunks(2501, &options) {
///     SplitPlan::Chunks(chunks) => {
///         let sizes: Vec<_> = chunks.iter().map(|c| c.len()).collect();
///         assert_eq!(sizes, vec![1000, 1000, 500]);
///     }
///     SplitPlan::NotNeeded => unreachable!(),
/// }
/// ```
pub fn plan_chunks(total_rows: usize, options: &SplitOptions) -> SplitPlan {
    let per_file = options.rows_per_file;
    let data_rows = total_rows.saturating_sub(1);

    let fits = match options.threshold {
        SplitThreshold::DataRows => data_rows <= per_file,
        SplitThreshold::TotalRows => total_rows <= per_file,
    };
    if fits || data_rows == 0 {
        return SplitPlan::NotNeeded;
    }

    let file_count = data_rows.div_ceil(per_file);
    let chunks = (1..=file_count)
        .map(|index| ChunkRange {
            index,
            start: 1 + (index - 1) * per_file,
            end: 1 + (index * per_file).min(data_rows),
        })
        .collect();

    SplitPlan::Chunks(chunks)
}

/// Output file name for chunk `index` of a source whose stem is `base_name`
pub fn chunk_file_name(base_name: &str, index: usize) -> String {
    format!("{}-{}.{}", base_name, index, SOURCE_EXTENSION)
}

/// Progress notifications emitted while splitting
#[derive(Debug, Clone, PartialEq)]
pub enum SplitEvent {
    /// Source passed validation
    Started {
        file_name: String,
        rows_per_file: usize,
    },
    /// Source sheet loaded
    Loaded {
        sheet_name: String,
        total_rows: usize,
    },
    /// Chunks computed; `file_count` files are about to be written
    Planned { file_count: usize },
    /// One output file finalized
    ChunkWritten {
        index: usize,
        path: PathBuf,
        data_rows: usize,
    },
}

/// One written output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFile {
    pub path: PathBuf,
    pub data_rows: usize,
}

/// What a split run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    /// The sheet already fits in one file; nothing was written
    NotNeeded { total_rows: usize },
    /// Output files in chunk order
    Split {
        total_rows: usize,
        files: Vec<ChunkFile>,
    },
}

impl SplitOutcome {
    /// Files written by the run (empty when no split was needed)
    pub fn files(&self) -> &[ChunkFile] {
        match self {
            SplitOutcome::NotNeeded { .. } => &[],
            SplitOutcome::Split { files, .. } => files,
        }
    }
}

/// Splits XLSX workbooks according to a set of [`SplitOptions`]
#[derive(Debug, Clone, Default)]
pub struct Splitter {
    options: SplitOptions,
}

impl Splitter {
    pub fn new(options: SplitOptions) -> Self {
        Splitter { options }
    }

    pub fn options(&self) -> &SplitOptions {
        &self.options
    }

    /// Split the workbook at `path`
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use excelsplit::splitter::{SplitOptions, SplitOutcome, Splitter};
    ///
    /// let splitter = Splitter::new(SplitOptions::new(500)?);
    /// if let SplitOutcome::Split { files, .. } = splitter.split("orders.xlsx")? {
    ///     println!("wrote {} files", files.len());
    /// }
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn split<P: AsRef<Path>>(&self, path: P) -> Result<SplitOutcome> {
        self.split_with_progress(path, |_| {})
    }

    /// Split the workbook at `path`, reporting each step to `progress`
    ///
    /// Files written before an error stay on disk.
    pub fn split_with_progress<P, F>(&self, path: P, mut progress: F) -> Result<SplitOutcome>
    where
        P: AsRef<Path>,
        F: FnMut(&SplitEvent),
    {
        let path = path.as_ref();
        validate_source(path)?;

        let out_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let base_name = path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        info!(
            "splitting {} into files of at most {} data rows",
            path.display(),
            self.options.rows_per_file
        );
        progress(&SplitEvent::Started {
            file_name,
            rows_per_file: self.options.rows_per_file,
        });

        let mut reader = ExcelReader::open(path)?;
        let sheet = reader.first_worksheet()?;
        let total_rows = sheet.row_count();

        info!("sheet '{}' holds {} rows", sheet.name(), total_rows);
        progress(&SplitEvent::Loaded {
            sheet_name: sheet.name().to_string(),
            total_rows,
        });

        let chunks = match plan_chunks(total_rows, &self.options) {
            SplitPlan::NotNeeded => {
                info!("{} rows fit in a single file, nothing to split", total_rows);
                return Ok(SplitOutcome::NotNeeded { total_rows });
            }
            SplitPlan::Chunks(chunks) => chunks,
        };

        progress(&SplitEvent::Planned {
            file_count: chunks.len(),
        });

        let header = sheet.row(0);
        let mut files = Vec::with_capacity(chunks.len());

        for chunk in &chunks {
            let out_path = out_dir.join(chunk_file_name(&base_name, chunk.index));
            debug!(
                "chunk {}: sheet rows {}..{} -> {}",
                chunk.index,
                chunk.start,
                chunk.end,
                out_path.display()
            );

            let mut writer = ExcelWriter::with_sheet_name(&out_path, sheet.name())?;
            writer.write_row(&header.cells)?;
            let data_rows = writer.write_rows(sheet.rows(chunk.rows()))?;
            writer.save()?;

            progress(&SplitEvent::ChunkWritten {
                index: chunk.index,
                path: out_path.clone(),
                data_rows,
            });
            files.push(ChunkFile {
                path: out_path,
                data_rows,
            });
        }

        info!("wrote {} files from {}", files.len(), path.display());
        Ok(SplitOutcome::Split { total_rows, files })
    }
}

/// Split `path` into files of at most `rows_per_file` data rows
pub fn split_file<P: AsRef<Path>>(path: P, rows_per_file: usize) -> Result<SplitOutcome> {
    Splitter::new(SplitOptions::new(rows_per_file)?).split(path)
}

fn validate_source(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ExcelError::NotFound(path.to_path_buf()));
    }

    match path.extension().and_then(|ext| ext.to_str()) {
        Some(SOURCE_EXTENSION) => Ok(()),
        _ => Err(ExcelError::UnsupportedFormat(path.to_path_buf())),
    }
}
