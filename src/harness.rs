use crate::{
    client::{Endpoint, Extractor},
    config::Config,
    report::{FileOutcome, JsonBody, RunReport},
    util::{ensure_dir, now_rfc3339, write_file},
};
use anyhow::{anyhow, Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Output directories, created before the first request.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub text: PathBuf,
    pub meta: PathBuf,
    pub rmeta: PathBuf,
}

impl OutputLayout {
    pub fn prepare(cfg: &Config, root: &Path) -> Result<Self> {
        let layout = Self {
            root: root.to_path_buf(),
            text: root.join(&cfg.output.text_dir),
            meta: root.join(&cfg.output.meta_dir),
            rmeta: root.join(&cfg.output.rmeta_dir),
        };
        for dir in [&layout.text, &layout.meta, &layout.rmeta] {
            ensure_dir(dir)?;
        }
        Ok(layout)
    }
}

pub struct Harness<E: Extractor> {
    cfg: Config,
    extractor: E,
}

impl<E: Extractor> Harness<E> {
    pub fn new(cfg: &Config, extractor: E) -> Self {
        Self {
            cfg: cfg.clone(),
            extractor,
        }
    }

    /// Uploads every sample in name order. The first failure aborts the run and
    /// no later sample is sent.
    pub fn run(&self, samples_dir: &Path, out_dir: &Path) -> Result<RunReport> {
        let started = now_rfc3339();
        let layout = OutputLayout::prepare(&self.cfg, out_dir)?;
        let samples = list_samples(samples_dir)?;
        info!("{} samples in {}", samples.len(), samples_dir.display());

        let mut files = Vec::with_capacity(samples.len());
        let mut written: HashSet<PathBuf> = HashSet::new();
        for sample in &samples {
            let outcome = self
                .process_file(sample, &layout)
                .with_context(|| format!("processing {}", sample.display()))?;
            for path in [&outcome.meta_path, &outcome.rmeta_path] {
                if !written.insert(path.clone()) {
                    warn!("{} overwritten by {}", path.display(), outcome.name);
                }
            }
            files.push(outcome);
        }

        let mime_rows: Vec<&str> = files.iter().map(|f| f.mime_row.as_str()).collect();
        let language_rows: Vec<&str> = files.iter().map(|f| f.language_row.as_str()).collect();
        let mime_summary = layout.root.join(&self.cfg.output.mime_summary);
        let language_summary = layout.root.join(&self.cfg.output.language_summary);
        write_file(&mime_summary, mime_rows.join("\n"))?;
        write_file(&language_summary, language_rows.join("\n"))?;

        Ok(RunReport {
            started,
            finished: now_rfc3339(),
            samples_dir: samples_dir.to_path_buf(),
            out_dir: out_dir.to_path_buf(),
            mime_summary,
            language_summary,
            files,
        })
    }

    /// Runs the five requests for one sample and persists the three file outputs.
    /// The two summary rows are returned for the caller to collect.
    pub fn process_file(&self, file: &Path, layout: &OutputLayout) -> Result<FileOutcome> {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow!("sample has no file name: {}", file.display()))?;
        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone());
        info!("extracting {name}");

        let text = self.extractor.put(Endpoint::Text, file)?;
        let text_path = layout.text.join(format!("{name}.txt"));
        write_file(&text_path, text)?;

        let meta = self.extractor.put(Endpoint::Meta, file)?;
        let meta_path = layout.meta.join(format!("{stem}.json"));
        let meta_body = write_json_or_raw(&meta_path, &meta)?;

        let rmeta = self.extractor.put(Endpoint::RecursiveMeta, file)?;
        let rmeta_path = layout.rmeta.join(format!("{stem}.json"));
        let rmeta_body = write_json_or_raw(&rmeta_path, &rmeta)?;

        let mime = self.extractor.put(Endpoint::Detect, file)?;
        let language = self.extractor.put(Endpoint::Language, file)?;

        Ok(FileOutcome {
            mime_row: summary_row(&name, &mime),
            language_row: summary_row(&name, &language),
            name,
            text_path,
            meta_path,
            meta_body,
            rmeta_path,
            rmeta_body,
        })
    }
}

/// Regular files directly under `dir`, sorted by file name.
pub fn list_samples(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("reading samples dir {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        files.push(path);
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Pretty-prints `body` when it parses as JSON (2-space indent, non-ASCII kept
/// literal, key order kept), otherwise writes it unchanged.
pub fn write_json_or_raw(path: &Path, body: &str) -> Result<JsonBody> {
    let pretty = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok());
    match pretty {
        Some(pretty) => {
            write_file(path, pretty)?;
            Ok(JsonBody::Pretty)
        }
        None => {
            warn!("{} is not valid JSON; keeping raw response", path.display());
            write_file(path, body)?;
            Ok(JsonBody::Raw)
        }
    }
}

pub fn summary_row(name: &str, body: &str) -> String {
    format!("{name}\t{}", body.trim())
}
