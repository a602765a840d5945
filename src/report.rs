use serde::Serialize;
use std::path::PathBuf;

/// How a metadata response was persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonBody {
    Pretty,
    Raw,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub name: String,
    pub text_path: PathBuf,
    pub meta_path: PathBuf,
    pub meta_body: JsonBody,
    pub rmeta_path: PathBuf,
    pub rmeta_body: JsonBody,
    pub mime_row: String,
    pub language_row: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started: String,
    pub finished: String,
    pub samples_dir: PathBuf,
    pub out_dir: PathBuf,
    pub mime_summary: PathBuf,
    pub language_summary: PathBuf,
    pub files: Vec<FileOutcome>,
}
