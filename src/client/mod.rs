pub mod http;

use crate::config::Endpoints;
use anyhow::Result;
use std::path::Path;

pub use http::TikaClient;

/// One of the extraction server resources a sample is uploaded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Text,
    Meta,
    RecursiveMeta,
    Detect,
    Language,
}

impl Endpoint {
    pub const ALL: [Endpoint; 5] = [
        Endpoint::Text,
        Endpoint::Meta,
        Endpoint::RecursiveMeta,
        Endpoint::Detect,
        Endpoint::Language,
    ];

    pub fn path(self, endpoints: &Endpoints) -> &str {
        match self {
            Endpoint::Text => &endpoints.text,
            Endpoint::Meta => &endpoints.meta,
            Endpoint::RecursiveMeta => &endpoints.rmeta,
            Endpoint::Detect => &endpoints.detect,
            Endpoint::Language => &endpoints.language,
        }
    }

    pub fn accept(self) -> &'static str {
        match self {
            Endpoint::Meta | Endpoint::RecursiveMeta => "application/json",
            Endpoint::Text | Endpoint::Detect | Endpoint::Language => "text/plain",
        }
    }
}

pub trait Extractor {
    /// Uploads `file` to `endpoint` and returns the response body. Any non-2xx
    /// status, timeout or transport failure is an error.
    fn put(&self, endpoint: Endpoint, file: &Path) -> Result<String>;
}

impl<T: Extractor + ?Sized> Extractor for &T {
    fn put(&self, endpoint: Endpoint, file: &Path) -> Result<String> {
        (**self).put(endpoint, file)
    }
}
