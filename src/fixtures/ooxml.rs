//! Minimal Open Packaging Conventions writer shared by the XLSX and DOCX generators.
//!
//! Parts are written in insertion order with a fixed modification time so the
//! same content always produces the same archive bytes.

use anyhow::{Context, Result};
use quick_xml::escape::escape;
use std::borrow::Cow;
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

pub const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Created/modified timestamp stamped into every package.
pub const FIXTURE_DATE: &str = "2025-09-22T00:00:00Z";

pub const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
pub const REL_EXTENDED_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
pub const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
pub const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
pub const REL_NUMBERING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
pub const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
pub const REL_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

pub const CT_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
pub const CT_CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
pub const CT_EXTENDED_PROPERTIES: &str =
    "application/vnd.openxmlformats-officedocument.extended-properties+xml";

pub fn esc(s: &str) -> Cow<'_, str> {
    escape(s)
}

fn part_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
}

pub struct Package {
    zip: ZipWriter<Cursor<Vec<u8>>>,
}

impl Package {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    pub fn add_part(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.zip
            .start_file(name, part_options())
            .with_context(|| format!("starting package part {name}"))?;
        self.zip
            .write_all(bytes)
            .with_context(|| format!("writing package part {name}"))
    }

    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.zip.finish().with_context(|| "finishing package")?;
        Ok(cursor.into_inner())
    }
}

#[derive(Default)]
pub struct ContentTypes {
    defaults: Vec<(&'static str, &'static str)>,
    overrides: Vec<(String, &'static str)>,
}

impl ContentTypes {
    pub fn new() -> Self {
        let mut ct = Self::default();
        ct.add_default("rels", CT_RELATIONSHIPS);
        ct.add_default("xml", "application/xml");
        ct.add_override("/docProps/core.xml", CT_CORE_PROPERTIES);
        ct.add_override("/docProps/app.xml", CT_EXTENDED_PROPERTIES);
        ct
    }

    pub fn add_default(&mut self, extension: &'static str, content_type: &'static str) {
        self.defaults.push((extension, content_type));
    }

    pub fn add_override(&mut self, part: impl Into<String>, content_type: &'static str) {
        self.overrides.push((part.into(), content_type));
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::from(XML_DECL);
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        for (ext, ct) in &self.defaults {
            let _ = write!(xml, r#"<Default Extension="{ext}" ContentType="{ct}"/>"#);
        }
        for (part, ct) in &self.overrides {
            let _ = write!(xml, r#"<Override PartName="{}" ContentType="{ct}"/>"#, esc(part));
        }
        xml.push_str("</Types>");
        xml
    }
}

struct Relationship {
    id: String,
    kind: &'static str,
    target: String,
    external: bool,
}

/// A `.rels` part. Ids are assigned sequentially (`rId1`, `rId2`, ...).
#[derive(Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: &'static str, target: impl Into<String>) -> String {
        self.push(kind, target.into(), false)
    }

    pub fn add_external(&mut self, kind: &'static str, target: impl Into<String>) -> String {
        self.push(kind, target.into(), true)
    }

    fn push(&mut self, kind: &'static str, target: String, external: bool) -> String {
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push(Relationship {
            id: id.clone(),
            kind,
            target,
            external,
        });
        id
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::from(XML_DECL);
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for rel in &self.entries {
            let _ = write!(
                xml,
                r#"<Relationship Id="{}" Type="{}" Target="{}"{}/>"#,
                rel.id,
                rel.kind,
                esc(&rel.target),
                if rel.external { r#" TargetMode="External""# } else { "" }
            );
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// Package-level relationships pointing at the main part and both property parts.
pub fn root_relationships(main_part: &str) -> Relationships {
    let mut rels = Relationships::new();
    rels.add(REL_OFFICE_DOCUMENT, main_part);
    rels.add(REL_CORE_PROPERTIES, "docProps/core.xml");
    rels.add(REL_EXTENDED_PROPERTIES, "docProps/app.xml");
    rels
}

#[derive(Debug, Default, Clone)]
pub struct CoreProperties<'a> {
    pub title: Option<&'a str>,
    pub subject: Option<&'a str>,
    pub creator: Option<&'a str>,
    pub keywords: Option<&'a str>,
    pub description: Option<&'a str>,
}

impl CoreProperties<'_> {
    pub fn to_xml(&self) -> String {
        let mut xml = String::from(XML_DECL);
        xml.push_str(concat!(
            r#"<cp:coreProperties"#,
            r#" xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties""#,
            r#" xmlns:dc="http://purl.org/dc/elements/1.1/""#,
            r#" xmlns:dcterms="http://purl.org/dc/terms/""#,
            r#" xmlns:dcmitype="http://purl.org/dc/dcmitype/""#,
            r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
        ));
        let fields = [
            ("dc:title", self.title),
            ("dc:subject", self.subject),
            ("dc:creator", self.creator),
            ("cp:keywords", self.keywords),
            ("dc:description", self.description),
            ("cp:lastModifiedBy", self.creator),
        ];
        for (tag, value) in fields {
            if let Some(v) = value {
                let _ = write!(xml, "<{tag}>{}</{tag}>", esc(v));
            }
        }
        for tag in ["dcterms:created", "dcterms:modified"] {
            let _ = write!(xml, r#"<{tag} xsi:type="dcterms:W3CDTF">{FIXTURE_DATE}</{tag}>"#);
        }
        xml.push_str("</cp:coreProperties>");
        xml
    }
}

pub fn app_properties_xml() -> String {
    format!(
        concat!(
            "{}",
            r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties""#,
            r#" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
            "<Application>{}</Application></Properties>"
        ),
        XML_DECL,
        env!("CARGO_PKG_NAME")
    )
}
