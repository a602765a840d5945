//! WordprocessingML document: heading, mixed-format runs, an external
//! hyperlink, a bulleted list, a 3x3 table and the logo as an inline picture.

use super::logo::Logo;
use super::ooxml::{
    app_properties_xml, esc, root_relationships, ContentTypes, CoreProperties, Package,
    Relationships, REL_HYPERLINK, REL_IMAGE, REL_NUMBERING, REL_STYLES, XML_DECL,
};
use anyhow::Result;
use std::fmt::Write as _;

const CT_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
const CT_NUMBERING: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";

pub const TITLE: &str = "Tika DOCX Sample";
pub const AUTHOR: &str = "Tika Samples";
pub const SUBJECT: &str = "Paragraphs, lists, table, image, hyperlink";
pub const KEYWORDS: &str = "tika, docx, sample";
pub const LINK_TEXT: &str = "Apache Tika website";
pub const LINK_URL: &str = "https://tika.apache.org/";
pub const HYPERLINK_COLOR: &str = "0000FF";

const EMU_PER_INCH: u64 = 914_400;
const PICTURE_WIDTH_EMU: u64 = 2 * EMU_PER_INCH;
const BULLET_NUM_ID: u32 = 1;

#[derive(Debug, Default, Clone, Copy)]
pub struct RunFormat {
    pub bold: bool,
    pub italic: bool,
}

impl RunFormat {
    pub const PLAIN: Self = Self {
        bold: false,
        italic: false,
    };
    pub const BOLD: Self = Self {
        bold: true,
        italic: false,
    };
    pub const ITALIC: Self = Self {
        bold: false,
        italic: true,
    };
}

/// A `w:p` under construction. Content is kept as serialized child elements.
#[derive(Debug, Default, Clone)]
pub struct Paragraph {
    style: Option<&'static str>,
    numbering: Option<u32>,
    content: String,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn styled(style: &'static str) -> Self {
        Self {
            style: Some(style),
            ..Self::default()
        }
    }

    pub fn run(mut self, text: &str, format: RunFormat) -> Self {
        self.push_run(text, format);
        self
    }

    pub fn push_run(&mut self, text: &str, format: RunFormat) {
        let mut props = String::new();
        if format.bold {
            props.push_str("<w:b/>");
        }
        if format.italic {
            props.push_str("<w:i/>");
        }
        self.content.push_str(&run_xml(&props, text));
    }

    pub fn to_xml(&self) -> String {
        let mut ppr = String::new();
        if let Some(style) = self.style {
            let _ = write!(ppr, r#"<w:pStyle w:val="{style}"/>"#);
        }
        if let Some(num_id) = self.numbering {
            let _ = write!(
                ppr,
                r#"<w:numPr><w:ilvl w:val="0"/><w:numId w:val="{num_id}"/></w:numPr>"#
            );
        }
        if ppr.is_empty() {
            format!("<w:p>{}</w:p>", self.content)
        } else {
            format!("<w:p><w:pPr>{ppr}</w:pPr>{}</w:p>", self.content)
        }
    }
}

fn run_xml(props: &str, text: &str) -> String {
    let rpr = if props.is_empty() {
        String::new()
    } else {
        format!("<w:rPr>{props}</w:rPr>")
    };
    format!(r#"<w:r>{rpr}<w:t xml:space="preserve">{}</w:t></w:r>"#, esc(text))
}

/// Appends a hyperlink run to `paragraph`: registers an external relationship
/// for `url` in `rels` and wraps a single underlined, blue run of `text` in a
/// `w:hyperlink` pointing at it.
pub fn append_hyperlink(paragraph: &mut Paragraph, rels: &mut Relationships, text: &str, url: &str) {
    let rid = rels.add_external(REL_HYPERLINK, url);
    let props = format!(r#"<w:color w:val="{HYPERLINK_COLOR}"/><w:u w:val="single"/>"#);
    let _ = write!(
        paragraph.content,
        r#"<w:hyperlink r:id="{rid}">{}</w:hyperlink>"#,
        run_xml(&props, text)
    );
}

/// Body blocks plus the part relationships they reference.
struct DocumentBody {
    blocks: Vec<String>,
    rels: Relationships,
    next_drawing_id: u32,
}

impl DocumentBody {
    fn new() -> Self {
        let mut rels = Relationships::new();
        rels.add(REL_STYLES, "styles.xml");
        rels.add(REL_NUMBERING, "numbering.xml");
        Self {
            blocks: Vec::new(),
            rels,
            next_drawing_id: 1,
        }
    }

    fn paragraph(&mut self, p: Paragraph) {
        self.blocks.push(p.to_xml());
    }

    fn heading(&mut self, text: &str) {
        self.paragraph(Paragraph::styled("Heading1").run(text, RunFormat::PLAIN));
    }

    fn bullet(&mut self, text: &str) {
        let mut p = Paragraph::styled("ListBullet").run(text, RunFormat::PLAIN);
        p.numbering = Some(BULLET_NUM_ID);
        self.paragraph(p);
    }

    fn table(&mut self, cells: &[Vec<String>], style: &str) {
        let cols = cells.first().map(Vec::len).unwrap_or(0);
        let col_width = 9360 / cols.max(1);
        let mut xml = String::from("<w:tbl><w:tblPr>");
        let _ = write!(
            xml,
            r#"<w:tblStyle w:val="{style}"/><w:tblW w:w="0" w:type="auto"/><w:tblLook w:val="04A0"/>"#
        );
        xml.push_str("</w:tblPr><w:tblGrid>");
        for _ in 0..cols {
            let _ = write!(xml, r#"<w:gridCol w:w="{col_width}"/>"#);
        }
        xml.push_str("</w:tblGrid>");
        for row in cells {
            xml.push_str("<w:tr>");
            for cell in row {
                let _ = write!(
                    xml,
                    r#"<w:tc><w:tcPr><w:tcW w:w="{col_width}" w:type="dxa"/></w:tcPr>{}</w:tc>"#,
                    Paragraph::new().run(cell, RunFormat::PLAIN).to_xml()
                );
            }
            xml.push_str("</w:tr>");
        }
        xml.push_str("</w:tbl>");
        self.blocks.push(xml);
    }

    /// Inline picture scaled to `width_emu`, height following the image aspect ratio.
    fn picture(&mut self, media_target: &str, name: &str, px: (u32, u32), width_emu: u64) {
        let rid = self.rels.add(REL_IMAGE, media_target);
        let (w, h) = px;
        let height_emu = width_emu * u64::from(h) / u64::from(w.max(1));
        let id = self.next_drawing_id;
        self.next_drawing_id += 1;
        let mut xml = String::from("<w:p><w:r><w:drawing>");
        let _ = write!(
            xml,
            concat!(
                r#"<wp:inline distT="0" distB="0" distL="0" distR="0">"#,
                r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
                r#"<wp:docPr id="{id}" name="Picture {id}"/>"#,
                r#"<wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr>"#,
                r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
                r#"<pic:pic><pic:nvPicPr><pic:cNvPr id="0" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
                r#"<pic:blipFill><a:blip r:embed="{rid}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
                r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
                r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic>"#,
                r#"</a:graphicData></a:graphic></wp:inline>"#
            ),
            cx = width_emu,
            cy = height_emu,
            id = id,
            name = esc(name),
            rid = rid,
        );
        xml.push_str("</w:drawing></w:r></w:p>");
        self.blocks.push(xml);
    }

    fn to_xml(&self) -> String {
        let mut xml = String::from(XML_DECL);
        xml.push_str(concat!(
            r#"<w:document"#,
            r#" xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#,
            r#" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#,
            r#" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing""#,
            r#" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main""#,
            r#" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            "<w:body>"
        ));
        for block in &self.blocks {
            xml.push_str(block);
        }
        xml.push_str(concat!(
            r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/>"#,
            r#"<w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/>"#,
            "</w:sectPr></w:body></w:document>"
        ));
        xml
    }
}

pub fn build(logo: &Logo) -> Result<Vec<u8>> {
    let mut body = DocumentBody::new();

    body.heading("Tika Test Document");
    body.paragraph(
        Paragraph::new()
            .run("This is a ", RunFormat::PLAIN)
            .run("sample", RunFormat::BOLD)
            .run(" DOCX file with ", RunFormat::PLAIN)
            .run("varied", RunFormat::ITALIC)
            .run(" content.", RunFormat::PLAIN),
    );

    let mut link = Paragraph::new();
    append_hyperlink(&mut link, &mut body.rels, LINK_TEXT, LINK_URL);
    body.paragraph(link);

    for item in ["Text extraction", "Tables", "Images", "Unicode – 你好, Привет, 😀"] {
        body.bullet(item);
    }

    let cells: Vec<Vec<String>> = (1..=3)
        .map(|r| (1..=3).map(|c| format!("R{r}C{c}")).collect())
        .collect();
    body.table(&cells, "LightShading");

    body.picture(
        "media/logo.png",
        "logo.png",
        (logo.width(), logo.height()),
        PICTURE_WIDTH_EMU,
    );

    let mut content_types = ContentTypes::new();
    content_types.add_default("png", "image/png");
    content_types.add_override("/word/document.xml", CT_DOCUMENT);
    content_types.add_override("/word/styles.xml", CT_STYLES);
    content_types.add_override("/word/numbering.xml", CT_NUMBERING);

    let core = CoreProperties {
        title: Some(TITLE),
        subject: Some(SUBJECT),
        creator: Some(AUTHOR),
        keywords: Some(KEYWORDS),
        ..Default::default()
    };

    let mut pkg = Package::new();
    pkg.add_part("[Content_Types].xml", content_types.to_xml().as_bytes())?;
    pkg.add_part("_rels/.rels", root_relationships("word/document.xml").to_xml().as_bytes())?;
    pkg.add_part("docProps/core.xml", core.to_xml().as_bytes())?;
    pkg.add_part("docProps/app.xml", app_properties_xml().as_bytes())?;
    pkg.add_part("word/document.xml", body.to_xml().as_bytes())?;
    pkg.add_part("word/_rels/document.xml.rels", body.rels.to_xml().as_bytes())?;
    pkg.add_part("word/styles.xml", STYLES_XML.as_bytes())?;
    pkg.add_part("word/numbering.xml", NUMBERING_XML.as_bytes())?;
    pkg.add_part("word/media/logo.png", &logo.png)?;
    pkg.finish()
}

const STYLES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    r#"<w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:eastAsia="Calibri" w:cs="Calibri"/>"#,
    r#"<w:sz w:val="22"/><w:szCs w:val="22"/><w:lang w:val="en-US"/></w:rPr></w:rPrDefault>"#,
    r#"<w:pPrDefault><w:pPr><w:spacing w:after="200" w:line="276" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults>"#,
    r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#,
    r#"<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/>"#,
    r#"<w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="480" w:after="0"/><w:outlineLvl w:val="0"/></w:pPr>"#,
    r#"<w:rPr><w:b/><w:color w:val="365F91"/><w:sz w:val="28"/><w:szCs w:val="28"/></w:rPr></w:style>"#,
    r#"<w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/><w:basedOn w:val="Normal"/>"#,
    r#"<w:pPr><w:numPr><w:numId w:val="1"/></w:numPr><w:contextualSpacing/></w:pPr></w:style>"#,
    r#"<w:style w:type="character" w:styleId="Hyperlink"><w:name w:val="Hyperlink"/>"#,
    r#"<w:rPr><w:color w:val="0000FF"/><w:u w:val="single"/></w:rPr></w:style>"#,
    r#"<w:style w:type="table" w:default="1" w:styleId="TableNormal"><w:name w:val="Normal Table"/>"#,
    r#"<w:tblPr><w:tblInd w:w="0" w:type="dxa"/><w:tblCellMar><w:top w:w="0" w:type="dxa"/><w:left w:w="108" w:type="dxa"/>"#,
    r#"<w:bottom w:w="0" w:type="dxa"/><w:right w:w="108" w:type="dxa"/></w:tblCellMar></w:tblPr></w:style>"#,
    r#"<w:style w:type="table" w:styleId="LightShading"><w:name w:val="Light Shading"/><w:basedOn w:val="TableNormal"/>"#,
    r#"<w:rPr><w:color w:val="000000"/></w:rPr><w:tblPr><w:tblBorders>"#,
    r#"<w:top w:val="single" w:sz="8" w:space="0" w:color="000000"/>"#,
    r#"<w:bottom w:val="single" w:sz="8" w:space="0" w:color="000000"/>"#,
    r#"</w:tblBorders></w:tblPr></w:style>"#,
    r#"</w:styles>"#,
);

const NUMBERING_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    r#"<w:abstractNum w:abstractNumId="0"><w:multiLevelType w:val="singleLevel"/>"#,
    r#"<w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="•"/><w:lvlJc w:val="left"/>"#,
    r#"<w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum>"#,
    r#"<w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>"#,
    r#"</w:numbering>"#,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyperlink_registers_external_relationship() {
        let mut rels = Relationships::new();
        rels.add(REL_STYLES, "styles.xml");
        let mut p = Paragraph::new();
        append_hyperlink(&mut p, &mut rels, "Docs & more", "https://example.org/");

        let xml = p.to_xml();
        assert!(xml.contains(r#"<w:hyperlink r:id="rId2">"#));
        assert!(xml.contains(r#"<w:u w:val="single"/>"#));
        assert!(xml.contains(r#"<w:color w:val="0000FF"/>"#));
        assert!(xml.contains("Docs &amp; more"));
        assert!(rels.to_xml().contains(r#"Target="https://example.org/" TargetMode="External""#));
    }

    #[test]
    fn runs_carry_bold_and_italic() {
        let p = Paragraph::new()
            .run("a", RunFormat::BOLD)
            .run("b", RunFormat::ITALIC);
        let xml = p.to_xml();
        assert!(xml.contains(r#"<w:rPr><w:b/></w:rPr><w:t xml:space="preserve">a</w:t>"#));
        assert!(xml.contains(r#"<w:rPr><w:i/></w:rPr><w:t xml:space="preserve">b</w:t>"#));
    }

    #[test]
    fn heading_references_a_defined_style() {
        let mut body = DocumentBody::new();
        body.heading("Title");
        assert!(body.blocks[0].contains(r#"<w:pStyle w:val="Heading1"/>"#));
        assert!(STYLES_XML.contains(r#"w:styleId="Heading1""#));
        assert_eq!(STYLES_XML.matches(r#"w:type="paragraph" w:styleId="Heading"#).count(), 1);
    }

    #[test]
    fn picture_keeps_aspect_ratio() {
        let mut body = DocumentBody::new();
        body.picture("media/logo.png", "logo.png", (400, 200), PICTURE_WIDTH_EMU);
        let xml = &body.blocks[0];
        assert!(xml.contains(r#"<wp:extent cx="1828800" cy="914400"/>"#));
        assert!(xml.contains(r#"r:embed="rId3""#));
    }
}
