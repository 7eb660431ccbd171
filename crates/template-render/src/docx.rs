//! Word-processing interior template
//!
//! A minimal WordprocessingML package: one section sized to the trim with
//! mirrored margins, so the gutter follows the binding edge on every page.

use template_geometry::InteriorGeometry;
use template_geometry::constants::in_to_twips;
use template_geometry::legend::{format_dimension, format_inches};

use crate::container::{Compression, ZipWriter};
use crate::types::*;
use crate::xml::XmlDoc;

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const PACKAGE_RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const OFFICE_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Header and footer distance in twips (half an inch)
const HEADER_DISTANCE: &str = "720";
/// Title run size in half-points
const TITLE_HALF_POINTS: &str = "32";

/// Interior template for word processors
pub struct InteriorDocx;

impl TemplateRenderer<InteriorGeometry> for InteriorDocx {
    fn entry_name(&self) -> &'static str {
        "Interior/interior.docx"
    }

    fn render(&self, geometry: &InteriorGeometry, _ctx: &RenderContext) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new();
        zip.add_file("[Content_Types].xml", &content_types()?, Compression::Deflated)?;
        zip.add_file("_rels/.rels", &package_rels()?, Compression::Deflated)?;
        zip.add_file("word/document.xml", &document(geometry)?, Compression::Deflated)?;
        zip.add_file("word/settings.xml", &settings()?, Compression::Deflated)?;
        zip.add_file(
            "word/_rels/document.xml.rels",
            &document_rels()?,
            Compression::Deflated,
        )?;
        zip.add_file("docProps/core.xml", &core_properties(geometry)?, Compression::Deflated)?;
        let bytes = zip.finish()?;
        log::debug!("Rendered interior DOCX: {} bytes", bytes.len());
        Ok(bytes)
    }
}

fn content_types() -> Result<Vec<u8>> {
    let mut xml = XmlDoc::new()?;
    xml.start("Types", &[("xmlns", CONTENT_TYPES_NS)])?;
    xml.empty(
        "Default",
        &[
            ("Extension", "rels"),
            ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        ],
    )?;
    xml.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;
    let overrides = [
        (
            "/word/document.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
        ),
        (
            "/word/settings.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml",
        ),
        (
            "/docProps/core.xml",
            "application/vnd.openxmlformats-package.core-properties+xml",
        ),
    ];
    for (part, content_type) in overrides {
        xml.empty(
            "Override",
            &[("PartName", part), ("ContentType", content_type)],
        )?;
    }
    xml.end("Types")?;
    Ok(xml.finish())
}

fn package_rels() -> Result<Vec<u8>> {
    let document_type = format!("{}/officeDocument", OFFICE_REL);
    let mut xml = XmlDoc::new()?;
    xml.start("Relationships", &[("xmlns", PACKAGE_RELS_NS)])?;
    xml.empty(
        "Relationship",
        &[
            ("Id", "rId1"),
            ("Type", document_type.as_str()),
            ("Target", "word/document.xml"),
        ],
    )?;
    xml.empty(
        "Relationship",
        &[
            ("Id", "rId2"),
            (
                "Type",
                "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties",
            ),
            ("Target", "docProps/core.xml"),
        ],
    )?;
    xml.end("Relationships")?;
    Ok(xml.finish())
}

fn document_rels() -> Result<Vec<u8>> {
    let settings_type = format!("{}/settings", OFFICE_REL);
    let mut xml = XmlDoc::new()?;
    xml.start("Relationships", &[("xmlns", PACKAGE_RELS_NS)])?;
    xml.empty(
        "Relationship",
        &[
            ("Id", "rId1"),
            ("Type", settings_type.as_str()),
            ("Target", "settings.xml"),
        ],
    )?;
    xml.end("Relationships")?;
    Ok(xml.finish())
}

fn settings() -> Result<Vec<u8>> {
    let mut xml = XmlDoc::new()?;
    xml.start("w:settings", &[("xmlns:w", WORD_NS)])?;
    xml.empty("w:mirrorMargins", &[])?;
    xml.empty("w:defaultTabStop", &[("w:val", "720")])?;
    xml.end("w:settings")?;
    Ok(xml.finish())
}

/// Single-run paragraph
fn paragraph(xml: &mut XmlDoc, bold: bool, italic: bool, size: Option<&str>, text: &str) -> Result<()> {
    xml.start("w:p", &[])?;
    xml.start("w:r", &[])?;
    if bold || italic || size.is_some() {
        xml.start("w:rPr", &[])?;
        if bold {
            xml.empty("w:b", &[])?;
        }
        if italic {
            xml.empty("w:i", &[])?;
        }
        if let Some(size) = size {
            xml.empty("w:sz", &[("w:val", size)])?;
        }
        xml.end("w:rPr")?;
    }
    xml.text_element("w:t", &[("xml:space", "preserve")], text)?;
    xml.end("w:r")?;
    xml.end("w:p")
}

fn document(geometry: &InteriorGeometry) -> Result<Vec<u8>> {
    let twips = |inches: f64| in_to_twips(inches).to_string();
    let description = format!(
        "This document is formatted for a {:.3}\" x {:.3}\" book with a \"{}\" binding.",
        geometry.trim_width, geometry.trim_height, geometry.binding_name
    );
    let margins = format!(
        "Margins: top {}, bottom {}, inside (gutter) {} for {} pages, outside {}.",
        format_inches(geometry.top),
        format_inches(geometry.bottom),
        format_inches(geometry.gutter),
        geometry.page_count,
        format_inches(geometry.outside)
    );

    let mut xml = XmlDoc::new()?;
    xml.start("w:document", &[("xmlns:w", WORD_NS)])?;
    xml.start("w:body", &[])?;

    paragraph(&mut xml, true, false, Some(TITLE_HALF_POINTS), "Book Interior Template")?;
    paragraph(&mut xml, false, true, None, &description)?;
    paragraph(&mut xml, false, false, None, &margins)?;
    paragraph(
        &mut xml,
        false,
        false,
        None,
        "You can start writing your book's interior content here. \
         The page size and margins are already set up for you.",
    )?;

    xml.start("w:sectPr", &[])?;
    xml.empty(
        "w:pgSz",
        &[
            ("w:w", twips(geometry.trim_width).as_str()),
            ("w:h", twips(geometry.trim_height).as_str()),
        ],
    )?;
    // With mirrored margins, left is the inside edge
    xml.empty(
        "w:pgMar",
        &[
            ("w:top", twips(geometry.top).as_str()),
            ("w:right", twips(geometry.outside).as_str()),
            ("w:bottom", twips(geometry.bottom).as_str()),
            ("w:left", twips(geometry.gutter).as_str()),
            ("w:header", HEADER_DISTANCE),
            ("w:footer", HEADER_DISTANCE),
            ("w:gutter", "0"),
        ],
    )?;
    xml.end("w:sectPr")?;

    xml.end("w:body")?;
    xml.end("w:document")?;
    Ok(xml.finish())
}

fn core_properties(geometry: &InteriorGeometry) -> Result<Vec<u8>> {
    let title = format!(
        "{} Interior Template {} x {} in",
        geometry.binding_name,
        format_dimension(geometry.trim_width),
        format_dimension(geometry.trim_height)
    );
    let mut xml = XmlDoc::new()?;
    xml.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
        ],
    )?;
    xml.text_element("dc:title", &[], &title)?;
    xml.text_element("dc:creator", &[], "template-render")?;
    xml.end("cp:coreProperties")?;
    Ok(xml.finish())
}
