//! IDML package assembly: designmap, resources, master spread, spreads and
//! stories zipped behind a stored `mimetype` entry
//!
//! All lengths are points in spread coordinates with Y pointing down.

use template_geometry::Rect;

use crate::container::{Compression, ZipWriter};
use crate::palette::{self, Rgb};
use crate::pdf::BEZIER_CIRCLE_FACTOR;
use crate::types::Result;
use crate::xml::{XmlDoc, num};

pub const MIMETYPE: &str = "application/vnd.adobe.indesign-idml-package";
const PACKAGING_NS: &str = "http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging";
const DOM_VERSION: &str = "8.0";
const AID_PI: &str =
    r#"aid style="50" type="document" readerVersion="6.0" featureSet="257" product="8.0(370)""#;

const MASTER_ID: &str = "um1";
pub(crate) const TEMPLATE_LAYER: &str = "ul1";
const ARTWORK_LAYER: &str = "ul2";
const NORMAL_PARAGRAPH: &str = "ParagraphStyle/$ID/NormalParagraphStyle";
const NO_CHARACTER_STYLE: &str = "CharacterStyle/$ID/[No character style]";
pub(crate) const NO_SWATCH: &str = "Swatch/None";

/// Page margins in points. `inside` is the binding side on facing pages
/// and the left side otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub inside: f64,
    pub outside: f64,
}

pub(crate) struct DocumentSetup {
    pub name: String,
    pub page_width: f64,
    pub page_height: f64,
    pub pages: usize,
    pub facing_pages: bool,
    pub bleed: f64,
    pub margins: Margins,
}

pub(crate) struct Paragraph {
    pub text: String,
    pub size: f64,
    pub bold: bool,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, size: f64, bold: bool) -> Self {
        Self {
            text: text.into(),
            size,
            bold,
        }
    }
}

struct Story {
    id: String,
    centered: bool,
    paragraphs: Vec<Paragraph>,
}

/// How a rectangle is painted
pub(crate) struct FrameStyle<'a> {
    pub fill: String,
    pub stroke: Option<&'a str>,
    pub dashed: bool,
    pub locked: bool,
    pub graphic: bool,
}

impl FrameStyle<'_> {
    pub fn filled(swatch: &str) -> Self {
        Self {
            fill: color_ref(swatch),
            stroke: None,
            dashed: false,
            locked: false,
            graphic: false,
        }
    }
}

/// `Color/<name>`
pub(crate) fn color_ref(swatch: &str) -> String {
    format!("Color/{}", swatch)
}

/// Builds one `Spreads/Spread_<id>.xml` part
pub(crate) struct SpreadXml {
    id: String,
    xml: XmlDoc,
}

impl SpreadXml {
    fn open(id: String, page_count: usize, binding_location: usize) -> Result<Self> {
        let mut xml = XmlDoc::new()?;
        xml.start(
            "idPkg:Spread",
            &[("xmlns:idPkg", PACKAGING_NS), ("DOMVersion", DOM_VERSION)],
        )?;
        xml.start(
            "Spread",
            &[
                ("Self", id.as_str()),
                ("PageCount", page_count.to_string().as_str()),
                ("BindingLocation", binding_location.to_string().as_str()),
                ("ShowMasterItems", "true"),
                ("ItemTransform", "1 0 0 1 0 0"),
            ],
        )?;
        Ok(Self { id, xml })
    }

    /// Page placed `x` points right of the spread origin
    pub fn page(&mut self, id: &str, name: &str, x: f64, setup: &DocumentSetup) -> Result<()> {
        write_page(&mut self.xml, id, name, MASTER_ID, x, setup)
    }

    pub fn rectangle(&mut self, id: &str, name: &str, r: &Rect, style: &FrameStyle<'_>) -> Result<()> {
        let transform = translate(r.x, r.y);
        let stroke_color = style.stroke.map(color_ref);
        let stroke = stroke_color.as_deref().unwrap_or(NO_SWATCH);
        let weight = if style.stroke.is_some() { "0.5" } else { "0" };
        let stroke_type = if style.dashed {
            "StrokeStyle/$ID/Dashed"
        } else {
            "StrokeStyle/$ID/Solid"
        };
        self.xml.start(
            "Rectangle",
            &[
                ("Self", id),
                ("Name", name),
                ("ItemLayer", TEMPLATE_LAYER),
                (
                    "ContentType",
                    if style.graphic { "GraphicType" } else { "Unassigned" },
                ),
                ("FillColor", style.fill.as_str()),
                ("StrokeColor", stroke),
                ("StrokeWeight", weight),
                ("StrokeType", stroke_type),
                ("Locked", if style.locked { "true" } else { "false" }),
                ("ItemTransform", transform.as_str()),
            ],
        )?;
        write_path(&mut self.xml, &box_points(r.width, r.height))?;
        self.xml.end("Rectangle")
    }

    /// Circle centered on `(cx, cy)`
    pub fn oval(&mut self, id: &str, name: &str, cx: f64, cy: f64, radius: f64, swatch: &str) -> Result<()> {
        let transform = translate(cx, cy);
        let fill = color_ref(swatch);
        self.xml.start(
            "Oval",
            &[
                ("Self", id),
                ("Name", name),
                ("ItemLayer", TEMPLATE_LAYER),
                ("ContentType", "Unassigned"),
                ("FillColor", fill.as_str()),
                ("FillTint", "50"),
                ("StrokeColor", NO_SWATCH),
                ("StrokeWeight", "0"),
                ("ItemTransform", transform.as_str()),
            ],
        )?;
        write_path(&mut self.xml, &circle_points(radius))?;
        self.xml.end("Oval")
    }

    /// Text frame of the given size whose center lands on `(cx, cy)` after
    /// a counter-clockwise rotation of `degrees`
    #[allow(clippy::too_many_arguments)]
    pub fn text_frame(
        &mut self,
        id: &str,
        name: &str,
        story: &str,
        cx: f64,
        cy: f64,
        width: f64,
        height: f64,
        degrees: f64,
    ) -> Result<()> {
        let (sin, cos) = degrees.to_radians().sin_cos();
        // Rotation in a Y-down space: x' = x cos + y sin, y' = -x sin + y cos
        let (a, b, c, d) = (cos, -sin, sin, cos);
        let tx = cx - (a * width / 2.0 + c * height / 2.0);
        let ty = cy - (b * width / 2.0 + d * height / 2.0);
        let transform = [a, b, c, d, tx, ty]
            .iter()
            .map(|v| num(*v))
            .collect::<Vec<_>>()
            .join(" ");

        self.xml.start(
            "TextFrame",
            &[
                ("Self", id),
                ("Name", name),
                ("ParentStory", story),
                ("ItemLayer", TEMPLATE_LAYER),
                ("ContentType", "TextType"),
                ("FillColor", NO_SWATCH),
                ("StrokeColor", NO_SWATCH),
                ("StrokeWeight", "0"),
                ("ItemTransform", transform.as_str()),
            ],
        )?;
        write_path(&mut self.xml, &box_points(width, height))?;
        self.xml.end("TextFrame")
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        self.xml.end("Spread")?;
        self.xml.end("idPkg:Spread")?;
        Ok(self.xml.finish())
    }
}

/// Collects the parts of one IDML document
pub(crate) struct Package {
    setup: DocumentSetup,
    spreads: Vec<(String, Vec<u8>)>,
    stories: Vec<Story>,
    next_id: usize,
}

impl Package {
    pub fn new(setup: DocumentSetup) -> Self {
        Self {
            setup,
            spreads: Vec::new(),
            stories: Vec::new(),
            next_id: 0,
        }
    }

    pub fn setup(&self) -> &DocumentSetup {
        &self.setup
    }

    /// Fresh `Self` identifier such as `ue3`
    pub fn next_id(&mut self) -> String {
        self.next_id += 1;
        format!("u{:x}", 0xe0 + self.next_id)
    }

    pub fn open_spread(&mut self, page_count: usize, binding_location: usize) -> Result<SpreadXml> {
        let id = self.next_id();
        SpreadXml::open(id, page_count, binding_location)
    }

    pub fn close_spread(&mut self, spread: SpreadXml) -> Result<()> {
        let id = spread.id.clone();
        self.spreads.push((id, spread.finish()?));
        Ok(())
    }

    /// Register a story and return its identifier for `ParentStory`
    pub fn add_story(&mut self, centered: bool, paragraphs: Vec<Paragraph>) -> String {
        let id = self.next_id();
        self.stories.push(Story {
            id: id.clone(),
            centered,
            paragraphs,
        });
        id
    }

    pub fn finish(self) -> Result<Vec<u8>> {
        let mut parts: Vec<(String, Vec<u8>)> = vec![
            ("Resources/Graphic.xml".to_string(), graphic_xml()?),
            ("Resources/Fonts.xml".to_string(), fonts_xml()?),
            ("Resources/Styles.xml".to_string(), styles_xml()?),
            (
                "Resources/Preferences.xml".to_string(),
                preferences_xml(&self.setup)?,
            ),
            (
                format!("MasterSpreads/MasterSpread_{}.xml", MASTER_ID),
                master_spread_xml(&self.setup)?,
            ),
        ];
        for (id, spread) in self.spreads {
            parts.push((format!("Spreads/Spread_{}.xml", id), spread));
        }
        for story in &self.stories {
            parts.push((format!("Stories/Story_{}.xml", story.id), story_xml(story)?));
        }

        let designmap = designmap_xml(&self.setup, &parts, &self.stories)?;
        let mut zip = ZipWriter::new();
        zip.add_file("mimetype", MIMETYPE.as_bytes(), Compression::Stored)?;
        zip.add_file("designmap.xml", &designmap, Compression::Deflated)?;
        zip.add_file("META-INF/container.xml", &container_xml()?, Compression::Deflated)?;
        zip.add_file("META-INF/manifest.xml", &manifest_xml(&parts)?, Compression::Deflated)?;
        for (name, data) in &parts {
            zip.add_file(name, data, Compression::Deflated)?;
        }
        zip.finish()
    }
}

fn translate(x: f64, y: f64) -> String {
    format!("1 0 0 1 {} {}", num(x), num(y))
}

/// `(anchor, left direction, right direction)` for each path point
type PathPoint = ((f64, f64), (f64, f64), (f64, f64));

fn box_points(width: f64, height: f64) -> Vec<PathPoint> {
    [(0.0, 0.0), (0.0, height), (width, height), (width, 0.0)]
        .into_iter()
        .map(|p| (p, p, p))
        .collect()
}

fn circle_points(r: f64) -> Vec<PathPoint> {
    let k = r * BEZIER_CIRCLE_FACTOR;
    vec![
        ((0.0, -r), (-k, -r), (k, -r)),
        ((r, 0.0), (r, -k), (r, k)),
        ((0.0, r), (k, r), (-k, r)),
        ((-r, 0.0), (-r, k), (-r, -k)),
    ]
}

fn write_path(xml: &mut XmlDoc, points: &[PathPoint]) -> Result<()> {
    let pair = |(x, y): (f64, f64)| format!("{} {}", num(x), num(y));
    xml.start("Properties", &[])?;
    xml.start("PathGeometry", &[])?;
    xml.start("GeometryPathType", &[("PathOpen", "false")])?;
    xml.start("PathPointArray", &[])?;
    for &(anchor, left, right) in points {
        xml.empty(
            "PathPointType",
            &[
                ("Anchor", pair(anchor).as_str()),
                ("LeftDirection", pair(left).as_str()),
                ("RightDirection", pair(right).as_str()),
            ],
        )?;
    }
    xml.end("PathPointArray")?;
    xml.end("GeometryPathType")?;
    xml.end("PathGeometry")?;
    xml.end("Properties")
}

fn write_page(
    xml: &mut XmlDoc,
    id: &str,
    name: &str,
    master: &str,
    x: f64,
    setup: &DocumentSetup,
) -> Result<()> {
    let bounds = format!(
        "0 0 {} {}",
        num(setup.page_height),
        num(setup.page_width)
    );
    xml.start(
        "Page",
        &[
            ("Self", id),
            ("Name", name),
            ("AppliedMaster", master),
            ("GeometricBounds", bounds.as_str()),
            ("ItemTransform", translate(x, 0.0).as_str()),
            ("MasterPageTransform", "1 0 0 1 0 0"),
        ],
    )?;
    write_margins(xml, &setup.margins)?;
    xml.end("Page")
}

fn write_margins(xml: &mut XmlDoc, margins: &Margins) -> Result<()> {
    xml.empty(
        "MarginPreference",
        &[
            ("ColumnCount", "1"),
            ("ColumnGutter", "12"),
            ("Top", num(margins.top).as_str()),
            ("Bottom", num(margins.bottom).as_str()),
            ("Left", num(margins.inside).as_str()),
            ("Right", num(margins.outside).as_str()),
            ("ColumnDirection", "Horizontal"),
        ],
    )
}

fn package_root(xml: &mut XmlDoc, name: &str) -> Result<()> {
    xml.start(
        name,
        &[("xmlns:idPkg", PACKAGING_NS), ("DOMVersion", DOM_VERSION)],
    )
}

fn designmap_xml(
    setup: &DocumentSetup,
    parts: &[(String, Vec<u8>)],
    stories: &[Story],
) -> Result<Vec<u8>> {
    let story_list = stories
        .iter()
        .map(|s| s.id.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let mut xml = XmlDoc::new()?;
    xml.pi(AID_PI)?;
    xml.start(
        "Document",
        &[
            ("xmlns:idPkg", PACKAGING_NS),
            ("DOMVersion", DOM_VERSION),
            ("Self", "d"),
            ("StoryList", story_list.as_str()),
            ("Name", setup.name.as_str()),
            ("ZeroPoint", "0 0"),
            ("ActiveLayer", ARTWORK_LAYER),
            ("SolidColorIntent", "UseColorValue"),
            ("AfterBlendingIntent", "UseColorValue"),
            ("DefaultImageIntent", "Perceptual"),
        ],
    )?;

    for (path, _) in parts {
        let element = match path.split('/').next() {
            Some("Resources") => match path.as_str() {
                "Resources/Graphic.xml" => "idPkg:Graphic",
                "Resources/Fonts.xml" => "idPkg:Fonts",
                "Resources/Styles.xml" => "idPkg:Styles",
                _ => "idPkg:Preferences",
            },
            Some("MasterSpreads") => "idPkg:MasterSpread",
            Some("Spreads") => "idPkg:Spread",
            _ => "idPkg:Story",
        };
        // Layers are declared between the resources and the spreads
        if element == "idPkg:MasterSpread" {
            write_layer(&mut xml, TEMPLATE_LAYER, "Template")?;
            write_layer(&mut xml, ARTWORK_LAYER, "Your Artwork Here")?;
        }
        xml.empty(element, &[("src", path.as_str())])?;
    }

    xml.end("Document")?;
    Ok(xml.finish())
}

fn write_layer(xml: &mut XmlDoc, id: &str, name: &str) -> Result<()> {
    xml.empty(
        "Layer",
        &[
            ("Self", id),
            ("Name", name),
            ("Visible", "true"),
            ("Locked", "false"),
            ("ShowGuides", "true"),
            ("Printable", "true"),
        ],
    )
}

fn container_xml() -> Result<Vec<u8>> {
    let mut xml = XmlDoc::new()?;
    xml.start(
        "container",
        &[
            ("version", "1.0"),
            ("xmlns", "urn:oasis:names:tc:opendocument:xmlns:container"),
        ],
    )?;
    xml.start("rootfiles", &[])?;
    xml.empty(
        "rootfile",
        &[("full-path", "designmap.xml"), ("media-type", "text/xml")],
    )?;
    xml.end("rootfiles")?;
    xml.end("container")?;
    Ok(xml.finish())
}

fn manifest_xml(parts: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut xml = XmlDoc::new()?;
    xml.start("idPkg:Manifest", &[("xmlns:idPkg", PACKAGING_NS)])?;
    xml.empty("idPkg:FilePath", &[("src", "designmap.xml")])?;
    for (path, _) in parts {
        xml.empty("idPkg:FilePath", &[("src", path.as_str())])?;
    }
    xml.end("idPkg:Manifest")?;
    Ok(xml.finish())
}

fn graphic_xml() -> Result<Vec<u8>> {
    let mut xml = XmlDoc::new()?;
    package_root(&mut xml, "idPkg:Graphic")?;
    for (name, value) in [("Black", "0 0 0 100"), ("Paper", "0 0 0 0")] {
        let id = color_ref(name);
        xml.empty(
            "Color",
            &[
                ("Self", id.as_str()),
                ("Model", "Process"),
                ("Space", "CMYK"),
                ("ColorValue", value),
                ("Name", name),
                ("ColorEditable", "false"),
                ("ColorRemovable", "false"),
                ("Visible", "true"),
            ],
        )?;
    }
    for (name, color) in palette::SWATCHES {
        write_rgb_swatch(&mut xml, name, color)?;
    }
    xml.empty(
        "Swatch",
        &[
            ("Self", NO_SWATCH),
            ("Name", "None"),
            ("ColorEditable", "false"),
            ("ColorRemovable", "false"),
            ("Visible", "true"),
        ],
    )?;
    for style in ["Solid", "Dashed"] {
        let id = format!("StrokeStyle/$ID/{}", style);
        let name = format!("$ID/{}", style);
        xml.empty("StrokeStyle", &[("Self", id.as_str()), ("Name", name.as_str())])?;
    }
    xml.end("idPkg:Graphic")?;
    Ok(xml.finish())
}

fn write_rgb_swatch(xml: &mut XmlDoc, name: &str, color: Rgb) -> Result<()> {
    let [r, g, b] = color.to_bytes();
    let id = color_ref(name);
    let value = format!("{} {} {}", r, g, b);
    xml.empty(
        "Color",
        &[
            ("Self", id.as_str()),
            ("Model", "Process"),
            ("Space", "RGB"),
            ("ColorValue", value.as_str()),
            ("Name", name),
            ("ColorEditable", "true"),
            ("ColorRemovable", "true"),
            ("Visible", "true"),
        ],
    )
}

fn fonts_xml() -> Result<Vec<u8>> {
    let mut xml = XmlDoc::new()?;
    package_root(&mut xml, "idPkg:Fonts")?;
    xml.start("FontFamily", &[("Self", "di1"), ("Name", "Helvetica")])?;
    for style in ["Regular", "Bold"] {
        let id = format!("di1FontnHelvetica{}", style);
        let postscript = if style == "Bold" {
            "Helvetica-Bold"
        } else {
            "Helvetica"
        };
        xml.empty(
            "Font",
            &[
                ("Self", id.as_str()),
                ("FontFamily", "Helvetica"),
                ("Name", postscript),
                ("PostScriptName", postscript),
                ("FontStyleName", style),
                ("FontType", "Type1"),
            ],
        )?;
    }
    xml.end("FontFamily")?;
    xml.end("idPkg:Fonts")?;
    Ok(xml.finish())
}

fn styles_xml() -> Result<Vec<u8>> {
    let mut xml = XmlDoc::new()?;
    package_root(&mut xml, "idPkg:Styles")?;
    xml.start("RootCharacterStyleGroup", &[("Self", "u79")])?;
    xml.empty(
        "CharacterStyle",
        &[
            ("Self", NO_CHARACTER_STYLE),
            ("Name", "$ID/[No character style]"),
        ],
    )?;
    xml.end("RootCharacterStyleGroup")?;
    xml.start("RootParagraphStyleGroup", &[("Self", "u78")])?;
    xml.empty(
        "ParagraphStyle",
        &[
            ("Self", "ParagraphStyle/$ID/[No paragraph style]"),
            ("Name", "$ID/[No paragraph style]"),
        ],
    )?;
    xml.empty(
        "ParagraphStyle",
        &[
            ("Self", NORMAL_PARAGRAPH),
            ("Name", "$ID/NormalParagraphStyle"),
            ("AppliedFont", "Helvetica"),
            ("PointSize", "10"),
        ],
    )?;
    xml.end("RootParagraphStyleGroup")?;
    xml.end("idPkg:Styles")?;
    Ok(xml.finish())
}

fn preferences_xml(setup: &DocumentSetup) -> Result<Vec<u8>> {
    let bleed = num(setup.bleed);
    let mut xml = XmlDoc::new()?;
    package_root(&mut xml, "idPkg:Preferences")?;
    xml.empty(
        "DocumentPreference",
        &[
            ("PageHeight", num(setup.page_height).as_str()),
            ("PageWidth", num(setup.page_width).as_str()),
            ("PagesPerDocument", setup.pages.to_string().as_str()),
            (
                "FacingPages",
                if setup.facing_pages { "true" } else { "false" },
            ),
            ("DocumentBleedTopOffset", bleed.as_str()),
            ("DocumentBleedBottomOffset", bleed.as_str()),
            ("DocumentBleedInsideOrLeftOffset", bleed.as_str()),
            ("DocumentBleedOutsideOrRightOffset", bleed.as_str()),
            ("DocumentBleedUniformSize", "true"),
            ("PageBinding", "LeftToRight"),
            ("Intent", "PrintIntent"),
        ],
    )?;
    write_margins(&mut xml, &setup.margins)?;
    xml.empty(
        "ViewPreference",
        &[
            ("HorizontalMeasurementUnits", "Inches"),
            ("VerticalMeasurementUnits", "Inches"),
        ],
    )?;
    xml.end("idPkg:Preferences")?;
    Ok(xml.finish())
}

fn master_spread_xml(setup: &DocumentSetup) -> Result<Vec<u8>> {
    let pages = if setup.facing_pages { 2 } else { 1 };
    let mut xml = XmlDoc::new()?;
    package_root(&mut xml, "idPkg:MasterSpread")?;
    xml.start(
        "MasterSpread",
        &[
            ("Self", MASTER_ID),
            ("Name", "A-Master"),
            ("NamePrefix", "A"),
            ("BaseName", "Master"),
            ("ShowMasterItems", "true"),
            ("PageCount", pages.to_string().as_str()),
            ("ItemTransform", "1 0 0 1 0 0"),
        ],
    )?;
    for index in 0..pages {
        let id = format!("{}p{}", MASTER_ID, index + 1);
        let x = setup.page_width * index as f64;
        write_page(&mut xml, &id, "A", "n", x, setup)?;
    }
    xml.end("MasterSpread")?;
    xml.end("idPkg:MasterSpread")?;
    Ok(xml.finish())
}

fn story_xml(story: &Story) -> Result<Vec<u8>> {
    let justification = if story.centered {
        "CenterAlign"
    } else {
        "LeftAlign"
    };
    let mut xml = XmlDoc::new()?;
    package_root(&mut xml, "idPkg:Story")?;
    xml.start(
        "Story",
        &[
            ("Self", story.id.as_str()),
            ("AppliedTOCStyle", "n"),
            ("TrackChanges", "false"),
            ("StoryTitle", "$ID/"),
        ],
    )?;
    let last = story.paragraphs.len().saturating_sub(1);
    for (index, paragraph) in story.paragraphs.iter().enumerate() {
        xml.start(
            "ParagraphStyleRange",
            &[
                ("AppliedParagraphStyle", NORMAL_PARAGRAPH),
                ("Justification", justification),
            ],
        )?;
        xml.start(
            "CharacterStyleRange",
            &[
                ("AppliedCharacterStyle", NO_CHARACTER_STYLE),
                ("PointSize", num(paragraph.size).as_str()),
                (
                    "FontStyle",
                    if paragraph.bold { "Bold" } else { "Regular" },
                ),
            ],
        )?;
        xml.text_element("Content", &[], &paragraph.text)?;
        if index < last {
            xml.empty("Br", &[])?;
        }
        xml.end("CharacterStyleRange")?;
        xml.end("ParagraphStyleRange")?;
    }
    xml.end("Story")?;
    xml.end("idPkg:Story")?;
    Ok(xml.finish())
}
