//! Binary serialization of a [`PsdDocument`]
//!
//! All integers are big-endian. Layer channels and the flattened image
//! use PackBits rows.

use byteorder::{BigEndian, WriteBytesExt};

use super::layers::{Layer, Node, PsdDocument, visible_layers};
use super::packbits;
use crate::types::{RenderError, Result};

const SIGNATURE: &[u8; 4] = b"8BPS";
const RESOURCE_SIGNATURE: &[u8; 4] = b"8BIM";
const VERSION: u16 = 1;
const CHANNELS: u16 = 3;
const DEPTH: u16 = 8;
const MODE_RGB: u16 = 3;
/// Largest side a version 1 file may have
const MAX_SIDE: u32 = 30_000;

const RESOURCE_RESOLUTION: u16 = 1005;
const RESOURCE_GUIDES: u16 = 1032;
/// Default grid cycle, one inch at 72 ppi in 1/32 units
const GRID_CYCLE: u32 = 576;

const COMPRESSION_RAW: u16 = 0;
const COMPRESSION_RLE: u16 = 1;

/// Alpha then red, green, blue
const LAYER_CHANNELS: [i16; 4] = [-1, 0, 1, 2];

const FLAG_HIDDEN: u8 = 0x02;
const FLAG_HAS_BIT4: u8 = 0x08;
const FLAG_NO_PIXELS: u8 = 0x10;

const SECTION_OPEN_FOLDER: u32 = 1;
const SECTION_DIVIDER: u32 = 3;
const LOCK_ALL: u32 = 0x8000_0000;
const DIVIDER_NAME: &str = "</Layer group>";

/// One entry of the flat record list, bottom to top
enum Record<'a> {
    Pixels(&'a Layer),
    GroupStart { name: &'a str, hidden: bool },
    GroupEnd,
}

pub(crate) fn write_document(doc: &PsdDocument) -> Result<Vec<u8>> {
    if doc.width == 0 || doc.height == 0 || doc.width > MAX_SIDE || doc.height > MAX_SIDE {
        return Err(RenderError::Layer(format!(
            "Canvas {}x{} px is outside the supported range",
            doc.width, doc.height
        )));
    }

    let mut out = Vec::new();
    out.extend_from_slice(SIGNATURE);
    out.write_u16::<BigEndian>(VERSION)?;
    out.extend_from_slice(&[0; 6]);
    out.write_u16::<BigEndian>(CHANNELS)?;
    out.write_u32::<BigEndian>(doc.height)?;
    out.write_u32::<BigEndian>(doc.width)?;
    out.write_u16::<BigEndian>(DEPTH)?;
    out.write_u16::<BigEndian>(MODE_RGB)?;

    // Color mode data is empty for RGB
    out.write_u32::<BigEndian>(0)?;

    write_resources(&mut out, doc)?;
    write_layers(&mut out, doc)?;
    write_composite(&mut out, doc)?;
    Ok(out)
}

fn write_resources(out: &mut Vec<u8>, doc: &PsdDocument) -> Result<()> {
    let mut section = Vec::new();

    let mut resolution = Vec::new();
    for _ in 0..2 {
        resolution.write_u32::<BigEndian>(doc.dpi << 16)?;
        resolution.write_u16::<BigEndian>(1)?; // pixels per inch
        resolution.write_u16::<BigEndian>(1)?; // display in inches
    }
    write_resource(&mut section, RESOURCE_RESOLUTION, &resolution)?;

    let mut guides = Vec::new();
    guides.write_u32::<BigEndian>(1)?;
    guides.write_u32::<BigEndian>(GRID_CYCLE)?;
    guides.write_u32::<BigEndian>(GRID_CYCLE)?;
    guides.write_u32::<BigEndian>(doc.guides.len() as u32)?;
    for guide in &doc.guides {
        guides.write_i32::<BigEndian>(guide.location)?;
        guides.write_u8(if guide.vertical { 0 } else { 1 })?;
    }
    write_resource(&mut section, RESOURCE_GUIDES, &guides)?;

    out.write_u32::<BigEndian>(section.len() as u32)?;
    out.extend_from_slice(&section);
    Ok(())
}

fn write_resource(out: &mut Vec<u8>, id: u16, data: &[u8]) -> Result<()> {
    out.extend_from_slice(RESOURCE_SIGNATURE);
    out.write_u16::<BigEndian>(id)?;
    // Empty name, padded to even
    out.extend_from_slice(&[0, 0]);
    out.write_u32::<BigEndian>(data.len() as u32)?;
    out.extend_from_slice(data);
    if data.len() % 2 == 1 {
        out.push(0);
    }
    Ok(())
}

fn flatten<'a>(nodes: &'a [Node], out: &mut Vec<Record<'a>>) {
    for node in nodes {
        match node {
            Node::Layer(layer) => out.push(Record::Pixels(layer)),
            Node::Group {
                name,
                hidden,
                children,
            } => {
                out.push(Record::GroupEnd);
                flatten(children, out);
                out.push(Record::GroupStart {
                    name,
                    hidden: *hidden,
                });
            }
        }
    }
}

fn write_layers(out: &mut Vec<u8>, doc: &PsdDocument) -> Result<()> {
    let mut records = Vec::new();
    flatten(&doc.nodes, &mut records);
    let count = i16::try_from(records.len())
        .map_err(|_| RenderError::Layer(format!("Too many layers: {}", records.len())))?;

    let mut info = Vec::new();
    info.write_i16::<BigEndian>(count)?;
    let mut pixel_data = Vec::new();
    for record in &records {
        let channels = match record {
            Record::Pixels(layer) => encode_layer(layer)?,
            _ => empty_channels(),
        };
        write_record(&mut info, record, &channels)?;
        for channel in channels {
            pixel_data.extend_from_slice(&channel);
        }
    }
    info.extend_from_slice(&pixel_data);
    if info.len() % 2 == 1 {
        info.push(0);
    }

    let mut section = Vec::new();
    section.write_u32::<BigEndian>(info.len() as u32)?;
    section.extend_from_slice(&info);
    // No global layer mask
    section.write_u32::<BigEndian>(0)?;

    out.write_u32::<BigEndian>(section.len() as u32)?;
    out.extend_from_slice(&section);
    Ok(())
}

fn write_record(out: &mut Vec<u8>, record: &Record<'_>, channels: &[Vec<u8>; 4]) -> Result<()> {
    let (bounds, name, opacity, hidden, locked) = match record {
        Record::Pixels(layer) => (
            layer.bounds,
            layer.name.as_str(),
            layer.opacity,
            layer.hidden,
            layer.locked,
        ),
        Record::GroupStart { name, hidden } => (Default::default(), *name, u8::MAX, *hidden, false),
        Record::GroupEnd => (Default::default(), DIVIDER_NAME, u8::MAX, false, false),
    };

    out.write_i32::<BigEndian>(bounds.top)?;
    out.write_i32::<BigEndian>(bounds.left)?;
    out.write_i32::<BigEndian>(bounds.bottom)?;
    out.write_i32::<BigEndian>(bounds.right)?;
    out.write_u16::<BigEndian>(LAYER_CHANNELS.len() as u16)?;
    for (id, data) in LAYER_CHANNELS.iter().zip(channels) {
        out.write_i16::<BigEndian>(*id)?;
        out.write_u32::<BigEndian>(data.len() as u32)?;
    }

    out.extend_from_slice(RESOURCE_SIGNATURE);
    out.extend_from_slice(b"norm");
    out.write_u8(opacity)?;
    out.write_u8(0)?; // clipping
    let mut flags = FLAG_HAS_BIT4;
    if hidden {
        flags |= FLAG_HIDDEN;
    }
    if !matches!(record, Record::Pixels(_)) {
        flags |= FLAG_NO_PIXELS;
    }
    out.write_u8(flags)?;
    out.write_u8(0)?;

    let mut extra = Vec::new();
    extra.write_u32::<BigEndian>(0)?; // layer mask
    extra.write_u32::<BigEndian>(0)?; // blending ranges
    write_pascal_name(&mut extra, name);
    write_unicode_name(&mut extra, name)?;
    match record {
        Record::GroupStart { .. } => {
            let mut data = Vec::new();
            data.write_u32::<BigEndian>(SECTION_OPEN_FOLDER)?;
            data.extend_from_slice(RESOURCE_SIGNATURE);
            data.extend_from_slice(b"pass");
            write_tagged(&mut extra, b"lsct", &data)?;
        }
        Record::GroupEnd => {
            write_tagged(&mut extra, b"lsct", &SECTION_DIVIDER.to_be_bytes())?;
        }
        Record::Pixels(_) => {}
    }
    if locked {
        write_tagged(&mut extra, b"lspf", &LOCK_ALL.to_be_bytes())?;
    }

    out.write_u32::<BigEndian>(extra.len() as u32)?;
    out.extend_from_slice(&extra);
    Ok(())
}

/// Legacy name: at most 255 ASCII bytes, padded to a multiple of four
fn write_pascal_name(out: &mut Vec<u8>, name: &str) {
    let bytes: Vec<u8> = name
        .chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .take(255)
        .collect();
    out.push(bytes.len() as u8);
    out.extend_from_slice(&bytes);
    let written = bytes.len() + 1;
    out.extend(std::iter::repeat_n(0, (4 - written % 4) % 4));
}

fn write_unicode_name(out: &mut Vec<u8>, name: &str) -> Result<()> {
    let units: Vec<u16> = name.encode_utf16().collect();
    let mut data = Vec::with_capacity(4 + units.len() * 2);
    data.write_u32::<BigEndian>(units.len() as u32)?;
    for unit in units {
        data.write_u16::<BigEndian>(unit)?;
    }
    write_tagged(out, b"luni", &data)
}

/// Additional layer information block, padded to a multiple of four
fn write_tagged(out: &mut Vec<u8>, key: &[u8; 4], data: &[u8]) -> Result<()> {
    let padding = (4 - data.len() % 4) % 4;
    out.extend_from_slice(RESOURCE_SIGNATURE);
    out.extend_from_slice(key);
    out.write_u32::<BigEndian>((data.len() + padding) as u32)?;
    out.extend_from_slice(data);
    out.extend(std::iter::repeat_n(0, padding));
    Ok(())
}

fn empty_channels() -> [Vec<u8>; 4] {
    std::array::from_fn(|_| COMPRESSION_RAW.to_be_bytes().to_vec())
}

fn row_length(len: usize) -> Result<u16> {
    u16::try_from(len).map_err(|_| RenderError::Layer(format!("Packed row of {} bytes", len)))
}

/// Alpha, red, green and blue channel data for one layer
fn encode_layer(layer: &Layer) -> Result<[Vec<u8>; 4]> {
    let bounds = layer.bounds;
    if bounds.is_empty() {
        return Ok(empty_channels());
    }

    let width = bounds.width() as usize;
    let mut counts: [Vec<u16>; 4] = Default::default();
    let mut data: [Vec<u8>; 4] = Default::default();
    let mut rows: [Vec<u8>; 4] = std::array::from_fn(|_| Vec::with_capacity(width));

    for y in bounds.top..bounds.bottom {
        for row in rows.iter_mut() {
            row.clear();
        }
        for x in bounds.left..bounds.right {
            let ([r, g, b], alpha) = layer.sample(x, y).unwrap_or(([0; 3], 0));
            rows[0].push(alpha);
            rows[1].push(r);
            rows[2].push(g);
            rows[3].push(b);
        }
        for channel in 0..4 {
            let before = data[channel].len();
            packbits::encode_row(&rows[channel], &mut data[channel]);
            counts[channel].push(row_length(data[channel].len() - before)?);
        }
    }

    let mut channels: [Vec<u8>; 4] = Default::default();
    for channel in 0..4 {
        let out = &mut channels[channel];
        out.write_u16::<BigEndian>(COMPRESSION_RLE)?;
        for count in &counts[channel] {
            out.write_u16::<BigEndian>(*count)?;
        }
        out.extend_from_slice(&data[channel]);
    }
    Ok(channels)
}

/// Flattened RGB image over a white page
fn write_composite(out: &mut Vec<u8>, doc: &PsdDocument) -> Result<()> {
    let width = doc.width as usize;
    let layers = visible_layers(&doc.nodes);

    let mut counts: [Vec<u16>; 3] = Default::default();
    let mut data: [Vec<u8>; 3] = Default::default();
    let mut pixels = vec![[u8::MAX; 3]; width];
    let mut plane = Vec::with_capacity(width);

    for y in 0..doc.height as i32 {
        pixels.fill([u8::MAX; 3]);
        for layer in layers.iter().filter(|l| y >= l.bounds.top && y < l.bounds.bottom) {
            let right = layer.bounds.right.min(doc.width as i32);
            for x in layer.bounds.left.max(0)..right {
                if let Some((color, alpha)) = layer.sample(x, y) {
                    let coverage = u32::from(alpha) * u32::from(layer.opacity) / 255;
                    blend(&mut pixels[x as usize], color, coverage);
                }
            }
        }
        for channel in 0..3 {
            plane.clear();
            plane.extend(pixels.iter().map(|p| p[channel]));
            let before = data[channel].len();
            packbits::encode_row(&plane, &mut data[channel]);
            counts[channel].push(row_length(data[channel].len() - before)?);
        }
    }

    out.write_u16::<BigEndian>(COMPRESSION_RLE)?;
    for channel in &counts {
        for count in channel {
            out.write_u16::<BigEndian>(*count)?;
        }
    }
    for channel in &data {
        out.extend_from_slice(channel);
    }
    Ok(())
}

fn blend(dst: &mut [u8; 3], src: [u8; 3], coverage: u32) {
    for (d, s) in dst.iter_mut().zip(src) {
        let mixed = u32::from(s) * coverage + u32::from(*d) * (255 - coverage);
        *d = ((mixed + 127) / 255) as u8;
    }
}
