use std::time::Duration;

use base64::Engine;
use lopdf::{Dictionary, Document, Object, Stream};
use pdf_inspect::*;

fn rect(values: [i64; 4]) -> Object {
    Object::Array(values.into_iter().map(Object::Integer).collect())
}

/// One page per entry; each page gets its own MediaBox plus any extra boxes
fn create_test_pdf(pages: &[(i64, i64)], extra: Vec<(&str, Object)>, title: Option<Object>) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for (index, &(width, height)) in pages.iter().enumerate() {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));
        let mut page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("MediaBox", rect([0, 0, width, height])),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]);
        if index == 0 {
            for (key, value) in &extra {
                page.set(*key, value.clone());
            }
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(pages.len() as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    if let Some(title) = title {
        let info_id = doc.add_object(Dictionary::from_iter(vec![("Title", title)]));
        doc.trailer.set("Info", info_id);
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[test]
fn test_page_sizes_in_inches() {
    let bytes = create_test_pdf(&[(432, 648), (432, 648), (432, 648)], vec![], None);
    let analysis = analyze_pdf(&bytes).unwrap();

    assert_eq!(analysis.page_count, 3);
    assert!(analysis.consistent_size);
    assert_eq!(analysis.first_page_width_inches, 6.0);
    assert_eq!(analysis.first_page_height_inches, 9.0);
    assert_eq!(analysis.page_dimensions.len(), 3);
    assert_eq!(analysis.title, None);
}

#[test]
fn test_mixed_sizes_are_inconsistent() {
    let bytes = create_test_pdf(&[(612, 792), (918, 666)], vec![], None);
    let analysis = analyze_pdf(&bytes).unwrap();

    assert!(!analysis.consistent_size);
    assert_eq!(analysis.page_dimensions[1].width_inches, 12.75);
    assert_eq!(analysis.page_dimensions[1].height_inches, 9.25);
    assert_eq!(analysis.first_page_width_inches, 8.5);
}

#[test]
fn test_first_page_boxes() {
    let bytes = create_test_pdf(
        &[(918, 666)],
        vec![
            ("BleedBox", rect([0, 0, 918, 666])),
            ("TrimBox", rect([9, 9, 909, 657])),
        ],
        None,
    );
    let boxes = analyze_pdf(&bytes).unwrap().first_page_boxes.unwrap();

    assert_eq!(boxes.bleed_box.width_inches, 12.75);
    assert_eq!(boxes.trim_box.width_inches, 12.5);
    assert_eq!(boxes.trim_box.height_inches, 9.0);
}

#[test]
fn test_boxes_fall_back_to_crop_box() {
    let bytes = create_test_pdf(
        &[(612, 792)],
        vec![("CropBox", rect([36, 36, 576, 756]))],
        None,
    );
    let boxes = analyze_pdf(&bytes).unwrap().first_page_boxes.unwrap();

    assert_eq!(boxes.bleed_box.width_inches, 7.5);
    assert_eq!(boxes.trim_box.height_inches, 10.0);
}

#[test]
fn test_title_is_trimmed() {
    let bytes = create_test_pdf(
        &[(612, 792)],
        vec![],
        Some(Object::string_literal("  My Novel  ")),
    );
    assert_eq!(analyze_pdf(&bytes).unwrap().title.as_deref(), Some("My Novel"));

    let blank = create_test_pdf(&[(612, 792)], vec![], Some(Object::string_literal("   ")));
    assert_eq!(analyze_pdf(&blank).unwrap().title, None);
}

#[test]
fn test_not_a_pdf() {
    assert!(matches!(
        analyze_pdf(b"<html>hello</html>"),
        Err(InspectError::Pdf(_))
    ));
}

#[test]
fn test_classify_response() {
    let url = "https://example.com/book.pdf";
    assert!(classify_response(url, 200, "application/pdf", b"%PDF-1.7\n...").is_ok());

    assert!(matches!(
        classify_response(url, 404, "text/html", b""),
        Err(InspectError::NotFound { .. })
    ));
    assert!(matches!(
        classify_response(url, 503, "text/html", b""),
        Err(InspectError::HttpStatus { status: 503, .. })
    ));

    let err = classify_response(url, 200, "text/html", b"<!DOCTYPE html><html>").unwrap_err();
    assert!(matches!(err, InspectError::ReturnedPage { .. }));
    assert!(err.to_string().contains("direct download link"));
}

#[tokio::test]
async fn test_inspect_base64_source() {
    let bytes = create_test_pdf(&[(432, 648)], vec![], None);
    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
    let source = PdfSource::Base64(format!("data:application/pdf;base64,{}", encoded));

    let analysis = inspect_pdf(source, Duration::from_secs(1)).await.unwrap();
    assert_eq!(analysis.page_count, 1);
}

#[tokio::test]
async fn test_inspect_path_source() {
    use tempfile::NamedTempFile;

    let bytes = create_test_pdf(&[(612, 792), (612, 792)], vec![], None);
    let temp = NamedTempFile::new().unwrap();
    std::fs::write(temp.path(), &bytes).unwrap();

    let source = PdfSource::parse(temp.path().to_str().unwrap());
    let analysis = inspect_pdf(source, Duration::from_secs(1)).await.unwrap();
    assert_eq!(analysis.page_count, 2);
    assert_eq!(analysis.first_page_height_inches, 11.0);
}

#[tokio::test]
async fn test_missing_path_is_io_error() {
    let source = PdfSource::Path("/definitely/not/here.pdf".into());
    assert!(matches!(
        inspect_pdf(source, Duration::from_secs(1)).await,
        Err(InspectError::Io(_))
    ));
}

#[test]
fn test_analysis_serializes_camel_case() {
    let bytes = create_test_pdf(&[(432, 648)], vec![], None);
    let json = serde_json::to_string(&analyze_pdf(&bytes).unwrap()).unwrap();
    assert!(json.contains("\"pageCount\":1"));
    assert!(json.contains("\"firstPageBoxes\""));
    assert!(!json.contains("\"title\""));
}
