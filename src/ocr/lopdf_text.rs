//! Alternate text layer decoded from the in-memory page tree.
//!
//! Pages are read straight from their page dictionary, so extracting one
//! page never walks the whole page tree.

use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::{Document, Encoding, Object};
use tracing::debug;

use super::backend::{BackendKind, ExtractionError, PageExtractor, PdfPage};

/// TJ kerning beyond this (thousandths of an em) reads as a word gap.
const WORD_GAP: i64 = -100;

/// Text layer backend reading an already-loaded lopdf document.
pub struct LopdfExtractor<'a> {
    document: &'a Document,
}

impl<'a> LopdfExtractor<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }
}

impl PageExtractor for LopdfExtractor<'_> {
    fn kind(&self) -> BackendKind {
        BackendKind::Lopdf
    }

    fn extract(&self, page: &PdfPage) -> Result<String, ExtractionError> {
        let page_id = page.object_id;
        if self.document.get_dictionary(page_id).is_err() {
            return Err(ExtractionError::PageMissing(page.number()));
        }

        // Fonts whose encoding cannot be resolved are skipped, not fatal
        let encodings: BTreeMap<Vec<u8>, Encoding> = self
            .document
            .get_page_fonts(page_id)?
            .into_iter()
            .filter_map(|(name, font)| match font.get_font_encoding(self.document) {
                Ok(encoding) => Some((name, encoding)),
                Err(e) => {
                    debug!("Page {}: no encoding for font: {}", page.number(), e);
                    None
                }
            })
            .collect();

        let content = Content::decode(&self.document.get_page_content(page_id)?)?;

        let mut text = String::new();
        let mut current: Option<&Encoding> = None;
        for operation in &content.operations {
            match operation.operator.as_str() {
                "Tf" => {
                    current = operation
                        .operands
                        .first()
                        .and_then(|font| font.as_name().ok())
                        .and_then(|name| encodings.get(name));
                }
                "Tj" | "TJ" | "'" | "\"" => {
                    if let Some(encoding) = current {
                        collect_text(&mut text, encoding, &operation.operands);
                    }
                }
                "ET" | "T*" | "Td" | "TD" => {
                    if !text.is_empty() && !text.ends_with('\n') {
                        text.push('\n');
                    }
                }
                _ => {}
            }
        }
        Ok(text)
    }
}

fn collect_text(text: &mut String, encoding: &Encoding, operands: &[Object]) {
    for operand in operands {
        match operand {
            Object::String(bytes, _) => {
                if let Ok(decoded) = Document::decode_text(encoding, bytes) {
                    text.push_str(&decoded);
                }
            }
            Object::Array(items) => collect_text(text, encoding, items),
            Object::Integer(gap) if *gap < WORD_GAP => text.push(' '),
            Object::Real(gap) if (*gap as f64) < WORD_GAP as f64 => text.push(' '),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use lopdf::content::Operation;
    use lopdf::{dictionary, Stream};

    use super::*;

    /// Two pages of Courier text; returns the document and its page ids.
    fn two_page_document() -> (Document, Vec<lopdf::ObjectId>) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for text in ["Red Jacket", "Model X200"] {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            kids.push(doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            }));
        }
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids.iter().map(|&id| id.into()).collect::<Vec<Object>>(),
                "Count" => kids.len() as i64,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        (doc, kids)
    }

    #[test]
    fn test_reads_each_page_by_object_id() {
        let (doc, kids) = two_page_document();
        let extractor = LopdfExtractor::new(&doc);

        let second = extractor
            .extract(&PdfPage {
                index: 1,
                object_id: kids[1],
            })
            .unwrap();
        assert_eq!(second.trim(), "Model X200");

        let first = extractor
            .extract(&PdfPage {
                index: 0,
                object_id: kids[0],
            })
            .unwrap();
        assert_eq!(first.trim(), "Red Jacket");
    }

    #[test]
    fn test_unknown_page_object_is_missing() {
        let (doc, _) = two_page_document();
        let extractor = LopdfExtractor::new(&doc);

        let err = extractor
            .extract(&PdfPage {
                index: 5,
                object_id: (999, 0),
            })
            .unwrap_err();
        assert!(matches!(err, ExtractionError::PageMissing(6)));
    }
}
