use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild};

use super::ExtractionError;

/// Top-level paragraphs in document order, one per line. Empty paragraphs
/// still produce a line; table contents are skipped.
pub(super) fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx = read_docx(bytes).map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    push_children(&mut text, &paragraph.children);
    text
}

fn push_children(text: &mut String, children: &[ParagraphChild]) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_children(text, &link.children),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fixtures::docx_bytes;

    #[test]
    fn test_paragraphs_joined_by_newline() {
        let bytes = docx_bytes(&[
            "Jane Doe",
            "Senior Backend Engineer",
            "Built payment pipelines in Rust",
        ]);
        let text = extract(&bytes).unwrap();
        assert_eq!(
            text,
            "Jane Doe\nSenior Backend Engineer\nBuilt payment pipelines in Rust"
        );
    }

    #[test]
    fn test_empty_paragraph_keeps_its_line() {
        let bytes = docx_bytes(&["Experience", "", "Education"]);
        assert_eq!(extract(&bytes).unwrap(), "Experience\n\nEducation");
    }

    #[test]
    fn test_not_a_zip_is_docx_error() {
        let err = extract(b"plain text pretending to be docx").unwrap_err();
        assert!(matches!(err, ExtractionError::Docx(_)));
    }
}
