//! Plain-text plans laid out on landscape US-letter pages.

use crate::error::PlanError;
use printpdf::{BuiltinFont, Mm, PdfDocument};

const PAGE_WIDTH_PT: f32 = 792.0;
const PAGE_HEIGHT_PT: f32 = 612.0;
const MARGIN_PT: f32 = 50.0;
const LEADING_PT: f32 = 15.0;
const FONT_SIZE_PT: f32 = 12.0;
/// Roughly what fits between the margins in 12pt Helvetica.
const MAX_LINE_CHARS: usize = 115;

fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

/// A line of text and its baseline, in points from the bottom of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub y: f32,
}

/// Splits `text` into pages. Each page starts one margin below the top edge,
/// advances by the leading and breaks once the cursor falls under the bottom margin.
pub fn paginate(text: &str) -> Vec<Vec<PlacedLine>> {
    let mut pages = vec![Vec::new()];
    let mut y = PAGE_HEIGHT_PT - MARGIN_PT;

    for line in text.lines().flat_map(wrap) {
        if let Some(page) = pages.last_mut() {
            page.push(PlacedLine { text: line, y });
        }
        y -= LEADING_PT;
        if y < MARGIN_PT {
            pages.push(Vec::new());
            y = PAGE_HEIGHT_PT - MARGIN_PT;
        }
    }
    if pages.len() > 1 && pages.last().is_some_and(Vec::is_empty) {
        pages.pop();
    }
    pages
}

/// The builtin fonts only cover Latin-1, so anything else (emoji, markdown bullets
/// from some models) is dropped and tabs become spaces.
fn printable(line: &str) -> String {
    line.chars()
        .filter_map(|c| match c {
            '\t' => Some(' '),
            '\u{2022}' => Some('-'),
            c if (' '..='~').contains(&c) || ('\u{a0}'..='\u{ff}').contains(&c) => Some(c),
            _ => None,
        })
        .collect()
}

fn wrap(line: &str) -> Vec<String> {
    let line = printable(line);
    if line.chars().count() <= MAX_LINE_CHARS {
        return vec![line];
    }
    let mut out = Vec::new();
    let mut current = String::new();
    for word in line.split(' ') {
        if !current.is_empty()
            && current.chars().count() + 1 + word.chars().count() > MAX_LINE_CHARS
        {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    out.push(current);
    out
}

/// Renders `text` as a PDF and returns the file bytes.
pub fn render_to_pdf(title: &str, text: &str) -> Result<Vec<u8>, PlanError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, mm(PAGE_WIDTH_PT), mm(PAGE_HEIGHT_PT), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| PlanError::Pdf(e.to_string()))?;

    for (index, lines) in paginate(text).into_iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(mm(PAGE_WIDTH_PT), mm(PAGE_HEIGHT_PT), "Layer 1")
        };
        let layer = doc.get_page(page).get_layer(layer);
        for line in lines {
            layer.use_text(line.text, FONT_SIZE_PT, mm(MARGIN_PT), mm(line.y), &font);
        }
    }

    doc.save_to_bytes().map_err(|e| PlanError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirty_five_lines_fit_on_a_page() {
        let text = (0..35).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let pages = paginate(&text);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0][0].y, 562.0);
        assert_eq!(pages[0][34].y, 52.0);

        let text = format!("{text}\nline 35");
        let pages = paginate(&text);
        assert_eq!(pages.len(), 2);
        assert_eq!(
            pages[1][0],
            PlacedLine {
                text: "line 35".into(),
                y: 562.0,
            }
        );
    }

    #[test]
    fn long_lines_wrap_on_word_boundaries() {
        let line = "recovery ".repeat(30);
        let pages = paginate(line.trim_end());
        assert!(pages[0].len() > 1);
        assert!(pages[0].iter().all(|l| l.text.chars().count() <= MAX_LINE_CHARS));
    }

    #[test]
    fn characters_outside_latin1_are_dropped() {
        assert_eq!(printable("\u{1F3CB}\u{FE0F} **Training Plan**"), " **Training Plan**");
        assert_eq!(printable("\u{2022}\tRest"), "- Rest");
    }

    #[test]
    fn rendered_document_is_a_pdf() {
        let bytes =
            render_to_pdf("Personalized Plan", "Training Plan\n- Sprints: 6 x 30m").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn empty_text_still_renders_one_page() {
        assert_eq!(paginate("").len(), 1);
        assert!(render_to_pdf("Empty", "").is_ok());
    }
}
