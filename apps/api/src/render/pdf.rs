//! Serializes a `LaidOutDocument` to PDF bytes with the built-in Helvetica font.

use printpdf::{BuiltinFont, Color, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb};

use crate::layout::engine::{LaidOutDocument, PageItem};
use crate::render::RenderError;

const LAYER_NAME: &str = "Report";

/// Points → millimetres.
fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

pub fn write_pdf(doc: &LaidOutDocument) -> Result<Vec<u8>, RenderError> {
    let width = mm(doc.page.width_pt);
    let height = mm(doc.page.height_pt);

    let (pdf, first_page, first_layer) =
        PdfDocument::new(doc.title.as_str(), width, height, LAYER_NAME);
    let font = pdf
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;

    for (index, page) in doc.pages.iter().enumerate() {
        let layer: PdfLayerReference = if index == 0 {
            pdf.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = pdf.add_page(width, height, LAYER_NAME);
            pdf.get_page(page_idx).get_layer(layer_idx)
        };

        layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));

        for item in &page.items {
            match item {
                PageItem::Text(run) => {
                    layer.use_text(
                        run.text.as_str(),
                        run.font_size,
                        mm(run.x),
                        mm(run.baseline),
                        &font,
                    );
                }
                PageItem::Rule(rule) => {
                    layer.set_outline_thickness(rule.thickness);
                    layer.add_line(Line {
                        points: vec![
                            (Point::new(mm(rule.x1), mm(rule.y1)), false),
                            (Point::new(mm(rule.x2), mm(rule.y2)), false),
                        ],
                        is_closed: false,
                    });
                }
            }
        }
    }

    pdf.save_to_bytes().map_err(|e| RenderError::Pdf(e.to_string()))
}
