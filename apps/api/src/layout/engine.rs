//! Flow layout engine: places template blocks onto fixed-size pages.
//!
//! Blocks flow top to bottom inside the margin frame. Paragraph text is wrapped
//! greedily against static Helvetica metrics; table cells wrap inside their
//! column. Breaks happen between lines and between table rows, never inside a
//! row. All coordinates are PDF points measured from the bottom-left corner.

use serde::Serialize;

use crate::layout::font_metrics::{helvetica, FontMetricTable, PageConfig};
use crate::layout::template::{Align, Block, CellPadding, ReportTemplate, TextStyle};
use crate::report::models::ReportState;

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// A single line of text at a fixed position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub x: f32,
    pub baseline: f32,
    pub font_size: f32,
    pub text: String,
}

/// A straight stroked line segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub thickness: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PageItem {
    Text(TextRun),
    Rule(Rule),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub items: Vec<PageItem>,
}

impl Page {
    #[cfg(test)]
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.items.iter().filter_map(|item| match item {
            PageItem::Text(run) => Some(run),
            PageItem::Rule(_) => None,
        })
    }

    #[cfg(test)]
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.items.iter().filter_map(|item| match item {
            PageItem::Rule(rule) => Some(rule),
            PageItem::Text(_) => None,
        })
    }
}

/// Fully positioned document, ready to serialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaidOutDocument {
    pub title: String,
    pub page: PageConfig,
    pub pages: Vec<Page>,
}

impl LaidOutDocument {
    #[cfg(test)]
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.pages.iter().flat_map(Page::text_runs)
    }

    /// True if any single laid-out line contains `needle`.
    #[cfg(test)]
    pub fn contains_text(&self, needle: &str) -> bool {
        self.text_runs().any(|run| run.text.contains(needle))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Line wrapping
// ────────────────────────────────────────────────────────────────────────────

/// Greedy word wrap. Returns the lines in order; an empty or all-whitespace
/// string returns no lines. A word wider than `max_width` on its own is split
/// between characters so that no line overflows.
pub fn wrap_text(
    text: &str,
    metrics: &FontMetricTable,
    font_size: f32,
    max_width: f32,
) -> Vec<String> {
    let space_w = metrics.space_width * font_size;
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        for piece in split_overlong(word, metrics, font_size, max_width) {
            let piece_w = metrics.width_pt(&piece, font_size);

            if current.is_empty() {
                current = piece;
                current_width = piece_w;
            } else if current_width + space_w + piece_w > max_width {
                // Current line is full — push it and start a new line.
                lines.push(std::mem::take(&mut current));
                current = piece;
                current_width = piece_w;
            } else {
                current.push(' ');
                current.push_str(&piece);
                current_width += space_w + piece_w;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Splits a single word into chunks that each fit `max_width`.
fn split_overlong(
    word: &str,
    metrics: &FontMetricTable,
    font_size: f32,
    max_width: f32,
) -> Vec<String> {
    if metrics.width_pt(word, font_size) <= max_width {
        return vec![word.to_string()];
    }

    let mut chunks = Vec::new();
    let mut chunk = String::new();
    let mut width = 0.0_f32;
    for c in word.chars() {
        let mut buf = [0u8; 4];
        let char_w = metrics.width_pt(c.encode_utf8(&mut buf), font_size);
        if !chunk.is_empty() && width + char_w > max_width {
            chunks.push(std::mem::take(&mut chunk));
            width = 0.0;
        }
        chunk.push(c);
        width += char_w;
    }
    if !chunk.is_empty() {
        chunks.push(chunk);
    }
    chunks
}

// ────────────────────────────────────────────────────────────────────────────
// Flow
// ────────────────────────────────────────────────────────────────────────────

const EPSILON: f32 = 0.01;

struct Flow<'a> {
    page: &'a PageConfig,
    metrics: &'static FontMetricTable,
    padding: CellPadding,
    rule_thickness: f32,
    pages: Vec<Page>,
    /// Top of the remaining free space on the current page.
    cursor: f32,
}

impl<'a> Flow<'a> {
    fn new(page: &'a PageConfig, template: &ReportTemplate) -> Self {
        Self {
            page,
            metrics: helvetica(),
            padding: template.cell_padding,
            rule_thickness: template.rule_thickness,
            pages: vec![Page::default()],
            cursor: page.frame_top(),
        }
    }

    fn at_top(&self) -> bool {
        (self.page.frame_top() - self.cursor).abs() < EPSILON
    }

    fn push(&mut self, item: PageItem) {
        if let Some(page) = self.pages.last_mut() {
            page.items.push(item);
        }
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = self.page.frame_top();
    }

    /// Starts a new page unless `height` still fits above the bottom margin.
    /// A block taller than a whole page is placed anyway rather than looping.
    fn ensure_space(&mut self, height: f32) {
        if self.cursor - height < self.page.frame_bottom() - EPSILON && !self.at_top() {
            self.new_page();
        }
    }

    /// Vertical whitespace. Dropped at the top of a page.
    fn skip(&mut self, height: f32) {
        if !self.at_top() {
            self.cursor -= height;
        }
    }

    fn aligned_x(&self, left: f32, width: f32, text_width: f32, align: Align) -> f32 {
        match align {
            Align::Left => left,
            Align::Center => left + (width - text_width) / 2.0,
        }
    }

    fn paragraph(&mut self, text: &str, style: &TextStyle) {
        let width = self.page.frame_width();
        let lines = wrap_text(text, self.metrics, style.font_size, width);
        if lines.is_empty() {
            return;
        }

        self.skip(style.space_before);
        for line in lines {
            self.ensure_space(style.leading);
            let line_w = self.metrics.width_pt(&line, style.font_size);
            let x = self.aligned_x(self.page.margin_left_pt, width, line_w, style.align);
            self.push(PageItem::Text(TextRun {
                x,
                baseline: self.cursor - style.font_size,
                font_size: style.font_size,
                text: line,
            }));
            self.cursor -= style.leading;
        }
        self.skip(style.space_after);
    }

    /// One table row, centred in the frame. When `ruled`, the row is boxed
    /// and every column boundary is drawn.
    fn table_row(&mut self, widths: &[f32], cells: &[&str], style: &TextStyle, ruled: bool) {
        let total: f32 = widths.iter().sum();
        let x0 = self.page.margin_left_pt + (self.page.frame_width() - total) / 2.0;
        let pad = self.padding;

        let wrapped: Vec<Vec<String>> = cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| {
                wrap_text(cell, self.metrics, style.font_size, w - 2.0 * pad.horizontal)
            })
            .collect();
        let line_count = wrapped.iter().map(Vec::len).max().unwrap_or(0).max(1);
        let row_height = line_count as f32 * style.leading + 2.0 * pad.vertical;

        self.ensure_space(row_height);
        let top = self.cursor;

        let mut x = x0;
        for (lines, w) in wrapped.into_iter().zip(widths) {
            let inner = w - 2.0 * pad.horizontal;
            for (i, line) in lines.into_iter().enumerate() {
                let line_w = self.metrics.width_pt(&line, style.font_size);
                let tx = self.aligned_x(x + pad.horizontal, inner, line_w, style.align);
                self.push(PageItem::Text(TextRun {
                    x: tx,
                    baseline: top - pad.vertical - style.font_size - i as f32 * style.leading,
                    font_size: style.font_size,
                    text: line,
                }));
            }
            x += w;
        }

        if ruled {
            let bottom = top - row_height;
            let thickness = self.rule_thickness;
            for y in [top, bottom] {
                self.push(PageItem::Rule(Rule {
                    x1: x0,
                    y1: y,
                    x2: x0 + total,
                    y2: y,
                    thickness,
                }));
            }
            let mut edge = x0;
            for boundary in std::iter::once(0.0).chain(widths.iter().copied()) {
                edge += boundary;
                self.push(PageItem::Rule(Rule {
                    x1: edge,
                    y1: top,
                    x2: edge,
                    y2: bottom,
                    thickness,
                }));
            }
        }

        self.cursor -= row_height;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

/// Lays out the report for one session. Pure and CPU-bound; async callers
/// should run it inside `tokio::task::spawn_blocking`.
pub fn layout_document(
    template: &ReportTemplate,
    state: &ReportState,
    page: &PageConfig,
) -> LaidOutDocument {
    let request = &state.request;
    let mut flow = Flow::new(page, template);

    for block in &template.blocks {
        match block {
            Block::Paragraph { text, style } => {
                flow.paragraph(&text.resolve(request), style);
            }
            Block::Spacer { height } => flow.skip(*height),
            Block::KeyValueTable {
                rows,
                column_widths,
                style,
            } => {
                for &(label, field) in rows {
                    flow.table_row(column_widths, &[label, field.resolve(request)], style, false);
                }
            }
            Block::NumberedList {
                heading,
                heading_style,
                item_style,
                section,
            } => {
                flow.paragraph(heading, heading_style);
                for (i, item) in state.tasks(*section).items().iter().enumerate() {
                    flow.paragraph(&format!("{}. {}", i + 1, item), item_style);
                }
            }
            Block::CheckboxGrid {
                labels,
                column_width,
                empty_rows,
                style,
            } => {
                let widths = vec![*column_width; labels.len()];
                flow.table_row(&widths, labels, style, true);
                let blanks = vec![""; labels.len()];
                for _ in 0..*empty_rows {
                    flow.table_row(&widths, &blanks, style, true);
                }
            }
        }
    }

    LaidOutDocument {
        title: template.title.to_string(),
        page: page.clone(),
        pages: flow.pages,
    }
}
