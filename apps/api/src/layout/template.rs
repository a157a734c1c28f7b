//! Declarative description of the weekly report page.
//!
//! The template is data: boilerplate strings, detail-row labels, rating
//! categories and paragraph styles. The engine in `layout::engine` knows how
//! to place each `Block` kind but nothing about what the report says, so
//! institutional formatting changes stay in this file.

use crate::report::models::{ReportRequest, TaskSection};

// ────────────────────────────────────────────────────────────────────────────
// Building blocks
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Paragraph style, all lengths in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub leading: f32,
    pub space_before: f32,
    pub space_after: f32,
    pub align: Align,
}

/// A request field the template can print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    InstituteName,
    StudentName,
    EnrollmentNumber,
    Organization,
    ExternalGuideName,
    ExternalGuideContact,
    InternalGuideName,
    Hours,
}

impl Field {
    pub fn resolve(self, request: &ReportRequest) -> &str {
        match self {
            Field::InstituteName => &request.institute_name,
            Field::StudentName => &request.student_name,
            Field::EnrollmentNumber => &request.enrollment_number,
            Field::Organization => &request.organization,
            Field::ExternalGuideName => &request.external_guide_name,
            Field::ExternalGuideContact => &request.external_guide_contact,
            Field::InternalGuideName => &request.internal_guide_name,
            Field::Hours => &request.hours,
        }
    }
}

/// Where a paragraph's text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Literal(&'static str),
    /// Field value, upper-cased.
    FieldUpper(Field),
    /// `prefix` followed directly by the field value, verbatim.
    Labeled(&'static str, Field),
}

impl TextSource {
    pub fn resolve(self, request: &ReportRequest) -> String {
        match self {
            TextSource::Literal(text) => text.to_string(),
            TextSource::FieldUpper(field) => field.resolve(request).trim().to_uppercase(),
            TextSource::Labeled(prefix, field) => format!("{prefix}{}", field.resolve(request)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph {
        text: TextSource,
        style: TextStyle,
    },
    Spacer {
        height: f32,
    },
    /// Borderless two-column label/value table.
    KeyValueTable {
        rows: Vec<(&'static str, Field)>,
        column_widths: [f32; 2],
        style: TextStyle,
    },
    /// Heading followed by `1. item`, `2. item`, … from one task list.
    NumberedList {
        heading: &'static str,
        heading_style: TextStyle,
        item_style: TextStyle,
        section: TaskSection,
    },
    /// Ruled grid: one header row of labels, then empty rows to tick.
    CheckboxGrid {
        labels: Vec<&'static str>,
        column_width: f32,
        empty_rows: usize,
        style: TextStyle,
    },
}

/// Cell padding shared by both table kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPadding {
    pub horizontal: f32,
    pub vertical: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportTemplate {
    pub title: &'static str,
    pub blocks: Vec<Block>,
    pub cell_padding: CellPadding,
    pub rule_thickness: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Weekly internship report
// ────────────────────────────────────────────────────────────────────────────

pub const REPORT_TITLE: &str = "Student's Weekly Report of Internship";
pub const ADDRESS_LINE: &str = "Ahmedabad, Gujarat";
pub const CONTACT_LINE: &str = "Ph: 07967129000 Website: www.ljku.edu.in";

pub const RATING_CATEGORIES: [&str; 6] =
    ["Excellent", "Very Good", "Good", "Fair", "Below Average", "Poor"];

const TITLE_STYLE: TextStyle = TextStyle {
    font_size: 14.0,
    leading: 16.0,
    space_before: 0.0,
    space_after: 12.0,
    align: Align::Center,
};

const SUBTITLE_STYLE: TextStyle = TextStyle {
    font_size: 12.0,
    leading: 14.0,
    space_before: 0.0,
    space_after: 8.0,
    align: Align::Center,
};

const BODY_STYLE: TextStyle = TextStyle {
    font_size: 10.0,
    leading: 12.0,
    space_before: 0.0,
    space_after: 8.0,
    align: Align::Left,
};

const LABEL_STYLE: TextStyle = TextStyle {
    font_size: 10.0,
    leading: 12.0,
    space_before: 8.0,
    space_after: 4.0,
    align: Align::Left,
};

const TABLE_STYLE: TextStyle = TextStyle {
    font_size: 10.0,
    leading: 12.0,
    space_before: 0.0,
    space_after: 0.0,
    align: Align::Left,
};

const GRID_STYLE: TextStyle = TextStyle {
    align: Align::Center,
    ..TABLE_STYLE
};

fn paragraph(text: TextSource, style: TextStyle) -> Block {
    Block::Paragraph { text, style }
}

fn literal(text: &'static str, style: TextStyle) -> Block {
    paragraph(TextSource::Literal(text), style)
}

fn spacer(height: f32) -> Block {
    Block::Spacer { height }
}

/// The weekly internship report layout.
pub fn weekly_report_template() -> ReportTemplate {
    ReportTemplate {
        title: REPORT_TITLE,
        blocks: vec![
            // Institute header
            paragraph(TextSource::FieldUpper(Field::InstituteName), TITLE_STYLE),
            literal(ADDRESS_LINE, SUBTITLE_STYLE),
            literal(CONTACT_LINE, SUBTITLE_STYLE),
            literal(REPORT_TITLE, TITLE_STYLE),
            spacer(12.0),
            Block::KeyValueTable {
                rows: vec![
                    ("Student Name:", Field::StudentName),
                    ("Enrollment Number:", Field::EnrollmentNumber),
                    ("Name of Organization:", Field::Organization),
                    ("External Guide Name:", Field::ExternalGuideName),
                    ("External Guide Contact Details:", Field::ExternalGuideContact),
                    ("Internal Faculty Guide Name:", Field::InternalGuideName),
                ],
                column_widths: [150.0, 350.0],
                style: TABLE_STYLE,
            },
            spacer(12.0),
            Block::NumberedList {
                heading: "Work done in last Week with description:",
                heading_style: LABEL_STYLE,
                item_style: BODY_STYLE,
                section: TaskSection::WorkDone,
            },
            spacer(8.0),
            Block::NumberedList {
                heading: "Plans for next week:",
                heading_style: LABEL_STYLE,
                item_style: BODY_STYLE,
                section: TaskSection::Plans,
            },
            spacer(8.0),
            paragraph(TextSource::Labeled("Total Working Hrs: ", Field::Hours), BODY_STYLE),
            spacer(8.0),
            literal("Signature of Student: ____________________", BODY_STYLE),
            spacer(12.0),
            // Performance rating
            literal(
                "The above entries are correct and the admin of work done by Trainee is",
                BODY_STYLE,
            ),
            Block::CheckboxGrid {
                labels: RATING_CATEGORIES.to_vec(),
                column_width: 80.0,
                empty_rows: 1,
                style: GRID_STYLE,
            },
            spacer(12.0),
            // Guide signatures
            literal(
                "Signature of External Guide with Company Seal: ____________________",
                BODY_STYLE,
            ),
            literal("Date: ____________________", BODY_STYLE),
            spacer(8.0),
            literal("Signature of Internal Guide: ____________________", BODY_STYLE),
            literal("Date: ____________________", BODY_STYLE),
        ],
        cell_padding: CellPadding {
            horizontal: 6.0,
            vertical: 2.0,
        },
        rule_thickness: 0.5,
    }
}
