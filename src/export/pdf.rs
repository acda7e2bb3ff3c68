//! PDF export on top of `printpdf`
//!
//! The shared outline is laid out on US Letter pages using real glyph
//! widths: the standard Helvetica metrics by default, or those of an
//! embedded TrueType font when one is configured. Only an embedded font can
//! show text outside Latin-1. With the built-in fonts such characters are
//! folded to their base letter where one exists and replaced with `?`
//! otherwise.

use std::path::Path;
use std::sync::Arc;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use tracing::{debug, info};

use super::{Line, outline};
use crate::config::ExportConfig;
use crate::models::{Itinerary, TripRequest};
use crate::{Result, TripAiError};

// Layout works in points
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;
const BLANK_GAP: f32 = 8.0;
const BULLET_INDENT: f32 = 14.0;
const CELL_GAP: f32 = 8.0;
/// Share of the text width given to the category and item columns
const COLUMN_SHARES: [f32; 2] = [0.35, 0.40];
const PT_TO_MM: f32 = 25.4 / 72.0;

/// Helvetica advance widths for ' '..='~', in 1/1000 em
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722, 667,
    611, 722, 667, 944, 667, 667, 611, // 'A'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, // 'a'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Helvetica-Bold advance widths for ' '..='~', in 1/1000 em
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    333, 333, 584, 584, 584, 611, 975, // ':'..'@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667, 778, 722, 667,
    611, 722, 667, 944, 667, 667, 611, // 'A'..'Z'
    333, 278, 333, 584, 556, 333, // '['..'`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, // 'a'..'z'
    389, 280, 389, 584, // '{'..'~'
];

/// Renders itineraries as PDF documents
#[derive(Debug, Clone, Default)]
pub struct PdfExporter {
    /// TrueType font embedded in every document; built-in Helvetica when unset
    font: Option<Arc<[u8]>>,
}

impl PdfExporter {
    /// Exporter using the built-in Helvetica faces
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exporter embedding the TrueType font at `path`
    pub fn with_font_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            TripAiError::export(format!("Cannot read font {}: {e}", path.display()))
        })?;
        ttf_parser::Face::parse(&bytes, 0).map_err(|e| {
            TripAiError::export(format!("{} is not a usable font: {e}", path.display()))
        })?;
        info!("PDF export will embed font {}", path.display());
        Ok(Self {
            font: Some(Arc::from(bytes)),
        })
    }

    pub fn from_config(config: &ExportConfig) -> Result<Self> {
        match &config.font_path {
            Some(path) => Self::with_font_file(path),
            None => Ok(Self::new()),
        }
    }

    /// Render the itinerary as a PDF document
    pub fn render(&self, request: &TripRequest, itinerary: &Itinerary) -> Result<Vec<u8>> {
        if itinerary.days.is_empty() {
            return Err(TripAiError::export("itinerary has no days"));
        }
        let metrics = self.metrics()?;
        let lines = outline(request, itinerary);
        let pages = layout(&lines, &metrics);
        debug!("Rendering PDF with {} pages", pages.len());

        let title = match lines.first() {
            Some(Line::Title(title)) => title.clone(),
            _ => "Trip itinerary".to_string(),
        };
        let (width, height) = (Mm(PAGE_WIDTH * PT_TO_MM), Mm(PAGE_HEIGHT * PT_TO_MM));
        let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Layer 1");
        let (regular, bold) = self.fonts(&doc)?;

        let mut targets = vec![(first_page, first_layer)];
        for _ in 1..pages.len() {
            targets.push(doc.add_page(width, height, "Layer 1"));
        }
        for ((page, layer), placed) in targets.into_iter().zip(&pages) {
            let layer = doc.get_page(page).get_layer(layer);
            for item in placed {
                let font = if item.bold { &bold } else { &regular };
                layer.use_text(
                    item.text.as_str(),
                    item.size,
                    Mm(item.x * PT_TO_MM),
                    Mm(item.y * PT_TO_MM),
                    font,
                );
            }
        }

        doc.save_to_bytes()
            .map_err(|e| TripAiError::export(format!("Failed to write PDF: {e}")))
    }

    fn metrics(&self) -> Result<Metrics<'_>> {
        match &self.font {
            Some(bytes) => ttf_parser::Face::parse(bytes, 0)
                .map(Metrics::Embedded)
                .map_err(|e| TripAiError::export(format!("Embedded font is unusable: {e}"))),
            None => Ok(Metrics::Builtin),
        }
    }

    fn fonts(&self, doc: &PdfDocumentReference) -> Result<(IndirectFontRef, IndirectFontRef)> {
        match &self.font {
            Some(bytes) => {
                let font = doc
                    .add_external_font(&bytes[..])
                    .map_err(|e| TripAiError::export(format!("Failed to embed font: {e}")))?;
                Ok((font.clone(), font))
            }
            None => {
                let regular = doc
                    .add_builtin_font(BuiltinFont::Helvetica)
                    .map_err(|e| TripAiError::export(format!("Failed to add font: {e}")))?;
                let bold = doc
                    .add_builtin_font(BuiltinFont::HelveticaBold)
                    .map_err(|e| TripAiError::export(format!("Failed to add font: {e}")))?;
                Ok((regular, bold))
            }
        }
    }
}

/// Render with the built-in fonts
pub fn render_pdf(request: &TripRequest, itinerary: &Itinerary) -> Result<Vec<u8>> {
    PdfExporter::new().render(request, itinerary)
}

/// Glyph widths for the font in use
enum Metrics<'a> {
    Builtin,
    Embedded(ttf_parser::Face<'a>),
}

impl Metrics<'_> {
    /// Text as it will be written with this font
    fn prepare(&self, text: &str) -> String {
        match self {
            Metrics::Builtin => fold_win_ansi(text),
            Metrics::Embedded(_) => text.to_string(),
        }
    }

    /// Width of prepared `text` in points
    fn width(&self, text: &str, size: f32, bold: bool) -> f32 {
        let units: f32 = text.chars().map(|c| self.char_units(c, bold)).sum();
        units * size / 1000.0
    }

    fn char_units(&self, c: char, bold: bool) -> f32 {
        match self {
            Metrics::Builtin => f32::from(builtin_units(c, bold)),
            Metrics::Embedded(face) => face
                .glyph_index(c)
                .and_then(|glyph| face.glyph_hor_advance(glyph))
                .map_or(500.0, |advance| {
                    f32::from(advance) * 1000.0 / f32::from(face.units_per_em())
                }),
        }
    }
}

fn builtin_units(c: char, bold: bool) -> u16 {
    let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
    let lookup = |c: char| table[(c as usize) - 0x20];
    match c {
        ' '..='~' => lookup(c),
        '•' => 350,
        '–' => 556,
        '—' | '…' | '‰' => 1000,
        '‘' | '’' | '‚' => 278,
        '“' | '”' | '„' => 500,
        _ => match base_letter(c) {
            Some(base) => lookup(base),
            None => 556,
        },
    }
}

/// Plain letter under an accented Latin one
fn base_letter(c: char) -> Option<char> {
    let base = match c {
        'À'..='Å' | 'Ą' | 'Ă' => 'A',
        'à'..='å' | 'ą' | 'ă' => 'a',
        'Ç' | 'Ć' | 'Č' => 'C',
        'ç' | 'ć' | 'č' => 'c',
        'È'..='Ë' | 'Ę' | 'Ě' => 'E',
        'è'..='ë' | 'ę' | 'ě' => 'e',
        'Ì'..='Ï' | 'İ' => 'I',
        'ì'..='ï' | 'ı' => 'i',
        'Ł' => 'L',
        'ł' => 'l',
        'Ñ' | 'Ń' | 'Ň' => 'N',
        'ñ' | 'ń' | 'ň' => 'n',
        'Ò'..='Ö' | 'Ø' | 'Ő' => 'O',
        'ò'..='ö' | 'ø' | 'ő' => 'o',
        'Ř' => 'R',
        'ř' => 'r',
        'Š' | 'Ś' | 'Ş' | 'Ș' => 'S',
        'š' | 'ś' | 'ş' | 'ș' => 's',
        'Ț' | 'Ť' => 'T',
        'ț' | 'ť' => 't',
        'Ù'..='Ü' | 'Ű' | 'Ů' => 'U',
        'ù'..='ü' | 'ű' | 'ů' => 'u',
        'Ý' | 'Ÿ' => 'Y',
        'ý' | 'ÿ' => 'y',
        'Ž' | 'Ź' | 'Ż' => 'Z',
        'ž' | 'ź' | 'ż' => 'z',
        'Ğ' => 'G',
        'ğ' => 'g',
        'Đ' => 'D',
        'đ' => 'd',
        _ => return None,
    };
    Some(base)
}

/// Keep what `WinAnsiEncoding` can show, fold other accented letters
fn fold_win_ansi(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ' '..='~' | '\u{A0}'..='\u{FF}' => c,
            '€' | '‚' | 'ƒ' | '„' | '…' | '†' | '‡' | 'ˆ' | '‰' | 'Š' | '‹' | 'Œ' | 'Ž' | '‘'
            | '’' | '“' | '”' | '•' | '–' | '—' | '˜' | '™' | 'š' | '›' | 'œ' | 'ž' | 'Ÿ' => c,
            _ => base_letter(c).unwrap_or('?'),
        })
        .collect()
}

/// A run of text at a fixed position
#[derive(Debug, Clone, PartialEq)]
struct Placed {
    text: String,
    x: f32,
    y: f32,
    size: f32,
    bold: bool,
}

struct Style {
    size: f32,
    leading: f32,
    bold: bool,
}

fn style(line: &Line) -> Style {
    let (size, leading, bold) = match line {
        Line::Title(_) => (18.0, 24.0, true),
        Line::Heading(_) => (14.0, 20.0, true),
        Line::Subheading(_) => (12.0, 17.0, true),
        Line::TableHeader(_) => (11.0, 15.0, true),
        Line::Text(_) | Line::Bullet(_) | Line::TableRow(_) | Line::Blank => (11.0, 14.0, false),
    };
    Style {
        size,
        leading,
        bold,
    }
}

/// Tracks the baseline and starts pages as they fill up
struct Cursor {
    pages: Vec<Vec<Placed>>,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn next_line(&mut self, leading: f32) {
        if self.y - leading < MARGIN {
            self.pages.push(Vec::new());
            self.y = PAGE_HEIGHT - MARGIN;
        }
        self.y -= leading;
    }

    fn place(&mut self, text: String, x: f32, style: &Style) {
        let y = self.y;
        if let Some(page) = self.pages.last_mut() {
            page.push(Placed {
                text,
                x,
                y,
                size: style.size,
                bold: style.bold,
            });
        }
    }
}

fn layout(lines: &[Line], metrics: &Metrics<'_>) -> Vec<Vec<Placed>> {
    let text_width = PAGE_WIDTH - 2.0 * MARGIN;
    let mut cursor = Cursor::new();

    for line in lines {
        let style = style(line);
        let measure = |text: &str| metrics.width(text, style.size, style.bold);

        match line {
            Line::Blank => {
                if cursor.y < PAGE_HEIGHT - MARGIN {
                    cursor.y -= BLANK_GAP;
                }
            }
            Line::Title(text)
            | Line::Heading(text)
            | Line::Subheading(text)
            | Line::Text(text)
            | Line::Bullet(text) => {
                let bullet = matches!(line, Line::Bullet(_));
                let indent = if bullet { BULLET_INDENT } else { 0.0 };
                let text = metrics.prepare(text);
                for (index, segment) in wrap(&text, text_width - indent, measure)
                    .into_iter()
                    .enumerate()
                {
                    cursor.next_line(style.leading);
                    if bullet && index == 0 {
                        cursor.place(metrics.prepare("•"), MARGIN + 2.0, &style);
                    }
                    cursor.place(segment, MARGIN + indent, &style);
                }
            }
            Line::TableHeader(cells) | Line::TableRow(cells) => {
                let [category, item, amount] = cells;
                let column_widths = COLUMN_SHARES.map(|share| text_width * share);
                let columns = [
                    wrap(&metrics.prepare(category), column_widths[0] - CELL_GAP, measure),
                    wrap(&metrics.prepare(item), column_widths[1] - CELL_GAP, measure),
                ];
                let amount = metrics.prepare(amount);
                let amount_x = PAGE_WIDTH - MARGIN - measure(&amount);
                let height = columns.iter().map(Vec::len).max().unwrap_or(1);

                for row in 0..height {
                    cursor.next_line(style.leading);
                    let mut x = MARGIN;
                    for (column, width) in columns.iter().zip(column_widths) {
                        if let Some(segment) = column.get(row) {
                            cursor.place(segment.clone(), x, &style);
                        }
                        x += width;
                    }
                    if row == 0 {
                        cursor.place(amount.clone(), amount_x, &style);
                    }
                }
            }
        }
    }

    cursor.pages
}

/// Greedy word wrap to `max_width`; words wider than a line are split
fn wrap<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if measure(&candidate) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        for c in word.chars() {
            current.push(c);
            if measure(&current) > max_width && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::replace(&mut current, c.to_string()));
            }
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
