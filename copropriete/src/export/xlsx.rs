//! Sérialisation d'une `Grid` en classeur xlsx (rust_xlsxwriter)
//!
//! Le classeur est produit entièrement en mémoire. La date de création est
//! fixée pour que deux rendus de la même grille donnent les mêmes octets.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook};

use crate::error::ReportError;
use crate::grid::{CellStyle, CellValue, Content, Emphasis, Grid};

const FONT_NAME: &str = "Arial";
const FONT_SIZE: f64 = 11.0;

/// Écrit la grille dans un classeur d'une feuille et retourne ses octets
pub fn to_bytes(grid: &Grid) -> Result<Vec<u8>, ReportError> {
    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    let mut formats = FormatCache::default();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&grid.sheet_name)?;

    for (col, width) in grid.column_widths().iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }
    for (row, height) in grid.row_heights() {
        worksheet.set_row_height(row, height)?;
    }

    // Fusions d'abord: merge_range écrit l'ancre en texte et formate toute la zone
    for merge in grid.merges() {
        let anchor = grid.cell(merge.first_row, merge.first_col);
        let style = anchor.map(|c| c.style).unwrap_or(BODY);
        let format = formats.get(style);
        let text = match anchor.map(|c| &c.value) {
            Some(CellValue::Text(t)) => t.as_str(),
            _ => "",
        };
        worksheet.merge_range(
            merge.first_row,
            merge.first_col,
            merge.last_row,
            merge.last_col,
            text,
            format,
        )?;
    }

    for (row, col, cell) in grid.cells() {
        let anchored = grid.merge_anchored_at(row, col).is_some();
        if grid.is_covered(row, col) || (anchored && !matches!(cell.value, CellValue::Number(_))) {
            continue;
        }
        let format = formats.get(cell.style);
        match &cell.value {
            CellValue::Blank => {
                worksheet.write_blank(row, col, format)?;
            }
            CellValue::Text(text) => {
                worksheet.write_string_with_format(row, col, text, format)?;
            }
            CellValue::Number(value) => {
                worksheet.write_number_with_format(row, col, to_f64(*value)?, format)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

const BODY: CellStyle = CellStyle::new(Emphasis::Body, Content::Text);

fn to_f64(value: Decimal) -> Result<f64, ReportError> {
    value
        .to_f64()
        .ok_or_else(|| ReportError::Number(value.to_string()))
}

/// Un `Format` par style rencontré
#[derive(Default)]
struct FormatCache {
    formats: BTreeMap<CellStyle, Format>,
}

impl FormatCache {
    fn get(&mut self, style: CellStyle) -> &Format {
        self.formats.entry(style).or_insert_with(|| derive_format(style))
    }
}

fn derive_format(style: CellStyle) -> Format {
    let mut format = Format::new()
        .set_font_name(FONT_NAME)
        .set_font_size(FONT_SIZE)
        .set_align(FormatAlign::VerticalCenter);

    format = match style.emphasis {
        Emphasis::Title => format
            .set_bold()
            .set_font_size(14.0)
            .set_text_wrap(),
        Emphasis::Subtitle => format.set_bold(),
        Emphasis::Header => format
            .set_bold()
            .set_text_wrap()
            .set_border(FormatBorder::Thin),
        Emphasis::Body => format.set_border(FormatBorder::Thin),
        Emphasis::Category => format
            .set_italic()
            .set_border(FormatBorder::Thin),
        Emphasis::Subtotal => format.set_bold().set_border(FormatBorder::Thin),
        Emphasis::Total => format
            .set_bold()
            .set_font_size(12.0)
            .set_border(FormatBorder::Medium),
    };

    match style.content {
        Content::Text => format.set_align(FormatAlign::Left),
        Content::Centered => format.set_align(FormatAlign::Center).set_text_wrap(),
        Content::Decimal2 => format.set_align(FormatAlign::Right).set_num_format("0.00"),
        Content::Integer => format.set_align(FormatAlign::Right).set_num_format("0"),
    }
}
