//! XLSX styles (styles.xml) writer

use std::collections::HashMap;

use serde_sheets_core::style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle,
    FontVerticalAlign, NumberFormat, PatternType, Protection, Style, Underline,
};
use serde_sheets_core::Workbook;

/// First id available for custom number formats
const FIRST_CUSTOM_NUM_FMT_ID: u32 = 164;

#[derive(Debug)]
pub(crate) struct XlsxStyleTable {
    /// Global, deduplicated styles. Index corresponds to the cellXfs index (xfId).
    styles: Vec<Style>,
    /// Per-worksheet mapping: local worksheet style index -> global xfId.
    sheet_maps: Vec<HashMap<u32, u32>>,
}

#[derive(Debug, Clone, Copy)]
struct ResolvedXfIds {
    font_id: u32,
    fill_id: u32,
    border_id: u32,
    num_fmt_id: u32,
}

impl XlsxStyleTable {
    pub(crate) fn build(workbook: &Workbook) -> Self {
        let mut styles: Vec<Style> = Vec::new();
        let mut style_to_xf: HashMap<Style, u32> = HashMap::new();

        // Index 0 is always default style
        let default = Style::default();
        styles.push(default.clone());
        style_to_xf.insert(default, 0);

        let mut sheet_maps: Vec<HashMap<u32, u32>> = Vec::with_capacity(workbook.sheet_count());

        for sheet in workbook.worksheets() {
            let mut map: HashMap<u32, u32> = HashMap::new();
            map.insert(0, 0);

            for (_row, _col, cell) in sheet.iter_cells() {
                let local_idx = cell.style_index;
                if map.contains_key(&local_idx) {
                    continue;
                }

                let style = sheet.style_by_index(local_idx).cloned().unwrap_or_default();

                let xf_id = match style_to_xf.get(&style) {
                    Some(&id) => id,
                    None => {
                        let id = styles.len() as u32;
                        styles.push(style.clone());
                        style_to_xf.insert(style, id);
                        id
                    }
                };

                map.insert(local_idx, xf_id);
            }

            sheet_maps.push(map);
        }

        Self { styles, sheet_maps }
    }

    pub(crate) fn xf_id_for(&self, sheet_index: usize, local_style_index: u32) -> u32 {
        self.sheet_maps
            .get(sheet_index)
            .and_then(|m| m.get(&local_style_index).copied())
            .unwrap_or(0)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.styles.len()
    }

    pub(crate) fn to_styles_xml(&self) -> String {
        let mut font_ids: HashMap<FontStyle, u32> = HashMap::new();
        let mut fonts: Vec<FontStyle> = Vec::new();

        let default_font = FontStyle::default();
        fonts.push(default_font.clone());
        font_ids.insert(default_font, 0);

        // The first two fills are reserved: none and gray125
        let mut fill_ids: HashMap<FillStyle, u32> = HashMap::new();
        let mut fills: Vec<FillStyle> = vec![
            FillStyle::default(),
            FillStyle::pattern(PatternType::Gray125, Color::Auto, Color::Auto),
        ];
        fill_ids.insert(FillStyle::default(), 0);

        let mut border_ids: HashMap<BorderStyle, u32> = HashMap::new();
        let mut borders: Vec<BorderStyle> = Vec::new();
        let default_border = BorderStyle::default();
        borders.push(default_border.clone());
        border_ids.insert(default_border, 0);

        let mut numfmt_ids: HashMap<String, u32> = HashMap::new();
        let mut numfmts: Vec<(u32, String)> = Vec::new();
        let mut next_numfmt_id = FIRST_CUSTOM_NUM_FMT_ID;

        let mut resolved: Vec<ResolvedXfIds> = Vec::with_capacity(self.styles.len());

        for style in &self.styles {
            let font_id = intern(&mut font_ids, &mut fonts, &style.font);

            let fill_id = if style.fill.is_none() {
                0
            } else {
                intern(&mut fill_ids, &mut fills, &style.fill)
            };

            let border_id = intern(&mut border_ids, &mut borders, &style.border);

            let num_fmt_id = match &style.number_format {
                NumberFormat::General => 0,
                NumberFormat::BuiltIn(id) => *id,
                NumberFormat::Custom(code) => match numfmt_ids.get(code) {
                    Some(&id) => id,
                    None => {
                        let id = next_numfmt_id;
                        next_numfmt_id += 1;
                        numfmt_ids.insert(code.clone(), id);
                        numfmts.push((id, code.clone()));
                        id
                    }
                },
            };

            resolved.push(ResolvedXfIds {
                font_id,
                fill_id,
                border_id,
                num_fmt_id,
            });
        }

        let mut xml = String::new();
        xml.push_str(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if !numfmts.is_empty() {
            xml.push_str(&format!("\n  <numFmts count=\"{}\">", numfmts.len()));
            for (id, code) in &numfmts {
                xml.push_str(&format!(
                    "\n    <numFmt numFmtId=\"{}\" formatCode=\"{}\"/>",
                    id,
                    escape_xml_attr(code)
                ));
            }
            xml.push_str("\n  </numFmts>");
        }

        xml.push_str(&format!("\n  <fonts count=\"{}\">", fonts.len()));
        for font in &fonts {
            xml.push_str("\n    ");
            xml.push_str(&write_font(font));
        }
        xml.push_str("\n  </fonts>");

        xml.push_str(&format!("\n  <fills count=\"{}\">", fills.len()));
        for fill in &fills {
            xml.push_str("\n    ");
            xml.push_str(&write_fill(fill));
        }
        xml.push_str("\n  </fills>");

        xml.push_str(&format!("\n  <borders count=\"{}\">", borders.len()));
        for border in &borders {
            xml.push_str("\n    ");
            xml.push_str(&write_border(border));
        }
        xml.push_str("\n  </borders>");

        xml.push_str(
            r#"
  <cellStyleXfs count="1">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  </cellStyleXfs>"#,
        );

        xml.push_str(&format!("\n  <cellXfs count=\"{}\">", self.styles.len()));
        for (style, ids) in self.styles.iter().zip(&resolved) {
            xml.push_str("\n    ");
            xml.push_str(&write_xf(style, *ids));
        }
        xml.push_str("\n  </cellXfs>");

        xml.push_str(
            r#"
  <cellStyles count="1">
    <cellStyle name="Normal" xfId="0" builtinId="0"/>
  </cellStyles>
  <dxfs count="0"/>
  <tableStyles count="0" defaultTableStyle="TableStyleMedium9" defaultPivotStyle="PivotStyleLight16"/>
</styleSheet>"#,
        );
        xml
    }
}

fn intern<T: Clone + Eq + std::hash::Hash>(ids: &mut HashMap<T, u32>, items: &mut Vec<T>, item: &T) -> u32 {
    if let Some(&id) = ids.get(item) {
        return id;
    }
    let id = items.len() as u32;
    items.push(item.clone());
    ids.insert(item.clone(), id);
    id
}

fn escape_xml_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn color_attrs(color: &Color) -> String {
    match color {
        Color::Auto => " auto=\"1\"".to_string(),
        Color::Rgb { .. } => format!(" rgb=\"{}\"", color.to_argb_hex()),
        Color::Indexed(i) => format!(" indexed=\"{}\"", i),
    }
}

fn write_color(tag: &str, color: &Color) -> String {
    format!("<{}{}/>", tag, color_attrs(color))
}

fn write_font(font: &FontStyle) -> String {
    let mut s = String::from("<font>");
    if font.bold {
        s.push_str("<b/>");
    }
    if font.italic {
        s.push_str("<i/>");
    }
    if font.strikethrough {
        s.push_str("<strike/>");
    }
    match font.underline {
        Underline::None => {}
        Underline::Single => s.push_str("<u/>"),
        other => s.push_str(&format!("<u val=\"{}\"/>", other.as_str())),
    }
    match font.vertical_align {
        FontVerticalAlign::Baseline => {}
        FontVerticalAlign::Superscript => s.push_str("<vertAlign val=\"superscript\"/>"),
        FontVerticalAlign::Subscript => s.push_str("<vertAlign val=\"subscript\"/>"),
    }
    s.push_str(&format!("<sz val=\"{}\"/>", font.size));
    if !font.color.is_auto() {
        s.push_str(&write_color("color", &font.color));
    }
    s.push_str(&format!("<name val=\"{}\"/>", escape_xml_attr(&font.name)));
    if let Some(charset) = font.charset {
        s.push_str(&format!("<charset val=\"{}\"/>", charset));
    }
    s.push_str("</font>");
    s
}

fn write_fill(fill: &FillStyle) -> String {
    if fill.is_none() {
        return "<fill><patternFill patternType=\"none\"/></fill>".to_string();
    }
    let mut s = format!("<fill><patternFill patternType=\"{}\">", fill.pattern.as_str());
    if !fill.foreground.is_auto() {
        s.push_str(&write_color("fgColor", &fill.foreground));
    }
    if fill.pattern == PatternType::Solid {
        s.push_str("<bgColor indexed=\"64\"/>");
    } else if !fill.background.is_auto() {
        s.push_str(&write_color("bgColor", &fill.background));
    }
    s.push_str("</patternFill></fill>");
    s
}

fn write_border_edge(tag: &str, edge: &BorderEdge) -> String {
    if edge.style == BorderLineStyle::None {
        return format!("<{tag}/>");
    }
    let color = if edge.color.is_auto() {
        String::from("<color indexed=\"64\"/>")
    } else {
        write_color("color", &edge.color)
    };
    format!("<{tag} style=\"{}\">{}</{tag}>", edge.style.as_str(), color)
}

fn write_border(border: &BorderStyle) -> String {
    let mut s = String::from("<border>");
    s.push_str(&write_border_edge("left", &border.left));
    s.push_str(&write_border_edge("right", &border.right));
    s.push_str(&write_border_edge("top", &border.top));
    s.push_str(&write_border_edge("bottom", &border.bottom));
    s.push_str("<diagonal/>");
    s.push_str("</border>");
    s
}

fn write_alignment(al: &Alignment) -> String {
    if al.is_default() {
        return String::new();
    }
    let default = Alignment::default();

    let mut s = String::from("<alignment");
    if al.horizontal != default.horizontal {
        s.push_str(&format!(" horizontal=\"{}\"", al.horizontal.as_str()));
    }
    if al.vertical != default.vertical {
        s.push_str(&format!(" vertical=\"{}\"", al.vertical.as_str()));
    }
    if al.wrap_text {
        s.push_str(" wrapText=\"1\"");
    }
    if al.shrink_to_fit {
        s.push_str(" shrinkToFit=\"1\"");
    }
    if al.indent != 0 {
        s.push_str(&format!(" indent=\"{}\"", al.indent));
    }
    if al.rotation != 0 {
        s.push_str(&format!(" textRotation=\"{}\"", al.rotation));
    }
    s.push_str("/>");
    s
}

fn write_protection(p: &Protection) -> String {
    let default = Protection::default();
    if p == &default {
        return String::new();
    }
    let mut s = String::from("<protection");
    if p.locked != default.locked {
        s.push_str(&format!(" locked=\"{}\"", u8::from(p.locked)));
    }
    if p.hidden != default.hidden {
        s.push_str(&format!(" hidden=\"{}\"", u8::from(p.hidden)));
    }
    s.push_str("/>");
    s
}

fn write_xf(style: &Style, ids: ResolvedXfIds) -> String {
    let mut attrs = String::new();
    if style.quote_prefix {
        attrs.push_str(" quotePrefix=\"1\"");
    }
    if ids.num_fmt_id != 0 {
        attrs.push_str(" applyNumberFormat=\"1\"");
    }
    if style.font != FontStyle::default() {
        attrs.push_str(" applyFont=\"1\"");
    }
    if !style.fill.is_none() {
        attrs.push_str(" applyFill=\"1\"");
    }
    if !style.border.is_empty() {
        attrs.push_str(" applyBorder=\"1\"");
    }
    if !style.alignment.is_default() {
        attrs.push_str(" applyAlignment=\"1\"");
    }
    if style.protection != Protection::default() {
        attrs.push_str(" applyProtection=\"1\"");
    }

    let mut s = format!(
        "<xf numFmtId=\"{}\" fontId=\"{}\" fillId=\"{}\" borderId=\"{}\" xfId=\"0\"{}",
        ids.num_fmt_id, ids.font_id, ids.fill_id, ids.border_id, attrs
    );

    let alignment_xml = write_alignment(&style.alignment);
    let protection_xml = write_protection(&style.protection);
    if alignment_xml.is_empty() && protection_xml.is_empty() {
        s.push_str("/>");
        return s;
    }

    s.push('>');
    s.push_str(&alignment_xml);
    s.push_str(&protection_xml);
    s.push_str("</xf>");
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_sheets_core::style::VerticalAlignment;

    fn styled_workbook(styles: &[Style]) -> Workbook {
        let mut wb = Workbook::new();
        let ws = wb.worksheet_mut(0).unwrap();
        for (i, style) in styles.iter().enumerate() {
            ws.set_cell_value_at(i as u32, 0, "x").unwrap();
            ws.set_cell_style_at(i as u32, 0, style).unwrap();
        }
        wb
    }

    #[test]
    fn test_default_only() {
        let table = XlsxStyleTable::build(&Workbook::new());
        assert_eq!(table.len(), 1);
        let xml = table.to_styles_xml();
        assert!(xml.contains("<fills count=\"2\">"));
        assert!(xml.contains("patternType=\"gray125\""));
        assert!(xml.contains("<cellXfs count=\"1\">"));
        assert!(!xml.contains("<numFmts"));
    }

    #[test]
    fn test_custom_number_formats_start_at_164() {
        let wb = styled_workbook(&[
            Style::new().number_format("yyyy-mm-dd"),
            Style::new().number_format("#,##0.000"),
            Style::new().number_format("0.00"),
        ]);
        let table = XlsxStyleTable::build(&wb);
        assert_eq!(table.len(), 4);

        let xml = table.to_styles_xml();
        assert!(xml.contains("<numFmt numFmtId=\"164\" formatCode=\"yyyy-mm-dd\"/>"));
        assert!(xml.contains("<numFmt numFmtId=\"165\" formatCode=\"#,##0.000\"/>"));
        // "0.00" is built-in id 2
        assert!(xml.contains("<xf numFmtId=\"2\""));
    }

    #[test]
    fn test_fill_border_alignment_protection() {
        let mut style = Style::new().fill_color(Color::rgb(0xFF, 0xCC, 0x00));
        style.alignment.vertical = VerticalAlignment::Center;
        style.border = BorderStyle::all(BorderLineStyle::Thin, Color::BLACK);
        style.protection = Protection::unlocked();
        style.quote_prefix = true;

        let table = XlsxStyleTable::build(&styled_workbook(&[style]));
        let xml = table.to_styles_xml();

        assert!(xml.contains("<fgColor rgb=\"FFFFCC00\"/>"));
        assert!(xml.contains("<left style=\"thin\"><color rgb=\"FF000000\"/></left>"));
        assert!(xml.contains("<alignment vertical=\"center\"/>"));
        assert!(xml.contains("<protection locked=\"0\"/>"));
        assert!(xml.contains("quotePrefix=\"1\""));
        assert!(xml.contains("fillId=\"2\""));
    }

    #[test]
    fn test_xf_ids_are_shared_across_sheets() {
        let mut wb = styled_workbook(&[Style::new().bold(true)]);
        let idx = wb.add_worksheet().unwrap();
        let ws = wb.worksheet_mut(idx).unwrap();
        ws.set_cell_value_at(0, 0, 1.0).unwrap();
        ws.set_cell_style_at(0, 0, &Style::new().bold(true)).unwrap();

        let table = XlsxStyleTable::build(&wb);
        assert_eq!(table.len(), 2);
        assert_eq!(table.xf_id_for(0, 1), 1);
        assert_eq!(table.xf_id_for(1, 1), 1);
        assert_eq!(table.xf_id_for(1, 0), 0);
    }
}
