use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str, TextStr};

/// US letter, in points.
const PAGE_W: f32 = 612.0;
const PAGE_H: f32 = 792.0;

/// First baseline, row step and the lowest baseline before a page break.
const TOP_Y: f32 = 750.0;
const ROW_H: f32 = 20.0;
const BOTTOM_Y: f32 = 50.0;

/// Left edges of the four report columns.
const COLUMNS_X: [f32; 4] = [50.0, 230.0, 380.0, 480.0];
/// Approximate Helvetica glyph width at `FONT_SIZE`, used to clip long cells.
const CHAR_W: f32 = 5.5;

const FONT_SIZE: f32 = 10.0;
const HEADER_FONT_SIZE: f32 = 11.0;

pub struct PdfManager {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    page_refs: Vec<Ref>,
    current_content_id: Option<Ref>,

    next_id: i32,
    font_id: Ref,
    bold_font_id: Ref,
}

impl Default for PdfManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfManager {
    pub fn new() -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);
        let bold_font_id = Ref::new(4);
        let next_id = 5;

        pdf.type1_font(font_id).base_font(Name(b"Helvetica"));
        pdf.type1_font(bold_font_id).base_font(Name(b"Helvetica-Bold"));

        Self {
            pdf,
            catalog_id,
            pages_id,
            page_refs: Vec::new(),
            current_content_id: None,
            next_id,
            font_id,
            bold_font_id,
        }
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    fn new_page(&mut self) -> Content {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();

        self.page_refs.push(page_id);

        let mut page = self.pdf.page(page_id);
        page.parent(self.pages_id)
            .media_box(Rect::new(0.0, 0.0, PAGE_W, PAGE_H))
            .contents(content_id);

        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        fonts.pair(Name(b"F1"), self.font_id);
        fonts.pair(Name(b"F2"), self.bold_font_id);

        self.current_content_id = Some(content_id);

        Content::new()
    }

    fn finalize_page(&mut self, content: Content) {
        if let Some(id) = self.current_content_id.take() {
            self.pdf.stream(id, &content.finish());
        }
    }

    fn build_pages_tree(&mut self) {
        let mut pages = self.pdf.pages(self.pages_id);
        pages.count(self.page_refs.len() as i32);
        pages.kids(self.page_refs.clone());
    }

    fn draw_text(content: &mut Content, font: &[u8], x: f32, y: f32, size: f32, text: &str) {
        let safe = sanitize(text);
        content.begin_text();
        content.set_font(Name(font), size);
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
        content.show(Str(safe.as_bytes()));
        content.end_text();
    }

    fn draw_row(content: &mut Content, font: &[u8], size: f32, y: f32, row: &[String]) {
        for (i, text) in row.iter().enumerate().take(COLUMNS_X.len()) {
            let x = COLUMNS_X[i];
            let right = COLUMNS_X.get(i + 1).copied().unwrap_or(PAGE_W - 30.0);
            let max_chars = ((right - x - 8.0) / CHAR_W).max(4.0) as usize;
            Self::draw_text(content, font, x, y, size, &clip(text, max_chars));
        }
    }

    fn draw_header(content: &mut Content, headers: &[&str], y: f32) {
        let row: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
        Self::draw_row(content, b"F2", HEADER_FONT_SIZE, y, &row);

        content.save_state();
        content.set_stroke_rgb(0.65, 0.65, 0.65);
        content.move_to(COLUMNS_X[0], y - 6.0);
        content.line_to(PAGE_W - 30.0, y - 6.0);
        content.stroke();
        content.restore_state();
    }

    fn draw_page_number(content: &mut Content, page: usize) {
        let pg = format!("Page {page}");
        Self::draw_text(content, b"F1", PAGE_W - 100.0, 25.0, FONT_SIZE, &pg);
    }

    /// Fixed-column report: header at the top of every page, one row per
    /// line, new page once the next baseline would fall below the margin.
    pub fn write_report(&mut self, headers: &[&str], rows: &[Vec<String>]) {
        let mut page_idx = 1;
        let mut content = self.new_page();
        Self::draw_header(&mut content, headers, TOP_Y);
        let mut y = TOP_Y - ROW_H;

        for row in rows {
            if y < BOTTOM_Y {
                Self::draw_page_number(&mut content, page_idx);
                self.finalize_page(content);

                page_idx += 1;
                content = self.new_page();
                Self::draw_header(&mut content, headers, TOP_Y);
                y = TOP_Y - ROW_H;
            }

            Self::draw_row(&mut content, b"F1", FONT_SIZE, y, row);
            y -= ROW_H;
        }

        Self::draw_page_number(&mut content, page_idx);
        self.finalize_page(content);
    }

    pub fn page_count(&self) -> usize {
        self.page_refs.len()
    }

    pub fn finish(mut self, title: &str) -> Vec<u8> {
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        self.build_pages_tree();

        let info_id = self.fresh_ref();
        self.pdf.document_info(info_id).title(TextStr(title));

        self.pdf.finish()
    }
}

/// The standard Type1 fonts only cover Latin-1; keep printable ASCII.
pub(crate) fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { '?' })
        .collect()
}

fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<Vec<String>> {
        (0..n)
            .map(|i| {
                vec![
                    format!("Item {i}"),
                    "Food".into(),
                    "1.00".into(),
                    "2025-10-01".into(),
                ]
            })
            .collect()
    }

    #[test]
    fn rows_flow_onto_new_pages() {
        // 750 → 50 in steps of 20: the header plus 35 rows fit on one page.
        let mut pdf = PdfManager::new();
        pdf.write_report(&["a", "b", "c", "d"], &rows(35));
        assert_eq!(pdf.page_count(), 1);

        let mut pdf = PdfManager::new();
        pdf.write_report(&["a", "b", "c", "d"], &rows(36));
        assert_eq!(pdf.page_count(), 2);
    }

    #[test]
    fn empty_report_has_one_page() {
        let mut pdf = PdfManager::new();
        pdf.write_report(&["a", "b", "c", "d"], &[]);
        assert_eq!(pdf.page_count(), 1);
        let bytes = pdf.finish("Expense Report");
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn non_ascii_is_replaced() {
        assert_eq!(sanitize("Café ₹5"), "Caf? ?5");
        assert_eq!(clip("abcdefghij", 6), "abc...");
        assert_eq!(clip("abc", 6), "abc");
    }
}
