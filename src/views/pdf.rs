//! Landscape A4 export of the order history.

use chrono::{DateTime, Utc};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use thiserror::Error;

use crate::models::{OrderResponse, OrdersView};

const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 20.0;
const LINE_HEIGHT: f32 = 6.5;
const BODY_SIZE: f32 = 10.0;
const HEADING_SIZE: f32 = 14.0;
const NAME_MAX_CHARS: usize = 40;

// x offsets from the left margin
const COLUMNS: [(f32, &str); 6] = [
    (0.0, "Date and time"),
    (45.0, "Symbol"),
    (70.0, "Name"),
    (165.0, "Quantity"),
    (190.0, "Price"),
    (220.0, "Trade amount"),
];

#[derive(Debug, Error)]
#[error("pdf generation failed: {0}")]
pub struct PdfError(String);

struct Writer<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl Writer<'_> {
    fn ensure_room(&mut self, lines: f32) {
        if self.y - lines * LINE_HEIGHT >= MARGIN {
            return;
        }
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "orders");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn text(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(MARGIN + x), Mm(self.y), font);
    }

    fn heading(&mut self, text: &str) {
        self.ensure_room(3.0);
        self.text(text, HEADING_SIZE, 0.0, true);
        self.y -= LINE_HEIGHT * 1.5;
    }

    fn row(&mut self, cells: [String; 6], bold: bool) {
        self.ensure_room(1.0);
        for ((x, _), cell) in COLUMNS.iter().zip(cells.iter()) {
            self.text(cell, BODY_SIZE, *x, bold);
        }
        self.y -= LINE_HEIGHT;
    }

    fn table(&mut self, title: &str, orders: &[OrderResponse]) {
        self.heading(title);
        self.row(COLUMNS.map(|(_, label)| label.to_string()), true);

        if orders.is_empty() {
            self.ensure_room(1.0);
            self.text("No orders", BODY_SIZE, 0.0, false);
            self.y -= LINE_HEIGHT;
        }

        for o in orders {
            self.row(
                [
                    o.order_date.format("%Y-%m-%d %H:%M:%S").to_string(),
                    o.stock_symbol.clone(),
                    truncate(&o.stock_name, NAME_MAX_CHARS),
                    o.quantity.to_string(),
                    format!("{:.2}", o.price),
                    format!("{:.2}", o.trade_amount),
                ],
                false,
            );
        }
        self.y -= LINE_HEIGHT;
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

pub fn orders_pdf(view: &OrdersView, generated_at: DateTime<Utc>) -> Result<Vec<u8>, PdfError> {
    let (doc, page, layer) = PdfDocument::new("Orders", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "orders");

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| PdfError(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| PdfError(e.to_string()))?;

    let mut w = Writer {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        regular,
        bold,
        y: PAGE_HEIGHT - MARGIN,
    };

    w.text("Orders", 18.0, 0.0, true);
    w.y -= LINE_HEIGHT;
    w.text(
        &format!("Generated {}", generated_at.format("%Y-%m-%d %H:%M UTC")),
        BODY_SIZE,
        0.0,
        false,
    );
    w.y -= LINE_HEIGHT * 2.0;

    w.table("Buy Orders", &view.buy_orders);
    w.table("Sell Orders", &view.sell_orders);

    drop(w);
    doc.save_to_bytes().map_err(|e| PdfError(e.to_string()))
}
