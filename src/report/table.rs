use ratatui::{
    buffer::{self, Buffer},
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, Table, Widget},
};

use crate::report::format::{fmt_opt2, fmt_pct1, fmt_pct2, fmt_thousands, short_mint, truncate};
use crate::types::ScoredToken;

const HEADERS: [&str; 9] = [
    "#", "Symbol", "Mint", "Score", "Safety", "Spread%", "Impact1k%", "r5m%", "NetBuy5m$",
];
const WIDTHS: [u16; 9] = [3, 10, 9, 6, 6, 7, 9, 7, 12];
const SYMBOL_MAX: usize = 10;

/// Render the ranking table off-screen and return it as plain text lines.
///
/// Drawn into a `Buffer` rather than a live terminal so it also works when
/// stdout is piped.
pub fn render_table(items: &[ScoredToken]) -> Vec<String> {
    let spacing = (WIDTHS.len() as u16).saturating_sub(1);
    let width = WIDTHS.iter().sum::<u16>() + spacing + 2;
    let height = items.len() as u16 + 3;

    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    build_table(items).render(area, &mut buf);

    buf.content()
        .chunks(width as usize)
        .map(line_text)
        .collect()
}

/// Join one buffer row back into text. A wide grapheme occupies several
/// cells; the cells it covers are padding and must not be emitted.
fn line_text(cells: &[buffer::Cell]) -> String {
    let mut out = String::with_capacity(cells.len());
    let mut covered = 0usize;
    for cell in cells {
        if covered > 0 {
            covered -= 1;
            continue;
        }
        let symbol = cell.symbol();
        out.push_str(symbol);
        covered = Span::raw(symbol).width().saturating_sub(1);
    }
    out.trim_end().to_string()
}

fn build_table(items: &[ScoredToken]) -> Table<'static> {
    let header = Row::new(HEADERS.iter().enumerate().map(|(i, h)| {
        let line = if i == 1 || i == 2 {
            Line::from(*h)
        } else {
            Line::from(*h).right_aligned()
        };
        Cell::from(line).style(Style::default().add_modifier(Modifier::BOLD))
    }));

    let rows: Vec<Row> = items
        .iter()
        .enumerate()
        .map(|(i, it)| {
            let r = &it.record;
            Row::new(vec![
                right(format!("{}", i + 1)),
                Cell::from(truncate(it.display_symbol(), SYMBOL_MAX)),
                Cell::from(short_mint(&r.mint)),
                right(fmt_pct1(it.bundle.score)),
                right(fmt_pct1(it.bundle.safety)),
                right(fmt_opt2(r.spread_pct)),
                right(fmt_opt2(r.impact_1k_pct)),
                right(fmt_pct2(r.r_5m)),
                right(fmt_thousands(r.net_buy_usd_5m)),
            ])
        })
        .collect();

    Table::new(rows, WIDTHS.map(Constraint::Length))
        .header(header)
        .block(Block::default().borders(Borders::ALL))
}

fn right(s: String) -> Cell<'static> {
    Cell::from(Line::from(s).right_aligned())
}
