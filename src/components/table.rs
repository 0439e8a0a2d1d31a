use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::page::CrudPage;
use crate::app::record::Record;
use crate::theme;

pub struct RecordTable;

impl RecordTable {
    /// Search line, facet line and the filtered rows of one management page.
    pub fn render<R: Record>(frame: &mut Frame, area: Rect, page: &CrudPage<R>, searching: bool) {
        let theme = theme::current();
        let visible = page.visible();

        let count = if page.loading {
            " Cargando... ".to_string()
        } else {
            format!(" {} de {} ", visible.len(), page.items.len())
        };
        let block = Block::default()
            .title(format!(" {} ", R::TITLE))
            .title_style(theme.header)
            .title_bottom(Line::from(Span::styled(count, theme.dim)))
            .borders(Borders::ALL)
            .border_style(theme.border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let parts = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

        frame.render_widget(Paragraph::new(search_line(&page.search, searching)), parts[0]);
        frame.render_widget(Paragraph::new(facet_line(page)), parts[1]);

        if visible.is_empty() {
            let message = if page.loading {
                "Cargando..."
            } else if page.items.is_empty() {
                "No hay registros"
            } else {
                "Ningún registro coincide con la búsqueda"
            };
            frame.render_widget(Paragraph::new(message).style(theme.dim), parts[2]);
            return;
        }

        let header = Row::new(
            R::COLUMNS
                .iter()
                .map(|(name, _)| Cell::from(*name).style(theme.header)),
        );
        let widths: Vec<Constraint> = R::COLUMNS
            .iter()
            .map(|(_, width)| Constraint::Min(*width))
            .collect();
        let rows = visible.iter().map(|item| Row::new(item.row()));

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme.highlight)
            .highlight_symbol("▶ ");
        let mut state = TableState::default().with_selected(Some(page.selected));
        frame.render_stateful_widget(table, parts[2], &mut state);
    }
}

fn search_line(search: &str, searching: bool) -> Line<'static> {
    let theme = theme::current();
    let cursor = if searching { "_" } else { "" };
    let style = if searching {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled("Buscar: ", theme.dim),
        Span::styled(format!("{search}{cursor}"), style),
    ])
}

fn facet_line<R: Record>(page: &CrudPage<R>) -> Line<'static> {
    let theme = theme::current();
    if R::FACETS.is_empty() {
        return Line::default();
    }
    let mut spans = vec![Span::styled("Filtros: ", theme.dim)];
    for (index, name) in R::FACETS.iter().enumerate() {
        let value = page
            .filters
            .get(index)
            .cloned()
            .flatten()
            .unwrap_or_else(|| "Todos".to_string());
        let style = if index == page.active_facet {
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!("{name}: {value}"), style));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}
