use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{PendingDelete, Screen};
use crate::theme;

use super::centered;

pub fn render_confirm(frame: &mut Frame, area: Rect, pending: &PendingDelete) {
    let popup = centered(area, 50, 7);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Confirmar eliminación ")
        .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(format!("¿Eliminar \"{}\"?", pending.label)),
        Line::from(Span::styled("Esta acción no se puede deshacer.", theme::current().dim)),
        Line::from(""),
        Line::from(vec![
            Span::styled("s", bold),
            Span::raw(":Eliminar  "),
            Span::styled("n", bold),
            Span::raw("/"),
            Span::styled("Esc", bold),
            Span::raw(":Cancelar"),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

pub fn render_help(frame: &mut Frame, area: Rect, menu: &[Screen]) {
    let popup_w = area.width.clamp(30, 60);
    let popup_h = area.height.clamp(12, 30);
    let popup = centered(area, popup_w, popup_h);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Atajos de teclado ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let entry = |key: &str, desc: &str| {
        Line::from(vec![
            Span::styled(format!("  {key:<10}"), key_style),
            Span::raw(desc.to_string()),
        ])
    };

    let mut lines = vec![Line::from(Span::styled("Pantallas", section_style))];
    for (index, screen) in menu.iter().enumerate() {
        lines.push(entry(&((index + 1) % 10).to_string(), screen.title()));
    }
    lines.push(entry("Tab", "Pantalla siguiente / anterior"));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("Listados", section_style)));
    lines.push(entry("j/k", "Mover selección"));
    lines.push(entry("/", "Buscar"));
    lines.push(entry("f / F", "Cambiar filtro / faceta"));
    lines.push(entry("n e d", "Nuevo / Editar / Eliminar"));
    lines.push(entry("m", "Miembros del grupo pequeño"));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("Calendario", section_style)));
    lines.push(entry("h/l", "Día anterior / siguiente"));
    lines.push(entry("j/k", "Semana siguiente / anterior"));
    lines.push(entry("[ ]", "Mes anterior / siguiente"));
    lines.push(entry("J/K", "Recorrer sesiones del día"));
    lines.push(entry("t", "Ir a hoy"));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("Asistencia", section_style)));
    lines.push(entry("g", "Generar QR de la sesión"));
    lines.push(entry("Enter", "Registrar asistencia"));
    lines.push(Line::from(""));

    lines.push(entry("r", "Recargar"));
    lines.push(entry("L", "Cerrar sesión"));
    lines.push(entry("q / Esc", "Salir / cerrar ventana"));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
