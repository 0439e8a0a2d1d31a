use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::page::BannerKind;
use crate::app::{App, InputMode, Screen};
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    /// User and screen on the left; the banner, or key hints, on the right.
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = theme::current();
        let w = area.width as usize;

        let user = app
            .session
            .as_ref()
            .map(|s| format!(" {} [{}] ", s.username, s.role.wire_name()))
            .unwrap_or_default();
        let left = format!("{user}{} ", app.screen.title());

        let (right, style) = match &app.banner {
            Some(banner) => {
                let style = match banner.kind {
                    BannerKind::Success => theme.success,
                    BannerKind::Error => theme.error,
                };
                (format!(" {} ", banner.text), style)
            }
            None => (hints(app, w).to_string(), theme.status),
        };

        let padding = " ".repeat(w.saturating_sub(left.chars().count() + right.chars().count()));
        let line = Line::from(vec![
            Span::styled(left, theme.status),
            Span::styled(padding, theme.status),
            Span::styled(right, style),
        ]);
        frame.render_widget(Paragraph::new(line).style(theme.status), area);
    }
}

fn hints(app: &App, w: usize) -> &'static str {
    match app.input_mode {
        InputMode::Search => " Enter:Aplicar Esc:Limpiar ",
        InputMode::Form => " Tab:Campo Enter:Guardar Esc:Cancelar ",
        InputMode::Confirm => " s:Eliminar n:Cancelar ",
        InputMode::Members => " Tab:Panel a:Agregar x:Quitar c:Ciclo Esc:Cerrar ",
        InputMode::Normal if w < 50 => " ?:Ayuda q:Salir ",
        InputMode::Normal => match app.screen {
            Screen::Calendar => " hjkl:Día/Semana [/]:Mes t:Hoy r:Recargar ?:Ayuda q:Salir ",
            Screen::Today => " jk:Mover g:Generar QR r:Recargar ?:Ayuda q:Salir ",
            Screen::CheckIn => " jk:Mover Enter:Registrar r:Recargar ?:Ayuda q:Salir ",
            Screen::Profile => " e:Editar r:Recargar ?:Ayuda q:Salir ",
            Screen::Dashboard => " Tab:Menú r:Recargar ?:Ayuda q:Salir ",
            Screen::SmallGroups => " /:Buscar n:Nuevo e:Editar d:Eliminar m:Miembros ?:Ayuda ",
            Screen::Participants => " /:Buscar f:Filtrar F:Faceta r:Recargar ?:Ayuda ",
            _ => " /:Buscar f:Filtrar n:Nuevo e:Editar d:Eliminar ?:Ayuda ",
        },
    }
}
