pub mod attendance;
pub mod dashboard;
pub mod day_view;
pub mod dialog;
pub mod form;
pub mod login;
pub mod members;
pub mod month_view;
pub mod profile;
pub mod status_bar;
pub mod table;

pub use attendance::{CheckInView, TodayView};
pub use dashboard::DashboardView;
pub use day_view::DayView;
pub use form::FormView;
pub use login::LoginView;
pub use members::MembersView;
pub use month_view::MonthView;
pub use profile::ProfileView;
pub use status_bar::StatusBar;
pub use table::RecordTable;

use ratatui::layout::Rect;

/// A `width` x `height` rect centered in `area`, shrunk to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width - w) / 2;
    let y = area.y + (area.height - h) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_fits_inside() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered(area, 20, 4), Rect::new(10, 3, 20, 4));
        assert_eq!(centered(area, 80, 40), area);
    }
}
