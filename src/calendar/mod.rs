pub mod grid;
pub mod palette;
pub mod parent;
pub mod session;

pub use grid::{month_grid, CalendarDay};
pub use palette::{assign_colors, ColorAssignment};
pub use parent::ParentEvent;
pub use session::{Session, SessionStatus};
