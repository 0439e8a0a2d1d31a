use std::collections::HashMap;

use ratatui::style::Color;

use super::parent::ParentEvent;
use crate::theme::parse_color;

/// Colors handed out to parent events, in order.
pub const PALETTE: [&str; 20] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7",
    "#DDA0DD", "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E9",
    "#F8C471", "#82E0AA", "#F1948A", "#85C1E9", "#D7BDE2",
    "#F9E79F", "#ABEBC6", "#AED6F1", "#FAD7A0", "#E8DAEF",
];

/// Used for sessions whose parent event is not in the assignment.
pub const FALLBACK_COLOR: &str = "#667eea";

/// Parent event id to display color.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorAssignment {
    colors: HashMap<i64, &'static str>,
}

impl ColorAssignment {
    pub fn hex_for(&self, parent_id: Option<i64>) -> &'static str {
        parent_id
            .and_then(|id| self.colors.get(&id).copied())
            .unwrap_or(FALLBACK_COLOR)
    }

    pub fn color_for(&self, parent_id: Option<i64>) -> Color {
        parse_color(self.hex_for(parent_id)).unwrap_or(Color::Blue)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Assigns `PALETTE[i % 20]` to the event at position `i`.
///
/// Keyed by list position: the same events in another order get other colors.
pub fn assign_colors(events: &[ParentEvent]) -> ColorAssignment {
    let colors = events
        .iter()
        .enumerate()
        .map(|(index, event)| (event.id, PALETTE[index % PALETTE.len()]))
        .collect();
    ColorAssignment { colors }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(ids: impl IntoIterator<Item = i64>) -> Vec<ParentEvent> {
        ids.into_iter()
            .map(|id| ParentEvent {
                id,
                name: format!("Evento {id}"),
                description: None,
                location: None,
                starts_on: None,
                ends_on: None,
                period_id: None,
                period_name: None,
                program_id: None,
                program_name: None,
                status: None,
            })
            .collect()
    }

    #[test]
    fn assigns_by_position() {
        let colors = assign_colors(&events([10, 20, 30]));
        assert_eq!(colors.hex_for(Some(10)), PALETTE[0]);
        assert_eq!(colors.hex_for(Some(20)), PALETTE[1]);
        assert_eq!(colors.hex_for(Some(30)), PALETTE[2]);
    }

    #[test]
    fn cycles_after_twenty() {
        let list = events(1..=25);
        let colors = assign_colors(&list);
        assert_eq!(colors.len(), 25);
        assert_eq!(colors.hex_for(Some(21)), colors.hex_for(Some(1)));
        assert_eq!(colors.hex_for(Some(25)), PALETTE[4]);
    }

    #[test]
    fn same_order_same_colors() {
        let list = events([4, 8, 15, 16, 23, 42]);
        assert_eq!(assign_colors(&list), assign_colors(&list));
    }

    #[test]
    fn reordering_changes_colors() {
        let forward = assign_colors(&events([1, 2]));
        let reversed = assign_colors(&events([2, 1]));
        assert_ne!(forward.hex_for(Some(1)), reversed.hex_for(Some(1)));
    }

    #[test]
    fn unknown_parent_gets_fallback() {
        let colors = assign_colors(&events([1]));
        assert_eq!(colors.hex_for(Some(99)), FALLBACK_COLOR);
        assert_eq!(colors.hex_for(None), FALLBACK_COLOR);
        assert_eq!(colors.color_for(None), Color::Rgb(0x66, 0x7e, 0xea));
    }
}
