//! Wake-window urgency indicator — color and advice text per level.

use ratatui::style::Color;

use nestling_api::Urgency;

use crate::theme;

pub fn color(urgency: Urgency) -> Color {
    match urgency {
        Urgency::Green => theme::MINT,
        Urgency::Yellow => theme::BUTTER,
        Urgency::Red => theme::ROSE,
    }
}

pub fn advice(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Green => "in window",
        Urgency::Yellow => "nap soon",
        Urgency::Red => "overdue",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn advice_covers_all_levels() {
        assert_eq!(advice(Urgency::Green), "in window");
        assert_eq!(advice(Urgency::Yellow), "nap soon");
        assert_eq!(advice(Urgency::Red), "overdue");
    }
}
