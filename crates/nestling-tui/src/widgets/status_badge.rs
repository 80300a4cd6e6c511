//! Loading / error badge appended to panel titles.

use ratatui::text::Span;

use nestling_core::SyncState;

use crate::theme;

/// Badge reflecting a subscription's condition: an error mark while the
/// latest cycle failed, dots while a load is pending, nothing otherwise.
pub fn badge<T>(state: &SyncState<T>) -> Span<'static> {
    if state.error.is_some() {
        Span::styled("✗ ", theme::error())
    } else if state.loading {
        Span::styled("… ", theme::muted())
    } else {
        Span::raw("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(loading: bool, failed: bool) -> SyncState<u32> {
        SyncState {
            value: None,
            loading,
            error: failed.then(|| {
                std::sync::Arc::new(nestling_api::Error::Decode {
                    message: "bad payload".into(),
                    body: String::new(),
                })
            }),
        }
    }

    #[test]
    fn error_outranks_loading() {
        assert_eq!(badge(&state(true, true)).content, "✗ ");
        assert_eq!(badge(&state(true, false)).content, "… ");
        assert_eq!(badge(&state(false, false)).content, "");
    }
}
