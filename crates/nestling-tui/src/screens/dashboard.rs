//! Dashboard screen — the single screen of the app.
//!
//! Layout:
//! ┌─ header: title · age · wake-window summary ──────────────────────┐
//! │ ┌─ Sleep ───────────────────────┐ ┌─ Diapers ──────────────────┐ │
//! │ │ naps / wake window / night    │ │ today / 7-day / last / log │ │
//! │ └───────────────────────────────┘ └────────────────────────────┘ │
//! │ ┌─ Nap Trend (7d bar chart) ────┐ ┌─ Feedings ─────────────────┐ │
//! │ └───────────────────────────────┘ └────────────────────────────┘ │
//! └─ status bar: monitor state · flash message · key hints ──────────┘
//!
//! Every panel reads a `SyncState` snapshot: stale values stay on screen
//! next to an error badge, and a panel that has never loaded says so
//! instead of rendering zeros.

use std::time::{Duration, Instant};

use chrono::Utc;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Paragraph};
use tokio::sync::watch;

use nestling_api::{
    AwakeStatus, DiaperEvent, DiaperStats, FeedingEvent, Health, SleepDay, SleepStats,
};
use nestling_core::format::{fmt_amount_ml, fmt_clock, fmt_minutes, relative_time};
use nestling_core::{Dashboard, SyncState};

use crate::theme;
use crate::widgets::{status_badge, urgency};

const FLASH_TTL: Duration = Duration::from_secs(4);

struct Flash {
    text: String,
    ok: bool,
    at: Instant,
}

/// Dashboard screen state: one watch receiver per subscription, plus a
/// transient status-bar flash for write feedback.
pub struct DashboardScreen {
    sleep: watch::Receiver<SyncState<SleepStats>>,
    weekly: watch::Receiver<SyncState<Vec<SleepDay>>>,
    diaper: watch::Receiver<SyncState<DiaperStats>>,
    diaper_log: watch::Receiver<SyncState<Vec<DiaperEvent>>>,
    feeding_log: watch::Receiver<SyncState<Vec<FeedingEvent>>>,
    health: watch::Receiver<SyncState<Health>>,
    awake: watch::Receiver<SyncState<AwakeStatus>>,
    baby_age_months: Option<u32>,
    flash: Option<Flash>,
}

impl DashboardScreen {
    pub fn new(dashboard: &Dashboard, baby_age_months: Option<u32>) -> Self {
        Self {
            sleep: dashboard.sleep_stats(),
            weekly: dashboard.weekly(),
            diaper: dashboard.diaper_stats(),
            diaper_log: dashboard.diaper_log(),
            feeding_log: dashboard.feeding_log(),
            health: dashboard.health(),
            awake: dashboard.awake_status(),
            baby_age_months,
            flash: None,
        }
    }

    /// Show a transient message in the status bar.
    pub fn set_flash(&mut self, text: String, ok: bool) {
        self.flash = Some(Flash {
            text,
            ok,
            at: Instant::now(),
        });
    }

    /// Expire the flash message.
    pub fn tick(&mut self) {
        if self
            .flash
            .as_ref()
            .is_some_and(|f| f.at.elapsed() > FLASH_TTL)
        {
            self.flash = None;
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(9),
            Constraint::Length(10),
            Constraint::Length(1),
        ])
        .split(frame.area());

        self.render_header(frame, rows[0]);

        let mid =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(rows[1]);
        self.render_sleep(frame, mid[0]);
        self.render_diaper(frame, mid[1]);

        let bottom =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(rows[2]);
        self.render_weekly(frame, bottom[0]);
        self.render_feeding(frame, bottom[1]);

        self.render_status_bar(frame, rows[3]);
    }

    // ── Panels ───────────────────────────────────────────────────────

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(" nestling ", theme::title_style())];
        if let Some(age) = self.baby_age_months {
            spans.push(Span::styled(format!("· {age} mo "), theme::label()));
        }

        let sleep = self.sleep.borrow();
        if let Some(stats) = &sleep.value {
            let ww = &stats.wake_window;
            spans.push(Span::styled("── ", theme::muted()));
            spans.push(Span::styled(
                "● ",
                Style::default().fg(urgency::color(ww.urgency)),
            ));
            spans.push(Span::styled(
                format!("awake {}", fmt_minutes(ww.awake_minutes)),
                theme::value(),
            ));
            let timing = if ww.remaining_minutes >= 0.0 {
                format!(" · nap in {}", fmt_minutes(ww.remaining_minutes))
            } else {
                format!(" · {} past window", fmt_minutes(-ww.remaining_minutes))
            };
            spans.push(Span::styled(timing, theme::label()));
            spans.push(Span::styled(
                format!(" ({})", urgency::advice(ww.urgency)),
                Style::default().fg(urgency::color(ww.urgency)),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_sleep(&self, frame: &mut Frame, area: Rect) {
        let state = self.sleep.borrow();
        let block = panel_block(" Sleep ", &state);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(stats) = &state.value else {
            frame.render_widget(placeholder(&state), inner);
            return;
        };

        let ww = &stats.wake_window;
        let window = format!(
            "{} – {}",
            fmt_minutes(ww.window_min_minutes),
            fmt_minutes(ww.window_max_minutes)
        );
        let night = &stats.night_sleep;

        let lines = vec![
            kv_line(
                "Naps",
                &format!(
                    "{} today · {} total · longest {}",
                    stats.nap_count,
                    fmt_minutes(stats.total_nap_minutes),
                    fmt_minutes(stats.longest_nap_minutes)
                ),
            ),
            Line::from(vec![
                Span::styled(" Awake   ", theme::label()),
                Span::styled(fmt_minutes(ww.awake_minutes), theme::value_strong()),
                Span::styled(format!("  window {window}  "), theme::label()),
                Span::styled("● ", Style::default().fg(urgency::color(ww.urgency))),
                Span::styled(
                    urgency::advice(ww.urgency),
                    Style::default().fg(urgency::color(ww.urgency)),
                ),
            ]),
            Line::from(""),
            kv_line(
                "Night",
                &format!(
                    "{} · {} wakes · longest stretch {}",
                    fmt_minutes(night.total_minutes),
                    night.wake_count,
                    fmt_minutes(night.longest_stretch_minutes)
                ),
            ),
        ];

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_diaper(&self, frame: &mut Frame, area: Rect) {
        let state = self.diaper.borrow();
        let block = panel_block(" Diapers ", &state);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(stats) = &state.value else {
            frame.render_widget(placeholder(&state), inner);
            return;
        };

        let mut lines = vec![
            kv_line(
                "Today",
                &format!(
                    "{} changes · {} wet · {} dirty",
                    stats.total, stats.wet, stats.dirty
                ),
            ),
            kv_line("7-day", &format!("{:.1} / day", stats.daily_average_7d)),
        ];

        match &stats.last_change {
            Some(last) => lines.push(Line::from(vec![
                Span::styled(" Last    ", theme::label()),
                Span::styled(last.kind.to_string(), theme::value_strong()),
                Span::styled(
                    format!(" · {}", relative_time(last.timestamp, Utc::now())),
                    theme::value(),
                ),
            ])),
            None => lines.push(kv_muted("Last", "none logged yet")),
        }
        lines.push(Line::from(""));

        // Recent changes from the event log, newest first.
        let log = self.diaper_log.borrow();
        if let Some(events) = &log.value {
            let visible = usize::from(inner.height).saturating_sub(lines.len());
            for event in events.iter().take(visible) {
                let mut spans = vec![
                    Span::styled(format!(" {}  ", fmt_clock(event.timestamp)), theme::muted()),
                    Span::styled(event.kind.to_string(), theme::value()),
                ];
                if let Some(notes) = &event.notes {
                    spans.push(Span::styled(format!("  {notes}"), theme::muted()));
                }
                lines.push(Line::from(spans));
            }
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn render_weekly(&self, frame: &mut Frame, area: Rect) {
        let state = self.weekly.borrow();
        let block = panel_block(" Nap Trend ", &state);

        let Some(days) = &state.value else {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(placeholder(&state), inner);
            return;
        };

        let bars: Vec<Bar> = days
            .iter()
            .map(|day: &SleepDay| {
                Bar::default()
                    .value(day.total_nap_minutes.max(0.0).round() as u64)
                    .label(Line::from(day.day_label.clone()))
                    .text_value(fmt_minutes(day.total_nap_minutes))
            })
            .collect();

        let bar_width = (area.width.saturating_sub(2) / 7).clamp(3, 9).saturating_sub(1);
        let chart = BarChart::default()
            .block(block)
            .bar_width(bar_width)
            .bar_gap(1)
            .bar_style(Style::default().fg(theme::LAVENDER))
            .value_style(
                Style::default()
                    .fg(theme::BG_HIGHLIGHT)
                    .bg(theme::LAVENDER)
                    .add_modifier(Modifier::BOLD),
            )
            .label_style(theme::label())
            .data(BarGroup::default().bars(&bars));

        frame.render_widget(chart, area);
    }

    fn render_feeding(&self, frame: &mut Frame, area: Rect) {
        let state = self.feeding_log.borrow();
        let block = panel_block(" Feedings ", &state);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(events) = &state.value else {
            frame.render_widget(placeholder(&state), inner);
            return;
        };

        if events.is_empty() {
            frame.render_widget(
                Paragraph::new(" none logged yet").style(theme::muted()),
                inner,
            );
            return;
        }

        let lines: Vec<Line> = events
            .iter()
            .take(usize::from(inner.height))
            .map(|event: &FeedingEvent| {
                Line::from(vec![
                    Span::styled(format!(" {}  ", fmt_clock(event.timestamp)), theme::muted()),
                    Span::styled(format!("{:<8}", event.kind.to_string()), theme::value()),
                    Span::styled(fmt_amount_ml(event.amount_ml), theme::label()),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();

        // Monitor state, from the health subscription.
        let health = self.health.borrow();
        if let Some(h) = &health.value {
            let (text, color) = if h.is_awake {
                ("awake", theme::BUTTER)
            } else {
                ("asleep", theme::MINT)
            };
            spans.push(Span::styled(" ● ", Style::default().fg(color)));
            spans.push(Span::styled(text, Style::default().fg(color)));
            if !h.model_sees_baby {
                spans.push(Span::styled("  (baby not in view)", theme::muted()));
            }
            // Classifier detail: rolling wake score plus its top reason.
            if let Some(status) = &self.awake.borrow().value {
                spans.push(Span::styled(
                    format!("  wake {:.2}", status.average_awake),
                    theme::muted(),
                ));
                if let Some(reason) = status.reasons.first() {
                    spans.push(Span::styled(format!(" ({reason})"), theme::muted()));
                }
            }
        } else if health.error.is_some() {
            spans.push(Span::styled(" ● monitor unreachable", theme::error()));
        } else {
            spans.push(Span::styled(" ● connecting…", theme::muted()));
        }

        // Flash message or the most pressing subscription error.
        if let Some(flash) = &self.flash {
            let style = if flash.ok { theme::success() } else { theme::error() };
            spans.push(Span::styled(format!("   {}", flash.text), style));
        } else if let Some(err) = self.first_error() {
            spans.push(Span::styled(format!("   {err}"), theme::error()));
        }

        let left = Line::from(spans);

        let hints = Line::from(vec![
            Span::styled("w/d/b", theme::key_hint_key()),
            Span::styled(" diaper  ", theme::key_hint()),
            Span::styled("f/n", theme::key_hint_key()),
            Span::styled(" feed  ", theme::key_hint()),
            Span::styled("t", theme::key_hint_key()),
            Span::styled(" alerts  ", theme::key_hint()),
            Span::styled("r", theme::key_hint_key()),
            Span::styled(" refresh  ", theme::key_hint()),
            Span::styled("q", theme::key_hint_key()),
            Span::styled(" quit ", theme::key_hint()),
        ]);

        let cols = Layout::horizontal([Constraint::Min(10), Constraint::Length(48)]).split(area);
        frame.render_widget(Paragraph::new(left), cols[0]);
        frame.render_widget(
            Paragraph::new(hints).alignment(ratatui::layout::Alignment::Right),
            cols[1],
        );
    }

    /// First subscription error worth surfacing in the status bar.
    fn first_error(&self) -> Option<String> {
        let from = |label: &str, msg: String| format!("{label}: {msg}");
        if let Some(e) = &self.sleep.borrow().error {
            return Some(from("sleep", e.to_string()));
        }
        if let Some(e) = &self.diaper.borrow().error {
            return Some(from("diapers", e.to_string()));
        }
        if let Some(e) = &self.diaper_log.borrow().error {
            return Some(from("diaper log", e.to_string()));
        }
        if let Some(e) = &self.weekly.borrow().error {
            return Some(from("trend", e.to_string()));
        }
        if let Some(e) = &self.feeding_log.borrow().error {
            return Some(from("feedings", e.to_string()));
        }
        None
    }
}

// ── Shared panel helpers ────────────────────────────────────────────

fn panel_block<'a, T>(title: &'a str, state: &SyncState<T>) -> Block<'a> {
    let title = Line::from(vec![
        Span::styled(title, theme::title_style()),
        status_badge::badge(state),
    ]);
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default())
}

/// Body for a panel whose subscription has never produced a value.
fn placeholder<T>(state: &SyncState<T>) -> Paragraph<'static> {
    let text = if state.loading {
        " loading…"
    } else {
        " no data — monitor unreachable"
    };
    Paragraph::new(text).style(theme::muted())
}

fn kv_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {label:<7} "), theme::label()),
        Span::styled(value.to_owned(), theme::value()),
    ])
}

fn kv_muted(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {label:<7} "), theme::label()),
        Span::styled(value.to_owned(), theme::muted()),
    ])
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn rx<T>(state: SyncState<T>) -> watch::Receiver<SyncState<T>> {
        watch::channel(state).1
    }

    fn settled<T>() -> SyncState<T> {
        SyncState {
            value: None,
            loading: false,
            error: None,
        }
    }

    fn failed<T>() -> SyncState<T> {
        SyncState {
            value: None,
            loading: false,
            error: Some(Arc::new(nestling_api::Error::Api {
                status: 500,
                status_text: "Internal Server Error".to_owned(),
            })),
        }
    }

    fn screen_with_diaper_log(diaper_log: SyncState<Vec<DiaperEvent>>) -> DashboardScreen {
        DashboardScreen {
            sleep: rx(settled()),
            weekly: rx(settled()),
            diaper: rx(settled()),
            diaper_log: rx(diaper_log),
            feeding_log: rx(settled()),
            health: rx(settled()),
            awake: rx(settled()),
            baby_age_months: None,
            flash: None,
        }
    }

    #[test]
    fn status_bar_error_sweep_covers_the_diaper_log() {
        let screen = screen_with_diaper_log(failed());
        let msg = screen.first_error().expect("error surfaced");
        assert!(msg.starts_with("diaper log:"), "{msg}");
    }

    #[test]
    fn no_errors_means_no_status_bar_message() {
        let screen = screen_with_diaper_log(settled());
        assert!(screen.first_error().is_none());
    }
}
