//! Application core — event loop and key dispatch.
//!
//! Writes are spawned onto the runtime so a slow backend never blocks the
//! UI; their outcomes come back over an unbounded channel and surface as
//! status-bar flashes. A successful write also refreshes the affected
//! event log, which is where the new entry actually appears.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use nestling_api::{DiaperKind, FeedingKind};
use nestling_core::Dashboard;

use crate::event::{Event, EventReader};
use crate::screens::dashboard::DashboardScreen;
use crate::tui::Tui;

/// Outcome of a background write, reported back to the status bar.
#[derive(Debug)]
enum Feedback {
    Logged(String),
    Failed(String),
}

/// Top-level application state and event loop.
pub struct App {
    dashboard: Arc<Dashboard>,
    screen: DashboardScreen,
    feedback_tx: mpsc::UnboundedSender<Feedback>,
    feedback_rx: mpsc::UnboundedReceiver<Feedback>,
    today: NaiveDate,
    running: bool,
}

impl App {
    pub fn new(dashboard: Dashboard, baby_age_months: Option<u32>) -> Self {
        let dashboard = Arc::new(dashboard);
        let screen = DashboardScreen::new(&dashboard, baby_age_months);
        let (feedback_tx, feedback_rx) = mpsc::unbounded_channel();
        Self {
            dashboard,
            screen,
            feedback_tx,
            feedback_rx,
            today: Local::now().date_naive(),
            running: true,
        }
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let mut events = EventReader::new(
            Duration::from_millis(250),
            Duration::from_millis(50),
        );

        info!("event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => self.handle_key(key),
                Event::Tick => self.on_tick(),
                Event::Render => tui.draw(|frame| self.screen.render(frame))?,
                Event::Resize(..) => {}
            }
        }

        events.stop();
        self.dashboard.shutdown();
        info!("event loop ended");
        Ok(())
    }

    fn on_tick(&mut self) {
        // Day rollover re-keys the weekly trend.
        let today = Local::now().date_naive();
        if today != self.today {
            info!(%today, "date rolled over");
            self.today = today;
            self.dashboard.observe_date(today);
        }

        while let Ok(feedback) = self.feedback_rx.try_recv() {
            match feedback {
                Feedback::Logged(msg) => self.screen.set_flash(msg, true),
                Feedback::Failed(msg) => {
                    warn!(%msg, "write failed");
                    self.screen.set_flash(msg, false);
                }
            }
        }

        self.screen.tick();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }

            KeyCode::Char('w') => self.log_diaper(DiaperKind::Wet),
            KeyCode::Char('d') => self.log_diaper(DiaperKind::Dirty),
            KeyCode::Char('b') => self.log_diaper(DiaperKind::Both),

            KeyCode::Char('f') => self.log_feeding(FeedingKind::Bottle),
            KeyCode::Char('n') => self.log_feeding(FeedingKind::Nursing),

            KeyCode::Char('t') => self.toggle_alerts(),
            KeyCode::Char('r') => self.refresh_all(),

            _ => debug!(?key, "unhandled key"),
        }
    }

    fn refresh_all(&mut self) {
        self.dashboard.refresh_weekly();
        self.dashboard.refresh_diaper_log();
        self.dashboard.refresh_feeding_log();
        self.screen.set_flash("refreshing…".to_owned(), true);
    }

    fn log_diaper(&self, kind: DiaperKind) {
        let dash = Arc::clone(&self.dashboard);
        let tx = self.feedback_tx.clone();
        tokio::spawn(async move {
            let feedback = match dash.log_diaper(kind).await {
                Ok(()) => {
                    dash.refresh_diaper_log();
                    Feedback::Logged(format!("diaper logged ({kind})"))
                }
                Err(e) => Feedback::Failed(format!("diaper not logged: {e}")),
            };
            let _ = tx.send(feedback);
        });
    }

    // TODO: amount entry for bottle feeds; for now the amount is omitted
    // and the backend records the feeding without one.
    fn log_feeding(&self, kind: FeedingKind) {
        let dash = Arc::clone(&self.dashboard);
        let tx = self.feedback_tx.clone();
        tokio::spawn(async move {
            let feedback = match dash.log_feeding(kind, None).await {
                Ok(()) => {
                    dash.refresh_feeding_log();
                    Feedback::Logged(format!("feeding logged ({kind})"))
                }
                Err(e) => Feedback::Failed(format!("feeding not logged: {e}")),
            };
            let _ = tx.send(feedback);
        });
    }

    /// Flip the backend's sleep-notification toggle (read, then invert).
    fn toggle_alerts(&self) {
        let dash = Arc::clone(&self.dashboard);
        let tx = self.feedback_tx.clone();
        tokio::spawn(async move {
            let feedback = match dash.notifications_enabled().await {
                Ok(current) => match dash.set_notifications_enabled(!current).await {
                    Ok(()) => Feedback::Logged(format!(
                        "sleep alerts {}",
                        if current { "off" } else { "on" }
                    )),
                    Err(e) => Feedback::Failed(format!("alerts unchanged: {e}")),
                },
                Err(e) => Feedback::Failed(format!("alerts unavailable: {e}")),
            };
            let _ = tx.send(feedback);
        });
    }
}
