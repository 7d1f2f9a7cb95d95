use crate::config::{DataSourceMode, HyperparamKey, ModelKind, RunConfig};
use crate::data;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// The simulated run. `Running` carries its own completion deadline, so a
/// reset or quit simply drops it; no detached timer can fire afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Idle,
    Running { until: Instant },
}

/// Sidebar controls in focus order. Which of these exist at any moment
/// depends on the current data-source and model selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    DataSource,
    UploadPath,
    StartDate,
    EndDate,
    Model,
    Hyperparam(HyperparamKey),
    RunButton,
    ResetButton,
}

const SPINNER_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

pub struct App {
    pub should_quit: bool,
    pub sidebar_visible: bool,
    pub focus: Field,
    pub config: RunConfig,
    pub status: RunStatus,
    pub run_delay: Duration,
    /// One-line notice under the footer hints (export results, mostly).
    pub status_msg: Option<String>,
    pub history: Vec<data::Candle>,
    pub export_dir: PathBuf,
}

impl App {
    pub fn new(run_delay: Duration, export_dir: PathBuf) -> Self {
        Self {
            should_quit: false,
            sidebar_visible: true,
            focus: Field::DataSource,
            config: RunConfig::default(),
            status: RunStatus::Idle,
            run_delay,
            status_msg: None,
            history: data::mock_history(252),
            export_dir,
        }
    }

    /// Focusable fields for the current selection state, top to bottom.
    pub fn focus_order(&self) -> Vec<Field> {
        let mut order = vec![Field::DataSource];
        if self.config.shows_upload() {
            order.push(Field::UploadPath);
        }
        if self.config.shows_date_range() {
            order.push(Field::StartDate);
            order.push(Field::EndDate);
        }
        order.push(Field::Model);
        for key in self.config.hyperparam_fields() {
            order.push(Field::Hyperparam(*key));
        }
        order.push(Field::RunButton);
        order.push(Field::ResetButton);
        order
    }

    pub fn focus_next(&mut self) {
        let order = self.focus_order();
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(idx + 1) % order.len()];
    }

    pub fn focus_prev(&mut self) {
        let order = self.focus_order();
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(idx + order.len() - 1) % order.len()];
    }

    pub fn is_running(&self) -> bool {
        matches!(self.status, RunStatus::Running { .. })
    }

    /// The run button is live only with a model chosen and no run in flight.
    pub fn can_run(&self) -> bool {
        self.config.model.is_some() && !self.is_running()
    }

    pub fn start_run(&mut self, now: Instant) {
        if !self.can_run() {
            return;
        }
        let until = now + self.run_delay;
        self.status = RunStatus::Running { until };
        self.status_msg = None;
        info!(
            model = self.config.model.map(|m| m.label()),
            delay_secs = self.run_delay.as_secs_f64(),
            "starting simulated prediction run"
        );
    }

    /// Drives the Running -> Idle transition. Called on every loop tick;
    /// completion is unconditional once the deadline passes.
    pub fn on_tick(&mut self, now: Instant) {
        if let RunStatus::Running { until } = self.status {
            if now >= until {
                self.status = RunStatus::Idle;
                info!("simulated prediction run finished");
            }
        }
    }

    /// Back to factory defaults. Also cancels a pending run, so a stale
    /// completion can never land on the fresh state.
    pub fn reset(&mut self) {
        if self.is_running() {
            info!("reset cancelled an in-flight simulated run");
        }
        self.config = RunConfig::default();
        self.status = RunStatus::Idle;
        self.status_msg = None;
        self.focus = Field::DataSource;
    }

    pub fn spinner_frame(&self, now: Instant) -> &'static str {
        let RunStatus::Running { until } = self.status else {
            return "";
        };
        let remaining = until.saturating_duration_since(now);
        let elapsed = self.run_delay.saturating_sub(remaining);
        let idx = (elapsed.as_millis() / 120) as usize % SPINNER_FRAMES.len();
        SPINNER_FRAMES[idx]
    }

    fn export(&mut self) {
        match crate::export::export_dashboard(&self.config, &self.history, &self.export_dir) {
            Ok(paths) => {
                self.status_msg = Some(format!(
                    "Exported {} and {}",
                    paths.csv.display(),
                    paths.summary.display()
                ));
            }
            Err(e) => {
                warn!("export failed: {}", e);
                self.status_msg = Some(format!("Export failed: {}", e));
            }
        }
    }

    fn focused_text_field(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::StartDate => Some(&mut self.config.start_date),
            Field::EndDate => Some(&mut self.config.end_date),
            Field::UploadPath => {
                Some(self.config.upload_path.get_or_insert_with(String::new))
            }
            Field::Hyperparam(key) => Some(self.config.hyperparam_mut(key)),
            _ => None,
        }
    }

    fn cycle_data_source(&mut self, forward: bool) {
        let all = DataSourceMode::ALL;
        let idx = all
            .iter()
            .position(|m| *m == self.config.data_source)
            .unwrap_or(0);
        let next = if forward {
            all[(idx + 1) % all.len()]
        } else {
            all[(idx + all.len() - 1) % all.len()]
        };
        self.config.set_data_source(next);
    }

    fn cycle_model(&mut self, forward: bool) {
        let all = ModelKind::ALL;
        let next = match self.config.model {
            None => {
                if forward {
                    all[0]
                } else {
                    all[all.len() - 1]
                }
            }
            Some(current) => {
                let idx = all.iter().position(|m| *m == current).unwrap_or(0);
                if forward {
                    all[(idx + 1) % all.len()]
                } else {
                    all[(idx + all.len() - 1) % all.len()]
                }
            }
        };
        self.config.set_model(next);
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Ctrl shortcuts work regardless of what is focused.
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('b') => self.sidebar_visible = !self.sidebar_visible,
                KeyCode::Char('r') => self.reset(),
                KeyCode::Char('c') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                return;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                return;
            }
            _ => {}
        }

        // Text fields swallow printable input before global single-key
        // shortcuts are considered.
        if let Some(buf) = self.focused_text_field() {
            match key.code {
                KeyCode::Char(c) => {
                    buf.push(c);
                    return;
                }
                KeyCode::Backspace => {
                    buf.pop();
                    return;
                }
                _ => {}
            }
        }

        match (self.focus, key.code) {
            (Field::DataSource, KeyCode::Right | KeyCode::Char(' ')) => {
                self.cycle_data_source(true)
            }
            (Field::DataSource, KeyCode::Left) => self.cycle_data_source(false),
            (Field::Model, KeyCode::Right | KeyCode::Char(' ') | KeyCode::Enter) => {
                self.cycle_model(true)
            }
            (Field::Model, KeyCode::Left) => self.cycle_model(false),
            (Field::RunButton, KeyCode::Enter | KeyCode::Char(' ')) => self.start_run(now),
            (Field::ResetButton, KeyCode::Enter | KeyCode::Char(' ')) => self.reset(),
            (_, KeyCode::Char('q')) => self.should_quit = true,
            (_, KeyCode::Char('b')) => self.sidebar_visible = !self.sidebar_visible,
            (_, KeyCode::Char('r')) => self.start_run(now),
            (_, KeyCode::Char('e')) => self.export(),
            _ => {}
        }
    }

    pub async fn run(&mut self, terminal: &mut crate::tui::Tui) -> io::Result<()> {
        while !self.should_quit {
            let now = Instant::now();
            self.on_tick(now);

            terminal.draw(|f| crate::ui::render(f, self, now))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key, Instant::now());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        App::new(Duration::from_secs(3), PathBuf::from("."))
    }

    #[test]
    fn test_run_requires_a_selected_model() {
        let mut app = test_app();
        let now = Instant::now();

        assert!(!app.can_run());
        app.start_run(now);
        assert_eq!(app.status, RunStatus::Idle);

        app.config.set_model(ModelKind::Linear);
        assert!(app.can_run());
        app.start_run(now);
        assert!(app.is_running());
    }

    #[test]
    fn test_run_is_not_reentrant() {
        let mut app = test_app();
        let now = Instant::now();
        app.config.set_model(ModelKind::Forest);

        app.start_run(now);
        let first = app.status;

        // A second request while running must not re-arm the timer.
        app.start_run(now + Duration::from_secs(1));
        assert_eq!(app.status, first);
    }

    #[test]
    fn test_run_completes_unconditionally_after_delay() {
        let mut app = test_app();
        let now = Instant::now();
        app.config.set_model(ModelKind::Tree);
        app.start_run(now);

        app.on_tick(now + Duration::from_secs(2));
        assert!(app.is_running(), "still inside the delay window");

        app.on_tick(now + Duration::from_secs(3));
        assert_eq!(app.status, RunStatus::Idle);
    }

    #[test]
    fn test_reset_cancels_pending_run_and_restores_defaults() {
        let mut app = test_app();
        let now = Instant::now();

        app.config.set_data_source(DataSourceMode::Upload);
        app.config.set_model(ModelKind::Forest);
        app.config.n_estimators = "500".to_string();
        app.start_run(now);
        assert!(app.is_running());

        app.reset();
        assert_eq!(app.status, RunStatus::Idle);
        assert_eq!(app.config, RunConfig::default());
        assert_eq!(app.focus, Field::DataSource);

        // The cancelled deadline must not complete a run later.
        app.on_tick(now + Duration::from_secs(10));
        assert_eq!(app.status, RunStatus::Idle);
    }

    #[test]
    fn test_focus_order_follows_visible_fields() {
        let mut app = test_app();

        // Defaults: fetch mode, no model.
        assert_eq!(
            app.focus_order(),
            vec![
                Field::DataSource,
                Field::StartDate,
                Field::EndDate,
                Field::Model,
                Field::RunButton,
                Field::ResetButton,
            ]
        );

        app.config.set_data_source(DataSourceMode::Upload);
        app.config.set_model(ModelKind::Forest);
        assert_eq!(
            app.focus_order(),
            vec![
                Field::DataSource,
                Field::UploadPath,
                Field::Model,
                Field::Hyperparam(HyperparamKey::NEstimators),
                Field::Hyperparam(HyperparamKey::MaxDepth),
                Field::RunButton,
                Field::ResetButton,
            ]
        );

        app.config.set_data_source(DataSourceMode::Local);
        app.config.set_model(ModelKind::Tree);
        assert_eq!(
            app.focus_order(),
            vec![
                Field::DataSource,
                Field::Model,
                Field::Hyperparam(HyperparamKey::MaxDepth),
                Field::RunButton,
                Field::ResetButton,
            ]
        );
    }

    #[test]
    fn test_focus_wraps_in_both_directions() {
        let mut app = test_app();
        let order = app.focus_order();

        for expected in order.iter().skip(1) {
            app.focus_next();
            assert_eq!(app.focus, *expected);
        }
        app.focus_next();
        assert_eq!(app.focus, Field::DataSource);

        app.focus_prev();
        assert_eq!(app.focus, Field::ResetButton);
    }

    #[test]
    fn test_spinner_is_empty_when_idle() {
        let app = test_app();
        assert_eq!(app.spinner_frame(Instant::now()), "");
    }
}
