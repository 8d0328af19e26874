use std::time::Duration;

use chrono::{DateTime, Local};
use eframe::egui;
use eframe::egui::text::LayoutJob;
use eframe::egui::{Color32, FontId, TextFormat, ViewportCommand, Visuals};
use log::{debug, info};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::{task, time};

use crate::config::{self, SearchPaths};
use crate::countdown::{DaysText, UNIT_SUFFIX};
use crate::fonts;
use crate::layout::{self, Geometry, TickCounter};

pub const TICK_PERIOD: Duration = Duration::from_millis(100);
pub const LABEL_COLOR: Color32 = Color32::RED;
pub const INTEGER_FONT_SIZE: f32 = 35.0;
/// Size of the decimal part and unit suffix, and of the label's base font.
pub const LABEL_FONT_SIZE: f32 = 20.0;

/// Display state of the overlay, advanced once per timer tick.
#[derive(Debug)]
pub struct Countdown {
    target: DateTime<Local>,
    text: DaysText,
    ticks: TickCounter,
    layout_pending: bool,
}

impl Countdown {
    pub fn new(target: DateTime<Local>) -> Self {
        Self {
            target,
            text: DaysText::new(0.0),
            ticks: TickCounter::default(),
            layout_pending: false,
        }
    }

    pub fn tick(&mut self, now: DateTime<Local>) {
        self.text = DaysText::between(&now, &self.target);
        if self.ticks.advance() {
            self.layout_pending = true;
        }
    }

    pub fn target(&self) -> DateTime<Local> {
        self.target
    }

    pub fn text(&self) -> &DaysText {
        &self.text
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.count()
    }

    pub fn layout_pending(&self) -> bool {
        self.layout_pending
    }

    /// Geometry for the most recent layout tick, if one is still unapplied.
    pub fn take_layout(&mut self, screen_width: f32, text_width: f32) -> Option<Geometry> {
        if !std::mem::take(&mut self.layout_pending) {
            return None;
        }
        Some(layout::pinned_geometry(screen_width, text_width))
    }

    pub fn label_job(&self) -> LayoutJob {
        let mut job = LayoutJob::default();
        job.append(
            &self.text.integer,
            0.0,
            TextFormat {
                font_id: FontId::proportional(INTEGER_FONT_SIZE),
                color: LABEL_COLOR,
                ..Default::default()
            },
        );
        job.append(
            &format!("{}{UNIT_SUFFIX}", self.text.decimal),
            0.0,
            TextFormat {
                font_id: FontId::proportional(LABEL_FONT_SIZE),
                color: LABEL_COLOR,
                ..Default::default()
            },
        );
        job
    }
}

pub struct CountdownApp {
    countdown: Countdown,
    tick_rx: Receiver<()>,
}

impl CountdownApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        fonts::install_label_font(&cc.egui_ctx);

        let mut style = (*cc.egui_ctx.style()).clone();
        style.wrap = Some(false);
        cc.egui_ctx.set_style(style);

        let target = config::resolve_target(&SearchPaths::from_env(), Local::now());
        info!("Counting down to {}", target.format(config::TARGET_FORMAT));

        let (tick_tx, tick_rx) = mpsc::channel(1);
        spawn_ticker(cc.egui_ctx.clone(), tick_tx);

        let mut countdown = Countdown::new(target);
        countdown.tick(Local::now());
        Self { countdown, tick_rx }
    }

    fn apply_layout(&mut self, ctx: &egui::Context) {
        if !self.countdown.layout_pending() {
            return;
        }
        // The monitor size arrives with the first window event; keep the layout
        // pending until then.
        let Some(screen) = ctx.input(|i| i.viewport().monitor_size) else {
            debug!("Monitor size not reported yet, deferring layout");
            return;
        };

        let plain = self.countdown.text().plain();
        let text_width = ctx.fonts(|fonts| {
            fonts
                .layout_no_wrap(plain, FontId::proportional(LABEL_FONT_SIZE), LABEL_COLOR)
                .size()
                .x
        });
        if let Some(geometry) = self.countdown.take_layout(screen.x, text_width) {
            ctx.send_viewport_cmd(ViewportCommand::InnerSize(geometry.size));
            ctx.send_viewport_cmd(ViewportCommand::OuterPosition(geometry.position));
        }
    }
}

/// Sends one message per tick period for as long as the app holds the receiver.
/// Ticks that arrive while the previous one is still unconsumed are dropped.
fn spawn_ticker(ctx: egui::Context, tick_tx: Sender<()>) -> task::JoinHandle<()> {
    task::spawn(async move {
        let mut interval = time::interval_at(time::Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            match tick_tx.try_send(()) {
                Ok(()) | Err(TrySendError::Full(())) => ctx.request_repaint(),
                Err(TrySendError::Closed(())) => break,
            }
        }
    })
}

impl eframe::App for CountdownApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while self.tick_rx.try_recv().is_ok() {
            self.countdown.tick(Local::now());
        }
        self.apply_layout(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label(self.countdown.label_job());
                });
            });
    }

    fn clear_color(&self, _visuals: &Visuals) -> [f32; 4] {
        Color32::TRANSPARENT.to_normalized_gamma_f32()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::countdown;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn first_tick_schedules_layout() {
        let mut countdown = Countdown::new(now() + chrono::Duration::days(2));
        countdown.tick(now());
        assert_eq!(countdown.ticks(), 1);
        assert!(countdown.layout_pending());
        assert_eq!(countdown.text().plain(), "2.000000 天");

        let geometry = countdown.take_layout(1920.0, 120.0).unwrap();
        assert_eq!(geometry.position.x + geometry.size.x + 50.0, 1920.0);
        assert_eq!(geometry.position.y, 50.0);
        assert!(countdown.take_layout(1920.0, 120.0).is_none());
    }

    #[test]
    fn layout_repeats_every_hundred_ticks() {
        let mut countdown = Countdown::new(now());
        countdown.tick(now());
        countdown.take_layout(1920.0, 120.0);

        for _ in 1..100 {
            countdown.tick(now());
            assert!(!countdown.layout_pending());
        }
        countdown.tick(now());
        assert_eq!(countdown.ticks(), 101);
        assert!(countdown.layout_pending());
    }

    #[test]
    fn label_splits_font_sizes() {
        let mut countdown = Countdown::new(now() + chrono::Duration::hours(36));
        countdown.tick(now());
        let job = countdown.label_job();
        assert_eq!(job.text, "1.500000 天");
        assert_eq!(job.sections.len(), 2);
        assert_eq!(job.sections[0].format.font_id.size, INTEGER_FONT_SIZE);
        assert_eq!(&job.text[job.sections[0].byte_range.clone()], "1");
        assert_eq!(job.sections[1].format.font_id.size, LABEL_FONT_SIZE);
    }

    #[test]
    fn config_target_drives_countdown() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(
            root.path().join(config::CONFIG_FILE_NAME),
            "[Time]\nTarget=2099-01-01T00:00:00\n",
        )
        .unwrap();
        let paths = SearchPaths {
            exe_dir: Some(root.path().to_path_buf()),
            working_dir: None,
        };

        let target = config::resolve_target(&paths, now());
        let mut countdown = Countdown::new(target);
        assert_eq!(
            countdown.target(),
            Local.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap()
        );

        countdown.tick(now());
        let seconds = countdown.target().signed_duration_since(now()).num_seconds();
        let expected = format!("{:.6}", seconds as f64 / countdown::SECONDS_PER_DAY);
        assert_eq!(countdown.text().plain(), format!("{expected}{UNIT_SUFFIX}"));
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_ui_keeps_at_most_one_tick() {
        let (tick_tx, mut tick_rx) = mpsc::channel(1);
        let ticker = spawn_ticker(egui::Context::default(), tick_tx);

        time::sleep(TICK_PERIOD * 10 + TICK_PERIOD / 2).await;
        assert!(tick_rx.try_recv().is_ok());
        assert!(tick_rx.try_recv().is_err());

        time::sleep(TICK_PERIOD).await;
        assert!(tick_rx.try_recv().is_ok());

        drop(tick_rx);
        time::sleep(TICK_PERIOD * 2).await;
        assert!(ticker.is_finished());
    }
}
