use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{bail, Result};
use serde::Serialize;
use tracing::info;

use folio_core::{AppConfig, EngineEvent, ManualClock};
use folio_tui::app::App;

/// Inputs for a headless run
#[derive(Debug, Clone)]
pub struct SimulateOptions {
    pub seconds: f64,
    pub fps: u32,
    pub navigate: Option<String>,
    pub wheel: Vec<f64>,
    /// Terminal size the page is laid out for
    pub width: u16,
    pub height: u16,
}

impl Default for SimulateOptions {
    fn default() -> Self {
        Self {
            seconds: 3.0,
            fps: 60,
            navigate: None,
            wheel: Vec::new(),
            width: 100,
            height: 32,
        }
    }
}

/// One line of the trace
#[derive(Debug, Clone, Serialize)]
pub struct TraceFrame {
    pub frame: u64,
    pub time_ms: f64,
    pub offset: f64,
    pub velocity: f64,
    pub section: Option<String>,
    pub active_tweens: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EngineEvent>,
}

/// Drive the page on a manual clock and record every frame
pub fn simulate(
    config: AppConfig,
    options: &SimulateOptions,
    mut on_frame: impl FnMut(&TraceFrame) -> Result<()>,
) -> Result<Vec<TraceFrame>> {
    if options.fps == 0 {
        bail!("fps must be positive");
    }
    if !(options.seconds.is_finite() && options.seconds > 0.0) {
        bail!("seconds must be a positive number");
    }

    let clock = ManualClock::new();
    let mut app = App::new(config, clock.clone(), options.width, options.height)?;

    let events = Rc::new(RefCell::new(Vec::new()));
    {
        let events = events.clone();
        app.engine
            .on_event(move |event: &EngineEvent| events.borrow_mut().push(event.clone()));
    }

    // Scripted input waits until the intro releases the scroll lock
    let mut scripted = options.navigate.is_some() || !options.wheel.is_empty();

    let frame_ms = 1000.0 / f64::from(options.fps);
    let total = (options.seconds * f64::from(options.fps)).round() as u64;
    let mut trace = Vec::with_capacity(total as usize);

    for frame in 0..total {
        if frame > 0 {
            clock.advance(frame_ms);
        }
        if scripted && !app.engine.is_scroll_locked() {
            apply_script(&app, options)?;
            scripted = false;
        }
        app.tick()?;

        let state = app.engine.scroll_state();
        let record = TraceFrame {
            frame,
            time_ms: app.engine.now_ms(),
            offset: state.virtual_offset,
            velocity: state.velocity,
            section: app.active_section(),
            active_tweens: app.engine.timeline().borrow().active_count(),
            events: std::mem::take(&mut *events.borrow_mut()),
        };
        on_frame(&record)?;
        trace.push(record);
    }

    if scripted {
        bail!(
            "scripted input never applied: scrolling was still locked after {}s",
            options.seconds
        );
    }
    Ok(trace)
}

fn apply_script(app: &App, options: &SimulateOptions) -> Result<()> {
    if let Some(section) = &options.navigate {
        let goal = app.engine.navigate_to(section)?;
        info!(%section, goal, now_ms = app.engine.now_ms(), "Scripted navigation");
    }
    for delta in &options.wheel {
        if !app.engine.on_wheel(*delta) {
            bail!("wheel input {} was ignored", delta);
        }
    }
    Ok(())
}

pub async fn run(config: AppConfig, options: SimulateOptions, json: bool, realtime: bool) -> Result<()> {
    let mut pace = tokio::time::interval(Duration::from_secs_f64(
        1.0 / f64::from(options.fps.max(1)),
    ));
    let mut pending = Vec::new();

    // Frames are produced synchronously; realtime pacing happens while printing
    let trace = simulate(config, &options, |frame| {
        if json {
            pending.push(serde_json::to_string(frame)?);
        }
        Ok(())
    })?;

    if json {
        for line in pending {
            println!("{}", line);
            if realtime {
                pace.tick().await;
            }
        }
        return Ok(());
    }

    for frame in trace.iter().filter(|f| !f.events.is_empty()) {
        for event in &frame.events {
            println!("{:>8.1} ms  {:?}", frame.time_ms, event);
            if realtime {
                pace.tick().await;
            }
        }
    }

    if let Some(last) = trace.last() {
        println!(
            "{} frames, final offset {:.1}, section {}",
            trace.len(),
            last.offset,
            last.section.as_deref().unwrap_or("-")
        );
    }
    info!(frames = trace.len(), "Simulation finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.ui.show_intro = false;
        config
    }

    #[test]
    fn test_navigate_reaches_section() {
        let options = SimulateOptions {
            seconds: 3.0,
            navigate: Some("projects".to_string()),
            ..Default::default()
        };
        let trace = simulate(quiet_config(), &options, |_| Ok(())).unwrap();

        assert_eq!(trace.len(), 180);
        let last = trace.last().unwrap();
        assert_eq!(last.section.as_deref(), Some("projects"));
        assert!(trace.iter().any(|f| f
            .events
            .iter()
            .any(|e| matches!(e, EngineEvent::SectionChanged { section } if section == "projects"))));
    }

    #[test]
    fn test_trace_serializes_as_json_lines() {
        let options = SimulateOptions {
            seconds: 0.5,
            fps: 10,
            ..Default::default()
        };
        let mut lines = Vec::new();
        simulate(quiet_config(), &options, |frame| {
            lines.push(serde_json::to_string(frame)?);
            Ok(())
        })
        .unwrap();

        assert_eq!(lines.len(), 5);
        let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(first["frame"], 0);
        assert!(first.get("offset").is_some());
    }

    #[test]
    fn test_intro_finishes_in_trace() {
        let options = SimulateOptions {
            seconds: 8.0,
            fps: 30,
            ..Default::default()
        };
        let trace = simulate(AppConfig::default(), &options, |_| Ok(())).unwrap();
        assert!(trace
            .iter()
            .flat_map(|f| f.events.iter())
            .any(|e| *e == EngineEvent::IntroFinished));
    }

    #[test]
    fn test_navigation_waits_for_intro() {
        let options = SimulateOptions {
            seconds: 10.0,
            navigate: Some("projects".to_string()),
            ..Default::default()
        };
        let trace = simulate(AppConfig::default(), &options, |_| Ok(())).unwrap();

        let intro_done = trace
            .iter()
            .position(|f| f.events.contains(&EngineEvent::IntroFinished))
            .unwrap();
        assert!(trace[..=intro_done].iter().all(|f| f.offset == 0.0));
        let last = trace.last().unwrap();
        assert!(last.offset > 0.0);
        assert_eq!(last.section.as_deref(), Some("projects"));
    }

    #[test]
    fn test_wheel_waits_for_intro() {
        let options = SimulateOptions {
            seconds: 8.0,
            wheel: vec![400.0],
            ..Default::default()
        };
        let trace = simulate(AppConfig::default(), &options, |_| Ok(())).unwrap();
        let last = trace.last().unwrap();
        assert!((last.offset - 400.0).abs() < 1.0);
    }

    #[test]
    fn test_script_fails_when_intro_outlasts_run() {
        let options = SimulateOptions {
            seconds: 1.0,
            navigate: Some("projects".to_string()),
            ..Default::default()
        };
        assert!(simulate(AppConfig::default(), &options, |_| Ok(())).is_err());
    }

    #[test]
    fn test_rejects_zero_fps() {
        let options = SimulateOptions {
            fps: 0,
            ..Default::default()
        };
        assert!(simulate(quiet_config(), &options, |_| Ok(())).is_err());
    }
}
