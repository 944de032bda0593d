//! Offline glide simulation
//!
//! Plays a release against a virtual scroll view on a manual frame clock, so
//! a glide can be inspected frame by frame without a display.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use glide_animation::{DecayCurve, FrameClock, ManualFrameClock};
use glide_core::{Point, Size, Vec2};
use glide_scroll::{DecelerationConfig, DecelerationRequest, Decelerator, ScrollView};
use serde::Serialize;

use crate::config::SimulationConfig;

/// Closed-form summary of the curve a release would produce
#[derive(Debug, Clone, Serialize)]
pub struct CurveSummary {
    pub scaled_velocity: Vec2,
    pub decay_rate: f64,
    pub duration_secs: f64,
    pub stop_position: Point,
}

/// Build the same curve the decelerator would, without running it
pub fn summarize_curve(
    request: DecelerationRequest,
    offset_y: f64,
    config: &DecelerationConfig,
) -> CurveSummary {
    let scaled_velocity = Vec2::new(
        request.velocity.x,
        request.velocity.y * config.velocity_scale(),
    );
    let decay_rate = config.rate(request.rate);
    let curve = DecayCurve::new(
        Point::new(0.0, offset_y),
        scaled_velocity,
        decay_rate,
        config.threshold,
    );

    CurveSummary {
        scaled_velocity,
        decay_rate,
        duration_secs: curve.duration().as_secs_f64(),
        stop_position: curve.stop_position(),
    }
}

/// One simulated display frame
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FrameSample {
    pub frame: u64,
    pub time_secs: f64,
    pub offset: Point,
    pub decelerating: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub frames: Vec<FrameSample>,
    pub final_offset: Point,
    /// Frame at which the simulated finger came down, if it did
    pub interrupted_at: Option<u64>,
}

/// Run a glide to completion (or interruption) and record every frame
pub fn simulate(
    request: DecelerationRequest,
    offset_y: f64,
    interrupt_after: Option<f64>,
    deceleration: &DecelerationConfig,
    simulation: &SimulationConfig,
) -> Result<SimulationReport> {
    if simulation.fps == 0 {
        anyhow::bail!("fps must be greater than zero");
    }
    let frame_interval = Duration::from_secs_f64(1.0 / f64::from(simulation.fps));

    let view = Rc::new(RefCell::new(
        ScrollView::new(
            Size::new(0.0, simulation.content_height),
            Size::new(0.0, simulation.viewport_height),
        )
        .with_offset(Point::new(0.0, offset_y)),
    ));
    let clock = Rc::new(ManualFrameClock::new());
    let dyn_clock: Rc<dyn FrameClock> = clock.clone();
    let decelerator = Decelerator::with_config(&view, dyn_clock, *deceleration);

    decelerator.decelerate(request);

    let mut frames = Vec::new();
    let mut interrupted_at = None;
    while decelerator.is_decelerating() && clock.frame_count() < simulation.max_frames {
        clock.advance(frame_interval);
        let frame = clock.frame_count();
        let time_secs = frame as f64 * frame_interval.as_secs_f64();

        if let Some(at) = interrupt_after {
            if interrupted_at.is_none() && time_secs >= at {
                tracing::info!("Finger down at frame {} ({:.3}s)", frame, time_secs);
                view.borrow_mut().begin_tracking();
                decelerator.invalidate_if_needed();
                interrupted_at = Some(frame);
            }
        }

        frames.push(FrameSample {
            frame,
            time_secs,
            offset: view.borrow().content_offset,
            decelerating: decelerator.is_decelerating(),
        });
    }

    if decelerator.is_decelerating() {
        tracing::warn!("Glide still running after {} frames", simulation.max_frames);
    }

    let final_offset = view.borrow().content_offset;
    Ok(SimulationReport {
        frames,
        final_offset,
        interrupted_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glide_scroll::DecelerationRate;

    fn request(velocity_y: f64) -> DecelerationRequest {
        DecelerationRequest::new(Vec2::new(0.0, velocity_y), DecelerationRate::Normal)
    }

    #[test]
    fn test_summary_scales_vertical_velocity_only() {
        let summary = summarize_curve(
            DecelerationRequest::new(Vec2::new(7.0, -12.0), DecelerationRate::Fast),
            50.0,
            &DecelerationConfig::default(),
        );

        assert_eq!(summary.scaled_velocity.x, 7.0);
        assert!((summary.scaled_velocity.y - -1200.0).abs() < 1e-9);
        assert_eq!(summary.decay_rate, 0.99);
        assert!(summary.duration_secs > 0.0);
        assert!(summary.stop_position.y < 50.0);
    }

    #[test]
    fn test_simulation_runs_to_rest() {
        let report = simulate(
            request(-1200.0),
            50.0,
            None,
            &DecelerationConfig::default(),
            &SimulationConfig::default(),
        )
        .unwrap();

        assert_eq!(report.final_offset.y, 0.0);
        assert!(report.interrupted_at.is_none());
        let last = report.frames.last().unwrap();
        assert!(!last.decelerating);
    }

    #[test]
    fn test_interrupt_freezes_offset() {
        let report = simulate(
            request(6.0),
            1000.0,
            Some(0.1),
            &DecelerationConfig::default(),
            &SimulationConfig::default(),
        )
        .unwrap();

        let frame = report.interrupted_at.unwrap();
        let at_touch = report.frames[frame as usize - 1].offset;
        assert_eq!(report.final_offset, at_touch);
        assert_eq!(report.frames.len() as u64, frame);
    }

    #[test]
    fn test_zero_fps_is_rejected() {
        let simulation = SimulationConfig {
            fps: 0,
            ..Default::default()
        };
        let result = simulate(
            request(1.0),
            0.0,
            None,
            &DecelerationConfig::default(),
            &simulation,
        );
        assert!(result.is_err());
    }
}
