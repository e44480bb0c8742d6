//! Session controller: owns the viewport state and applies queued input.

pub mod axes;
pub mod events;

pub use axes::{PlotMode, SpreadTransform, XAxis, YAxis};
pub use events::{CursorStep, SessionEvent};

use std::ops::Range;
use std::sync::mpsc;

use serde::Serialize;

use crate::config::PlotConfig;
use crate::pyramid::Point;
use crate::traces::{Color, TraceSet, TraceStatus, TraceVisibility};
use crate::viewport::ViewportIndexer;

/// One visible trace as handed to the renderer.
#[derive(Debug, Clone, Serialize)]
pub struct TraceSlice<'a> {
    pub index: usize,
    pub name: &'a str,
    pub color: Color,
    pub status: TraceStatus,
    /// Index range into the trace's current level.
    pub range: Range<usize>,
    pub points: &'a [Point],
    /// Lane mapping when spread mode is active.
    pub spread: Option<SpreadTransform>,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameView<'a> {
    pub level: usize,
    pub x_axis: XAxis,
    pub y_limits: (f64, f64),
    pub visible_points: usize,
    pub show_markers: bool,
    pub plot_mode: PlotMode,
    pub spread: bool,
    pub cursor_time: f64,
    pub traces: Vec<TraceSlice<'a>>,
}

/// Viewport, visibility and cursor state over one loaded trace set.
///
/// Input is delivered as [`SessionEvent`]s through [`Session::events`] and
/// applied in order by [`Session::process_events`], once per frame.
pub struct Session {
    config: PlotConfig,
    traces: TraceSet,
    visibility: TraceVisibility,
    indexer: ViewportIndexer,
    x: XAxis,
    y: YAxis,
    cursor: usize,
    plot_mode: PlotMode,
    fit_pending: bool,
    tx: mpsc::Sender<SessionEvent>,
    rx: mpsc::Receiver<SessionEvent>,
}

impl Session {
    pub fn new(traces: TraceSet, config: PlotConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        let num_traces = traces.num_traces();
        let mut session = Self {
            visibility: TraceVisibility::new(num_traces),
            indexer: ViewportIndexer::new(config.min_detail_level_points),
            x: XAxis::new(0.0, traces.max_time()),
            y: YAxis::default(),
            cursor: traces.num_samples() / 2,
            plot_mode: PlotMode::initial(num_traces, config.spread_max_traces),
            fit_pending: false,
            config,
            traces,
            tx,
            rx,
        };
        session.refresh_viewport();
        session
    }

    /// A sender for input callbacks; clone freely.
    pub fn events(&self) -> mpsc::Sender<SessionEvent> {
        self.tx.clone()
    }

    /// Enqueue an event from the owning thread.
    pub fn send(&self, event: SessionEvent) {
        // The receiver lives in self, so the channel cannot be closed here.
        let _ = self.tx.send(event);
    }

    /// Apply every queued event, then re-index the viewport if the X range
    /// moved. Returns the number of events applied.
    pub fn process_events(&mut self) -> usize {
        let mut applied = 0;
        let mut x_changed = false;
        while let Ok(event) = self.rx.try_recv() {
            log::trace!("Session event: {:?}", event);
            x_changed |= self.apply(event);
            applied += 1;
        }

        if x_changed {
            self.refresh_viewport();
        }
        if self.fit_pending {
            self.fit_pending = false;
            self.fit_y();
        }
        applied
    }

    /// Returns true when the X range changed.
    fn apply(&mut self, event: SessionEvent) -> bool {
        let x_before = self.x;
        match event {
            SessionEvent::ResetZoom => {
                self.x = XAxis::new(0.0, self.traces.max_time());
                self.y = YAxis::default();
            }
            SessionEvent::ZoomXIn => self.x.zoom(self.config.x_zoom_fraction),
            SessionEvent::ZoomXOut => self.x.zoom(-self.config.x_zoom_fraction),
            SessionEvent::PanLeft => self.x.pan(-self.config.pan_fraction),
            SessionEvent::PanRight => self.x.pan(self.config.pan_fraction),
            SessionEvent::SetXRange { min, max } => {
                if min < max && min.is_finite() && max.is_finite() {
                    self.x = XAxis::new(min, max);
                }
            }
            SessionEvent::ZoomYIn => self.y.zoom_by(1, self.config.y_zoom_base),
            SessionEvent::ZoomYOut => self.y.zoom_by(-1, self.config.y_zoom_base),
            SessionEvent::ResetY => self.y = YAxis::default(),
            SessionEvent::FitY => self.fit_pending = true,
            SessionEvent::Cursor(step) => self.step_cursor(step),
            SessionEvent::CursorToTime(time) => self.cursor_to_time(time),
            SessionEvent::ShowAllTraces => self.visibility.set_all(true),
            SessionEvent::ToggleTrace(trace) => self.visibility.toggle(trace),
            SessionEvent::SoloTrace(trace) => self.visibility.solo(trace),
            SessionEvent::CyclePlotMode => {
                self.plot_mode = self.plot_mode.next();
                log::debug!("Plot mode: {:?}", self.plot_mode);
            }
            SessionEvent::CycleColormap => {
                let next = self.traces.colormap().next();
                self.traces.set_colormap(next);
                log::debug!("Colormap: {}", next.name());
            }
        }
        self.x != x_before
    }

    fn refresh_viewport(&mut self) {
        if let Some(reference) = self.traces.reference() {
            self.indexer.update(reference, self.x.min, self.x.max);
        }
    }

    fn fit_y(&mut self) {
        let max_abs = self
            .visibility
            .visible()
            .filter_map(|t| self.traces.trace(t))
            .flat_map(|trace| self.indexer.slice(&trace.pyramid).iter())
            .map(|p| p.y.abs())
            .fold(f64::NEG_INFINITY, f64::max);
        self.y.fit(max_abs, self.config.y_fit_margin, self.config.y_zoom_base);
    }

    fn step_cursor(&mut self, step: CursorStep) {
        let count = self.traces.num_samples();
        if count == 0 {
            return;
        }
        let last = count - 1;
        let jump = (count / self.config.cursor_large_step_divisor).max(1);
        self.cursor = match step {
            CursorStep::Next => (self.cursor + 1).min(last),
            CursorStep::Previous => self.cursor.saturating_sub(1),
            CursorStep::JumpForward => (self.cursor + jump).min(last),
            CursorStep::JumpBack => self.cursor.saturating_sub(jump),
        };
    }

    fn cursor_to_time(&mut self, time: f64) {
        let count = self.traces.num_samples();
        if count == 0 {
            return;
        }
        self.cursor = if time <= 0.0 {
            0
        } else if time >= self.traces.max_time() {
            count - 1
        } else {
            crate::audio::store::index_for_time(time, self.traces.sample_period()).min(count - 1)
        };
    }

    /// Spread lanes are disabled while a trace is soloed.
    pub fn spread_enabled(&self) -> bool {
        self.plot_mode == PlotMode::Spread && !self.visibility.is_exclusive()
    }

    /// Snapshot for rendering the current frame.
    pub fn frame(&self) -> FrameView<'_> {
        let level = self.indexer.level();
        let spread = self.spread_enabled();
        let lanes = self.visibility.visible_count();
        let gain = self.y.gain();

        let traces = self
            .visibility
            .visible()
            .enumerate()
            .filter_map(|(slot, t)| {
                let trace = self.traces.trace(t)?;
                let range = self.indexer.range_for(&trace.pyramid);
                let points = &trace.pyramid.points(level)[range.clone()];
                Some(TraceSlice {
                    index: t,
                    name: trace.name.as_str(),
                    color: trace.color,
                    status: self.visibility.status(t),
                    range,
                    points,
                    spread: spread.then(|| SpreadTransform::for_lane(slot, lanes, gain)),
                })
            })
            .collect();

        FrameView {
            level,
            x_axis: self.x,
            y_limits: if spread { (-1.0, 1.0) } else { self.y.limits() },
            visible_points: self.indexer.visible_points(),
            show_markers: self.indexer.visible_points() < self.config.marker_threshold,
            plot_mode: self.plot_mode,
            spread,
            cursor_time: self.traces.time(self.cursor),
            traces,
        }
    }

    /// Frames listed around the cursor in the value table.
    pub fn cursor_context(&self) -> Range<usize> {
        let count = self.traces.num_samples();
        let context = self.config.cursor_context_frames;
        let width = (2 * context + 1).min(count);
        let start = self.cursor.saturating_sub(context).min(count - width);
        start..start + width
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn level(&self) -> usize {
        self.indexer.level()
    }

    pub fn indexer(&self) -> &ViewportIndexer {
        &self.indexer
    }

    pub fn traces(&self) -> &TraceSet {
        &self.traces
    }

    pub fn visibility(&self) -> &TraceVisibility {
        &self.visibility
    }

    pub fn plot_mode(&self) -> PlotMode {
        self.plot_mode
    }

    pub fn x_axis(&self) -> XAxis {
        self.x
    }

    pub fn y_axis(&self) -> YAxis {
        self.y
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }
}
