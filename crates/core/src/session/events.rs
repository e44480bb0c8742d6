//! Input events consumed by the session once per frame.

/// Cursor movements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStep {
    /// One frame forward.
    Next,
    /// One frame back.
    Previous,
    /// `frame_count / cursor_large_step_divisor` frames forward.
    JumpForward,
    /// `frame_count / cursor_large_step_divisor` frames back.
    JumpBack,
}

/// Everything the shell can ask of a session.
///
/// Input callbacks only enqueue these; `Session::process_events` applies them.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Restore the full X range and the unit Y range.
    ResetZoom,
    ZoomXIn,
    ZoomXOut,
    PanLeft,
    PanRight,
    /// Mouse-driven X limits.
    SetXRange { min: f64, max: f64 },
    ZoomYIn,
    ZoomYOut,
    ResetY,
    /// Fit Y to the largest visible magnitude.
    FitY,
    Cursor(CursorStep),
    /// Place the cursor at the frame nearest to a time.
    CursorToTime(f64),
    ShowAllTraces,
    ToggleTrace(usize),
    SoloTrace(usize),
    CyclePlotMode,
    CycleColormap,
}
