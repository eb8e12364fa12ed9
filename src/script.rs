//! Gesture scripts: recorded pointer events and commands, replayed against a
//! [`Session`].
//!
//! A script is a JSON array of steps tagged by `"action"`. Coordinates are in
//! viewport space.
//!
//! ```json
//! [
//!   { "action": "select", "index": 0 },
//!   { "action": "handle_down", "handle": "se" },
//!   { "action": "pointer_move", "x": 520, "y": 410 },
//!   { "action": "pointer_up" },
//!   { "action": "apply_to_all" }
//! ]
//! ```

use crate::aspect::AspectRatio;
use crate::engine::Handle;
use crate::geometry::Point;
use crate::session::{ApplyOutcome, Session, SessionError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Select { index: usize },
    PointerDown { x: f64, y: f64 },
    HandleDown { handle: Handle },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    PointerLeave,
    ApplyToAll,
    ResetAll,
    ResetCrop,
    SetAspect { ratio: AspectRatio },
    Remove { index: usize },
}

/// What a replay did, for the summary line.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScriptReport {
    pub steps: usize,
    /// Pointer moves that changed the crop.
    pub adjustments: usize,
    /// Steps that had no effect (bad index, gesture rejected, too few images).
    pub ignored: usize,
}

pub fn parse_script(json: &str) -> Result<Vec<Step>, ScriptError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_script(path: &Path) -> Result<Vec<Step>, ScriptError> {
    let content = std::fs::read_to_string(path)?;
    parse_script(&content)
}

/// Replay `steps` in order. Nothing aborts a replay: out-of-range indices and
/// rejected gestures are logged and counted as ignored.
pub fn run_script(session: &mut Session, steps: &[Step]) -> ScriptReport {
    let mut report = ScriptReport::default();

    for step in steps {
        report.steps += 1;
        let applied = match step {
            Step::Select { index } => indexed(session.set_active(*index)),
            Step::Remove { index } => indexed(session.remove_image(*index).map(|_| ())),
            Step::PointerDown { x, y } => session.pointer_down(Point::new(*x, *y)),
            Step::HandleDown { handle } => session.handle_down(*handle),
            Step::PointerMove { x, y } => {
                let changed = session.pointer_move(Point::new(*x, *y));
                if changed {
                    report.adjustments += 1;
                }
                changed
            }
            Step::PointerUp => {
                session.pointer_up();
                true
            }
            Step::PointerLeave => {
                session.pointer_leave();
                true
            }
            Step::ApplyToAll => session.apply_current_to_all() != ApplyOutcome::Skipped,
            Step::ResetAll => {
                session.reset_all_crops();
                true
            }
            Step::ResetCrop => {
                session.reset_crop();
                true
            }
            Step::SetAspect { ratio } => {
                session.set_aspect_ratio(*ratio);
                true
            }
        };

        if !applied {
            debug!("step {} had no effect: {:?}", report.steps, step);
            report.ignored += 1;
        }
    }

    report
}

fn indexed(result: Result<(), SessionError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            debug!("{}", e);
            false
        }
    }
}
