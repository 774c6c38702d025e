//! Line-oriented intent scripts replayed against a [`GridEditor`].
//!
//! Each non-empty line holds one step; `#` starts a comment.
//!
//! ```text
//! pan <dx> <dy> <seconds>
//! add <screen-x> <screen-y>
//! remove <screen-x> <screen-y>
//! ui on|off
//! lock on|off
//! zoom <scale>
//! ```

use std::time::Duration;

use glam::Vec2;
use solidgrid_core::{PointerInput, ViewError, VisualLayer};
use solidgrid_system_editor::{EditOutcome, GridEditor, Intent};
use thiserror::Error;
use tracing::debug;

/// Single parsed script step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ScriptStep {
    /// Pans the view for the provided duration.
    Pan {
        /// Direction of travel.
        delta: Vec2,
        /// Duration the input is held for.
        dt: Duration,
    },
    /// Adds the cell under the screen position.
    Add(Vec2),
    /// Removes the cell under the screen position.
    Remove(Vec2),
    /// Marks subsequent pointer positions as hovering a UI control.
    PointerOverUi(bool),
    /// Locks or unlocks vertical panning.
    LockVertical(bool),
    /// Changes the zoom level.
    Zoom(f32),
}

/// Reasons a script line may be rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub(crate) enum ScriptError {
    /// The step keyword is not recognised.
    #[error("line {line}: unknown step '{keyword}'")]
    UnknownStep {
        /// One-based line number.
        line: usize,
        /// Offending keyword.
        keyword: String,
    },
    /// The step received the wrong number of arguments.
    #[error("line {line}: '{keyword}' expects {expected} argument(s)")]
    WrongArity {
        /// One-based line number.
        line: usize,
        /// Step keyword.
        keyword: String,
        /// Number of arguments the step takes.
        expected: usize,
    },
    /// An argument could not be parsed.
    #[error("line {line}: invalid argument '{value}'")]
    InvalidArgument {
        /// One-based line number.
        line: usize,
        /// Offending argument.
        value: String,
    },
    /// A zoom step carried an unusable scale.
    #[error("line {line}: {source}")]
    InvalidScale {
        /// One-based line number.
        line: usize,
        /// Rejection reported by the editor.
        source: ViewError,
    },
}

/// Parses a whole script.
pub(crate) fn parse(text: &str) -> Result<Vec<(usize, ScriptStep)>, ScriptError> {
    let mut steps = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        steps.push((line, parse_line(line, content)?));
    }
    Ok(steps)
}

fn parse_line(line: usize, content: &str) -> Result<ScriptStep, ScriptError> {
    let mut words = content.split_whitespace();
    let keyword = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    let arity = |expected: usize| {
        if args.len() == expected {
            Ok(())
        } else {
            Err(ScriptError::WrongArity {
                line,
                keyword: keyword.to_owned(),
                expected,
            })
        }
    };

    match keyword {
        "pan" => {
            arity(3)?;
            let seconds = number(line, args[2])?;
            let dt = Duration::try_from_secs_f32(seconds).map_err(|_| {
                ScriptError::InvalidArgument {
                    line,
                    value: args[2].to_owned(),
                }
            })?;
            Ok(ScriptStep::Pan {
                delta: Vec2::new(number(line, args[0])?, number(line, args[1])?),
                dt,
            })
        }
        "add" | "remove" => {
            arity(2)?;
            let position = Vec2::new(number(line, args[0])?, number(line, args[1])?);
            if keyword == "add" {
                Ok(ScriptStep::Add(position))
            } else {
                Ok(ScriptStep::Remove(position))
            }
        }
        "ui" => {
            arity(1)?;
            Ok(ScriptStep::PointerOverUi(toggle(line, args[0])?))
        }
        "lock" => {
            arity(1)?;
            Ok(ScriptStep::LockVertical(toggle(line, args[0])?))
        }
        "zoom" => {
            arity(1)?;
            Ok(ScriptStep::Zoom(number(line, args[0])?))
        }
        other => Err(ScriptError::UnknownStep {
            line,
            keyword: other.to_owned(),
        }),
    }
}

fn number(line: usize, value: &str) -> Result<f32, ScriptError> {
    value
        .parse::<f32>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| ScriptError::InvalidArgument {
            line,
            value: value.to_owned(),
        })
}

fn toggle(line: usize, value: &str) -> Result<bool, ScriptError> {
    match value {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(ScriptError::InvalidArgument {
            line,
            value: other.to_owned(),
        }),
    }
}

/// Totals gathered while replaying a script.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ReplaySummary {
    /// Edits that changed occupancy.
    pub(crate) edits: usize,
    /// Edits dropped because the pointer hovered a UI control.
    pub(crate) ignored: usize,
    /// Visual cells reported to the layer.
    pub(crate) refreshed: usize,
}

/// Replays parsed steps in order, forwarding visual updates to `layer`.
pub(crate) fn replay<L>(
    editor: &mut GridEditor,
    steps: &[(usize, ScriptStep)],
    layer: &mut L,
) -> Result<ReplaySummary, ScriptError>
where
    L: VisualLayer + ?Sized,
{
    let mut summary = ReplaySummary::default();
    let mut over_ui = false;
    let pointer = |position: Vec2, over_ui: bool| PointerInput { position, over_ui };

    for &(line, step) in steps {
        let intent = match step {
            ScriptStep::Pan { delta, dt } => Intent::Pan { delta, dt },
            ScriptStep::Add(position) => Intent::AddCell {
                pointer: pointer(position, over_ui),
            },
            ScriptStep::Remove(position) => Intent::RemoveCell {
                pointer: pointer(position, over_ui),
            },
            ScriptStep::PointerOverUi(value) => {
                over_ui = value;
                continue;
            }
            ScriptStep::LockVertical(locked) => {
                editor.set_vertical_pan_locked(locked);
                continue;
            }
            ScriptStep::Zoom(scale) => {
                editor
                    .set_scale(scale)
                    .map_err(|source| ScriptError::InvalidScale { line, source })?;
                continue;
            }
        };

        match editor.handle(intent, layer) {
            EditOutcome::Edited {
                changed, refreshed, ..
            } => {
                summary.edits += usize::from(changed);
                summary.refreshed += refreshed;
            }
            EditOutcome::IgnoredOverUi => {
                debug!(line, "intent ignored over ui");
                summary.ignored += 1;
            }
            EditOutcome::Panned { .. } => {}
        }
    }
    Ok(summary)
}
