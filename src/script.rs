//! Parser for the shape script mini-language.
//!
//! A script is a list of lines broken by `\n`, `\r\n`, or a lone `\r`, one
//! command per line, tokens separated by spaces or tabs. The first character
//! of the first token selects the command; the remaining tokens are
//! coordinates:
//!
//! ```text
//! v 0 0      corner point
//! o 10 10    G4 point
//! c 20 0     G2 point
//! [ 5 5      left point
//! ] 6 6      right point
//! { 0 0      open-contour start
//! } 9 9      open-contour end, finishes the shape
//! z          closing end point (optional "x y", default 0 0), finishes the shape
//! ```
//!
//! Shapes are handed out as soon as they finish, so a later malformed line
//! does not take back shapes already delivered. Whatever is pending after the
//! last line is delivered untagged, even when it has no points.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use crate::doc::{ControlPoint, PointType, Shape};

/// A malformed script line. Line numbers are 1-based.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ScriptError {
    /// The line starts with a character that names no command.
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: char },
    /// The command received the wrong number of coordinates.
    #[error("line {line}: '{command}' expects {expected} argument(s), found {found}")]
    ArgumentCount { line: usize, command: char, expected: &'static str, found: usize },
    /// A coordinate is not a finite decimal number.
    #[error("line {line}: invalid number {token:?}")]
    InvalidNumber { line: usize, token: String },
}

/// A script command, selected by the leading character of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `v`
    Corner,
    /// `o`
    G4,
    /// `c`
    G2,
    /// `[`
    Left,
    /// `]`
    Right,
    /// `{`
    OpenContour,
    /// `}`
    EndOpenContour,
    /// `z`
    End,
}

impl Command {
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'v' => Some(Self::Corner),
            'o' => Some(Self::G4),
            'c' => Some(Self::G2),
            '[' => Some(Self::Left),
            ']' => Some(Self::Right),
            '{' => Some(Self::OpenContour),
            '}' => Some(Self::EndOpenContour),
            'z' => Some(Self::End),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::Corner => 'v',
            Self::G4 => 'o',
            Self::G2 => 'c',
            Self::Left => '[',
            Self::Right => ']',
            Self::OpenContour => '{',
            Self::EndOpenContour => '}',
            Self::End => 'z',
        }
    }

    /// The type of the point this command appends.
    #[must_use]
    pub fn point_type(self) -> PointType {
        match self {
            Self::Corner => PointType::Corner,
            Self::G4 => PointType::G4,
            Self::G2 => PointType::G2,
            Self::Left => PointType::Left,
            Self::Right => PointType::Right,
            Self::OpenContour => PointType::OpenContour,
            Self::EndOpenContour => PointType::EndOpenContour,
            Self::End => PointType::End,
        }
    }

    /// Whether the command completes the current shape.
    #[must_use]
    pub fn finishes_shape(self) -> bool {
        matches!(self, Self::End | Self::EndOpenContour)
    }
}

/// One parsed line: the command and the point it appends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instruction {
    pub command: Command,
    pub point: ControlPoint,
}

/// Parse a single line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns a [`ScriptError`] for an unknown command, a wrong argument count,
/// or an unparseable coordinate.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Instruction>, ScriptError> {
    let tokens: Vec<&str> = line.split([' ', '\t']).filter(|t| !t.is_empty()).collect();
    let Some((head, args)) = tokens.split_first() else {
        return Ok(None);
    };
    let Some(first) = head.chars().next() else {
        return Ok(None);
    };
    let command = Command::from_char(first).ok_or(ScriptError::UnknownCommand { line: line_no, command: first })?;

    let (x, y) = match (command, args) {
        (Command::End, []) => (0.0, 0.0),
        (_, [x, y]) => (parse_number(line_no, x)?, parse_number(line_no, y)?),
        (Command::End, _) => return Err(argument_count(line_no, command, "0 or 2", args.len())),
        _ => return Err(argument_count(line_no, command, "2", args.len())),
    };

    Ok(Some(Instruction { command, point: ControlPoint::new(x, y, command.point_type()) }))
}

fn argument_count(line: usize, command: Command, expected: &'static str, found: usize) -> ScriptError {
    ScriptError::ArgumentCount { line, command: command.as_char(), expected, found }
}

fn parse_number(line_no: usize, token: &str) -> Result<f64, ScriptError> {
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ScriptError::InvalidNumber { line: line_no, token: token.to_owned() }),
    }
}

/// Split on `\r\n`, `\n`, and a lone `\r`. Each break counts as one line.
fn split_lines(script: &str) -> impl Iterator<Item = &str> {
    script
        .split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

/// Run a script, handing each shape to `commit` as soon as it is complete.
///
/// Finished shapes are open and tagged. After the last line the pending shape
/// is committed untagged, including when it is empty. An empty script commits
/// nothing.
///
/// # Errors
///
/// Stops at the first malformed line. Shapes committed before that line stay
/// committed; the pending shape is discarded.
pub fn run<F>(script: &str, mut commit: F) -> Result<(), ScriptError>
where
    F: FnMut(Shape),
{
    if script.is_empty() {
        return Ok(());
    }

    let mut shape = Shape::new(false, true);
    for (index, line) in split_lines(script).enumerate() {
        let Some(instruction) = parse_line(index + 1, line)? else {
            continue;
        };
        shape.push(instruction.point);
        if instruction.command.finishes_shape() {
            commit(std::mem::replace(&mut shape, Shape::new(false, true)));
        }
    }

    shape.is_tagged = false;
    commit(shape);
    Ok(())
}
