use std::fmt;

use crate::geometry::PixelCoord;

/// A single outline instruction in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    /// Cubic Bezier segment; emitted only by curve-producing backends.
    CubicTo {
        c1: (f64, f64),
        c2: (f64, f64),
        to: (f64, f64),
    },
    Close,
}

impl PathCommand {
    pub fn move_to(point: PixelCoord) -> Self {
        PathCommand::MoveTo {
            x: point.x as f64,
            y: point.y as f64,
        }
    }

    pub fn line_to(point: PixelCoord) -> Self {
        PathCommand::LineTo {
            x: point.x as f64,
            y: point.y as f64,
        }
    }
}

/// Write a coordinate, mapping non-finite values to zero so they never reach the text.
fn write_coord(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    let value = if value.is_finite() { value } else { 0.0 };
    write!(f, "{value}")
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PathCommand::MoveTo { x, y } => {
                f.write_str("M ")?;
                write_coord(f, x)?;
                f.write_str(" ")?;
                write_coord(f, y)
            }
            PathCommand::LineTo { x, y } => {
                f.write_str("L ")?;
                write_coord(f, x)?;
                f.write_str(" ")?;
                write_coord(f, y)
            }
            PathCommand::CubicTo { c1, c2, to } => {
                f.write_str("C")?;
                for (x, y) in [c1, c2, to] {
                    f.write_str(" ")?;
                    write_coord(f, x)?;
                    f.write_str(" ")?;
                    write_coord(f, y)?;
                }
                Ok(())
            }
            PathCommand::Close => f.write_str("Z"),
        }
    }
}

/// An ordered list of path commands, rendered to path-data text on display.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathData {
    commands: Vec<PathCommand>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: PathCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl From<Vec<PathCommand>> for PathData {
    fn from(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{command}")?;
        }
        Ok(())
    }
}

/// Turn a simplified point run into a closed outline.
///
/// Returns `None` for runs shorter than two points.
pub fn emit_path(points: &[PixelCoord]) -> Option<PathData> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }

    let mut commands = Vec::with_capacity(points.len() + 1);
    commands.push(PathCommand::move_to(*first));
    commands.extend(rest.iter().copied().map(PathCommand::line_to));
    commands.push(PathCommand::Close);
    Some(PathData::from(commands))
}
