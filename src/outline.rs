//! Path-command ingestion: turns a move/line/curve/close command stream
//! into curve sequences, one per closed path. The source frame is
//! top-down (positive y downward), so every ingested point is mirrored
//! across the page height. Ingestion is forgiving: unknown commands and
//! malformed operands are skipped, never fatal.

use nalgebra::Point2;

use crate::geometry::{flip_y, Beziergon, CubicBezier, FlattenTolerance, Polygon};

/// One path-drawing command. Lower-case source commands carry relative
/// coordinates; the flag records that, resolution happens at ingestion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    Move {
        to: Point2<f64>,
        relative: bool,
    },
    Line {
        to: Point2<f64>,
        relative: bool,
    },
    Curve {
        control1: Point2<f64>,
        control2: Point2<f64>,
        to: Point2<f64>,
        relative: bool,
    },
    Close,
}

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Move,
    Line,
    Curve,
}

/// Tokenizes a whitespace-separated command string ("M 10,20 C ... Z")
/// into path commands. Command letters are M/L/C/Z, lower-case meaning
/// relative; anything unrecognized is skipped.
pub fn parse_path_data(data: &str) -> Vec<PathCommand> {
    let mut commands = Vec::new();
    let mut mode = Mode::Move;
    let mut relative = false;
    let mut pending: Vec<Point2<f64>> = Vec::new();

    for token in data.split_whitespace() {
        match token {
            "M" | "m" | "L" | "l" | "C" | "c" => {
                if !pending.is_empty() {
                    log::debug!("dropping incomplete curve operands before '{}'", token);
                    pending.clear();
                }
                relative = token.chars().next().is_some_and(|c| c.is_lowercase());
                mode = match token.to_ascii_uppercase().as_str() {
                    "M" => Mode::Move,
                    "L" => Mode::Line,
                    _ => Mode::Curve,
                };
            }
            "Z" | "z" => {
                if !pending.is_empty() {
                    log::debug!("dropping incomplete curve operands before '{}'", token);
                    pending.clear();
                }
                commands.push(PathCommand::Close);
            }
            _ => {
                let Some(p) = parse_point(token) else {
                    log::debug!("skipping unrecognized path token '{}'", token);
                    continue;
                };
                match mode {
                    Mode::Move => {
                        commands.push(PathCommand::Move { to: p, relative });
                        // Subsequent operand points are implicit line-tos.
                        mode = Mode::Line;
                    }
                    Mode::Line => commands.push(PathCommand::Line { to: p, relative }),
                    Mode::Curve => {
                        pending.push(p);
                        if pending.len() == 3 {
                            commands.push(PathCommand::Curve {
                                control1: pending[0],
                                control2: pending[1],
                                to: pending[2],
                                relative,
                            });
                            pending.clear();
                        }
                    }
                }
            }
        }
    }

    if !pending.is_empty() {
        log::debug!("dropping {} trailing curve operands", pending.len());
    }
    commands
}

fn parse_point(token: &str) -> Option<Point2<f64>> {
    let (x, y) = token.split_once(',')?;
    Some(Point2::new(
        x.trim().parse().ok()?,
        y.trim().parse().ok()?,
    ))
}

/// Resolves the command stream into curve sequences, one Beziergon per
/// closed path. Relative coordinates accumulate in the source frame;
/// every stored point is mirrored across `page_height`. A close command
/// that would produce a zero-length closing curve is elided.
pub fn beziergons_from_commands(commands: &[PathCommand], page_height: f64) -> Vec<Beziergon> {
    let mut beziergons = Vec::new();
    let mut curves: Vec<CubicBezier> = Vec::new();
    // Pen position in the raw (top-down) source frame.
    let mut current = Point2::origin();
    let mut subpath_start = current;

    let resolve = |base: Point2<f64>, p: Point2<f64>, relative: bool| {
        if relative {
            base + p.coords
        } else {
            p
        }
    };

    for cmd in commands {
        match *cmd {
            PathCommand::Move { to, relative } => {
                current = resolve(current, to, relative);
                subpath_start = current;
            }
            PathCommand::Line { to, relative } => {
                let start = current;
                current = resolve(current, to, relative);
                curves.push(CubicBezier::line(
                    flip_y(start, page_height),
                    flip_y(current, page_height),
                ));
            }
            PathCommand::Curve {
                control1,
                control2,
                to,
                relative,
            } => {
                let c1 = resolve(current, control1, relative);
                let c2 = resolve(current, control2, relative);
                let start = current;
                current = resolve(current, to, relative);
                curves.push(CubicBezier::new(
                    flip_y(start, page_height),
                    flip_y(c1, page_height),
                    flip_y(c2, page_height),
                    flip_y(current, page_height),
                ));
            }
            PathCommand::Close => {
                if let (Some(first), Some(last)) = (curves.first(), curves.last()) {
                    let start = last.p3;
                    let end = first.p0;
                    // A closing curve between coincident points carries no
                    // geometry and is elided.
                    if start != end {
                        curves.push(CubicBezier::line(start, end));
                    }
                    beziergons.push(Beziergon::new(std::mem::take(&mut curves)));
                }
                current = subpath_start;
            }
        }
    }

    // An unterminated trailing path still yields a (possibly open)
    // curve sequence.
    if !curves.is_empty() {
        beziergons.push(Beziergon::new(curves));
    }
    beziergons
}

/// Ingests, flattens, and filters in one step: one polygon per closed
/// path, degenerate segments removed.
pub fn polygons_from_commands(
    commands: &[PathCommand],
    page_height: f64,
    tol: &FlattenTolerance,
    max_sides: usize,
) -> Vec<Polygon> {
    beziergons_from_commands(commands, page_height)
        .iter()
        .map(|b| b.approximate_by_polygon(tol, max_sides))
        .collect()
}
