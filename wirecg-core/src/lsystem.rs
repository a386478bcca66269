/// Deterministic L-system rewriting and a 2D turtle interpreter
use std::collections::BTreeMap;

use nalgebra::Point3;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{satisfy, space0},
    combinator::all_consuming,
    sequence::{delimited, separated_pair},
    IResult,
};

use crate::error::GrammarError;
use crate::geometry::{polyline_segments, Segment};

/// Rewriting stops early once the derived string grows past this many symbols
pub const MAX_DERIVED_LEN: usize = 1 << 22;

/// Rewriting never runs more rounds than this
pub const MAX_ITERATIONS: usize = 64;

/// Turns a non-finite or negative iteration count into zero, truncating the rest
pub fn iteration_count(iterations: f32) -> usize {
    if iterations.is_nan() || iterations <= 0.0 {
        return 0;
    }
    iterations.trunc() as usize
}

/// Parse rule text such as `"F -> F+F; X = FX"`.
///
/// Rules are separated by `;` or newlines; each maps one symbol to a
/// replacement with `->` or `=`. Blank entries are skipped.
pub fn parse_rules(text: &str) -> Result<BTreeMap<char, String>, GrammarError> {
    let mut rules = BTreeMap::new();
    let items = text
        .split(|c| c == ';' || c == '\n')
        .map(str::trim)
        .filter(|item| !item.is_empty());

    for item in items {
        let (_, (symbol, replacement)) =
            all_consuming(parse_rule)(item).map_err(|_| GrammarError::Malformed(item.to_string()))?;
        if rules.insert(symbol, replacement.to_string()).is_some() {
            return Err(GrammarError::DuplicateRule(symbol));
        }
    }
    Ok(rules)
}

fn parse_rule(input: &str) -> IResult<&str, (char, &str)> {
    separated_pair(
        satisfy(|c| !c.is_whitespace()),
        delimited(space0, alt((tag("->"), tag("="))), space0),
        take_while(|c: char| !c.is_whitespace()),
    )(input)
}

/// Vertices and segments produced by one turtle walk
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurtlePath {
    pub vertices: Vec<Point3<f32>>,
    pub segments: Vec<Segment>,
}

/// An axiom, one rule per symbol, and turtle settings
#[derive(Debug, Clone, PartialEq)]
pub struct LSystem {
    pub axiom: String,
    pub rules: BTreeMap<char, String>,
    /// Heading change for `+` and `-`, in degrees
    pub turn_degrees: f32,
    /// Distance advanced by `F`
    pub step: f32,
}

impl LSystem {
    pub fn new(axiom: impl Into<String>, rules: BTreeMap<char, String>) -> Self {
        Self {
            axiom: axiom.into(),
            rules,
            turn_degrees: 90.0,
            step: 1.0,
        }
    }

    /// Quadratic Koch island: `F-F-F-F` with `F -> F-F+F+FF-F-F+F`
    pub fn quadratic_koch_island() -> Self {
        let rules = BTreeMap::from([('F', "F-F+F+FF-F-F+F".to_string())]);
        Self::new("F-F-F-F", rules)
    }

    /// Rewrite the axiom `iterations` times (truncated, negative counts as 0).
    ///
    /// Symbols without a rule pass through unchanged. At most
    /// [`MAX_ITERATIONS`] rounds run, and rewriting ends early once a round
    /// leaves the string unchanged.
    pub fn derive(&self, iterations: f32) -> String {
        let mut rounds = iteration_count(iterations);
        if rounds > MAX_ITERATIONS {
            tracing::warn!(iterations, max = MAX_ITERATIONS, "too many L-system iterations, clamped");
            rounds = MAX_ITERATIONS;
        }

        let mut current = self.axiom.clone();
        for round in 0..rounds {
            if current.len() > MAX_DERIVED_LEN {
                tracing::warn!(round, len = current.len(), "L-system derivation too long, stopping");
                break;
            }
            let mut next = String::with_capacity(current.len() * 2);
            for symbol in current.chars() {
                match self.rules.get(&symbol) {
                    Some(replacement) => next.push_str(replacement),
                    None => next.push(symbol),
                }
            }
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    /// Walk a derived string in the XY plane.
    ///
    /// The turtle starts at the origin facing +Y (heading 0). `F` records the
    /// current position and steps forward; `+`/`-` turn by `turn_degrees`. The
    /// final pen position is recorded once at the end if anything was drawn.
    pub fn interpret(&self, derived: &str) -> TurtlePath {
        let mut position = Point3::origin();
        let mut heading = 0.0f32;
        let mut vertices = Vec::new();

        for symbol in derived.chars() {
            match symbol {
                'F' => {
                    vertices.push(position);
                    let (sin, cos) = heading.to_radians().sin_cos();
                    position.x += self.step * sin;
                    position.y += self.step * cos;
                }
                '+' => heading += self.turn_degrees,
                '-' => heading -= self.turn_degrees,
                _ => {}
            }
        }
        if !vertices.is_empty() {
            vertices.push(position);
        }

        let segments = polyline_segments(&vertices, false);
        TurtlePath { vertices, segments }
    }

    /// Derive and interpret in one go
    pub fn build(&self, iterations: f32) -> TurtlePath {
        self.interpret(&self.derive(iterations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doubling() -> LSystem {
        LSystem::new("F", BTreeMap::from([('F', "F+F".to_string())]))
    }

    #[test]
    fn test_iteration_count() {
        assert_eq!(iteration_count(2.9), 2);
        assert_eq!(iteration_count(0.5), 0);
        assert_eq!(iteration_count(-3.0), 0);
        assert_eq!(iteration_count(f32::NAN), 0);
    }

    #[test]
    fn test_derive() {
        let system = doubling();
        assert_eq!(system.derive(0.0), "F");
        assert_eq!(system.derive(1.0), "F+F");
        assert_eq!(system.derive(2.0), "F+F+F+F");
        assert_eq!(system.derive(1.7), "F+F");
    }

    #[test]
    fn test_fixed_point_grammar_terminates() {
        let system = LSystem::new("F", BTreeMap::from([('F', "F".to_string())]));
        assert_eq!(system.derive(f32::INFINITY), "F");
        assert_eq!(system.derive(5e7), "F");
    }

    #[test]
    fn test_cycling_grammar_is_capped() {
        let rules = parse_rules("A -> B; B -> A").unwrap();
        let system = LSystem::new("A", rules);
        assert_eq!(system.derive(3.0), "B");
        // MAX_ITERATIONS is even, so the cycle lands back on the axiom
        assert_eq!(system.derive(f32::INFINITY), "A");
        assert_eq!(system.derive(f32::INFINITY), system.derive(MAX_ITERATIONS as f32));
    }

    #[test]
    fn test_growth_is_capped() {
        let system = doubling();
        let derived = system.derive(f32::INFINITY);
        assert!(derived.len() > MAX_DERIVED_LEN);
        assert!(derived.len() <= 2 * MAX_DERIVED_LEN + 1);
    }

    #[test]
    fn test_symbols_without_rules_pass_through() {
        let system = LSystem::new("AXB", BTreeMap::from([('X', "YY".to_string())]));
        assert_eq!(system.derive(1.0), "AYYB");
    }

    #[test]
    fn test_turtle_quarter_turn() {
        let mut system = doubling();
        system.step = 1.0;
        system.turn_degrees = 90.0;

        let path = system.interpret("F+F");
        assert_eq!(path.vertices.len(), 3);
        assert_eq!(path.segments.len(), 2);

        let expected = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        for (v, e) in path.vertices.iter().zip(expected) {
            assert!((v - e).norm() < 1e-5, "{v} != {e}");
        }

        let d0 = path.segments[0].b - path.segments[0].a;
        let d1 = path.segments[1].b - path.segments[1].a;
        assert!(d0.dot(&d1).abs() < 1e-5);
        // clockwise turn when viewed from +Z
        assert!(d0.cross(&d1).z < 0.0);
    }

    #[test]
    fn test_turtle_ignores_unknown_symbols() {
        let path = doubling().interpret("XY[]");
        assert!(path.vertices.is_empty());
        assert!(path.segments.is_empty());
    }

    #[test]
    fn test_koch_island_closes() {
        let system = LSystem::quadratic_koch_island();
        let path = system.build(1.0);
        // 4 * 8 forward moves plus the final pen position
        assert_eq!(path.vertices.len(), 33);
        let first = path.vertices[0];
        let last = path.vertices[path.vertices.len() - 1];
        assert!((first - last).norm() < 1e-3);
    }

    #[test]
    fn test_parse_rules() {
        let rules = parse_rules("F -> F+F; X=FX\n  Y ->  -Y \n").unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[&'F'], "F+F");
        assert_eq!(rules[&'X'], "FX");
        assert_eq!(rules[&'Y'], "-Y");
    }

    #[test]
    fn test_parse_rules_empty_replacement() {
        let rules = parse_rules("A ->").unwrap();
        assert_eq!(rules[&'A'], "");
    }

    #[test]
    fn test_parse_rules_errors() {
        assert_eq!(
            parse_rules("F F+F"),
            Err(GrammarError::Malformed("F F+F".to_string()))
        );
        assert_eq!(
            parse_rules("F -> F+F; F -> F"),
            Err(GrammarError::DuplicateRule('F'))
        );
        assert!(parse_rules("FF -> F").is_err());
    }
}
