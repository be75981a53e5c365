use std::str::FromStr;

use rtsopen_core::spatial_hash::HashGrid;
use rtsopen_data::{VisibilityState, VisitedWorldDatum};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VisitArgError {
    #[error("expected x,y[,state], got {0:?}")]
    Shape(String),

    #[error("invalid coordinate {0:?}")]
    Coordinate(String),

    #[error("unknown visibility state {0:?} (visible, obscured, hidden)")]
    State(String),
}

/// A world position plus the state to record there, as typed on the command
/// line: `12.5,40` or `12.5,40,obscured`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisitArg {
    pub x: f64,
    pub y: f64,
    pub state: VisibilityState,
}

impl VisitArg {
    #[must_use]
    pub fn to_datum(self, grid: &HashGrid) -> VisitedWorldDatum {
        VisitedWorldDatum::new(grid.cell_index([self.x, self.y, 0.0]), self.state)
    }
}

fn parse_state(s: &str) -> Result<VisibilityState, VisitArgError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "visible" | "v" => Ok(VisibilityState::Visible),
        "obscured" | "o" => Ok(VisibilityState::Obscured),
        "hidden" | "notvisible" | "h" => Ok(VisibilityState::NotVisible),
        _ => Err(VisitArgError::State(s.to_string())),
    }
}

fn parse_coordinate(s: &str) -> Result<f64, VisitArgError> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| VisitArgError::Coordinate(s.to_string()))
}

impl FromStr for VisitArg {
    type Err = VisitArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        let (x, y, state) = match parts.as_slice() {
            [x, y] => (x, y, VisibilityState::Visible),
            [x, y, state] => (x, y, parse_state(state)?),
            _ => return Err(VisitArgError::Shape(s.to_string())),
        };
        Ok(Self {
            x: parse_coordinate(x)?,
            y: parse_coordinate(y)?,
            state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtsopen_data::GridCell;

    #[test]
    fn test_parse_defaults_to_visible() {
        let arg: VisitArg = "3,4.5".parse().unwrap();
        assert_eq!(arg.state, VisibilityState::Visible);
        assert_eq!((arg.x, arg.y), (3.0, 4.5));
    }

    #[test]
    fn test_parse_state() {
        let arg: VisitArg = "0,0,Obscured".parse().unwrap();
        assert_eq!(arg.state, VisibilityState::Obscured);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("1".parse::<VisitArg>(), Err(VisitArgError::Shape(_))));
        assert!(matches!("a,1".parse::<VisitArg>(), Err(VisitArgError::Coordinate(_))));
        assert!(matches!("1,inf".parse::<VisitArg>(), Err(VisitArgError::Coordinate(_))));
        assert!(matches!("1,1,dim".parse::<VisitArg>(), Err(VisitArgError::State(_))));
    }

    #[test]
    fn test_to_datum_uses_grid() {
        let grid = HashGrid::new(10.0).unwrap();
        let datum = "25,-1".parse::<VisitArg>().unwrap().to_datum(&grid);
        assert_eq!(datum.cell, GridCell::new(2, -1, 0));
    }
}
