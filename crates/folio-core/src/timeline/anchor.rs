use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Which edge of the element is compared against the viewport line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementEdge {
    #[default]
    Top,
    Center,
    Bottom,
}

impl ElementEdge {
    fn factor(self) -> f64 {
        match self {
            ElementEdge::Top => 0.0,
            ElementEdge::Center => 0.5,
            ElementEdge::Bottom => 1.0,
        }
    }
}

/// Visibility threshold written as `"<edge> <percent>%"`, e.g. `"top 70%"`:
/// satisfied once the element's top edge has crossed 70% of the way down
/// the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportAnchor {
    pub edge: ElementEdge,
    /// Fraction of the viewport height, from the top
    pub fraction: f64,
}

impl Default for ViewportAnchor {
    fn default() -> Self {
        Self::top(0.8)
    }
}

impl ViewportAnchor {
    pub fn top(fraction: f64) -> Self {
        Self {
            edge: ElementEdge::Top,
            fraction,
        }
    }

    /// Whether the element has crossed this anchor line
    pub fn is_crossed(&self, intersection: &ViewportIntersection) -> bool {
        let edge = intersection.element_top + intersection.element_height * self.edge.factor();
        edge <= self.fraction * intersection.viewport_height
    }
}

impl FromStr for ViewportAnchor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidTween(format!("invalid viewport anchor '{}'", s));
        let mut parts = s.split_whitespace();
        let (edge, percent) = match (parts.next(), parts.next(), parts.next()) {
            (Some(edge), Some(percent), None) => (edge, percent),
            _ => return Err(invalid()),
        };

        let edge = match edge {
            "top" => ElementEdge::Top,
            "center" => ElementEdge::Center,
            "bottom" => ElementEdge::Bottom,
            _ => return Err(invalid()),
        };
        let percent: f64 = percent
            .strip_suffix('%')
            .and_then(|p| p.parse().ok())
            .filter(|p: &f64| p.is_finite())
            .ok_or_else(invalid)?;

        Ok(Self {
            edge,
            fraction: percent / 100.0,
        })
    }
}

impl fmt::Display for ViewportAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edge = match self.edge {
            ElementEdge::Top => "top",
            ElementEdge::Center => "center",
            ElementEdge::Bottom => "bottom",
        };
        write!(f, "{} {}%", edge, self.fraction * 100.0)
    }
}

/// Position of an element relative to the viewport, fed in by the adapter
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportIntersection {
    /// Distance from the viewport top to the element top (negative once scrolled past)
    pub element_top: f64,
    pub element_height: f64,
    pub viewport_height: f64,
}

impl ViewportIntersection {
    pub fn new(element_top: f64, viewport_height: f64) -> Self {
        Self {
            element_top,
            element_height: 0.0,
            viewport_height,
        }
    }

    pub fn with_height(mut self, element_height: f64) -> Self {
        self.element_height = element_height;
        self
    }

    /// Intersection of an element at page offset `element_offset` when the
    /// page is scrolled to `scroll_offset`
    pub fn from_scroll(
        element_offset: f64,
        element_height: f64,
        scroll_offset: f64,
        viewport_height: f64,
    ) -> Self {
        Self {
            element_top: element_offset - scroll_offset,
            element_height,
            viewport_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_anchor() {
        let anchor: ViewportAnchor = "top 70%".parse().unwrap();
        assert_eq!(anchor.edge, ElementEdge::Top);
        assert!((anchor.fraction - 0.7).abs() < 1e-9);

        let anchor: ViewportAnchor = "  bottom   100% ".parse().unwrap();
        assert_eq!(anchor.edge, ElementEdge::Bottom);
        assert!((anchor.fraction - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "top", "top 70", "left 50%", "top 70% extra", "top abc%"] {
            assert!(bad.parse::<ViewportAnchor>().is_err(), "{bad:?} parsed");
        }
    }

    #[test]
    fn test_display_round_trip() {
        let anchor: ViewportAnchor = "center 50%".parse().unwrap();
        assert_eq!(anchor.to_string(), "center 50%");
    }

    #[test]
    fn test_crossing() {
        let anchor = ViewportAnchor::top(0.7);
        assert!(!anchor.is_crossed(&ViewportIntersection::new(701.0, 1000.0)));
        assert!(anchor.is_crossed(&ViewportIntersection::new(700.0, 1000.0)));
        assert!(anchor.is_crossed(&ViewportIntersection::new(-50.0, 1000.0)));

        let bottom = ViewportAnchor {
            edge: ElementEdge::Bottom,
            fraction: 1.0,
        };
        let card = ViewportIntersection::new(800.0, 1000.0).with_height(300.0);
        assert!(!bottom.is_crossed(&card));
    }

    #[test]
    fn test_from_scroll() {
        let i = ViewportIntersection::from_scroll(1500.0, 200.0, 900.0, 800.0);
        assert_eq!(i.element_top, 600.0);
        assert_eq!(i.element_height, 200.0);
    }
}
