use std::fmt;

use serde::{Deserialize, Serialize};

/// A named page region as a half-open range of scroll offsets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    pub id: String,
    pub start_offset: f64,
    pub end_offset: f64,
}

impl SectionDescriptor {
    pub fn new(id: impl Into<String>, start_offset: f64, end_offset: f64) -> Self {
        Self {
            id: id.into(),
            start_offset,
            end_offset,
        }
    }

    /// Build from an element's top edge and height in page coordinates
    pub fn from_geometry(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self::new(id, top, top + height)
    }

    /// Whether `offset` lies in `[start, end)`
    #[inline]
    pub fn contains(&self, offset: f64) -> bool {
        offset >= self.start_offset && offset < self.end_offset
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.end_offset - self.start_offset
    }
}

/// Geometry that breaks the "sorted partition" expectation
#[derive(Debug, Clone, PartialEq)]
pub enum RangeAnomaly {
    /// Nothing covers `[from, to)` between two sections
    Gap { after: String, before: String, from: f64, to: f64 },
    /// Two sections both cover `[from, to)`; the earlier one wins lookups
    Overlap { first: String, second: String, from: f64, to: f64 },
    /// Zero or negative height, never matches
    Empty { id: String },
    /// Non-finite bounds
    Invalid { id: String },
    /// Id used more than once; only the first is reachable by id
    DuplicateId { id: String },
}

impl fmt::Display for RangeAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeAnomaly::Gap { after, before, from, to } => {
                write!(f, "gap [{from}, {to}) between '{after}' and '{before}'")
            }
            RangeAnomaly::Overlap { first, second, from, to } => {
                write!(f, "'{first}' overlaps '{second}' on [{from}, {to})")
            }
            RangeAnomaly::Empty { id } => write!(f, "section '{id}' is empty"),
            RangeAnomaly::Invalid { id } => write!(f, "section '{id}' has non-finite bounds"),
            RangeAnomaly::DuplicateId { id } => write!(f, "section id '{id}' is duplicated"),
        }
    }
}

/// Check that `sections` (in lookup order) form a gap-free, non-overlapping
/// partition.
pub fn validate_partition(sections: &[SectionDescriptor]) -> Vec<RangeAnomaly> {
    let mut anomalies = Vec::new();

    for (i, section) in sections.iter().enumerate() {
        if sections[..i].iter().any(|s| s.id == section.id) {
            anomalies.push(RangeAnomaly::DuplicateId {
                id: section.id.clone(),
            });
        }
        if !section.start_offset.is_finite() || !section.end_offset.is_finite() {
            anomalies.push(RangeAnomaly::Invalid {
                id: section.id.clone(),
            });
        } else if section.height() <= 0.0 {
            anomalies.push(RangeAnomaly::Empty {
                id: section.id.clone(),
            });
        }
    }

    for pair in sections.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if a.end_offset < b.start_offset {
            anomalies.push(RangeAnomaly::Gap {
                after: a.id.clone(),
                before: b.id.clone(),
                from: a.end_offset,
                to: b.start_offset,
            });
        } else if a.end_offset > b.start_offset && b.height() > 0.0 {
            anomalies.push(RangeAnomaly::Overlap {
                first: a.id.clone(),
                second: b.id.clone(),
                from: b.start_offset,
                to: a.end_offset.min(b.end_offset),
            });
        }
    }

    anomalies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_geometry() {
        let s = SectionDescriptor::from_geometry("about", 500.0, 700.0);
        assert_eq!(s.start_offset, 500.0);
        assert_eq!(s.end_offset, 1200.0);
        assert!(s.contains(500.0));
        assert!(s.contains(1199.9));
        assert!(!s.contains(1200.0));
    }

    #[test]
    fn test_valid_partition() {
        let sections = vec![
            SectionDescriptor::new("a", 0.0, 500.0),
            SectionDescriptor::new("b", 500.0, 1200.0),
        ];
        assert!(validate_partition(&sections).is_empty());
    }

    #[test]
    fn test_detects_gap_and_overlap() {
        let sections = vec![
            SectionDescriptor::new("a", 0.0, 400.0),
            SectionDescriptor::new("b", 500.0, 1200.0),
            SectionDescriptor::new("c", 1100.0, 2000.0),
        ];
        let anomalies = validate_partition(&sections);
        assert_eq!(anomalies.len(), 2);
        assert!(matches!(
            &anomalies[0],
            RangeAnomaly::Gap { from, to, .. } if *from == 400.0 && *to == 500.0
        ));
        assert!(matches!(
            &anomalies[1],
            RangeAnomaly::Overlap { first, from, to, .. }
                if first == "b" && *from == 1100.0 && *to == 1200.0
        ));
    }

    #[test]
    fn test_detects_empty_and_duplicate() {
        let sections = vec![
            SectionDescriptor::new("a", 0.0, 0.0),
            SectionDescriptor::new("a", 0.0, 100.0),
        ];
        let anomalies = validate_partition(&sections);
        assert!(anomalies.contains(&RangeAnomaly::Empty { id: "a".into() }));
        assert!(anomalies.contains(&RangeAnomaly::DuplicateId { id: "a".into() }));
    }
}
