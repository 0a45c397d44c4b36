use tracing::{debug, warn};

use super::descriptor::{validate_partition, SectionDescriptor};

/// Resolves section ids to their start offsets
pub trait SectionLookup {
    fn section_start(&self, id: &str) -> Option<f64>;
}

/// Maps the virtual scroll offset to the active section id.
///
/// Sampling happens at most once per frame epoch; the active id only changes
/// when a section actually contains the probe, so it never flickers back to
/// "none" once resolved. Callers notify their own listeners from the
/// returned change, after releasing any borrow of the tracker.
#[derive(Debug)]
pub struct SectionTracker {
    activation_bias: f64,
    sections: Vec<SectionDescriptor>,
    active: Option<String>,
    last_epoch: Option<u64>,
}

impl SectionTracker {
    pub fn new(activation_bias: f64) -> Self {
        Self {
            activation_bias,
            sections: Vec::new(),
            active: None,
            last_epoch: None,
        }
    }

    pub fn activation_bias(&self) -> f64 {
        self.activation_bias
    }

    pub fn set_activation_bias(&mut self, bias: f64) {
        self.activation_bias = bias;
    }

    /// Replace the section layout. Sections are stable-sorted by start
    /// offset; gaps and overlaps are logged and resolved first-match-wins.
    pub fn set_sections(&mut self, mut sections: Vec<SectionDescriptor>) {
        sections.sort_by(|a, b| a.start_offset.total_cmp(&b.start_offset));
        for anomaly in validate_partition(&sections) {
            warn!(%anomaly, "Section range anomaly");
        }
        debug!(count = sections.len(), "Section layout updated");
        self.sections = sections;
    }

    pub fn sections(&self) -> &[SectionDescriptor] {
        &self.sections
    }

    pub fn current_section(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Sample the offset for frame `epoch`.
    ///
    /// Repeated calls within the same epoch are skipped. Returns the new id
    /// when the active section changed.
    pub fn on_scroll(&mut self, virtual_offset: f64, epoch: u64) -> Option<String> {
        if self.last_epoch == Some(epoch) {
            return None;
        }
        self.last_epoch = Some(epoch);
        self.resolve(virtual_offset)
    }

    /// Re-evaluate immediately, e.g. after a layout change
    pub fn refresh(&mut self, virtual_offset: f64) -> Option<String> {
        self.resolve(virtual_offset)
    }

    fn resolve(&mut self, virtual_offset: f64) -> Option<String> {
        let probe = virtual_offset + self.activation_bias;
        let found = self.sections.iter().find(|s| s.contains(probe))?;

        if self.active.as_deref() == Some(found.id.as_str()) {
            return None;
        }

        let id = found.id.clone();
        debug!(section = %id, probe, "Active section changed");
        self.active = Some(id.clone());
        Some(id)
    }
}

impl SectionLookup for SectionTracker {
    fn section_start(&self, id: &str) -> Option<f64> {
        self.sections
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.start_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Vec<SectionDescriptor> {
        vec![
            SectionDescriptor::new("A", 0.0, 500.0),
            SectionDescriptor::new("B", 500.0, 1200.0),
            SectionDescriptor::new("C", 1200.0, 2000.0),
        ]
    }

    #[test]
    fn test_probe_uses_activation_bias() {
        let mut tracker = SectionTracker::new(150.0);
        tracker.set_sections(abc());

        assert_eq!(tracker.on_scroll(300.0, 1).as_deref(), Some("A"));
        // 400 + 150 lands in B
        assert_eq!(tracker.on_scroll(400.0, 2).as_deref(), Some("B"));
        // 1060 + 150 = 1210 lands in C
        assert_eq!(tracker.on_scroll(1060.0, 3).as_deref(), Some("C"));
        // 1900 + 150 = 2050 is past every range; C is kept
        assert_eq!(tracker.on_scroll(1900.0, 4), None);
        assert_eq!(tracker.current_section(), Some("C"));
    }

    #[test]
    fn test_none_before_first_resolution() {
        let mut tracker = SectionTracker::new(150.0);
        tracker.set_sections(vec![SectionDescriptor::new("A", 1000.0, 2000.0)]);
        assert_eq!(tracker.on_scroll(0.0, 1), None);
        assert_eq!(tracker.current_section(), None);
    }

    #[test]
    fn test_samples_once_per_epoch() {
        let mut tracker = SectionTracker::new(0.0);
        tracker.set_sections(abc());
        assert_eq!(tracker.on_scroll(0.0, 7).as_deref(), Some("A"));
        assert_eq!(tracker.on_scroll(600.0, 7), None);
        assert_eq!(tracker.current_section(), Some("A"));
        assert_eq!(tracker.on_scroll(600.0, 8).as_deref(), Some("B"));
    }

    #[test]
    fn test_reports_only_changes() {
        let mut tracker = SectionTracker::new(0.0);
        tracker.set_sections(abc());

        let seen: Vec<String> = [0.0, 10.0, 20.0, 700.0, 800.0, 100.0]
            .into_iter()
            .enumerate()
            .filter_map(|(epoch, offset)| tracker.on_scroll(offset, epoch as u64))
            .collect();
        assert_eq!(seen, vec!["A", "B", "A"]);
    }

    #[test]
    fn test_overlap_first_match_wins() {
        let mut tracker = SectionTracker::new(0.0);
        tracker.set_sections(vec![
            SectionDescriptor::new("first", 0.0, 600.0),
            SectionDescriptor::new("second", 500.0, 1000.0),
        ]);
        assert_eq!(tracker.refresh(550.0).as_deref(), Some("first"));
    }

    #[test]
    fn test_sections_are_sorted() {
        let mut tracker = SectionTracker::new(0.0);
        let mut sections = abc();
        sections.reverse();
        tracker.set_sections(sections);
        let ids: Vec<_> = tracker.sections().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(tracker.section_start("C"), Some(1200.0));
        assert_eq!(tracker.section_start("D"), None);
    }

    #[test]
    fn test_refresh_ignores_epoch() {
        let mut tracker = SectionTracker::new(0.0);
        tracker.set_sections(abc());
        tracker.on_scroll(0.0, 1);
        assert_eq!(tracker.refresh(1300.0).as_deref(), Some("C"));
    }
}
