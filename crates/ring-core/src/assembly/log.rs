use crate::elements::{BuiltElement, ElementDescriptor};
use crate::numerics::stable_sum;

/// One undo unit: a single element, or a whole replayed cell.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub line: String,
    /// Trailing descriptors this entry owns.
    pub descriptor_count: usize,
}

/// Append/undo regime shared by the ring and the cell.
///
/// `lengths` and `entries` always have the same length; the descriptor
/// counts of all entries sum to `elements.len()`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementLog {
    elements: Vec<ElementDescriptor>,
    lengths: Vec<f64>,
    entries: Vec<LogEntry>,
}

/// What a `pop` took off the log.
#[derive(Debug, Clone, PartialEq)]
pub struct PoppedEntry {
    pub line: String,
    pub length: f64,
    pub descriptors: Vec<ElementDescriptor>,
}

impl ElementLog {
    pub fn push_element(&mut self, built: BuiltElement) {
        let line = built.summary.log_line();
        self.push_group(vec![built.descriptor], built.length_consumed, line);
    }

    /// Appends `descriptors` as one entry consuming `length`.
    pub fn push_group(&mut self, descriptors: Vec<ElementDescriptor>, length: f64, line: String) {
        self.entries.push(LogEntry {
            line,
            descriptor_count: descriptors.len(),
        });
        self.lengths.push(length);
        self.elements.extend(descriptors);
    }

    pub fn pop(&mut self) -> Option<PoppedEntry> {
        let entry = self.entries.pop()?;
        let length = self.lengths.pop().unwrap_or_default();
        let split_at = self.elements.len().saturating_sub(entry.descriptor_count);
        let descriptors = self.elements.split_off(split_at);

        Some(PoppedEntry {
            line: entry.line,
            length,
            descriptors,
        })
    }

    pub fn elements(&self) -> &[ElementDescriptor] {
        &self.elements
    }

    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn total_length(&self) -> f64 {
        stable_sum(&self.lengths)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn display_lines(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.line.as_str())
    }

    /// Newline-terminated display text, one line per entry.
    pub fn render_display(&self) -> String {
        self.display_lines().fold(String::new(), |mut text, line| {
            text.push_str(line);
            text.push('\n');
            text
        })
    }
}
