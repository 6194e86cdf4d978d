//! Fixed-capacity batching of serialized records.

/// An ordered group of serialized records, immutable once emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Zero-based position of this batch in the output stream
    pub sequence: usize,
    pub records: Vec<String>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Joins the records with `\n` (no trailing newline).
    pub fn into_payload(self) -> String {
        self.records.join("\n")
    }
}

/// Accumulates records and emits a batch every `capacity` records.
///
/// Boundaries depend only on arrival order and capacity, so the same input
/// always partitions the same way.
#[derive(Debug)]
pub struct Batcher {
    capacity: usize,
    buffer: Vec<String>,
    next_sequence: usize,
}

impl Batcher {
    /// `capacity` must be non-zero; `PipelineConfig::validate` guarantees it.
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "batch capacity must be non-zero");
        Self {
            capacity,
            buffer: Vec::with_capacity(capacity),
            next_sequence: 0,
        }
    }

    /// Adds a record; returns the full batch once `capacity` is reached.
    pub fn append(&mut self, record: String) -> Option<Batch> {
        self.buffer.push(record);
        if self.buffer.len() >= self.capacity {
            let records = std::mem::replace(&mut self.buffer, Vec::with_capacity(self.capacity));
            return Some(self.emit(records));
        }
        None
    }

    /// Returns the remaining records as a final, possibly undersized batch.
    pub fn flush(&mut self) -> Option<Batch> {
        if self.buffer.is_empty() {
            return None;
        }
        let records = std::mem::take(&mut self.buffer);
        Some(self.emit(records))
    }

    /// Number of records waiting for the next batch.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    fn emit(&mut self, records: Vec<String>) -> Batch {
        let batch = Batch {
            sequence: self.next_sequence,
            records,
        };
        self.next_sequence += 1;
        batch
    }
}
