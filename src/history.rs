use std::collections::VecDeque;

/// Bounded log of the values a counter has held, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct History {
    limit: usize,
    values: VecDeque<i64>,
}

impl History {
    pub(crate) fn new(limit: usize, initial: i64) -> Self {
        let mut history = Self {
            limit,
            values: VecDeque::with_capacity(limit.min(64)),
        };
        history.record(initial);
        history
    }

    pub(crate) fn record(&mut self, value: i64) {
        if self.limit == 0 {
            return;
        }
        if self.values.len() == self.limit {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Drop everything and start over from `initial`.
    pub(crate) fn restart(&mut self, initial: i64) {
        self.values.clear();
        self.record(initial);
    }

    pub(crate) fn to_vec(&self) -> Vec<i64> {
        self.values.iter().copied().collect()
    }
}
