use core::cell::Cell;

/// Seed shared by all randomized tests, so failures reproduce.
pub(crate) const RNG_SEED: u64 = 0x5432_1012_3454_3210;

/// Counts how many [`Droppable`]s created through it have been dropped.
#[derive(Debug, Default)]
pub(crate) struct DropCounter {
    count: Cell<usize>,
}

impl DropCounter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn dropped(&self) -> usize {
        self.count.get()
    }

    pub(crate) fn track(&self, value: usize) -> Droppable<'_> {
        Droppable {
            value,
            counter: self,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Droppable<'a> {
    pub(crate) value: usize,
    counter: &'a DropCounter,
}

impl Drop for Droppable<'_> {
    fn drop(&mut self) {
        let count = self.counter.count.get();
        self.counter.count.set(count + 1);
    }
}
