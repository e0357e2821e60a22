//! Generic step collection.

/// A trait for a type that can collect the steps taken by an algorithm, such as the rewrite
/// steps applied during simplification.
pub trait StepCollector<T> {
    /// Collects one step.
    fn push(&mut self, step: T);
}

/// The unit collector throws all steps away. Use it when only the final result matters.
impl<T> StepCollector<T> for () {
    fn push(&mut self, _: T) {}
}

impl<T> StepCollector<T> for Vec<T> {
    fn push(&mut self, step: T) {
        self.push(step);
    }
}
