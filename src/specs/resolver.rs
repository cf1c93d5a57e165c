// src/specs/resolver.rs
//
// Ordered fallback strategies: try each in turn, first `Some` wins.
// Each step is named so the log can say which one matched.

pub struct Chain<'r, I, T> {
    steps: Vec<(&'static str, Box<dyn Fn(I) -> Option<T> + 'r>)>,
}

impl<'r, I: Copy, T> Chain<'r, I, T> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn then<F>(mut self, name: &'static str, f: F) -> Self
    where
        F: Fn(I) -> Option<T> + 'r,
    {
        self.steps.push((name, Box::new(f)));
        self
    }

    pub fn resolve(&self, input: I) -> Option<T> {
        self.resolve_named(input).map(|(_, v)| v)
    }

    /// Value plus the name of the step that produced it.
    pub fn resolve_named(&self, input: I) -> Option<(&'static str, T)> {
        self.steps.iter().find_map(|(name, f)| f(input).map(|v| (*name, v)))
    }

    pub fn len(&self) -> usize { self.steps.len() }
    pub fn is_empty(&self) -> bool { self.steps.is_empty() }
}

impl<'r, I: Copy, T> Default for Chain<'r, I, T> {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_success_wins_in_order() {
        let chain = Chain::new()
            .then("never", |_: i32| None::<i32>)
            .then("double", |x| Some(x * 2))
            .then("triple", |x| Some(x * 3));
        assert_eq!(chain.resolve_named(4), Some(("double", 8)));
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn empty_chain_resolves_nothing() {
        let chain: Chain<'_, i32, i32> = Chain::default();
        assert!(chain.is_empty());
        assert_eq!(chain.resolve(1), None);
    }
}
