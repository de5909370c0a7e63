//! Composite oscillator — the pointwise sum of several oscillators.
//!
//! Purely visual: it shares its children with the scope state and never
//! starts or stops them.

use std::rc::Rc;

use super::oscillator::{Sampleable, SineOscillator};

#[derive(Debug, Clone, Default)]
pub struct CompositeOscillator {
    children: Vec<Rc<SineOscillator>>,
}

impl CompositeOscillator {
    pub fn new(children: Vec<Rc<SineOscillator>>) -> Self {
        CompositeOscillator { children }
    }

    pub fn from_slice(children: &[Rc<SineOscillator>]) -> Self {
        Self::new(children.to_vec())
    }

    pub fn children(&self) -> &[Rc<SineOscillator>] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Sampleable for CompositeOscillator {
    fn value(&self, t: f64) -> f64 {
        self.children.iter().map(|c| c.value(t)).sum()
    }
}
