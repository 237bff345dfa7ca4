use crate::fd::propagate::{PResult, Propagate, StateView};
use crate::fd::state::VarId;

/// `array[index] = value` for a constant array; `index` is 1-based.
#[derive(Debug)]
pub struct Element {
    array: Vec<isize>,
    index: VarId,
    value: VarId,
}

impl Element {
    pub fn new(array: Vec<isize>, index: VarId, value: VarId) -> Element {
        Element {
            array,
            index,
            value,
        }
    }
}

impl Propagate for Element {
    fn name(&self) -> &'static str {
        "element"
    }

    fn variables(&self) -> Vec<VarId> {
        vec![self.index, self.value]
    }

    fn propagate(&self, view: &mut StateView<'_>) -> PResult {
        // Index stays within the array.
        view.remove_below(self.index, 1)?;
        view.remove_above(self.index, self.array.len() as isize)?;

        let array = &self.array;
        let image = view
            .domain(self.index)
            .mapped(|i| Some(array[(i - 1) as usize]));
        view.tighten(self.value, &image)?;

        let values = view.domain(self.value).clone();
        let image = view.domain(self.index).mapped(|i| {
            if values.has(array[(i - 1) as usize]) {
                Some(i)
            } else {
                None
            }
        });
        view.tighten(self.index, &image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fd::domain::Domain;
    use crate::fd::propagator::harness::fixpoint1;

    #[test]
    fn test_element_forward() {
        // array = [3, 1, 4, 1]; index ∈ {1..4} → value ∈ {1, 3, 4}
        let domains = vec![Domain::full(9), Domain::full(9)];
        let out = fixpoint1(Element::new(vec![3, 1, 4, 1], 0, 1), domains).unwrap();
        assert_eq!(out[0].values(), vec![1, 2, 3, 4]);
        assert_eq!(out[1].values(), vec![1, 3, 4]);
    }

    #[test]
    fn test_element_backward() {
        // Forcing value = 1 keeps only indices 2 and 4.
        let domains = vec![Domain::full(9), Domain::singleton(9, 1).unwrap()];
        let out = fixpoint1(Element::new(vec![3, 1, 4, 1], 0, 1), domains).unwrap();
        assert_eq!(out[0].values(), vec![2, 4]);
    }

    #[test]
    fn test_element_assigned_index() {
        let domains = vec![Domain::singleton(9, 3).unwrap(), Domain::full(9)];
        let out = fixpoint1(Element::new(vec![3, 1, 4, 1], 0, 1), domains).unwrap();
        assert_eq!(out[1].singleton_value(), Some(4));
    }
}
