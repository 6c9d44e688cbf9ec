use serde_json::Value;
use crate::tensor::{ElementType, TensorData};

/// Marker for a value tree that is not a rectangular numeric array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NotRectangular;

/// Depth-first shape inference and element conversion over a JSON value tree.
///
/// The first path down the tree records one length per depth and, once it
/// reaches a number, the terminal depth. Every node visited afterwards must
/// agree: arrays at depth `d` must have length `shape[d]` and sit above the
/// terminal depth, numbers must sit exactly at it. Anything else rejects the
/// whole tree. Numbers are converted and appended as they are visited, so the
/// flat data comes out in row-major order.
pub(crate) struct ShapeWalker {
    shape: Vec<usize>,
    leaf_depth: Option<usize>,
    data: TensorData,
}

impl ShapeWalker {
    pub(crate) fn new(element_type: ElementType, capacity: usize) -> Self {
        Self {
            shape: Vec::new(),
            leaf_depth: None,
            data: TensorData::with_capacity(element_type, capacity),
        }
    }

    /// A walker whose outermost dimension is already fixed.
    ///
    /// Used for row ordered bodies, where the instances list plays the role of
    /// the outermost array and each instance's value is walked from depth 1.
    pub(crate) fn with_outer_dimension(element_type: ElementType, capacity: usize, outer: usize) -> Self {
        let mut walker = Self::new(element_type, capacity);
        walker.shape.push(outer);
        walker
    }

    pub(crate) fn walk(&mut self, node: &Value, depth: usize) -> Result<(), NotRectangular> {
        match node {
            Value::Array(items) => {
                if self.leaf_depth.is_some_and(|leaf| depth >= leaf) {
                    return Err(NotRectangular);
                }
                match self.shape.get(depth) {
                    Some(&len) if len != items.len() => return Err(NotRectangular),
                    Some(_) => {}
                    None if self.shape.len() == depth => self.shape.push(items.len()),
                    None => return Err(NotRectangular),
                }
                items.iter().try_for_each(|item| self.walk(item, depth + 1))
            }
            Value::Number(number) => {
                match self.leaf_depth {
                    Some(leaf) if leaf != depth => return Err(NotRectangular),
                    Some(_) => {}
                    None if self.shape.len() == depth => self.leaf_depth = Some(depth),
                    None => return Err(NotRectangular),
                }
                self.data.push_number(number);
                Ok(())
            }
            Value::Null | Value::Bool(_) | Value::String(_) | Value::Object(_) => Err(NotRectangular),
        }
    }

    /// Inferred shape and the converted row-major data
    pub(crate) fn finish(self) -> (Vec<usize>, TensorData) {
        (self.shape, self.data)
    }
}
