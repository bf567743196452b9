//! Structured array values with construction-time validation.
//!
//! An array value of dimension `n >= 1` is a sequence of elements (for
//! `n == 1`) or of sub-arrays of dimension `n - 1` (for `n > 1`). Entries
//! of a multi-dimensional array may be null; element entries may be null
//! only when the element type admits null. Shape and element types are
//! checked when the value is built, so a constructed array always matches
//! its descriptor.

use std::fmt;

use thiserror::Error;

use crate::types::{TypeDesc, Value};

/// Errors from array construction and indexed access.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArrayError {
    /// Arrays must have at least one dimension.
    #[error("array dimension must be at least 1")]
    ZeroDimension,

    /// An element did not fit the element type.
    #[error("element at index {index} is not a valid {expected}")]
    ElementTypeMismatch { index: usize, expected: String },

    /// A nested entry was not a sub-array of the expected shape.
    #[error("entry at index {index} is not a {dims}-dimensional array of {expected}")]
    DimensionMismatch {
        index: usize,
        dims: usize,
        expected: String,
    },

    /// Indexed access used the wrong number of indices.
    #[error("expected {expected} indices, got {given}")]
    WrongIndexCount { expected: usize, given: usize },

    /// Sub-array access used an index count outside `1..=dims-1`.
    #[error("sub-array access takes between 1 and {max} indices, got {given}")]
    WrongSubArrayIndexCount { max: usize, given: usize },

    /// An index was out of bounds at some nesting level.
    #[error("index {index} out of range at depth {depth} (length {len})")]
    IndexOutOfRange {
        index: usize,
        depth: usize,
        len: usize,
    },

    /// A traversal hit a null sub-array.
    #[error("sub-array at index {index} is null")]
    NullSubArray { index: usize },
}

/// A validated array value.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    elem: TypeDesc,
    dims: usize,
    items: Vec<Value>,
}

impl ArrayValue {
    /// Build an array value, validating shape and element types.
    ///
    /// For `dims == 1` every item must be a valid element value (null only
    /// if the element type admits it); for `dims > 1` every item must be
    /// null or an array of dimension `dims - 1` whose element type is a
    /// subtype of `elem`.
    pub fn new(elem: TypeDesc, dims: usize, items: Vec<Value>) -> Result<Self, ArrayError> {
        if dims == 0 {
            return Err(ArrayError::ZeroDimension);
        }

        for (index, item) in items.iter().enumerate() {
            if dims == 1 {
                if !elem.is_valid_value(item) {
                    return Err(ArrayError::ElementTypeMismatch {
                        index,
                        expected: elem.display_name(),
                    });
                }
            } else {
                match item {
                    Value::Null => {}
                    Value::Array(sub)
                        if sub.dims == dims - 1 && sub.elem.is_subtype_of(&elem) => {}
                    _ => {
                        return Err(ArrayError::DimensionMismatch {
                            index,
                            dims: dims - 1,
                            expected: elem.display_name(),
                        });
                    }
                }
            }
        }

        Ok(Self { elem, dims, items })
    }

    /// An empty array value.
    pub fn empty(elem: TypeDesc, dims: usize) -> Result<Self, ArrayError> {
        Self::new(elem, dims, Vec::new())
    }

    /// The element type descriptor.
    pub fn elem(&self) -> &TypeDesc {
        &self.elem
    }

    /// The dimension count.
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Entries at the outermost level.
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Number of entries at the outermost level.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Read the element at the fully indexed position.
    ///
    /// Exactly `dims` indices are required, each in bounds at its level.
    pub fn get(&self, indices: &[usize]) -> Result<&Value, ArrayError> {
        if indices.len() != self.dims {
            return Err(ArrayError::WrongIndexCount {
                expected: self.dims,
                given: indices.len(),
            });
        }

        let leaf = self.descend(&indices[..indices.len() - 1])?;
        let last = indices[indices.len() - 1];
        leaf.items.get(last).ok_or(ArrayError::IndexOutOfRange {
            index: last,
            depth: indices.len() - 1,
            len: leaf.items.len(),
        })
    }

    /// Replace the element at the fully indexed position.
    pub fn set(&mut self, value: Value, indices: &[usize]) -> Result<(), ArrayError> {
        if indices.len() != self.dims {
            return Err(ArrayError::WrongIndexCount {
                expected: self.dims,
                given: indices.len(),
            });
        }

        let elem = self.elem.clone();
        let leaf = self.descend_mut(&indices[..indices.len() - 1])?;
        if !elem.is_valid_value(&value) {
            let last = indices[indices.len() - 1];
            return Err(ArrayError::ElementTypeMismatch {
                index: last,
                expected: elem.display_name(),
            });
        }

        let last = indices[indices.len() - 1];
        let len = leaf.items.len();
        match leaf.items.get_mut(last) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(ArrayError::IndexOutOfRange {
                index: last,
                depth: indices.len() - 1,
                len,
            }),
        }
    }

    /// Borrow the sub-array at a partially indexed position.
    ///
    /// Takes between 1 and `dims - 1` indices.
    pub fn sub_array(&self, indices: &[usize]) -> Result<&ArrayValue, ArrayError> {
        self.check_sub_index_count(indices.len())?;
        self.descend(indices)
    }

    /// Replace the sub-array at a partially indexed position.
    ///
    /// The replacement must have dimension `dims - indices.len()` and an
    /// element type compatible with this array's.
    pub fn set_sub_array(
        &mut self,
        sub: ArrayValue,
        indices: &[usize],
    ) -> Result<(), ArrayError> {
        self.check_sub_index_count(indices.len())?;

        let expected_dims = self.dims - indices.len();
        if sub.dims != expected_dims || !sub.elem.is_subtype_of(&self.elem) {
            return Err(ArrayError::DimensionMismatch {
                index: indices[indices.len() - 1],
                dims: expected_dims,
                expected: self.elem.display_name(),
            });
        }

        let parent = self.descend_mut(&indices[..indices.len() - 1])?;
        let last = indices[indices.len() - 1];
        let len = parent.items.len();
        match parent.items.get_mut(last) {
            Some(slot) => {
                *slot = Value::Array(sub);
                Ok(())
            }
            None => Err(ArrayError::IndexOutOfRange {
                index: last,
                depth: indices.len() - 1,
                len,
            }),
        }
    }

    fn check_sub_index_count(&self, given: usize) -> Result<(), ArrayError> {
        let max = self.dims.saturating_sub(1);
        if given == 0 || given > max {
            return Err(ArrayError::WrongSubArrayIndexCount { max, given });
        }
        Ok(())
    }

    /// Walk down `indices.len()` levels, borrowing the array reached.
    fn descend(&self, indices: &[usize]) -> Result<&ArrayValue, ArrayError> {
        let mut current = self;
        for (depth, &index) in indices.iter().enumerate() {
            let item = current.items.get(index).ok_or(ArrayError::IndexOutOfRange {
                index,
                depth,
                len: current.items.len(),
            })?;
            current = match item {
                Value::Array(sub) => sub,
                Value::Null => return Err(ArrayError::NullSubArray { index }),
                // Ruled out at construction for dims > 1.
                _ => return Err(ArrayError::NullSubArray { index }),
            };
        }
        Ok(current)
    }

    fn descend_mut(&mut self, indices: &[usize]) -> Result<&mut ArrayValue, ArrayError> {
        let mut current = self;
        for (depth, &index) in indices.iter().enumerate() {
            let len = current.items.len();
            let item = current
                .items
                .get_mut(index)
                .ok_or(ArrayError::IndexOutOfRange { index, depth, len })?;
            current = match item {
                Value::Array(sub) => sub,
                _ => return Err(ArrayError::NullSubArray { index }),
            };
        }
        Ok(current)
    }
}

impl fmt::Display for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Primitive;
    use assert_matches::assert_matches;

    fn int_desc() -> TypeDesc {
        TypeDesc::Primitive(Primitive::Int)
    }

    fn ints(values: &[i32]) -> ArrayValue {
        ArrayValue::new(int_desc(), 1, values.iter().map(|&v| Value::Int(v)).collect())
            .unwrap()
    }

    #[test]
    fn test_one_dimensional() {
        let array = ints(&[1, 2, 3]);
        assert_eq!(array.dims(), 1);
        assert_eq!(array.len(), 3);
        assert_eq!(array.get(&[1]).unwrap(), &Value::Int(2));
    }

    #[test]
    fn test_element_type_checked() {
        let err = ArrayValue::new(int_desc(), 1, vec![Value::Int(1), Value::Bool(true)])
            .unwrap_err();
        assert_matches!(err, ArrayError::ElementTypeMismatch { index: 1, .. });
    }

    #[test]
    fn test_null_element_needs_nullable_type() {
        // Primitives do not admit null elements.
        let err = ArrayValue::new(int_desc(), 1, vec![Value::Null]).unwrap_err();
        assert_matches!(err, ArrayError::ElementTypeMismatch { .. });

        // Object types do.
        let strings =
            ArrayValue::new(TypeDesc::string(), 1, vec![Value::string("a"), Value::Null]);
        assert!(strings.is_ok());
    }

    #[test]
    fn test_two_dimensional() {
        let array = ArrayValue::new(
            int_desc(),
            2,
            vec![
                Value::Array(ints(&[1, 2])),
                Value::Null,
                Value::Array(ints(&[3])),
            ],
        )
        .unwrap();

        assert_eq!(array.get(&[0, 1]).unwrap(), &Value::Int(2));
        assert_eq!(array.get(&[2, 0]).unwrap(), &Value::Int(3));
        assert_matches!(array.get(&[1, 0]), Err(ArrayError::NullSubArray { index: 1 }));
    }

    #[test]
    fn test_wrong_nesting_rejected() {
        let err = ArrayValue::new(int_desc(), 2, vec![Value::Int(7)]).unwrap_err();
        assert_matches!(err, ArrayError::DimensionMismatch { index: 0, dims: 1, .. });
    }

    #[test]
    fn test_index_count_enforced() {
        let array = ints(&[1, 2]);
        assert_matches!(
            array.get(&[0, 0]),
            Err(ArrayError::WrongIndexCount {
                expected: 1,
                given: 2
            })
        );
        assert_matches!(
            array.get(&[]),
            Err(ArrayError::WrongIndexCount {
                expected: 1,
                given: 0
            })
        );
    }

    #[test]
    fn test_out_of_range() {
        let array = ints(&[1, 2]);
        assert_matches!(
            array.get(&[5]),
            Err(ArrayError::IndexOutOfRange {
                index: 5,
                depth: 0,
                len: 2
            })
        );
    }

    #[test]
    fn test_set() {
        let mut array = ints(&[1, 2]);
        array.set(Value::Int(9), &[0]).unwrap();
        assert_eq!(array.get(&[0]).unwrap(), &Value::Int(9));

        let err = array.set(Value::Bool(true), &[0]).unwrap_err();
        assert_matches!(err, ArrayError::ElementTypeMismatch { .. });
    }

    #[test]
    fn test_sub_array_access() {
        let mut array = ArrayValue::new(
            int_desc(),
            2,
            vec![Value::Array(ints(&[1, 2])), Value::Array(ints(&[3, 4]))],
        )
        .unwrap();

        assert_eq!(array.sub_array(&[1]).unwrap().items(), ints(&[3, 4]).items());

        array.set_sub_array(ints(&[8, 9]), &[0]).unwrap();
        assert_eq!(array.get(&[0, 1]).unwrap(), &Value::Int(9));

        // Index counts outside 1..=dims-1 are rejected.
        assert_matches!(
            array.sub_array(&[0, 0]),
            Err(ArrayError::WrongSubArrayIndexCount { max: 1, given: 2 })
        );

        // Replacement shape is validated.
        let flat = ArrayValue::empty(int_desc(), 1).unwrap();
        let mut cube = ArrayValue::empty(int_desc(), 3).unwrap();
        assert_matches!(
            cube.set_sub_array(flat, &[0]),
            Err(ArrayError::DimensionMismatch { .. })
        );
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert_matches!(
            ArrayValue::new(int_desc(), 0, vec![]),
            Err(ArrayError::ZeroDimension)
        );
    }

    #[test]
    fn test_display() {
        let array = ArrayValue::new(
            int_desc(),
            2,
            vec![Value::Array(ints(&[1, 2])), Value::Array(ints(&[3]))],
        )
        .unwrap();
        assert_eq!(array.to_string(), "{{1, 2}, {3}}");
    }
}
