use serde_sheets_core::CellValue;

const ARRAY_SEGMENT: &str = "[]";

/// One row rebuilt as a tree keyed by column pointers
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RowNode {
    #[default]
    Null,
    Value(CellValue),
    /// Fields in column order
    Object(Vec<(String, RowNode)>),
    Array(Vec<RowNode>),
}

impl RowNode {
    pub fn is_null(&self) -> bool {
        matches!(self, RowNode::Null)
    }

    /// Place `value` at the path given by pointer segments
    ///
    /// An `[]` segment descends into the last element of a sequence, creating
    /// it when the sequence is empty, so every row yields at most one element.
    pub fn insert<S: AsRef<str>>(&mut self, segments: &[S], value: CellValue) {
        let Some((head, rest)) = segments.split_first() else {
            *self = RowNode::Value(value);
            return;
        };
        let head = head.as_ref();
        if head == ARRAY_SEGMENT {
            if !matches!(self, RowNode::Array(_)) {
                *self = RowNode::Array(Vec::new());
            }
            if let RowNode::Array(items) = self {
                if items.is_empty() {
                    items.push(RowNode::Null);
                }
                if let Some(last) = items.last_mut() {
                    last.insert(rest, value);
                }
            }
        } else {
            if !matches!(self, RowNode::Object(_)) {
                *self = RowNode::Object(Vec::new());
            }
            if let RowNode::Object(fields) = self {
                let index = match fields.iter().position(|(name, _)| name == head) {
                    Some(index) => index,
                    None => {
                        fields.push((head.to_string(), RowNode::Null));
                        fields.len() - 1
                    }
                };
                fields[index].1.insert(rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_builds_tree() {
        let mut node = RowNode::Null;
        node.insert(&["a"], CellValue::Number(1.0));
        node.insert(&["inner", "b"], CellValue::Number(2.0));
        node.insert(&["tags", "[]"], CellValue::string("x"));
        node.insert(&["items", "[]", "b"], CellValue::Number(3.0));
        node.insert(&["items", "[]", "c"], CellValue::string("y"));

        assert_eq!(
            node,
            RowNode::Object(vec![
                ("a".into(), RowNode::Value(CellValue::Number(1.0))),
                (
                    "inner".into(),
                    RowNode::Object(vec![("b".into(), RowNode::Value(CellValue::Number(2.0)))])
                ),
                (
                    "tags".into(),
                    RowNode::Array(vec![RowNode::Value(CellValue::string("x"))])
                ),
                (
                    "items".into(),
                    RowNode::Array(vec![RowNode::Object(vec![
                        ("b".into(), RowNode::Value(CellValue::Number(3.0))),
                        ("c".into(), RowNode::Value(CellValue::string("y"))),
                    ])])
                ),
            ])
        );
    }
}
