//! Positions of values being written
//!
//! The generator keeps a stack of frames mirroring the nesting of the value
//! being serialized. Each frame knows the row and column its next value lands
//! on: the root and arrays move down one row per element, objects resolve
//! their column from the schema by pointer.

use serde_sheets_core::CellAddress;

use crate::schema::{ColumnPointer, SpreadsheetSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Nothing written yet; the parent's column applies
    Unset,
    Resolved(u16),
    /// Last pointer matched no column
    Unmatched,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FrameKind {
    Root,
    Array,
    Object { name: Option<String>, slot: Slot },
}

#[derive(Debug, Clone)]
struct Frame {
    kind: FrameKind,
    index: i64,
    step: i64,
    /// Row of the parent when the frame was opened
    base_row: i64,
    /// Column of the parent when the frame was opened
    base_column: Option<u16>,
    /// Pointer of the frame itself; objects append the current name
    pointer: ColumnPointer,
}

impl Frame {
    fn is_step_aware(&self) -> bool {
        matches!(self.kind, FrameKind::Root | FrameKind::Array)
    }

    fn row(&self) -> i64 {
        match self.kind {
            FrameKind::Root | FrameKind::Array => self.base_row + self.index,
            FrameKind::Object { .. } => self.base_row,
        }
    }

    fn column(&self) -> Option<u16> {
        match &self.kind {
            FrameKind::Root => {
                let col = i64::from(self.base_column.unwrap_or(0)) + self.index.max(0);
                u16::try_from(col).ok()
            }
            FrameKind::Array => self.base_column,
            FrameKind::Object { slot, .. } => match slot {
                Slot::Unset => self.base_column,
                Slot::Resolved(col) => Some(*col),
                Slot::Unmatched => None,
            },
        }
    }

    fn current_pointer(&self) -> ColumnPointer {
        match &self.kind {
            FrameKind::Object {
                name: Some(name), ..
            } => self.pointer.resolve(name),
            _ => self.pointer.clone(),
        }
    }
}

/// Stack of write positions
#[derive(Debug, Clone)]
pub struct SheetStreamContext {
    frames: Vec<Frame>,
}

impl SheetStreamContext {
    /// Context whose first value lands on the schema's data row
    pub fn new_root(schema: &SpreadsheetSchema) -> Self {
        Self {
            frames: vec![Frame {
                kind: FrameKind::Root,
                index: -1,
                step: 1,
                base_row: i64::from(schema.data_row()),
                base_column: Some(schema.origin_column()),
                pointer: ColumnPointer::empty(),
            }],
        }
    }

    fn top(&self) -> &Frame {
        // The root frame is never popped
        &self.frames[self.frames.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// Nesting depth; 1 for the bare root
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn in_root(&self) -> bool {
        self.frames.len() == 1
    }

    pub fn push_array(&mut self) {
        let parent = self.top();
        let pointer = if matches!(parent.kind, FrameKind::Root) {
            parent.pointer.clone()
        } else {
            parent.current_pointer().resolve_array()
        };
        let frame = Frame {
            kind: FrameKind::Array,
            index: -1,
            step: 1,
            base_row: parent.row(),
            base_column: parent.column(),
            pointer,
        };
        self.frames.push(frame);
    }

    pub fn push_object(&mut self) {
        let parent = self.top();
        let frame = Frame {
            kind: FrameKind::Object {
                name: None,
                slot: Slot::Unset,
            },
            index: -1,
            step: 1,
            base_row: parent.row(),
            base_column: parent.column(),
            pointer: parent.current_pointer(),
        };
        self.frames.push(frame);
    }

    /// Set the field name of the innermost object
    pub fn set_current_name(&mut self, field: &str) {
        if let FrameKind::Object { name, .. } = &mut self.top_mut().kind {
            *name = Some(field.to_string());
        }
    }

    /// Close the innermost frame
    ///
    /// Closing an array pushes the rows it used onto the nearest enclosing
    /// array or root, so the next element starts below them.
    pub fn pop(&mut self) {
        if self.frames.len() <= 1 {
            return;
        }
        let Some(frame) = self.frames.pop() else {
            return;
        };
        if !matches!(frame.kind, FrameKind::Array) {
            return;
        }
        let row = frame.row();
        if let Some(ancestor) = self.frames.iter_mut().rev().find(|f| f.is_step_aware()) {
            let used = frame.step + row - ancestor.row();
            ancestor.step = ancestor.step.max(used).max(1);
        }
    }

    /// Advance to the next value position
    pub fn write_value(&mut self, schema: &SpreadsheetSchema) {
        let frame = self.top_mut();
        match &mut frame.kind {
            FrameKind::Root | FrameKind::Array => {
                frame.index += frame.step;
                frame.step = 1;
            }
            FrameKind::Object { name, slot } => {
                let pointer = match name {
                    Some(name) => frame.pointer.resolve(name),
                    None => frame.pointer.clone(),
                };
                *slot = match schema.column_index_of(&pointer) {
                    Some(col) => Slot::Resolved(col),
                    None => Slot::Unmatched,
                };
            }
        }
    }

    /// Pointer of the value at the current position
    pub fn current_pointer(&self) -> ColumnPointer {
        self.top().current_pointer()
    }

    /// Cell of the current position, `None` when it maps to no column
    pub fn current_reference(&self) -> Option<CellAddress> {
        let frame = self.top();
        let row = u32::try_from(frame.row()).ok()?;
        let col = frame.column()?;
        Some(CellAddress::new(row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ColumnOptions, ColumnType};
    use crate::styles::StylesBuilder;
    use pretty_assertions::assert_eq;

    fn schema(paths: &[&str], origin: CellAddress) -> SpreadsheetSchema {
        let columns = paths
            .iter()
            .map(|p| {
                let pointer = ColumnPointer::parse(p);
                let array = pointer.name() == "[]";
                Column::new(pointer, ColumnOptions::default(), ColumnType::Any, array)
            })
            .collect();
        SpreadsheetSchema::new(columns, StylesBuilder::new(), origin)
    }

    fn field(ctx: &mut SheetStreamContext, schema: &SpreadsheetSchema, name: &str) -> Option<String> {
        ctx.set_current_name(name);
        ctx.write_value(schema);
        ctx.current_reference().map(|r| r.to_string())
    }

    #[test]
    fn test_single_record() {
        let schema = schema(&["a", "inner/b"], CellAddress::new(1, 1));
        let mut ctx = SheetStreamContext::new_root(&schema);
        ctx.write_value(&schema);
        ctx.push_object();
        assert_eq!(field(&mut ctx, &schema, "a"), Some("B3".to_string()));
        ctx.set_current_name("inner");
        ctx.write_value(&schema);
        ctx.push_object();
        assert_eq!(ctx.current_pointer().to_string(), "inner");
        assert_eq!(field(&mut ctx, &schema, "b"), Some("C3".to_string()));
        assert_eq!(field(&mut ctx, &schema, "missing"), None);
        ctx.pop();
        ctx.pop();
        assert!(ctx.in_root());
    }

    #[test]
    fn test_rows_with_nested_array() {
        let schema = schema(&["a", "tags/[]"], CellAddress::A1);
        let mut ctx = SheetStreamContext::new_root(&schema);
        ctx.write_value(&schema);
        ctx.push_array();

        // first record with three tags
        ctx.write_value(&schema);
        ctx.push_object();
        assert_eq!(field(&mut ctx, &schema, "a"), Some("A2".to_string()));
        ctx.set_current_name("tags");
        ctx.write_value(&schema);
        ctx.push_array();
        assert_eq!(ctx.current_pointer().to_string(), "tags/[]");
        let mut cells = Vec::new();
        for _ in 0..3 {
            ctx.write_value(&schema);
            cells.push(ctx.current_reference().unwrap().to_string());
        }
        assert_eq!(cells, vec!["B2", "B3", "B4"]);
        ctx.pop();
        ctx.pop();

        // second record starts below the tags
        ctx.write_value(&schema);
        ctx.push_object();
        assert_eq!(field(&mut ctx, &schema, "a"), Some("A5".to_string()));
        ctx.pop();
    }

    #[test]
    fn test_empty_array_keeps_step() {
        let schema = schema(&["a", "tags/[]"], CellAddress::A1);
        let mut ctx = SheetStreamContext::new_root(&schema);
        ctx.write_value(&schema);
        ctx.push_array();
        for expected in ["A2", "A3"] {
            ctx.write_value(&schema);
            ctx.push_object();
            assert_eq!(field(&mut ctx, &schema, "a"), Some(expected.to_string()));
            ctx.set_current_name("tags");
            ctx.write_value(&schema);
            ctx.push_array();
            ctx.pop();
            ctx.pop();
        }
    }

    #[test]
    fn test_array_of_objects() {
        let schema = schema(&["items/[]/b", "items/[]/c"], CellAddress::A1);
        let mut ctx = SheetStreamContext::new_root(&schema);
        ctx.write_value(&schema);
        ctx.push_object();
        ctx.set_current_name("items");
        ctx.write_value(&schema);
        assert_eq!(ctx.current_reference(), None);
        ctx.push_array();
        let mut cells = Vec::new();
        for _ in 0..2 {
            ctx.write_value(&schema);
            ctx.push_object();
            cells.push(field(&mut ctx, &schema, "b").unwrap());
            cells.push(field(&mut ctx, &schema, "c").unwrap());
            ctx.pop();
        }
        assert_eq!(cells, vec!["A2", "B2", "A3", "B3"]);
    }
}
