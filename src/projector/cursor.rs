//! Forward-only cursor over a record stream

use crate::executor::{ExecutorError, ExecutorResult};
use crate::model::{DataColumn, Key, Record, PRIMARY_KEY_FIELD};
use crate::stream::RecordStream;
use crate::value::Value;

/// Declared row count when the engine cannot know it up front
pub const UNKNOWN_ROW_COUNT: i64 = -1;

static NIL: Value = Value::Nil;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    BeforeFirst,
    OnRow,
    AfterLast,
    Closed,
}

/// Single-pass tabular view of a record stream.
///
/// Columns are addressed by 0-based position in the projected column
/// list. A bin the record lacks reads as NULL; the `__key` column reads
/// the record's user key.
pub struct RecordCursor {
    stream: RecordStream,
    columns: Vec<DataColumn>,
    current: Option<Record>,
    position: Position,
}

impl RecordCursor {
    pub fn new(stream: RecordStream, columns: Vec<DataColumn>) -> Self {
        Self {
            stream,
            columns,
            current: None,
            position: Position::BeforeFirst,
        }
    }

    /// Advances to the next row; false at end of stream.
    ///
    /// A failure signalled by the store surfaces here, after every record
    /// buffered ahead of it.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> ExecutorResult<bool> {
        match self.position {
            Position::Closed => return Err(ExecutorError::Closed),
            Position::AfterLast => return Ok(false),
            _ => {}
        }
        match self.stream.next_record() {
            Ok(Some(record)) => {
                self.current = Some(record);
                self.position = Position::OnRow;
                Ok(true)
            }
            Ok(None) => {
                self.current = None;
                self.position = Position::AfterLast;
                Ok(false)
            }
            Err(err) => {
                self.current = None;
                self.position = Position::AfterLast;
                Err(err.into())
            }
        }
    }

    /// Value of the column at `index` in the current row
    pub fn get(&self, index: usize) -> ExecutorResult<&Value> {
        let record = self.current_record()?;
        let column = self
            .columns
            .get(index)
            .ok_or(ExecutorError::ColumnOutOfRange {
                index,
                count: self.columns.len(),
            })?;

        if column.name == PRIMARY_KEY_FIELD {
            return Ok(record.key.as_ref().map_or(&NIL, |k| &k.user_key));
        }
        Ok(record.bin(&column.name).unwrap_or(&NIL))
    }

    /// Value of the column with `label` (case-insensitive)
    pub fn get_by_label(&self, label: &str) -> ExecutorResult<&Value> {
        let index = self.find_column(label)?;
        self.get(index)
    }

    /// Position of the column with `label`
    pub fn find_column(&self, label: &str) -> ExecutorResult<usize> {
        self.columns
            .iter()
            .position(|c| c.label.eq_ignore_ascii_case(label))
            .ok_or_else(|| ExecutorError::UnknownColumn(label.to_string()))
    }

    /// Every column value of the current row, in column order
    pub fn row(&self) -> ExecutorResult<Vec<Value>> {
        (0..self.columns.len())
            .map(|i| self.get(i).cloned())
            .collect()
    }

    /// Projected columns
    pub fn columns(&self) -> &[DataColumn] {
        &self.columns
    }

    /// Store key of the current row, if the store returned one
    pub fn key(&self) -> ExecutorResult<Option<&Key>> {
        Ok(self.current_record()?.key.as_ref())
    }

    /// Raw record under the cursor
    pub fn current_record(&self) -> ExecutorResult<&Record> {
        match self.position {
            Position::Closed => Err(ExecutorError::Closed),
            _ => self.current.as_ref().ok_or(ExecutorError::NoCurrentRow),
        }
    }

    /// Releases the stream; a running scan stops on its next delivery
    pub fn close(&mut self) {
        if self.position != Position::Closed {
            self.stream.close();
            self.current = None;
            self.position = Position::Closed;
        }
    }

    pub fn is_closed(&self) -> bool {
        self.position == Position::Closed
    }
}

impl std::fmt::Debug for RecordCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordCursor")
            .field("columns", &self.columns.len())
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

/// Cursor plus the declared row count
#[derive(Debug)]
pub struct ExecutionResult {
    pub cursor: RecordCursor,
    /// `UNKNOWN_ROW_COUNT` unless the engine knows it exactly
    pub row_count: i64,
}

impl ExecutionResult {
    pub fn new(cursor: RecordCursor) -> Self {
        Self {
            cursor,
            row_count: UNKNOWN_ROW_COUNT,
        }
    }
}
