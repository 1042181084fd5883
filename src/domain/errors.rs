#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    RowOutOfRange { index: usize, len: usize },
    ColumnOutOfRange { index: usize, len: usize },
    LastRow,
    InvalidColumnCount,
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::RowOutOfRange { index, len } => {
                write!(f, "Row {} does not exist ({} rows)", index + 1, len)
            }
            GridError::ColumnOutOfRange { index, len } => {
                write!(f, "Column {} does not exist ({} columns)", index + 1, len)
            }
            GridError::LastRow => {
                write!(f, "Cannot remove the last remaining row")
            }
            GridError::InvalidColumnCount => {
                write!(f, "Column count must be at least 1")
            }
        }
    }
}

impl std::error::Error for GridError {}

pub type GridResult<T> = Result<T, GridError>;
