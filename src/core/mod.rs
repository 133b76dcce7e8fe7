pub mod etl;
pub mod html_table;
pub mod inference;
pub mod json;
pub mod pipeline;

pub use crate::domain::model::{CellValue, Column, ColumnKind, SourceEndpoint, TabularDataset};
pub use crate::domain::ports::{ConfigProvider, PageFetcher, Pipeline, Storage};
pub use crate::utils::error::Result;
