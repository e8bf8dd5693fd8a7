pub mod notion;
pub mod props;
pub mod records;

pub use notion::NotionStore;
pub use records::{RecordStore, StoredRecord};
