pub mod console;
pub mod file;
pub mod index;

pub use console::ConsoleSink;
pub use file::FileSink;
pub use index::{IndexSink, LogIndex, MemoryIndex};

use crate::adapters::storage::LocalStorage;
use crate::domain::model::SinkKind;
use crate::domain::ports::{ConfigProvider, RecordSink};

/// 依設定建立輸出端
pub fn build_sink<C: ConfigProvider>(config: &C) -> Box<dyn RecordSink> {
    match config.sink() {
        SinkKind::Console => Box::new(ConsoleSink::stdout()),
        SinkKind::File => Box::new(FileSink::new(
            LocalStorage::new(config.output_path().to_string()),
            config.output_formats().to_vec(),
            config.compress(),
        )),
        SinkKind::Index => Box::new(IndexSink::new(LogIndex)),
    }
}
