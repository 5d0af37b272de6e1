use crate::utils::error::Result;

/// Raw contents of one module data resource.
#[derive(Debug, Clone)]
pub struct RawModuleFile {
    /// Where the data came from; used in error messages
    pub origin: String,
    pub contents: String,
}

/// 模組資料來源（檔案系統、記憶體等）
pub trait ModuleSource: Send + Sync {
    fn read_all(&self) -> Result<Vec<RawModuleFile>>;
}
