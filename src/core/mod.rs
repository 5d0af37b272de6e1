pub mod stats;
pub mod store;

pub use crate::domain::model::{Coefficients, ModuleDefinition, StatQuery, StatResult};
pub use crate::domain::ports::{ModuleSource, RawModuleFile};
pub use crate::utils::error::Result;
pub use stats::{QualityPolicy, StatService};
pub use store::CoefficientStore;
