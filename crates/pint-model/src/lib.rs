pub mod check;
pub mod context;
pub mod error;
pub mod exception;
pub mod lookup;
pub mod population;
pub mod record;

pub use check::{CheckConfig, ComparisonOp, RuleKind};
pub use context::{DataContext, DatasetScope};
pub use error::{ModelError, Result};
pub use exception::{Exception, Severity};
pub use lookup::CaseInsensitiveSet;
pub use population::{ColumnPopulation, PopulationStats};
pub use record::Record;
