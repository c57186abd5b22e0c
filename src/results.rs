mod normalize;
mod result_set;
mod row;

pub use normalize::{NormalizedResult, ResultFields, normalize, normalize_with};
pub use result_set::RawResult;
pub use row::CustomDbRow;
