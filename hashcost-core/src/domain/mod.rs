//! Domain types for hashcost

pub mod observation;
pub mod range;
pub mod record;

pub use observation::Observation;
pub use range::IndexRange;
pub use record::DailyRecord;
