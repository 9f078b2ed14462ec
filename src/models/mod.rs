pub mod normalize;
pub mod record;

pub use normalize::*;
pub use record::*;
