pub mod activity;
pub mod conversion;
pub mod definition;
pub mod store;

pub use activity::*;
pub use conversion::*;
pub use definition::*;
pub use store::*;
