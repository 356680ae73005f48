pub mod preprocessing;
pub mod extraction;
pub mod ordering;

pub use preprocessing::*;
pub use extraction::*;
pub use ordering::*;
