mod ais;
mod vessels;

pub use ais::*;
pub use vessels::*;
