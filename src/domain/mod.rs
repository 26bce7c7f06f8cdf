mod budget;
mod category;
mod expense;
mod money;
mod month;

pub use budget::*;
pub use category::*;
pub use expense::*;
pub use money::*;
pub use month::*;
