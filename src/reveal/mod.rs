pub mod scanner;
pub mod unit;
pub mod controller;
pub mod session;
pub mod transform;
pub mod tree;
pub mod live;

pub use scanner::*;
pub use unit::*;
pub use controller::*;
pub use session::*;
pub use transform::*;
pub use tree::*;
pub use live::*;
