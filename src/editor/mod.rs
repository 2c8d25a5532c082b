mod attribution;
mod document;
mod feedback;
mod request_builder;
mod suggestion;

pub use attribution::*;
pub use document::*;
pub use feedback::*;
pub use request_builder::*;
pub use suggestion::*;
