pub mod check;
pub mod error;
pub mod subtype;

pub use check::{typeof_term, Level};
pub use error::TypeError;
pub use subtype::{join, meet, subtype};
