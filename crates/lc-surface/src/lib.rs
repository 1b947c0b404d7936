pub mod builder;
pub mod error;
pub mod surface;

pub use builder::{build_command, build_term, build_type, BuiltCommand};
pub use error::BuildError;
pub use surface::{Command, SurfaceTerm, SurfaceType};
