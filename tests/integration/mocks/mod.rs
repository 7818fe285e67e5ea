mod clients;
mod models;

pub use clients::*;
pub use inspectors::*;
pub use models::*;
