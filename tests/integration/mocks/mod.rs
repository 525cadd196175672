mod clients;

pub use clients::*;
pub use models::*;
