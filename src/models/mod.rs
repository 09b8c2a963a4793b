pub mod bar;
pub mod quote;
pub mod request;
pub mod response;

pub use bar::*;
pub use quote::*;
pub use request::*;
pub use response::*;
