pub use detail::*;
pub use info::*;
pub use payloads::*;
pub use types::*;

mod detail;
mod info;
mod payloads;
mod types;
pub mod waas;
