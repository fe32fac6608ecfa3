mod appointment;
mod broker;
mod client;
mod link;
mod notification;
mod quote;
mod sale;
mod vocab;

pub use appointment::*;
pub use broker::*;
pub use client::*;
pub use link::*;
pub use notification::*;
pub use quote::*;
pub use sale::*;
pub use vocab::*;
