pub mod di;
pub mod html;
pub(crate) mod http;
pub(crate) mod json;
pub mod net;
pub mod repositories;
