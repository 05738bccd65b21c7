pub mod ext;
pub mod request;
pub mod response;
