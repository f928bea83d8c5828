pub mod auth;
pub mod blob;
pub mod id_codec;
