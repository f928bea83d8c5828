pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryPostStore;
pub use postgres::PgPostStore;
pub use store::{PostDraft, PostRecord, PostStore, TitleDirection};
