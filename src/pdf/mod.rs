pub mod builder;
pub mod decoration;
pub mod generator;
pub mod layout;

pub use builder::PdfBuilder;
pub use decoration::{FooterDecorator, PageDecorator};
pub use generator::{page_count, write_atomically, write_to_sink, PdfGenerator};
pub use layout::{Banner, Block, Fragment};
