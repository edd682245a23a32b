mod writer;

pub use writer::FlakyWriter;
