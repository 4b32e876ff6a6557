pub mod swrite;
