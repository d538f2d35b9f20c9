/// Archive staging, naming and creation
pub mod archive;
