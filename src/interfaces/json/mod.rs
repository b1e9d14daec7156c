pub mod export;
pub mod workspace_reader;
