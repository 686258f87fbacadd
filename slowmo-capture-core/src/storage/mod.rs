pub mod checksum;
pub mod output_path;
