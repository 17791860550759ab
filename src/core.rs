//! Device bring-up and command recording.

pub mod command_buffer_builder_ext;
pub mod init;
