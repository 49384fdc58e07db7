//! Composed process invocations for wrapped tools

mod tool_command;

pub use tool_command::ToolCommand;
