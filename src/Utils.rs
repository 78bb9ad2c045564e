//! different utility modules used throughout the project
/// terminal and file logging set up from the launch settings
pub mod logger;
/// PNG surface for the function and derivative plot
pub mod plots;
/// launch settings (render target, log level) with defaults
pub mod settings;
/// parse document with structure like "title1 key1: value1, value2 key2: value2 title2 key3: value3" into sections
pub mod task_parser;
