pub mod config;
pub mod prompts;
pub mod run;
