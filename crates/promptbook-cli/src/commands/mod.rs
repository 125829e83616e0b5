pub mod prefs;
pub mod prompts;
pub mod watch;
