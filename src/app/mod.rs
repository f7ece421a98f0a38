// App layer: user-facing front end over the quote session.

pub mod render;
#[cfg(feature = "cli")]
pub mod shell;
