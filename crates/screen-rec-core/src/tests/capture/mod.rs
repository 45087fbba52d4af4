#[cfg(unix)]
mod engine;
mod message;
