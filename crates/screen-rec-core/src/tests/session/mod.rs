mod output;
mod state;
mod title;
