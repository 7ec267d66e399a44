mod common;
mod drafts;
mod generation;
