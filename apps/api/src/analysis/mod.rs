// Resume-vs-requirements scoring pipeline.
// Tokenizer and skill matcher run on each text independently; their output
// plus the experience estimate feed the scorer. Everything here is pure.

pub mod experience;
pub mod handlers;
pub mod keywords;
pub mod scoring;
pub mod skills;
