//! Reader for qmake's `.pri`/`.prl`/`.conf` key-value files.

pub mod parser;
pub mod tokenize;

pub use parser::{parse_lines, read_lines, variable, variable_items};
pub use tokenize::{clean_path, resolve_tokens, substitute_placeholders, tokenize};
