mod parsed_args;
mod parser;

#[cfg(test)]
mod tests;

pub use parsed_args::{OnError, ParsedArgs, SortChoice};
pub use parser::parse_args;
