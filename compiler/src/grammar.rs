use pest_derive::Parser;

/// The source language's grammar driver.
#[derive(Parser)]
#[grammar = "source.pest"]
pub struct SourceParser;
