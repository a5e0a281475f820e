use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "matchql.pest"]
pub struct MatchqlParser;
