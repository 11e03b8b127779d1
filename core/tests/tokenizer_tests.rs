use indexcore::analysis::{AnalyzerFactory, DefaultAnalyzerFactory};
use indexcore::token::Token;
use indexcore::tokenizer::Tokenizer;
use indexcore::{FieldName, TokenizationError};

fn words(text: &str, t: &Tokenizer) -> Vec<String> {
    t.consume(text).unwrap().map(Token::into_string).collect()
}

#[test]
fn it_is_deterministic_for_a_delimiter() {
    let ws = Tokenizer::default();
    let tilde = Tokenizer::new("~").unwrap();
    assert_eq!(words("hello world", &ws), vec!["hello", "world"]);
    assert_eq!(words("hello world", &tilde), vec!["hello world"]);
    assert_eq!(words("hello world", &ws), words("hello world", &ws));
}

#[test]
fn it_rejects_empty_values() {
    assert!(matches!(Tokenizer::default().consume(""), Err(TokenizationError::EmptyInput)));
    assert!(matches!(Tokenizer::new("~").unwrap().consume(""), Err(TokenizationError::EmptyInput)));
}

#[test]
fn it_leaves_case_and_punctuation_alone() {
    assert_eq!(words("The Café's MENU.", &Tokenizer::default()), vec!["The", "Café's", "MENU."]);
}

#[test]
fn it_normalizes_and_stems_content() {
    let factory = DefaultAnalyzerFactory::default();
    let stream = Tokenizer::default().consume("Running Runners RUN! The café's menu.").unwrap();
    let out: Vec<String> =
        factory.analyzer_for(FieldName::Content).unwrap().process(stream).map(Token::into_string).collect();
    assert!(out.contains(&"run".to_string()));
    assert!(out.contains(&"menu".to_string()));
    assert!(!out.contains(&"the".to_string()));
}
