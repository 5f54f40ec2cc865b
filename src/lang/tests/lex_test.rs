use super::super::token::*;
use super::super::{lex, ErrorCode};

fn kinds(s: &str) -> Vec<Kind> {
    lex(s).unwrap().iter().map(|t| t.kind).collect()
}

#[test]
fn test_always_ends() {
    assert_eq!(kinds(""), [Kind::End]);
    assert_eq!(kinds("   \r\n\t "), [Kind::End]);
}

#[test]
fn test_two_char_first() {
    assert_eq!(
        kinds("a<=b==c"),
        [
            Kind::Ident,
            Kind::Operator(Operator::LessEqual),
            Kind::Ident,
            Kind::Operator(Operator::Equal),
            Kind::Ident,
            Kind::End
        ]
    );
    assert_eq!(
        kinds("x=-1"),
        [
            Kind::Ident,
            Kind::Assign,
            Kind::Operator(Operator::Minus),
            Kind::Number,
            Kind::End
        ]
    );
    assert_eq!(
        kinds("i++<<2"),
        [
            Kind::Ident,
            Kind::IncDec(IncDec::Increment),
            Kind::Operator(Operator::ShiftLeft),
            Kind::Number,
            Kind::End
        ]
    );
}

#[test]
fn test_reclassify() {
    assert_eq!(
        kinds("if ifx print pi e2 e"),
        [
            Kind::Word(Word::If),
            Kind::Ident,
            Kind::Builtin(Builtin::Print),
            Kind::Constant(Constant::Pi),
            Kind::Ident,
            Kind::Constant(Constant::E),
            Kind::End
        ]
    );
}

#[test]
fn test_numbers() {
    let tokens = lex("12 3.25 .5").unwrap();
    assert_eq!(tokens[0].number(), Some(12.0));
    assert_eq!(tokens[1].number(), Some(3.25));
    assert_eq!(tokens[2].number(), Some(0.5));
    assert_eq!(tokens[3].kind, Kind::End);
}

#[test]
fn test_comments() {
    assert_eq!(
        kinds("// one\n// two\nx; // three"),
        [Kind::Ident, Kind::Semicolon, Kind::End]
    );
    assert_eq!(
        kinds("8/2"),
        [
            Kind::Number,
            Kind::Operator(Operator::Divide),
            Kind::Number,
            Kind::End
        ]
    );
}

#[test]
fn test_positions() {
    let tokens = lex("a = 1;\n  foo(bar);").unwrap();
    assert_eq!(tokens[0].line, 1);
    assert_eq!(tokens[0].column, 0..1);
    assert_eq!(tokens[4].line, 2);
    assert_eq!(&*tokens[4].lexeme, "foo");
    assert_eq!(tokens[4].column, 2..5);
}

#[test]
fn test_illegal_character() {
    let e = lex("x = 1;\ny = $;").unwrap_err();
    assert_eq!(e.code(), ErrorCode::IllegalCharacter);
    assert_eq!(e.line_number(), Some(2));
    assert_eq!(e.column(), 4..5);
    assert_eq!(lex("1.").unwrap_err().code(), ErrorCode::IllegalCharacter);
}
