//! Ошибки и диагностика разбора.
//!
//! Разбор сообщения никогда не прерывается на первом дефекте: все находки
//! складываются в упорядоченный список [`Diagnostic`] внутри
//! [`crate::types::ParseResult`]. Отдельно стоят [`ParseError`] и [`DumpError`],
//! которые относятся к вводу-выводу вокруг разбора, а не к содержимому сообщения.

use std::{io, string::FromUtf8Error};

use thiserror::Error;

/// Дефект отдельной строки, найденный токенизатором.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenDefect {
    #[error("Missing open delimiter ({0}) on tag number.")]
    MissingOpen(char),
    #[error("Incorrectly placed open delimiter ({0}) on tag number...not first character on line.")]
    MisplacedOpen(char),
    #[error("Missing close delimiter ({0}) on tag number.")]
    MissingClose(char),
    #[error("Tag is invalid length of {found} characters instead of {expected}.")]
    TagLength { found: usize, expected: usize },
    #[error("Tag contains one or more invalid non-numeric characters.")]
    NonNumericTag,
    #[error("No data follows the tag...empty value field.")]
    EmptyValue,
}

/// Структурные дефекты SWIFT-сообщения (блоки `{1:}`..`{5:}`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FramingError {
    #[error("Missing block 1 in message.")]
    MissingBlock1,
    #[error("SWIFT message contains more than one block 1. Unable to parse.")]
    DuplicateBlock1,
    #[error(
        "SWIFT message contains more than one block 1 even after removing the ACK/UAK header. Unable to parse."
    )]
    DuplicateBlock1AfterAck,
    #[error("SWIFT message is missing a block {0}.")]
    MissingBlock(u8),
    #[error("SWIFT message contains more than one block {0}.")]
    DuplicateBlock(u8),
    #[error("SWIFT message is missing a dash-curly on message.")]
    MissingTerminator,
    #[error("SWIFT message is missing a dash-curly on block 4.")]
    MisplacedTerminator,
    #[error("SWIFT message's block {first} does not occur before block {second}.")]
    OutOfOrder { first: u8, second: u8 },
    #[error("SWIFT message's blocks are out of order. Unable to parse.")]
    BlocksOutOfOrder,
    #[error("SWIFT message's block {0} is not closed with a curly brace.")]
    UnterminatedBlock(u8),
    #[error("SWIFT message has an invalid block 2: Neither I nor O.")]
    InvalidDirection,
    #[error("SWIFT message's block {block} is too short to hold the {field}.")]
    HeaderTooShort { block: u8, field: &'static str },
}

/// Одна запись в списке ошибок результата разбора.
///
/// `Display` даёт человекочитаемый текст, который видит пользователь.
/// Фатальной является только [`Diagnostic::Fatal`]: при ней сообщение не собирается.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("Line {line}: {defect}")]
    Token { line: usize, defect: TokenDefect },
    #[error("Line {line}: Invalid field or malformed field tag")]
    MalformedLine { line: usize },
    #[error("Duplicate field: {0} exists more than once.")]
    DuplicateField(String),
    #[error("Invalid field type: {0} found in list.")]
    InvalidFieldType(String),
    #[error("Malformed field: {tag}{label} incorrect length.")]
    MalformedField { tag: String, label: &'static str },
    #[error("Malformed field: {0} is empty.")]
    EmptyField(String),
    #[error("Missing mandatory field: Field {0}.")]
    MissingMandatory(String),
    #[error("Missing Type/Subtype Code: Field {0}")]
    MissingTypeSubtype(String),
    #[error("{0}")]
    Framing(FramingError),
    #[error("{0}")]
    Fatal(FramingError),
}

impl Diagnostic {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Diagnostic::Fatal(_))
    }
}

/// Ошибка чтения входного потока до начала разбора.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    IOError(String),
    #[error("invalid input: {0}")]
    InvalidFormat(String),
}

impl From<io::Error> for ParseError {
    fn from(value: io::Error) -> Self {
        ParseError::IOError(value.to_string())
    }
}

impl From<FromUtf8Error> for ParseError {
    fn from(err: FromUtf8Error) -> Self {
        ParseError::InvalidFormat(err.to_string())
    }
}

/// Ошибка записи разобранного сообщения обратно в текст.
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("nothing to dump: the message was not decoded")]
    NoMessage,
    #[error("output error: {0}")]
    OutputError(String),
}

impl From<io::Error> for DumpError {
    fn from(value: io::Error) -> Self {
        DumpError::OutputError(value.to_string())
    }
}
