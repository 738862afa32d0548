//! Модуль верхнего уровня для разбора и вывода сообщений.
//!
//! Предоставляет единый интерфейс для всех трёх форматов через функции
//! [`parse`], [`parse_text`] и [`dump`].

use std::io;

use log::warn;
use serde::Serialize;

use crate::chips_format::{ChipsMessage, ChipsParser};
use crate::error::{Diagnostic, DumpError, ParseError};
use crate::fedwire_format::{FedWireMessage, FedWireParser};
use crate::swift_format::{SwiftMessage, SwiftParser};
use crate::types::{Field, ParseResult, SupportedFormat};

/// Трейт, который реализуют разборщики конкретных форматов.
pub(crate) trait MessageParser {
    type Message;

    /// Разбирает один текст сообщения. Никогда не паникует и не возвращает
    /// ошибку: все дефекты попадают в результат.
    fn parse_text(text: &str) -> ParseResult<Self::Message>;
}

/// Результат разбора в одном из поддерживаемых форматов.
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Chips(ParseResult<ChipsMessage>),
    FedWire(ParseResult<FedWireMessage>),
    Swift(ParseResult<SwiftMessage>),
}

impl ParsedMessage {
    pub fn format(&self) -> SupportedFormat {
        match self {
            ParsedMessage::Chips(_) => SupportedFormat::Chips,
            ParsedMessage::FedWire(_) => SupportedFormat::FedWire,
            ParsedMessage::Swift(_) => SupportedFormat::Swift,
        }
    }

    pub fn has_message(&self) -> bool {
        match self {
            ParsedMessage::Chips(r) => r.has_message(),
            ParsedMessage::FedWire(r) => r.has_message(),
            ParsedMessage::Swift(r) => r.has_message(),
        }
    }

    /// Поля в порядке появления. Для SWIFT это поля блока 4.
    pub fn fields(&self) -> &[Field] {
        match self {
            ParsedMessage::Chips(r) => r.fields(),
            ParsedMessage::FedWire(r) => r.fields(),
            ParsedMessage::Swift(r) => r.fields(),
        }
    }

    pub fn errors(&self) -> &[Diagnostic] {
        match self {
            ParsedMessage::Chips(r) => r.errors(),
            ParsedMessage::FedWire(r) => r.errors(),
            ParsedMessage::Swift(r) => r.errors(),
        }
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors().iter().map(Diagnostic::to_string).collect()
    }

    /// Текст сообщения, восстановленный из разобранной структуры.
    pub fn render(&self) -> Option<String> {
        match self {
            ParsedMessage::Chips(r) => r.message().map(ToString::to_string),
            ParsedMessage::FedWire(r) => r.message().map(ToString::to_string),
            ParsedMessage::Swift(r) => r.message().map(ToString::to_string),
        }
    }

    /// Краткий отчёт для вывода в JSON.
    pub fn report(&self) -> ParseReport<'_> {
        ParseReport {
            format: self.format(),
            has_message: self.has_message(),
            fields: self.fields(),
            errors: self.error_messages(),
        }
    }
}

/// Сериализуемое представление результата разбора.
#[derive(Debug, Serialize)]
pub struct ParseReport<'a> {
    pub format: SupportedFormat,
    pub has_message: bool,
    pub fields: &'a [Field],
    pub errors: Vec<String>,
}

/// Разбирает текст сообщения в заданном формате.
///
/// # Пример
///
/// ```rust
/// use interbank_parser::{parse_text, types::SupportedFormat};
///
/// let parsed = parse_text("{2000}000000000100", SupportedFormat::FedWire);
/// assert!(parsed.has_message());
/// assert_eq!(parsed.fields()[0].tag(), "2000");
/// assert_eq!(parsed.render().as_deref(), Some("{2000}000000000100"));
/// ```
pub fn parse_text(text: &str, format: SupportedFormat) -> ParsedMessage {
    let parsed = match format {
        SupportedFormat::Chips => ParsedMessage::Chips(ChipsParser::parse_text(text)),
        SupportedFormat::FedWire => ParsedMessage::FedWire(FedWireParser::parse_text(text)),
        SupportedFormat::Swift => ParsedMessage::Swift(SwiftParser::parse_text(text)),
    };
    if !parsed.errors().is_empty() {
        warn!(
            "{} message parsed with {} diagnostics",
            format,
            parsed.errors().len()
        );
    }
    parsed
}

/// Читает одно сообщение из потока и разбирает его в заданном формате.
///
/// ## Аргументы
///
/// * `reader` - Поток ввода (файл, буфер в памяти и т.п.).
/// * `format` - Ожидаемый формат сообщения ([`SupportedFormat`]).
///
/// ## Возвращаемое значение
///
/// [`ParsedMessage`] с результатом разбора. Ошибка [`ParseError`] возвращается
/// только если поток не удалось прочитать или он не является UTF-8; дефекты
/// самого сообщения лежат внутри результата.
///
/// # Пример
///
/// ```no_run
/// use std::fs::File;
/// use interbank_parser::{parse, types::SupportedFormat};
///
/// let mut file = File::open("mt202.txt").expect("Файл не найден");
/// let parsed = parse(&mut file, SupportedFormat::Swift).expect("Ошибка чтения");
/// println!("{:?}", parsed.error_messages());
/// ```
pub fn parse(reader: &mut impl io::Read, format: SupportedFormat) -> Result<ParsedMessage, ParseError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    let text = String::from_utf8(buf)?;
    Ok(parse_text(&text, format))
}

/// Записывает восстановленный текст разобранного сообщения в поток.
///
/// Возвращает [`DumpError::NoMessage`], если сообщение не было собрано.
///
/// # Пример
///
/// ```rust
/// use interbank_parser::{dump, parse_text, types::SupportedFormat};
///
/// let text = "[260] 000220769618\r\n[270] 001663\r\n[320] 74300T743013042";
/// let parsed = parse_text(text, SupportedFormat::Chips);
///
/// let mut buffer = Vec::new();
/// dump(&mut buffer, &parsed).expect("Ошибка записи");
/// assert_eq!(String::from_utf8(buffer).unwrap(), text);
/// ```
pub fn dump(writer: &mut impl io::Write, parsed: &ParsedMessage) -> Result<(), DumpError> {
    let rendered = parsed.render().ok_or(DumpError::NoMessage)?;
    writer.write_all(rendered.as_bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reads_stream() {
        let mut reader = "[260] 1\r\n[270] 2\r\n[320] 3".as_bytes();
        let parsed = parse(&mut reader, SupportedFormat::Chips).unwrap();
        assert_eq!(parsed.format(), SupportedFormat::Chips);
        assert_eq!(parsed.fields().len(), 3);
        assert!(parsed.errors().is_empty());
    }

    #[test]
    fn test_parse_rejects_invalid_utf8() {
        let mut reader: &[u8] = &[0x5b, 0xff, 0xfe];
        let got = parse(&mut reader, SupportedFormat::Chips);
        assert!(matches!(got, Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_dump_without_message_fails() {
        let parsed = parse_text("no blocks here", SupportedFormat::Swift);
        let mut buffer = Vec::new();
        assert!(matches!(
            dump(&mut buffer, &parsed),
            Err(DumpError::NoMessage)
        ));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_report_serializes() {
        let parsed = parse_text("{2000}000000000100", SupportedFormat::FedWire);
        let json = serde_json::to_value(parsed.report()).unwrap();
        assert_eq!(json["format"], "FedWire");
        assert_eq!(json["has_message"], true);
        assert_eq!(json["fields"][0]["tag"], "2000");
        assert_eq!(json["fields"][0]["value"], "000000000100");
        assert!(json["errors"].as_array().unwrap().len() > 0);
    }
}
