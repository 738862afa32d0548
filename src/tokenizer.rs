//! Токенизатор тегированных полей.
//!
//! Один и тот же построчный сканер обслуживает три формата, отличаются они
//! только конфигурацией [`TagSyntax`]:
//!
//! ```text
//! [260] 000220769618      CHIPS      '[' ']'  тег из 3 цифр
//! {2000}000000000100      FedWire    '{' '}'  тег из 4 цифр
//! :32A:101101USD10100,50  SWIFT (4)  ':' ':'  буквенно-цифровой тег
//! ```
//!
//! Строки, которые не открывают новое поле, считаются продолжением значения
//! предыдущего поля и приклеиваются к нему через `\r\n`.

use std::{iter::Peekable, str::Lines};

use log::debug;

use crate::error::{Diagnostic, TokenDefect};
use crate::types::{Field, FieldKind, LINE_SEPARATOR};

/// Конфигурация разметки тегов для одного формата.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSyntax {
    pub kind: FieldKind,
    pub open: char,
    pub close: char,
    /// Ожидаемая ширина тега, `None` если не проверяется.
    pub tag_len: Option<usize>,
    pub numeric_tags: bool,
    /// Символ между закрывающим разделителем и значением, не входит в значение.
    pub value_separator: Option<char>,
    /// Пустая строка завершает тело сообщения.
    pub stop_at_blank_line: bool,
    /// Строка с испорченным тегом продолжает значение предыдущего поля,
    /// а не отбрасывается.
    pub malformed_continues: bool,
}

impl TagSyntax {
    pub const CHIPS: TagSyntax = TagSyntax {
        kind: FieldKind::Chips,
        open: '[',
        close: ']',
        tag_len: Some(3),
        numeric_tags: true,
        value_separator: Some(' '),
        stop_at_blank_line: true,
        malformed_continues: false,
    };

    pub const FEDWIRE: TagSyntax = TagSyntax {
        kind: FieldKind::FedWire,
        open: '{',
        close: '}',
        tag_len: Some(4),
        numeric_tags: true,
        value_separator: None,
        stop_at_blank_line: true,
        malformed_continues: false,
    };

    pub const SWIFT_BLOCK4: TagSyntax = TagSyntax {
        kind: FieldKind::Swift,
        open: ':',
        close: ':',
        tag_len: None,
        numeric_tags: false,
        value_separator: None,
        stop_at_blank_line: false,
        malformed_continues: true,
    };

    fn is_blank(&self, line: &str) -> bool {
        self.stop_at_blank_line && line.trim().is_empty()
    }

    /// Строка начинает новое поле (или завершает тело), а не продолжает текущее.
    fn breaks_continuation(&self, line: &str) -> bool {
        line.starts_with(self.open) || self.is_blank(line)
    }
}

/// Курсор по строкам с просмотром следующей строки без её потребления.
///
/// Понимает и `\r\n`, и одиночный `\n`. Номер строки считается с единицы и
/// относится к последней строке, выданной [`LineCursor::next_line`].
pub struct LineCursor<'a> {
    lines: Peekable<Lines<'a>>,
    line_number: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        LineCursor {
            lines: text.lines().peekable(),
            line_number: 0,
        }
    }

    pub fn peek(&mut self) -> Option<&'a str> {
        self.lines.peek().copied()
    }

    pub fn next_line(&mut self) -> Option<&'a str> {
        let line = self.lines.next()?;
        self.line_number += 1;
        Some(line)
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

/// Разбивает текст на поля согласно `syntax`.
///
/// Дефекты разметки попадают в `errors` с номером строки. Поле с неверным
/// тегом всё равно создаётся; не создаётся оно только если не найден
/// открывающий или закрывающий разделитель. При `malformed_continues` такая
/// строка приклеивается к значению предыдущего поля.
pub fn tokenize(text: &str, syntax: &TagSyntax, errors: &mut Vec<Diagnostic>) -> Vec<Field> {
    let mut cursor = LineCursor::new(text);
    let mut fields: Vec<Field> = Vec::new();

    while let Some(line) = cursor.next_line() {
        let line_number = cursor.line_number();
        if syntax.is_blank(line) {
            debug!("blank line {} ends the message body", line_number);
            break;
        }

        let (tag, mut value) = match split_head(line, line_number, syntax, errors) {
            Some((tag, head)) => (tag.to_string(), head.to_string()),
            None => {
                errors.push(Diagnostic::MalformedLine { line: line_number });
                let previous = if syntax.malformed_continues {
                    fields.pop()
                } else {
                    None
                };
                let Some(previous) = previous else {
                    continue;
                };
                debug!("line {} continues field {}", line_number, previous.tag());
                let value = format!("{}{}{}", previous.value(), LINE_SEPARATOR, line);
                (previous.tag().to_string(), value)
            }
        };

        while let Some(next) = cursor.peek() {
            if syntax.breaks_continuation(next) {
                break;
            }
            cursor.next_line();
            value.push_str(LINE_SEPARATOR);
            value.push_str(next);
        }

        fields.push(Field::new(syntax.kind, tag, value));
    }

    debug!("tokenized {} {:?} fields", fields.len(), syntax.kind);
    fields
}

/// Выделяет тег и начало значения из первой строки поля.
fn split_head<'l>(
    line: &'l str,
    line_number: usize,
    syntax: &TagSyntax,
    errors: &mut Vec<Diagnostic>,
) -> Option<(&'l str, &'l str)> {
    let mut report = |defect| {
        errors.push(Diagnostic::Token {
            line: line_number,
            defect,
        })
    };

    let Some(open_at) = line.find(syntax.open) else {
        report(TokenDefect::MissingOpen(syntax.open));
        return None;
    };
    if open_at > 0 {
        report(TokenDefect::MisplacedOpen(syntax.open));
    }

    let tag_start = open_at + syntax.open.len_utf8();
    let Some(tag_len) = line[tag_start..].find(syntax.close) else {
        report(TokenDefect::MissingClose(syntax.close));
        return None;
    };
    let tag = &line[tag_start..tag_start + tag_len];
    let rest = &line[tag_start + tag_len + syntax.close.len_utf8()..];

    if let Some(expected) = syntax.tag_len {
        let found = tag.chars().count();
        if found != expected {
            report(TokenDefect::TagLength { found, expected });
        }
    }
    if syntax.numeric_tags && !tag.chars().all(|c| c.is_ascii_digit()) {
        report(TokenDefect::NonNumericTag);
    }

    let value = match syntax.value_separator {
        Some(separator) => rest.strip_prefix(separator).unwrap_or(rest),
        None => rest,
    };
    if value.is_empty() {
        report(TokenDefect::EmptyValue);
    }

    Some((tag, value))
}
