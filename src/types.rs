use core::fmt;
use std::{collections::HashMap, str::FromStr};

use serde::Serialize;

use crate::error::{Diagnostic, ParseError};

/// Разделитель строк во всех трёх форматах.
pub const LINE_SEPARATOR: &str = "\r\n";

/// Формат поля. Определяет, как пара (тег, значение) выводится обратно в текст.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    /// `[tag] value`
    Chips,
    /// `{tag}value`
    FedWire,
    /// `:tag:value`
    Swift,
}

impl FieldKind {
    pub fn render(self, tag: &str, value: &str) -> String {
        match self {
            FieldKind::Chips => format!("[{}] {}", tag, value),
            FieldKind::FedWire => format!("{{{}}}{}", tag, value),
            FieldKind::Swift => format!(":{}:{}", tag, value),
        }
    }
}

/// Неизменяемая пара (тег, значение).
///
/// Значение может содержать переводы строк `\r\n`, если поле продолжалось
/// на следующих строках.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    #[serde(skip)]
    kind: FieldKind,
    tag: String,
    value: String,
}

impl Field {
    pub fn new(kind: FieldKind, tag: impl Into<String>, value: impl Into<String>) -> Self {
        Field {
            kind,
            tag: tag.into(),
            value: value.into(),
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.kind.render(&self.tag, &self.value))
    }
}

/// Поля сообщения в исходном порядке плюс индекс по тегу.
///
/// При повторе тега в индекс попадает первое вхождение, но в упорядоченной
/// последовательности остаются все, чтобы вывод совпадал с исходным текстом.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
    /// Исходный текст заканчивался переводом строки.
    terminated: bool,
}

impl FieldSet {
    pub fn new(fields: Vec<Field>) -> Self {
        let mut index = HashMap::with_capacity(fields.len());
        for (position, field) in fields.iter().enumerate() {
            index.entry(field.tag.clone()).or_insert(position);
        }
        FieldSet {
            fields,
            index,
            terminated: false,
        }
    }

    /// Набор полей текста, который целиком был разобран в `fields`.
    /// Завершающий перевод строки текста сохраняется при выводе.
    pub fn from_text(fields: Vec<Field>, text: &str) -> Self {
        FieldSet {
            terminated: text.ends_with('\n'),
            ..FieldSet::new(fields)
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Первое поле с данным тегом.
    pub fn get(&self, tag: &str) -> Option<&Field> {
        self.index.get(tag).map(|&position| &self.fields[position])
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.index.contains_key(tag)
    }

    /// Значение первого поля с тегом или пустая строка.
    pub fn value(&self, tag: &str) -> &str {
        self.get(tag).map(Field::value).unwrap_or("")
    }

    /// Все поля с тегом, включая повторы, в порядке появления.
    pub fn all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields.iter().filter(move |field| field.tag == tag)
    }

    /// Склеивает отформатированные поля через `separator`. Если исходный
    /// текст заканчивался переводом строки, `separator` добавляется и в конец.
    pub fn render(&self, separator: &str) -> String {
        let mut out = self
            .fields
            .iter()
            .map(Field::to_string)
            .collect::<Vec<_>>()
            .join(separator);
        if self.terminated && !self.fields.is_empty() {
            out.push_str(separator);
        }
        out
    }
}

/// Результат одного вызова разбора.
///
/// Сообщение может присутствовать одновременно с непустым списком ошибок
/// (нефатальные дефекты полей). Если структура была испорчена безнадёжно,
/// сообщения нет, а список ошибок объясняет почему.
#[derive(Debug, Clone)]
pub struct ParseResult<M> {
    message: Option<M>,
    fields: Vec<Field>,
    errors: Vec<Diagnostic>,
}

impl<M> ParseResult<M> {
    pub(crate) fn new(message: Option<M>, fields: Vec<Field>, errors: Vec<Diagnostic>) -> Self {
        ParseResult {
            message,
            fields,
            errors,
        }
    }

    pub fn message(&self) -> Option<&M> {
        self.message.as_ref()
    }

    pub fn into_message(self) -> Option<M> {
        self.message
    }

    pub fn has_message(&self) -> bool {
        self.message.is_some()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(Diagnostic::to_string).collect()
    }

    /// Фатальная ошибка, из-за которой сообщение не было собрано.
    pub fn fatal(&self) -> Option<&Diagnostic> {
        self.errors.iter().find(|d| d.is_fatal())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SupportedFormat {
    Chips,
    FedWire,
    Swift,
}

impl FromStr for SupportedFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chips" => Ok(SupportedFormat::Chips),
            "fedwire" | "fed" => Ok(SupportedFormat::FedWire),
            "swift" | "mt" => Ok(SupportedFormat::Swift),
            _ => Err(ParseError::InvalidFormat(format!("unknown format: {}", s))),
        }
    }
}

impl fmt::Display for SupportedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chips => write!(f, "CHIPS"),
            Self::FedWire => write!(f, "FedWire"),
            Self::Swift => write!(f, "SWIFT"),
        }
    }
}
