//! Проверка набора полей после токенизации.
//!
//! Валидатор никогда не прерывает разбор: все находки складываются в список
//! диагностик, а сообщение собирается дальше.

use std::collections::HashSet;

use crate::error::Diagnostic;
use crate::types::Field;

/// Сообщает о каждом повторном вхождении тега.
///
/// Три поля с одинаковым тегом дают две записи.
pub fn report_duplicates(fields: &[Field], errors: &mut Vec<Diagnostic>) {
    let mut seen = HashSet::with_capacity(fields.len());
    for field in fields {
        if !seen.insert(field.tag()) {
            errors.push(Diagnostic::DuplicateField(field.tag().to_string()));
        }
    }
}

/// Ограничение на длину значения поля.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthRule {
    /// Длина равна одному из перечисленных значений.
    Exact(&'static [usize]),
    /// Длина равна числу, либо значение совпадает с литералом.
    ExactOrLiteral(usize, &'static str),
    AtLeast(usize),
    NonEmpty,
}

impl LengthRule {
    pub fn accepts(&self, value: &str) -> bool {
        let len = value.chars().count();
        match *self {
            LengthRule::Exact(lengths) => lengths.contains(&len),
            LengthRule::ExactOrLiteral(expected, literal) => len == expected || value == literal,
            LengthRule::AtLeast(min) => len >= min,
            LengthRule::NonEmpty => len > 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub tag: &'static str,
    pub rule: LengthRule,
    /// Пояснение в тексте ошибки, например ` (IMAD)`.
    pub label: &'static str,
}

const fn rule(tag: &'static str, rule: LengthRule) -> FieldRule {
    FieldRule {
        tag,
        rule,
        label: "",
    }
}

const fn labeled(tag: &'static str, rule: LengthRule, label: &'static str) -> FieldRule {
    FieldRule { tag, rule, label }
}

/// Все известные теги FedWire и требования к их значениям.
pub static FEDWIRE_RULES: &[FieldRule] = &[
    rule("1500", LengthRule::Exact(&[11, 12])),
    rule("1510", LengthRule::Exact(&[4])),
    labeled("1520", LengthRule::Exact(&[22]), " (IMAD)"),
    labeled("2000", LengthRule::Exact(&[12]), " (Amount)"),
    rule("3100", LengthRule::AtLeast(9)),
    rule("3400", LengthRule::AtLeast(9)),
    rule("3600", LengthRule::ExactOrLiteral(3, "CTRCOV")),
    rule("3000", LengthRule::Exact(&[10])),
    rule("3320", LengthRule::Exact(&[16])),
    labeled("3500", LengthRule::Exact(&[22]), " (Prev IMAD)"),
    rule("3700", LengthRule::Exact(&[15])),
    rule("3710", LengthRule::Exact(&[18])),
    rule("3720", LengthRule::Exact(&[12])),
    rule("4000", LengthRule::NonEmpty),
    rule("4100", LengthRule::NonEmpty),
    rule("4200", LengthRule::NonEmpty),
    rule("4320", LengthRule::NonEmpty),
    rule("4400", LengthRule::NonEmpty),
    rule("5000", LengthRule::NonEmpty),
    rule("5100", LengthRule::NonEmpty),
    rule("5200", LengthRule::NonEmpty),
    rule("5400", LengthRule::NonEmpty),
    rule("6000", LengthRule::NonEmpty),
    rule("6100", LengthRule::NonEmpty),
    rule("6110", LengthRule::NonEmpty),
    rule("6200", LengthRule::NonEmpty),
    rule("6210", LengthRule::NonEmpty),
    rule("6300", LengthRule::NonEmpty),
    rule("6310", LengthRule::NonEmpty),
    rule("6400", LengthRule::NonEmpty),
    rule("6410", LengthRule::NonEmpty),
    rule("6420", LengthRule::NonEmpty),
    rule("6430", LengthRule::NonEmpty),
    rule("6500", LengthRule::NonEmpty),
    rule("9000", LengthRule::NonEmpty),
    // Поля, которые дописывает сам FedWire при доставке.
    rule("1100", LengthRule::NonEmpty),
    rule("1110", LengthRule::NonEmpty),
    rule("1120", LengthRule::NonEmpty),
    rule("1130", LengthRule::NonEmpty),
];

pub fn fedwire_rule(tag: &str) -> Option<&'static FieldRule> {
    FEDWIRE_RULES.iter().find(|r| r.tag == tag)
}

/// Проверяет каждое поле FedWire по таблице [`FEDWIRE_RULES`].
///
/// Неизвестный тег даёт "invalid field type", нарушение длины даёт
/// "malformed field". Повторы здесь не проверяются, см. [`report_duplicates`].
pub fn validate_fedwire(fields: &[Field], errors: &mut Vec<Diagnostic>) {
    for field in fields {
        let Some(rule) = fedwire_rule(field.tag()) else {
            errors.push(Diagnostic::InvalidFieldType(field.tag().to_string()));
            continue;
        };
        if rule.rule.accepts(field.value()) {
            continue;
        }
        let diagnostic = match rule.rule {
            LengthRule::NonEmpty => Diagnostic::EmptyField(field.tag().to_string()),
            _ => Diagnostic::MalformedField {
                tag: field.tag().to_string(),
                label: rule.label,
            },
        };
        errors.push(diagnostic);
    }
}
