use std::borrow::Cow;

use crate::error::Diagnostic;
use crate::types::FieldSet;

/// Значение первого непустого поля из списка приоритетов или пустая строка.
///
/// Так описываются данные, которые в разных вариантах сообщения лежат под
/// разными тегами (например 410/411/412).
pub(crate) fn first_present<'a>(fields: &'a FieldSet, tags: &[&str]) -> &'a str {
    tags.iter()
        .map(|tag| fields.value(tag))
        .find(|value| !value.is_empty())
        .unwrap_or("")
}

/// Значение обязательного поля. Если поля нет, в `errors` добавляется
/// запись о нём, а возвращается пустая строка.
pub(crate) fn mandatory_value(fields: &FieldSet, tag: &str, errors: &mut Vec<Diagnostic>) -> String {
    match fields.get(tag) {
        Some(field) => field.value().to_string(),
        None => {
            errors.push(Diagnostic::MissingMandatory(tag.to_string()));
            String::new()
        }
    }
}

/// Выделяет `буква-код + пробел + идентификатор` из начала значения CHIPS.
pub(crate) fn decode_id_code(value: &str) -> &str {
    if value.len() <= 2 || value.as_bytes()[1] != b' ' {
        return "";
    }
    match value[2..].find(char::is_whitespace) {
        Some(end) => &value[..end + 2],
        None => value,
    }
}

/// Первая строка значения без пробелов по краям.
pub(crate) fn first_line(value: &str) -> &str {
    value.lines().next().unwrap_or("").trim()
}

/// 9-значный ABA-номер в начале значения, если значение не короче 9 символов.
pub(crate) fn aba_number(value: &str) -> &str {
    value.get(..9).unwrap_or("")
}

pub(crate) fn count_matches(haystack: &str, needle: &str) -> usize {
    haystack.match_indices(needle).count()
}

/// Дополняет строку символом `filler` справа до длины `len`.
pub(crate) fn pad_to(s: &str, len: usize, filler: char) -> Cow<'_, str> {
    let current = s.chars().count();
    if current >= len {
        return Cow::Borrowed(s);
    }
    let mut padded = String::with_capacity(len);
    padded.push_str(s);
    padded.extend(std::iter::repeat_n(filler, len - current));
    Cow::Owned(padded)
}
