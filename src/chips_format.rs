//! Разбор сообщений CHIPS.
//!
//! Каждое поле начинается с трёхзначного тега в квадратных скобках, за ним
//! пробел и значение. Значение может продолжаться на следующих строках до
//! следующей `[` или пустой строки.

use core::fmt;

use log::debug;

use crate::error::Diagnostic;
use crate::lookup::{self, CHIPS_APD_CODES, CHIPS_ID_CODES, CHIPS_MESSAGE_TYPES};
use crate::parser::MessageParser;
use crate::tokenizer::{TagSyntax, tokenize};
use crate::types::{FieldSet, LINE_SEPARATOR, ParseResult};
use crate::utils::{decode_id_code, first_present, mandatory_value};
use crate::validator::report_duplicates;

const INTERMEDIARY_BANK: &[&str] = &["400", "401", "402"];
const BENEFICIARY_BANK: &[&str] = &["410", "411", "412"];
const BENEFICIARY: &[&str] = &["420", "421", "422"];
const ORIGINATOR: &[&str] = &["500", "501", "502"];
const ORIGINATOR_BANK: &[&str] = &["510", "511", "512"];
const INSTRUCTING_BANK: &[&str] = &["520", "521", "522"];

/// Сообщение CHIPS.
///
/// Обязательные поля 260 (сумма), 270 (PSN) и 320 (референс отправителя)
/// извлекаются при сборке. Отсутствующее обязательное поле даёт пустую строку
/// и запись в списке ошибок.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipsMessage {
    amount: String,
    psn: String,
    send_participant_reference: String,
    fields: FieldSet,
}

impl ChipsMessage {
    fn assemble(fields: FieldSet, errors: &mut Vec<Diagnostic>) -> Self {
        ChipsMessage {
            amount: mandatory_value(&fields, "260", errors),
            psn: mandatory_value(&fields, "270", errors),
            send_participant_reference: mandatory_value(&fields, "320", errors),
            fields,
        }
    }

    /// Поле 260.
    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// Поле 270, Payment Sequence Number.
    pub fn psn(&self) -> &str {
        &self.psn
    }

    /// Поле 320.
    pub fn send_participant_reference(&self) -> &str {
        &self.send_participant_reference
    }

    pub fn header(&self) -> &str {
        self.fields.value("031")
    }

    pub fn identification_tag(&self) -> &str {
        self.fields.value("201")
    }

    pub fn disposition_tag(&self) -> &str {
        self.fields.value("211")
    }

    pub fn delivery_tag(&self) -> &str {
        self.fields.value("221")
    }

    pub fn charges_information(&self) -> &str {
        self.fields.value("301")
    }

    pub fn related_bank_reference(&self) -> &str {
        self.fields.value("321")
    }

    pub fn intermediary_bank(&self) -> &str {
        first_present(&self.fields, INTERMEDIARY_BANK)
    }

    pub fn intermediary_bank_id(&self) -> &str {
        decode_id_code(self.intermediary_bank())
    }

    pub fn beneficiary_bank(&self) -> &str {
        first_present(&self.fields, BENEFICIARY_BANK)
    }

    pub fn beneficiary_bank_id(&self) -> &str {
        decode_id_code(self.beneficiary_bank())
    }

    pub fn beneficiary(&self) -> &str {
        first_present(&self.fields, BENEFICIARY)
    }

    pub fn beneficiary_id(&self) -> &str {
        decode_id_code(self.beneficiary())
    }

    pub fn originator(&self) -> &str {
        first_present(&self.fields, ORIGINATOR)
    }

    pub fn originator_id(&self) -> &str {
        decode_id_code(self.originator())
    }

    pub fn originator_bank(&self) -> &str {
        first_present(&self.fields, ORIGINATOR_BANK)
    }

    pub fn originator_bank_id(&self) -> &str {
        decode_id_code(self.originator_bank())
    }

    pub fn instructing_bank(&self) -> &str {
        first_present(&self.fields, INSTRUCTING_BANK)
    }

    pub fn instructing_bank_id(&self) -> &str {
        decode_id_code(self.instructing_bank())
    }

    pub fn field_exists(&self, tag: &str) -> bool {
        self.fields.contains(tag)
    }

    /// Значение поля или пустая строка.
    pub fn field_value(&self, tag: &str) -> &str {
        self.fields.value(tag)
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Описание типа идентификатора по первой букве (`D`, `B`, `C`...).
    pub fn lookup_id_code(code: &str) -> Option<&'static str> {
        lookup::lookup(CHIPS_ID_CODES, code)
    }

    /// Описание формата дополнительных платёжных данных (поле 820).
    pub fn lookup_apd_code(code: &str) -> Option<&'static str> {
        lookup::lookup(CHIPS_APD_CODES, code)
    }

    pub fn lookup_message_type(code: &str) -> Option<&'static str> {
        lookup::lookup(CHIPS_MESSAGE_TYPES, code)
    }
}

impl fmt::Display for ChipsMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fields.render(LINE_SEPARATOR))
    }
}

pub(crate) struct ChipsParser;

impl MessageParser for ChipsParser {
    type Message = ChipsMessage;

    fn parse_text(text: &str) -> ParseResult<ChipsMessage> {
        let mut errors = Vec::new();
        let fields = tokenize(text, &TagSyntax::CHIPS, &mut errors);
        report_duplicates(&fields, &mut errors);
        let message = ChipsMessage::assemble(
            FieldSet::from_text(fields.clone(), text),
            &mut errors,
        );
        debug!(
            "CHIPS message: {} fields, {} errors",
            fields.len(),
            errors.len()
        );
        ParseResult::new(Some(message), fields, errors)
    }
}

/// Разбирает сообщение CHIPS.
///
/// Сообщение собирается всегда; дефекты полей и отсутствующие обязательные
/// поля попадают в список ошибок результата.
///
/// # Пример
///
/// ```rust
/// use interbank_parser::parse_from_chips;
///
/// let result = parse_from_chips("[260] 000220769618\r\n[270] 001663\r\n[320] 74300T743013042\r\n");
/// assert_eq!(result.error_count(), 0);
/// assert_eq!(result.field_count(), 3);
///
/// let message = result.message().expect("сообщение не собрано");
/// assert_eq!(message.amount(), "000220769618");
/// assert_eq!(message.psn(), "001663");
/// ```
pub fn parse_from_chips(text: &str) -> ParseResult<ChipsMessage> {
    ChipsParser::parse_text(text)
}
