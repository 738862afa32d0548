//! Разбор сообщений FedWire.
//!
//! Поле - это четырёхзначный тег в фигурных скобках, сразу за ним значение:
//! `{2000}000000000100`. Кроме обязательных полей, каждое поле проверяется
//! по таблице длин [`crate::validator::FEDWIRE_RULES`].

use core::fmt;

use log::debug;

use crate::error::Diagnostic;
use crate::lookup::{
    self, FEDWIRE_ADVICE_CODES, FEDWIRE_BUSINESS_FUNCTIONS, FEDWIRE_ID_CODES,
    FEDWIRE_SUBTYPE_CODES, FEDWIRE_TYPE_CODES,
};
use crate::parser::MessageParser;
use crate::tokenizer::{TagSyntax, tokenize};
use crate::types::{FieldSet, LINE_SEPARATOR, ParseResult};
use crate::utils::{aba_number, first_line, mandatory_value};
use crate::validator::{report_duplicates, validate_fedwire};

/// Сообщение FedWire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FedWireMessage {
    sender_supplied_information: String,
    type_code: String,
    subtype_code: String,
    imad: String,
    amount: String,
    sender_fi: String,
    receiver_fi: String,
    business_function_code: String,
    fields: FieldSet,
}

impl FedWireMessage {
    fn assemble(fields: FieldSet, errors: &mut Vec<Diagnostic>) -> Self {
        let sender_supplied_information = mandatory_value(&fields, "1500", errors);

        let type_subtype = mandatory_value(&fields, "1510", errors);
        let (type_code, subtype_code) = match (type_subtype.get(..2), type_subtype.get(2..)) {
            (Some(code), Some(subtype)) if type_subtype.len() == 4 => {
                (code.to_string(), subtype.to_string())
            }
            _ => {
                if fields.contains("1510") {
                    errors.push(Diagnostic::MissingTypeSubtype("1510".to_string()));
                }
                (String::new(), String::new())
            }
        };

        FedWireMessage {
            sender_supplied_information,
            type_code,
            subtype_code,
            imad: mandatory_value(&fields, "1520", errors),
            amount: mandatory_value(&fields, "2000", errors),
            sender_fi: mandatory_value(&fields, "3100", errors),
            receiver_fi: mandatory_value(&fields, "3400", errors),
            business_function_code: mandatory_value(&fields, "3600", errors),
            fields,
        }
    }

    /// Поле 1500.
    pub fn sender_supplied_information(&self) -> &str {
        &self.sender_supplied_information
    }

    /// Первые две цифры поля 1510.
    pub fn type_code(&self) -> &str {
        &self.type_code
    }

    /// Последние две цифры поля 1510.
    pub fn subtype_code(&self) -> &str {
        &self.subtype_code
    }

    pub fn type_and_subtype_code(&self) -> &str {
        self.fields.value("1510")
    }

    /// Поле 1520, Input Message Accountability Data.
    pub fn imad(&self) -> &str {
        &self.imad
    }

    /// Поле 2000.
    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// Поле 3100.
    pub fn sender_fi(&self) -> &str {
        &self.sender_fi
    }

    pub fn sender_aba(&self) -> &str {
        aba_number(&self.sender_fi)
    }

    /// Поле 3400.
    pub fn receiver_fi(&self) -> &str {
        &self.receiver_fi
    }

    pub fn receiver_aba(&self) -> &str {
        aba_number(&self.receiver_fi)
    }

    /// Поле 3600.
    pub fn business_function_code(&self) -> &str {
        &self.business_function_code
    }

    // Поля 11xx добавляет сам FedWire при доставке сообщения.

    pub fn message_disposition(&self) -> &str {
        self.fields.value("1100")
    }

    pub fn acceptance_timestamp(&self) -> &str {
        self.fields.value("1110")
    }

    /// Поле 1120, Output Message Accountability Data.
    pub fn omad(&self) -> &str {
        self.fields.value("1120")
    }

    pub fn error_field(&self) -> &str {
        self.fields.value("1130")
    }

    pub fn intermediary_fi(&self) -> &str {
        self.fields.value("4000")
    }

    pub fn intermediary_fi_id(&self) -> &str {
        first_line(self.intermediary_fi())
    }

    pub fn beneficiary_fi(&self) -> &str {
        self.fields.value("4100")
    }

    pub fn beneficiary_fi_id(&self) -> &str {
        first_line(self.beneficiary_fi())
    }

    pub fn beneficiary(&self) -> &str {
        self.fields.value("4200")
    }

    pub fn beneficiary_id(&self) -> &str {
        first_line(self.beneficiary())
    }

    pub fn drawdown_debit_account(&self) -> &str {
        self.fields.value("4400")
    }

    pub fn drawdown_debit_account_id(&self) -> &str {
        first_line(self.drawdown_debit_account())
    }

    pub fn originator(&self) -> &str {
        self.fields.value("5000")
    }

    pub fn originator_id(&self) -> &str {
        first_line(self.originator())
    }

    pub fn originator_fi(&self) -> &str {
        self.fields.value("5100")
    }

    pub fn originator_fi_id(&self) -> &str {
        first_line(self.originator_fi())
    }

    pub fn instructing_fi(&self) -> &str {
        self.fields.value("5200")
    }

    pub fn instructing_fi_id(&self) -> &str {
        first_line(self.instructing_fi())
    }

    pub fn field_exists(&self, tag: &str) -> bool {
        self.fields.contains(tag)
    }

    pub fn field_value(&self, tag: &str) -> &str {
        self.fields.value(tag)
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn lookup_advice_code(code: &str) -> Option<&'static str> {
        lookup::lookup(FEDWIRE_ADVICE_CODES, code)
    }

    pub fn lookup_id_code(code: &str) -> Option<&'static str> {
        lookup::lookup(FEDWIRE_ID_CODES, code)
    }

    pub fn lookup_business_function(code: &str) -> Option<&'static str> {
        lookup::lookup(FEDWIRE_BUSINESS_FUNCTIONS, code)
    }

    pub fn lookup_type_code(code: &str) -> Option<&'static str> {
        lookup::lookup(FEDWIRE_TYPE_CODES, code)
    }

    pub fn lookup_subtype_code(code: &str) -> Option<&'static str> {
        lookup::lookup(FEDWIRE_SUBTYPE_CODES, code)
    }
}

impl fmt::Display for FedWireMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fields.render(LINE_SEPARATOR))
    }
}

/// Идентификатор стороны: буква-код и номер, например `D01230123456789`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FedWireIdentifier {
    code: String,
    identifier: String,
}

impl FedWireIdentifier {
    pub fn new(code: impl Into<String>, identifier: impl Into<String>) -> Self {
        FedWireIdentifier {
            code: code.into(),
            identifier: identifier.into(),
        }
    }

    /// Разбирает первую строку значения. Для пустого значения возвращает `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let mut chars = value.chars();
        let code = chars.next()?;
        let rest = chars.as_str();
        let identifier = rest.lines().next().unwrap_or("").trim();
        Some(FedWireIdentifier::new(code.to_string(), identifier))
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn code_description(&self) -> Option<&'static str> {
        FedWireMessage::lookup_id_code(&self.code)
    }
}

impl fmt::Display for FedWireIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.code, self.identifier)
    }
}

pub(crate) struct FedWireParser;

impl MessageParser for FedWireParser {
    type Message = FedWireMessage;

    fn parse_text(text: &str) -> ParseResult<FedWireMessage> {
        let mut errors = Vec::new();
        let fields = tokenize(text, &TagSyntax::FEDWIRE, &mut errors);
        validate_fedwire(&fields, &mut errors);
        report_duplicates(&fields, &mut errors);
        let message = FedWireMessage::assemble(
            FieldSet::from_text(fields.clone(), text),
            &mut errors,
        );
        debug!(
            "FedWire message: {} fields, {} errors",
            fields.len(),
            errors.len()
        );
        ParseResult::new(Some(message), fields, errors)
    }
}

/// Разбирает сообщение FedWire.
///
/// # Пример
///
/// ```rust
/// use interbank_parser::parse_from_fedwire;
///
/// let result = parse_from_fedwire("{1510}100\r\n{2000}000000000100");
/// let message = result.message().expect("сообщение не собрано");
/// assert_eq!(message.amount(), "000000000100");
/// assert!(result
///     .error_messages()
///     .contains(&"Malformed field: 1510 incorrect length.".to_string()));
/// ```
pub fn parse_from_fedwire(text: &str) -> ParseResult<FedWireMessage> {
    FedWireParser::parse_text(text)
}
