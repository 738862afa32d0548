//! Статические справочники кодов (код -> описание).
//!
//! Таблицы неизменяемы и живут всё время работы процесса, поэтому их можно
//! читать из любого числа параллельных разборов без синхронизации.

/// Пара "код - описание" из справочника.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeLookup {
    pub code: &'static str,
    pub description: &'static str,
}

impl CodeLookup {
    const fn new(code: &'static str, description: &'static str) -> Self {
        CodeLookup { code, description }
    }
}

/// Ищет описание кода в таблице. Сравнение точное, с учётом регистра.
pub fn lookup(table: &[CodeLookup], code: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|entry| entry.code == code)
        .map(|entry| entry.description)
}

/// Типы идентификаторов CHIPS (первая буква значения полей 4xx/5xx).
pub static CHIPS_ID_CODES: &[CodeLookup] = &[
    CodeLookup::new("C", "CHIPS Universal ID"),
    CodeLookup::new("D", "Demand Deposit Account (DDA)"),
    CodeLookup::new("B", "BIC/SWIFT"),
    CodeLookup::new("F", "Financial Telecommunications"),
    CodeLookup::new("1", "Non-Bank Identifier"),
    CodeLookup::new("2", "Non-Bank Identifier"),
    CodeLookup::new("3", "Non-Bank Identifier"),
    CodeLookup::new("4", "Non-Bank Identifier"),
    CodeLookup::new("5", "Non-Bank Identifier"),
    CodeLookup::new("9", "Non-Bank Identifier"),
];

/// Форматы дополнительных платёжных данных (APD), поле 820.
pub static CHIPS_APD_CODES: &[CodeLookup] = &[
    CodeLookup::new("01", "UN-EDIFACT"),
    CodeLookup::new("02", "ANSI X12"),
    CodeLookup::new("03", "SWIFT"),
    CodeLookup::new("04", "IXML (ISO 20022)"),
    CodeLookup::new("05", "GXML (General XML)"),
    CodeLookup::new("06", "S820 (STP 820)"),
    CodeLookup::new("07", "Related Remittance Information (field 825) required"),
    CodeLookup::new("08", "RMTS (Structured remittance)"),
    CodeLookup::new("09", "PROP (Proprietary code)"),
];

pub static CHIPS_MESSAGE_TYPES: &[CodeLookup] = &[
    CodeLookup::new("10", "Payment Request"),
    CodeLookup::new("25", "Payment Stored Response"),
    CodeLookup::new("02", "Payment Preference"),
    CodeLookup::new("38", "Payment Resolver Notification"),
    CodeLookup::new("01", "Payment Delete"),
    CodeLookup::new("22", "General Service"),
    CodeLookup::new("27", "Service Response"),
    CodeLookup::new("36", "Service Notification"),
];

/// Коды способа уведомления, поля {6210}, {6310}, {6410}.
pub static FEDWIRE_ADVICE_CODES: &[CodeLookup] = &[
    CodeLookup::new("LTR", "Letter"),
    CodeLookup::new("PHN", "Telephone"),
    CodeLookup::new("TLX", "Telex"),
    CodeLookup::new("WRE", "Wire"),
    CodeLookup::new("HLD", "Hold"),
];

pub static FEDWIRE_ID_CODES: &[CodeLookup] = &[
    CodeLookup::new("1", "Passport Number"),
    CodeLookup::new("2", "Tax Identification Number"),
    CodeLookup::new("3", "Driver License Number"),
    CodeLookup::new("4", "Alien Registration Number"),
    CodeLookup::new("5", "Corporate Identification"),
    CodeLookup::new("9", "Other Identification"),
    CodeLookup::new("B", "S.W.I.F.T. Bank Identifier Code (BIC)"),
    CodeLookup::new("C", "CHIPS Participant"),
    CodeLookup::new("D", "Demand Deposit Account (DDA) Number"),
    CodeLookup::new("F", "Fed Routing Number"),
    CodeLookup::new(
        "T",
        "S.W.I.F.T. BIC or Bank Entity Identifier (BEI) and account number",
    ),
];

/// Коды бизнес-функции, поле {3600}.
pub static FEDWIRE_BUSINESS_FUNCTIONS: &[CodeLookup] = &[
    CodeLookup::new("BTR", "Bank Transfer (Beneficiary is a bank)"),
    CodeLookup::new("FFR", "Fed Funds Returned"),
    CodeLookup::new("CTR", "Customer Transfer (Beneficiary is a not a bank)"),
    CodeLookup::new("CTRCOV", "Cover Payment"),
    CodeLookup::new("FFS", "Fed Funds Sold"),
    CodeLookup::new("DEP", "Deposit to Sender's Account"),
    CodeLookup::new("DRB", "Bank-to-Bank Drawdown Request"),
    CodeLookup::new("CKS", "Check Same Day Settlement"),
    CodeLookup::new("DRC", "Customer or Corporate Drawdown Request"),
    CodeLookup::new("SVC", "Service Message"),
    CodeLookup::new("DRW", "Drawdown Payment"),
];

/// Первые две цифры поля {1510}.
pub static FEDWIRE_TYPE_CODES: &[CodeLookup] = &[
    CodeLookup::new("10", "Funds Transfer"),
    CodeLookup::new("15", "Foreign Transfer"),
    CodeLookup::new("16", "Settlement Transfer"),
];

/// Последние две цифры поля {1510}.
pub static FEDWIRE_SUBTYPE_CODES: &[CodeLookup] = &[
    CodeLookup::new("00", "Basic Funds Transfer"),
    CodeLookup::new("01", "Request for Reversal"),
    CodeLookup::new("02", "Reversal of Transfer"),
    CodeLookup::new("07", "Request for Reversal of a Prior Day Transfer"),
    CodeLookup::new("08", "Reversal of a Prior Day Transfer"),
    CodeLookup::new("20", "As-of Adjustment"),
    CodeLookup::new("31", "Request for Credit (Drawdown)"),
    CodeLookup::new("32", "Funds Transfer Honoring a Request for Credit"),
    CodeLookup::new("33", "Refusal to Honor a Request for Credit"),
    CodeLookup::new("90", "Service Message"),
];
